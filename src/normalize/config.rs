//! Normalization configuration options

use serde::{Deserialize, Serialize};

/// What to do with an allele containing characters outside `{A,C,G,T,N,-}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvalidAllelePolicy {
    /// Log and drop that allele; the rest of the record is still processed
    #[default]
    Skip,
    /// Return the error to the caller
    Propagate,
}

impl std::fmt::Display for InvalidAllelePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidAllelePolicy::Skip => write!(f, "skip"),
            InvalidAllelePolicy::Propagate => write!(f, "propagate"),
        }
    }
}

impl std::str::FromStr for InvalidAllelePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" | "drop" => Ok(InvalidAllelePolicy::Skip),
            "propagate" | "error" => Ok(InvalidAllelePolicy::Propagate),
            _ => Err(format!("Invalid allele policy: {}", s)),
        }
    }
}

/// Configuration for variant normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Handling of alleles with characters outside the nucleotide alphabet
    pub invalid_allele_policy: InvalidAllelePolicy,

    /// Remove repeated variants from an assembly's output
    ///
    /// Different concrete alleles of one ambiguous call can collapse to the
    /// same variant, e.g. when two of them fail normalization and pass
    /// through with identical coordinates after uppercasing.
    pub deduplicate_expansions: bool,
}

impl NormalizeConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the invalid-allele policy
    pub fn with_invalid_allele_policy(mut self, policy: InvalidAllelePolicy) -> Self {
        self.invalid_allele_policy = policy;
        self
    }

    /// Enable or disable removal of repeated variants
    pub fn with_deduplication(mut self, deduplicate: bool) -> Self {
        self.deduplicate_expansions = deduplicate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NormalizeConfig::default();
        assert_eq!(config.invalid_allele_policy, InvalidAllelePolicy::Skip);
        assert!(!config.deduplicate_expansions);
    }

    #[test]
    fn test_builders() {
        let config = NormalizeConfig::new()
            .with_invalid_allele_policy(InvalidAllelePolicy::Propagate)
            .with_deduplication(true);
        assert_eq!(config.invalid_allele_policy, InvalidAllelePolicy::Propagate);
        assert!(config.deduplicate_expansions);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "Propagate".parse::<InvalidAllelePolicy>().unwrap(),
            InvalidAllelePolicy::Propagate
        );
        assert_eq!(
            "skip".parse::<InvalidAllelePolicy>().unwrap(),
            InvalidAllelePolicy::Skip
        );
        assert!("ignore".parse::<InvalidAllelePolicy>().is_err());
        assert_eq!(InvalidAllelePolicy::Propagate.to_string(), "propagate");
    }

    #[test]
    fn test_serde_round_trip_uses_lowercase_policy() {
        let config = NormalizeConfig::new().with_invalid_allele_policy(InvalidAllelePolicy::Propagate);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"propagate\""));
        let parsed: NormalizeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}

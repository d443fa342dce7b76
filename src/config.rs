//! Configuration file support for ferro-vcfnorm.
//!
//! This module provides loading of `.ferro.toml` configuration files
//! which name the reference FASTA for each assembly and tune how
//! normalization treats problem alleles.
//!
//! # Example Configuration
//!
//! ```toml
//! [vcf-normalization]
//! invalid-allele = "skip"
//! deduplicate-expansions = false
//!
//! [reference]
//! grch37 = "/refs/GRCh37.fa"
//! grch38 = "/refs/GRCh38.fa"
//! ```
//!
//! # Config File Locations
//!
//! Configuration is searched in this order (first found wins):
//! 1. `.ferro.toml` in current directory
//! 2. `~/.config/ferro/config.toml`
//!
//! Relative reference paths are resolved against the directory holding the
//! config file.

use crate::error::FerroError;
use crate::normalize::{InvalidAllelePolicy, NormalizeConfig};
use crate::reference::GenomeBuild;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Parsed configuration from a .ferro.toml file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FerroConfig {
    /// Normalization section.
    pub vcf_normalization: VcfNormalizationConfig,
    /// Reference FASTA section.
    pub reference: ReferenceConfig,
}

/// `[vcf-normalization]` section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct VcfNormalizationConfig {
    /// Policy for alleles with characters outside the nucleotide alphabet.
    pub invalid_allele: InvalidAllelePolicy,
    /// Remove repeated variants after ambiguity expansion.
    pub deduplicate_expansions: bool,
}

/// `[reference]` section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReferenceConfig {
    /// Indexed FASTA for GRCh37.
    pub grch37: Option<PathBuf>,
    /// Indexed FASTA for GRCh38.
    pub grch38: Option<PathBuf>,
}

impl FerroConfig {
    /// Load configuration from the default locations.
    ///
    /// Searches for config in:
    /// 1. `.ferro.toml` in current directory
    /// 2. `~/.config/ferro/config.toml`
    ///
    /// A file that exists but fails to parse is logged and skipped.
    pub fn load() -> Option<Self> {
        let mut candidates = vec![PathBuf::from(".ferro.toml")];
        if let Some(home) = dirs_home() {
            candidates.push(home.join(".config").join("ferro").join("config.toml"));
        }

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from_path(&path) {
                Ok(config) => {
                    log::debug!("Loaded configuration from {}", path.display());
                    return Some(config);
                }
                Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
            }
        }

        None
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, FerroError> {
        let content = fs::read_to_string(path).map_err(|e| FerroError::Config {
            msg: format!("Failed to read {}: {}", path.display(), e),
        })?;
        let mut config = Self::parse(&content)?;
        if let Some(dir) = path.parent() {
            config.reference.resolve_relative_to(dir);
        }
        Ok(config)
    }

    /// Parse configuration from TOML content.
    pub fn parse(content: &str) -> Result<Self, FerroError> {
        Ok(toml::from_str(content)?)
    }

    /// Convert the normalization section to a NormalizeConfig.
    pub fn to_normalize_config(&self) -> NormalizeConfig {
        NormalizeConfig::new()
            .with_invalid_allele_policy(self.vcf_normalization.invalid_allele)
            .with_deduplication(self.vcf_normalization.deduplicate_expansions)
    }

    /// The configured reference FASTA for an assembly.
    pub fn reference_path(&self, build: GenomeBuild) -> Option<&Path> {
        match build {
            GenomeBuild::GRCh37 => self.reference.grch37.as_deref(),
            GenomeBuild::GRCh38 => self.reference.grch38.as_deref(),
        }
    }

    /// Override the invalid-allele policy, e.g. from a command-line flag.
    pub fn with_invalid_allele(mut self, policy: Option<InvalidAllelePolicy>) -> Self {
        if let Some(policy) = policy {
            self.vcf_normalization.invalid_allele = policy;
        }
        self
    }
}

impl ReferenceConfig {
    fn resolve_relative_to(&mut self, dir: &Path) {
        for path in [&mut self.grch37, &mut self.grch38].into_iter().flatten() {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = FerroConfig::parse("").unwrap();
        assert_eq!(config, FerroConfig::default());
        assert_eq!(config.to_normalize_config(), NormalizeConfig::default());
    }

    #[test]
    fn test_parse_normalization_section() {
        let content = r#"
[vcf-normalization]
invalid-allele = "propagate"
deduplicate-expansions = true
"#;
        let config = FerroConfig::parse(content).unwrap();
        let normalize = config.to_normalize_config();
        assert_eq!(normalize.invalid_allele_policy, InvalidAllelePolicy::Propagate);
        assert!(normalize.deduplicate_expansions);
    }

    #[test]
    fn test_parse_reference_section() {
        let content = r#"
[reference]
grch38 = "/refs/GRCh38.fa"
"#;
        let config = FerroConfig::parse(content).unwrap();
        assert_eq!(
            config.reference_path(GenomeBuild::GRCh38),
            Some(Path::new("/refs/GRCh38.fa"))
        );
        assert!(config.reference_path(GenomeBuild::GRCh37).is_none());
    }

    #[test]
    fn test_comments_ignored() {
        let content = r#"
# This is a comment
[vcf-normalization]
# Another comment
invalid-allele = "skip"
"#;
        let config = FerroConfig::parse(content).unwrap();
        assert_eq!(config.vcf_normalization.invalid_allele, InvalidAllelePolicy::Skip);
    }

    #[test]
    fn test_invalid_policy_is_config_error() {
        let content = r#"
[vcf-normalization]
invalid-allele = "ignore"
"#;
        let err = FerroConfig::parse(content).unwrap_err();
        assert!(matches!(err, FerroError::Config { .. }));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = FerroConfig::parse("[reference]\nhg19 = \"x.fa\"\n").unwrap_err();
        assert!(matches!(err, FerroError::Config { .. }));
    }

    #[test]
    fn test_cli_override() {
        let config = FerroConfig::default().with_invalid_allele(Some(InvalidAllelePolicy::Propagate));
        assert_eq!(
            config.to_normalize_config().invalid_allele_policy,
            InvalidAllelePolicy::Propagate
        );
        let unchanged = config.clone().with_invalid_allele(None);
        assert_eq!(unchanged, config);
    }

    #[test]
    fn test_load_from_path_resolves_relative_references() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".ferro.toml");
        std::fs::write(
            &path,
            "[reference]\ngrch37 = \"refs/b37.fa\"\ngrch38 = \"/abs/b38.fa\"\n",
        )
        .unwrap();

        let config = FerroConfig::load_from_path(&path).unwrap();
        assert_eq!(
            config.reference_path(GenomeBuild::GRCh37),
            Some(dir.path().join("refs/b37.fa").as_path())
        );
        assert_eq!(
            config.reference_path(GenomeBuild::GRCh38),
            Some(Path::new("/abs/b38.fa"))
        );
    }

    #[test]
    fn test_load_from_missing_path() {
        let err = FerroConfig::load_from_path(Path::new("/nonexistent/.ferro.toml")).unwrap_err();
        assert!(matches!(err, FerroError::Config { .. }));
    }
}

//! Per-assembly normalization
//!
//! Expands ambiguous alternate alleles and normalizes each concrete allele
//! against one assembly's reference, degrading to the unnormalized variant
//! when the reference disagrees or has no data.

use std::collections::HashSet;

use crate::error::FerroError;
use crate::normalize::config::{InvalidAllelePolicy, NormalizeConfig};
use crate::normalize::iupac::{expand_ambiguous, has_ambiguity};
use crate::normalize::left_align::left_align;
use crate::reference::{GenomeBuild, SequenceProvider};
use crate::vcf::VcfVariant;

/// Normalizer for the variants of a single assembly
///
/// Without a provider only ambiguity expansion is applied.
#[derive(Debug, Clone)]
pub struct AssemblyNormalizer<P> {
    build: GenomeBuild,
    provider: Option<P>,
    config: NormalizeConfig,
}

impl<P: SequenceProvider> AssemblyNormalizer<P> {
    /// Create a normalizer with default configuration
    pub fn new(build: GenomeBuild, provider: Option<P>) -> Self {
        Self::with_config(build, provider, NormalizeConfig::default())
    }

    /// Create a normalizer with custom configuration
    pub fn with_config(build: GenomeBuild, provider: Option<P>, config: NormalizeConfig) -> Self {
        Self {
            build,
            provider,
            config,
        }
    }

    /// Create a normalizer that only expands ambiguity codes
    pub fn without_provider(build: GenomeBuild) -> Self {
        Self::new(build, None)
    }

    /// The assembly this normalizer serves
    pub fn build(&self) -> GenomeBuild {
        self.build
    }

    /// The reference provider, if one is configured
    pub fn provider(&self) -> Option<&P> {
        self.provider.as_ref()
    }

    /// Get the configuration
    pub fn config(&self) -> &NormalizeConfig {
        &self.config
    }

    /// Normalize one variant into its concrete, left-aligned forms
    ///
    /// Returns one variant per concrete alternate allele. Alleles whose
    /// reference check or left extension fails are returned unnormalized.
    /// Alleles with invalid characters are dropped or reported according to
    /// [`InvalidAllelePolicy`].
    ///
    /// # Errors
    ///
    /// - [`FerroError::InvalidNucleotideSequence`] under
    ///   [`InvalidAllelePolicy::Propagate`]
    /// - any non-recoverable provider error (I/O failures)
    pub fn normalize(&self, variant: &VcfVariant) -> Result<Vec<VcfVariant>, FerroError> {
        let upper_alt = variant.alternate.to_ascii_uppercase();
        let candidates: Vec<VcfVariant> = if has_ambiguity(&upper_alt) {
            expand_ambiguous(&upper_alt)
                .map(|alt| variant.with_alternate(alt))
                .collect()
        } else {
            vec![variant.clone()]
        };

        let normalized = match &self.provider {
            None => {
                log::debug!(
                    "No {} reference configured; {} left unnormalized",
                    self.build,
                    variant
                );
                candidates
            }
            Some(provider) => {
                let mut normalized = Vec::with_capacity(candidates.len());
                for candidate in candidates {
                    if let Some(v) = self.normalize_concrete(provider, candidate)? {
                        normalized.push(v);
                    }
                }
                normalized
            }
        };

        if self.config.deduplicate_expansions {
            Ok(dedup_in_order(normalized))
        } else {
            Ok(normalized)
        }
    }

    /// Normalize a variant whose alternate allele has no ambiguity codes
    ///
    /// `Ok(None)` means the allele was dropped.
    fn normalize_concrete(
        &self,
        provider: &P,
        candidate: VcfVariant,
    ) -> Result<Option<VcfVariant>, FerroError> {
        match left_align(provider, &candidate) {
            Ok(normalized) => Ok(Some(normalized)),
            Err(err @ FerroError::InvalidNucleotideSequence { .. }) => {
                match self.config.invalid_allele_policy {
                    InvalidAllelePolicy::Skip => {
                        log::warn!("Skipping {} on {}: {}", candidate, self.build, err);
                        Ok(None)
                    }
                    InvalidAllelePolicy::Propagate => Err(err),
                }
            }
            Err(err) if err.is_recoverable() => {
                log::warn!(
                    "Keeping {} unnormalized on {}: {}",
                    candidate,
                    self.build,
                    err.detailed_message()
                );
                Ok(Some(candidate))
            }
            Err(err) => Err(err),
        }
    }
}

/// Drop repeated variants, keeping the first occurrence of each
fn dedup_in_order(variants: Vec<VcfVariant>) -> Vec<VcfVariant> {
    let mut seen = HashSet::new();
    variants
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::MockProvider;

    fn normalizer() -> AssemblyNormalizer<MockProvider> {
        AssemblyNormalizer::new(GenomeBuild::GRCh38, Some(MockProvider::with_test_data()))
    }

    #[test]
    fn test_concrete_allele_normalized_once() {
        let out = normalizer()
            .normalize(&VcfVariant::new("chr1", 10, "AAG", "AG"))
            .unwrap();
        assert_eq!(out, vec![VcfVariant::new("chr1", 6, "CA", "C")]);
    }

    #[test]
    fn test_ambiguous_alternate_expands() {
        // chr1:2 is A; R expands to A (ref == alt, passed through) and G
        let out = normalizer()
            .normalize(&VcfVariant::new("chr1", 2, "A", "R"))
            .unwrap();
        assert_eq!(
            out,
            vec![
                VcfVariant::new("chr1", 2, "A", "A"),
                VcfVariant::new("chr1", 2, "A", "G"),
            ]
        );
    }

    #[test]
    fn test_lowercase_ambiguity_is_expanded() {
        let out = normalizer()
            .normalize(&VcfVariant::new("chr1", 2, "A", "y"))
            .unwrap();
        assert_eq!(
            out,
            vec![
                VcfVariant::new("chr1", 2, "A", "C"),
                VcfVariant::new("chr1", 2, "A", "T"),
            ]
        );
    }

    #[test]
    fn test_wrong_ref_passes_through() {
        let variant = VcfVariant::new("chr1", 2, "C", "G");
        let out = normalizer().normalize(&variant).unwrap();
        assert_eq!(out, vec![variant]);
    }

    #[test]
    fn test_missing_contig_passes_through() {
        let variant = VcfVariant::new("chr22", 100, "AC", "A");
        let out = normalizer().normalize(&variant).unwrap();
        assert_eq!(out, vec![variant]);
    }

    #[test]
    fn test_before_contig_start_passes_through() {
        let variant = VcfVariant::new("chr1", 1, "G", "-");
        let out = normalizer().normalize(&variant).unwrap();
        assert_eq!(out, vec![variant]);
    }

    #[test]
    fn test_without_provider_only_expands() {
        let normalizer = AssemblyNormalizer::<MockProvider>::without_provider(GenomeBuild::GRCh37);
        let out = normalizer
            .normalize(&VcfVariant::new("chr1", 10, "AAG", "AK"))
            .unwrap();
        assert_eq!(
            out,
            vec![
                VcfVariant::new("chr1", 10, "AAG", "AG"),
                VcfVariant::new("chr1", 10, "AAG", "AT"),
            ]
        );
    }

    #[test]
    fn test_invalid_allele_skipped_by_default() {
        let out = normalizer()
            .normalize(&VcfVariant::new("chr1", 2, "Z", "A"))
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_invalid_allele_propagated() {
        let normalizer = AssemblyNormalizer::with_config(
            GenomeBuild::GRCh38,
            Some(MockProvider::with_test_data()),
            NormalizeConfig::new().with_invalid_allele_policy(InvalidAllelePolicy::Propagate),
        );
        let err = normalizer
            .normalize(&VcfVariant::new("chr1", 2, "Z", "A"))
            .unwrap_err();
        assert!(matches!(err, FerroError::InvalidNucleotideSequence { .. }));
    }

    #[test]
    fn test_non_ascii_alternate_is_not_expanded() {
        let variant = VcfVariant::new("chr1", 2, "A", "ß");
        assert!(normalizer().normalize(&variant).unwrap().is_empty());

        let normalizer = AssemblyNormalizer::with_config(
            GenomeBuild::GRCh38,
            Some(MockProvider::with_test_data()),
            NormalizeConfig::new().with_invalid_allele_policy(InvalidAllelePolicy::Propagate),
        );
        let err = normalizer.normalize(&variant).unwrap_err();
        assert!(matches!(err, FerroError::InvalidNucleotideSequence { .. }));
    }

    #[test]
    fn test_position_past_coordinate_range_passes_through() {
        let variant = VcfVariant::new("chr1", u64::MAX, "AC", "A");
        let out = normalizer().normalize(&variant).unwrap();
        assert_eq!(out, vec![variant]);
    }

    #[test]
    fn test_dedup_in_order_keeps_first_occurrence() {
        let a = VcfVariant::new("chr1", 6, "CA", "C");
        let b = VcfVariant::new("chr1", 2, "A", "G");
        let out = dedup_in_order(vec![a.clone(), b.clone(), a.clone(), b.clone()]);
        assert_eq!(out, vec![a, b]);
    }

    #[test]
    fn test_deduplication_preserves_distinct_expansions() {
        let dedup = AssemblyNormalizer::with_config(
            GenomeBuild::GRCh38,
            Some(MockProvider::with_test_data()),
            NormalizeConfig::new().with_deduplication(true),
        );
        let variant = VcfVariant::new("chr1", 2, "A", "B");
        assert_eq!(
            dedup.normalize(&variant).unwrap(),
            normalizer().normalize(&variant).unwrap()
        );
        assert_eq!(dedup.normalize(&variant).unwrap().len(), 3);
    }
}

//! Mock sequence provider for testing

use crate::error::FerroError;
use crate::reference::provider::SequenceProvider;
use std::collections::HashMap;
use std::path::Path;

/// A stretch of contig sequence starting at a 0-based offset
#[derive(Debug, Clone)]
struct Region {
    offset: u64,
    bases: String,
}

/// Mock sequence provider holding contig sequence in memory
///
/// Each contig is a single region that may start anywhere, so tests can
/// register only the bases around a variant instead of a whole chromosome.
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    regions: HashMap<String, Region>,
}

impl MockProvider {
    /// Create an empty mock provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Load contigs from a JSON object of `{"chr1": "ACGT...", ...}`
    pub fn from_json(path: &Path) -> Result<Self, FerroError> {
        let content = std::fs::read_to_string(path)?;
        let contigs: HashMap<String, String> = serde_json::from_str(&content)?;

        let mut provider = Self::new();
        for (contig, bases) in contigs {
            provider.add_contig(contig, bases);
        }
        Ok(provider)
    }

    /// Add a full contig sequence starting at position 0
    pub fn add_contig(&mut self, contig: impl Into<String>, bases: impl Into<String>) {
        self.add_region(contig, 0, bases);
    }

    /// Add the bases of a contig starting at a 0-based offset
    ///
    /// Replaces any sequence previously registered for the contig.
    pub fn add_region(&mut self, contig: impl Into<String>, offset: u64, bases: impl Into<String>) {
        self.regions.insert(
            contig.into(),
            Region {
                offset,
                bases: bases.into(),
            },
        );
    }

    /// Create a provider with a small test genome
    ///
    /// `chr1` holds a homopolymer and a dinucleotide repeat for indel
    /// left-alignment tests:
    ///
    /// ```text
    /// 1-based: 1234567890123456789012345678901234567890
    /// chr1:    GATTACAAAAAGCTCACACACAGTTGCAGGTACCGTTAAC
    /// ```
    pub fn with_test_data() -> Self {
        let mut provider = Self::new();
        provider.add_contig("chr1", "GATTACAAAAAGCTCACACACAGTTGCAGGTACCGTTAAC");
        provider.add_contig("chr2", "TTTTCCCCGGGGAAAATTTTCCCCGGGGAAAA");
        provider.add_contig("chrX", "ACGTACGTACGTNNNNACGTACGT");
        provider
    }

    /// Get the number of contigs
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Check if provider is empty
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Get all contig names
    pub fn contig_names(&self) -> Vec<&str> {
        self.regions.keys().map(|s| s.as_str()).collect()
    }
}

impl SequenceProvider for MockProvider {
    fn fetch(&self, contig: &str, start: u64, end: u64) -> Result<String, FerroError> {
        let region = self
            .regions
            .get(contig)
            .ok_or_else(|| FerroError::ReferenceNotFound {
                id: contig.to_string(),
            })?;

        let region_end = region.offset + region.bases.len() as u64;
        if start > end || start < region.offset || end > region_end {
            return Err(FerroError::InvalidCoordinates {
                msg: format!(
                    "Position {}-{} out of range for {} (available {}-{})",
                    start, end, contig, region.offset, region_end
                ),
            });
        }

        let from = (start - region.offset) as usize;
        let to = (end - region.offset) as usize;
        Ok(region.bases[from..to].to_string())
    }

    fn has_contig(&self, contig: &str) -> bool {
        self.regions.contains_key(contig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider_with_test_data() {
        let provider = MockProvider::with_test_data();
        assert!(!provider.is_empty());
        assert_eq!(provider.len(), 3);
        assert!(provider.has_contig("chr1"));
        assert!(!provider.has_contig("chr3"));
    }

    #[test]
    fn test_fetch() {
        let provider = MockProvider::with_test_data();
        assert_eq!(provider.fetch("chr1", 0, 7).unwrap(), "GATTACA");
        assert_eq!(provider.fetch("chr1", 3, 3).unwrap(), "");
    }

    #[test]
    fn test_fetch_region_with_offset() {
        let mut provider = MockProvider::new();
        provider.add_region("chr1", 998, "CCAG");
        assert_eq!(provider.fetch("chr1", 999, 1002).unwrap(), "CAG");
        assert_eq!(provider.fetch("chr1", 998, 999).unwrap(), "C");
    }

    #[test]
    fn test_fetch_out_of_range() {
        let mut provider = MockProvider::new();
        provider.add_region("chr1", 998, "CCAG");
        assert!(matches!(
            provider.fetch("chr1", 997, 999),
            Err(FerroError::InvalidCoordinates { .. })
        ));
        assert!(matches!(
            provider.fetch("chr1", 1000, 1003),
            Err(FerroError::InvalidCoordinates { .. })
        ));
    }

    #[test]
    fn test_fetch_unknown_contig() {
        let provider = MockProvider::new();
        assert!(matches!(
            provider.fetch("chr7", 0, 1),
            Err(FerroError::ReferenceNotFound { .. })
        ));
    }

    #[test]
    fn test_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contigs.json");
        std::fs::write(&path, r#"{"chrMT": "GATCACAGGT"}"#).unwrap();

        let provider = MockProvider::from_json(&path).unwrap();
        assert_eq!(provider.fetch("chrMT", 0, 4).unwrap(), "GATC");
    }
}

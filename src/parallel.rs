//! Parallel processing support for ferro-vcfnorm
//!
//! This module provides parallel record normalization using rayon. Enable
//! with the `parallel` feature. Records are independent and providers are
//! read-only, so a single normalizer is shared across worker threads.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "parallel")]
//! # fn main() {
//! use ferro_vcfnorm::parallel::normalize_records_parallel_ok;
//! use ferro_vcfnorm::{ClinVarRecord, GenomeBuild, MockProvider, RecordNormalizer, SequenceLocation};
//!
//! let records = vec![
//!     ClinVarRecord::new("1", "a")
//!         .with_location(GenomeBuild::GRCh38, SequenceLocation::vcf("1", 10, "AAG", "AG")),
//!     ClinVarRecord::new("2", "b")
//!         .with_location(GenomeBuild::GRCh38, SequenceLocation::vcf("1", 2, "A", "R")),
//! ];
//!
//! let normalizer = RecordNormalizer::new(None, Some(MockProvider::with_test_data()));
//! let normalized = normalize_records_parallel_ok(&normalizer, &records);
//! assert_eq!(normalized.len(), 3);
//! # }
//! # #[cfg(not(feature = "parallel"))]
//! # fn main() {}
//! ```

use rayon::prelude::*;

use crate::clinvar::ArchiveRecord;
use crate::error::FerroError;
use crate::normalize::RecordNormalizer;
use crate::reference::SequenceProvider;

/// Normalize multiple records in parallel
///
/// Returns one result per input record, holding that record's normalized
/// copies. Order is preserved.
pub fn normalize_records_parallel<P, R>(
    normalizer: &RecordNormalizer<P>,
    records: &[R],
) -> Vec<Result<Vec<R>, FerroError>>
where
    P: SequenceProvider + Sync,
    R: ArchiveRecord + Send + Sync,
{
    records
        .par_iter()
        .map(|r| normalize_owned(normalizer, r))
        .collect()
}

/// Normalize multiple records in parallel, filtering errors
///
/// Returns the normalized copies of every record that succeeded, flattened
/// in input order.
pub fn normalize_records_parallel_ok<P, R>(normalizer: &RecordNormalizer<P>, records: &[R]) -> Vec<R>
where
    P: SequenceProvider + Sync,
    R: ArchiveRecord + Send + Sync,
{
    records
        .par_iter()
        .filter_map(|r| normalize_owned(normalizer, r).ok())
        .flatten_iter()
        .collect()
}

/// Normalize records on a dedicated thread pool, collecting statistics
///
/// Failed records are logged and counted; their output is omitted.
pub fn normalize_records_with_config<P, R>(
    normalizer: &RecordNormalizer<P>,
    records: &[R],
    config: &ParallelConfig,
) -> Result<(Vec<R>, ParallelStats), FerroError>
where
    P: SequenceProvider + Sync,
    R: ArchiveRecord + Send + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.num_threads)
        .build()
        .map_err(|e| FerroError::Config {
            msg: format!("Failed to build thread pool: {}", e),
        })?;

    let results: Vec<Result<Vec<R>, FerroError>> = pool.install(|| {
        records
            .par_iter()
            .with_min_len(config.chunk_size.max(1))
            .map(|r| normalize_owned(normalizer, r))
            .collect()
    });

    let mut stats = ParallelStats {
        total: results.len(),
        ..Default::default()
    };
    let mut normalized = Vec::with_capacity(records.len());
    for result in results {
        match result {
            Ok(copies) => {
                stats.success += 1;
                stats.emitted += copies.len();
                normalized.extend(copies);
            }
            Err(e) => {
                stats.errors += 1;
                log::warn!("Record failed normalization: {}", e.detailed_message());
            }
        }
    }
    Ok((normalized, stats))
}

fn normalize_owned<P, R>(normalizer: &RecordNormalizer<P>, record: &R) -> Result<Vec<R>, FerroError>
where
    P: SequenceProvider,
    R: ArchiveRecord,
{
    Ok(normalizer
        .normalize(record)?
        .into_iter()
        .map(|copy| copy.into_owned())
        .collect())
}

/// Configuration for parallel batch processing
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Minimum number of records handed to a worker at once
    pub chunk_size: usize,
    /// Number of threads (0 = use rayon default)
    pub num_threads: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            num_threads: 0,
        }
    }
}

impl ParallelConfig {
    /// Create a new parallel configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chunk size for batched processing
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Set the number of threads
    pub fn with_num_threads(mut self, threads: usize) -> Self {
        self.num_threads = threads;
        self
    }
}

/// Statistics from parallel processing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParallelStats {
    /// Total records processed
    pub total: usize,
    /// Records normalized without error
    pub success: usize,
    /// Records that failed
    pub errors: usize,
    /// Normalized records emitted
    pub emitted: usize,
}

impl ParallelStats {
    /// Calculate success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clinvar::{ClinVarRecord, SequenceLocation};
    use crate::normalize::{InvalidAllelePolicy, NormalizeConfig};
    use crate::reference::{GenomeBuild, MockProvider};

    fn records() -> Vec<ClinVarRecord> {
        vec![
            ClinVarRecord::new("1", "a")
                .with_location(GenomeBuild::GRCh38, SequenceLocation::vcf("1", 10, "AAG", "AG")),
            ClinVarRecord::new("2", "b")
                .with_location(GenomeBuild::GRCh38, SequenceLocation::vcf("1", 2, "Z", "A")),
            ClinVarRecord::new("3", "c")
                .with_location(GenomeBuild::GRCh38, SequenceLocation::vcf("1", 2, "A", "R")),
        ]
    }

    fn strict_normalizer() -> RecordNormalizer<MockProvider> {
        RecordNormalizer::with_config(
            None,
            Some(MockProvider::with_test_data()),
            NormalizeConfig::new().with_invalid_allele_policy(InvalidAllelePolicy::Propagate),
        )
    }

    #[test]
    fn test_normalize_records_parallel_preserves_order() {
        let results = normalize_records_parallel(&strict_normalizer(), &records());
        assert_eq!(results.len(), 3);
        let first = results[0].as_ref().unwrap();
        assert_eq!(first[0].grch38_locations[0].position_vcf, Some(6));
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_normalize_records_parallel_ok() {
        let normalized = normalize_records_parallel_ok(&strict_normalizer(), &records());
        let ids: Vec<&str> = normalized.iter().map(|r| r.variation_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3", "3"]);
    }

    #[test]
    fn test_normalize_records_with_config_stats() {
        let config = ParallelConfig::new().with_chunk_size(1).with_num_threads(2);
        let (normalized, stats) =
            normalize_records_with_config(&strict_normalizer(), &records(), &config).unwrap();
        assert_eq!(normalized.len(), 3);
        assert_eq!(
            stats,
            ParallelStats {
                total: 3,
                success: 2,
                errors: 1,
                emitted: 3,
            }
        );
        assert!((stats.success_rate() - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_stats_empty() {
        assert_eq!(ParallelStats::default().success_rate(), 0.0);
    }
}

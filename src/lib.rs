// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-vcfnorm: VCF allele normalization for archive variant records
//!
//! Part of the ferro bioinformatics toolkit.
//!
//! Archive records (e.g. ClinVar) describe the same variant against GRCh37
//! and GRCh38 with alleles that may be right-aligned, padded, hyphenated or
//! contain IUPAC ambiguity codes. This crate left-aligns and trims those
//! alleles against a reference, expands ambiguity codes into concrete
//! alleles, and pairs the per-assembly results back into records.
//!
//! # Example
//!
//! ```
//! use ferro_vcfnorm::{normalize_alleles, MockProvider};
//!
//! let mut provider = MockProvider::new();
//! provider.add_region("chr1", 998, "CCAG");
//!
//! let normalized = normalize_alleles(&provider, "chr1", 1000, "CAG", "CTG").unwrap();
//! assert_eq!(normalized.pos, 1001);
//! assert_eq!(normalized.reference, "A");
//! assert_eq!(normalized.alternate, "T");
//! ```

pub mod clinvar;
pub mod config;
pub mod coords;
pub mod error;
pub mod normalize;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod reference;
pub mod vcf;

// Re-export commonly used types
pub use clinvar::{ArchiveRecord, ClinVarRecord, SequenceLocation};
pub use config::FerroConfig;
pub use error::FerroError;
pub use normalize::{
    expand_ambiguous, left_align, normalize_alleles, AssemblyNormalizer, InvalidAllelePolicy,
    MatchedVariantPair, NormalizeConfig, RecordNormalizer,
};
pub use reference::{FastaProvider, GenomeBuild, MockProvider, SequenceProvider};
pub use vcf::VcfVariant;

/// Result type alias for ferro-vcfnorm operations
pub type Result<T> = std::result::Result<T, FerroError>;

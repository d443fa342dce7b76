//! ClinVar archive records.
//!
//! Normalization operates on any type implementing [`ArchiveRecord`]: a
//! record holding, per assembly, an ordered list of [`SequenceLocation`]
//! entries. [`ClinVarRecord`] is the provided implementation.
//!
//! # Examples
//!
//! ```
//! use ferro_vcfnorm::clinvar::{ArchiveRecord, ClinVarRecord, SequenceLocation};
//! use ferro_vcfnorm::GenomeBuild;
//!
//! let record = ClinVarRecord::new("12345", "NM_000088.3:c.10A>G")
//!     .with_location(GenomeBuild::GRCh38, SequenceLocation::vcf("17", 50201631, "T", "C"));
//!
//! assert_eq!(record.locations(GenomeBuild::GRCh38).len(), 1);
//! assert!(record.locations(GenomeBuild::GRCh37).is_empty());
//! ```

mod types;

pub use types::{ArchiveRecord, ClinVarRecord, SequenceLocation};

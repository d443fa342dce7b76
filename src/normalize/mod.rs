//! Normalization engine
//!
//! Brings VCF-convention variants into their left-aligned, minimal form and
//! applies that across the GRCh37 and GRCh38 coordinates of archive records.
//!
//! The layers, bottom-up:
//!
//! | Layer | Entry point | Reference access |
//! |-------|-------------|------------------|
//! | Core trim-and-shift | [`left_align`] | yes |
//! | IUPAC expansion | [`expand_ambiguous`] | no |
//! | One assembly | [`AssemblyNormalizer`] | optional |
//! | Whole record | [`RecordNormalizer`] | optional, per assembly |
//!
//! Positions are 1-based throughout this module; the translation to the
//! provider's 0-based half-open intervals happens in [`crate::coords`].

pub mod assembly;
pub mod config;
pub mod iupac;
pub mod left_align;
pub mod record;

pub use assembly::AssemblyNormalizer;
pub use config::{InvalidAllelePolicy, NormalizeConfig};
pub use iupac::{expand_ambiguous, has_ambiguity, AmbiguityExpansion};
pub use left_align::{left_align, normalize_alleles};
pub use record::{extract_variant, match_variants, MatchedVariantPair, RecordNormalizer};

//! VCF-convention variant representation
//!
//! A variant is `(chromosome, 1-based position, reference, alternate)`.

pub mod contig;
pub mod variant;

pub use contig::{is_primary_contig, ucsc_contig};
pub use variant::VcfVariant;

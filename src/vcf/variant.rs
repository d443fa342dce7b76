//! VCF-convention variant coordinates

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single variant call in VCF convention
///
/// `pos` is the 1-based position of the first reference base. Either allele
/// may be empty for a pure insertion or deletion before normalization, and
/// archive input may use `-` for an empty allele.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VcfVariant {
    /// Contig name (e.g., "chr1", "chrX", "chrMT")
    pub chrom: String,

    /// 1-based position of the first base in the reference allele
    pub pos: u64,

    /// Reference allele
    pub reference: String,

    /// Alternate allele
    pub alternate: String,
}

impl VcfVariant {
    /// Create a new variant
    pub fn new(
        chrom: impl Into<String>,
        pos: u64,
        reference: impl Into<String>,
        alternate: impl Into<String>,
    ) -> Self {
        Self {
            chrom: chrom.into(),
            pos,
            reference: reference.into(),
            alternate: alternate.into(),
        }
    }

    /// The same coordinates with a different alternate allele
    pub fn with_alternate(&self, alternate: impl Into<String>) -> Self {
        Self {
            alternate: alternate.into(),
            ..self.clone()
        }
    }

    /// `chrom:pos`, used to locate the variant in log messages and errors
    pub fn location(&self) -> String {
        format!("{}:{}", self.chrom, self.pos)
    }

    /// Check if this is a single nucleotide variant
    pub fn is_snv(&self) -> bool {
        self.reference.len() == 1 && self.alternate.len() == 1
    }

    /// Check if this is an insertion (ref shorter than alt)
    pub fn is_insertion(&self) -> bool {
        self.reference.len() < self.alternate.len()
    }

    /// Check if this is a deletion (ref longer than alt)
    pub fn is_deletion(&self) -> bool {
        self.reference.len() > self.alternate.len()
    }
}

impl fmt::Display for VcfVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let allele = |a: &str| if a.is_empty() { "-".to_string() } else { a.to_string() };
        write!(
            f,
            "{}:{}:{}>{}",
            self.chrom,
            self.pos,
            allele(&self.reference),
            allele(&self.alternate)
        )
    }
}

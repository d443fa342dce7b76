//! Sequence provider trait
//!
//! Defines the interface for accessing reference genome bases.

use std::sync::Arc;

use crate::error::FerroError;

/// Trait for providing reference sequence data
///
/// Implementations are read-only and are owned by the caller; the
/// normalizers only borrow them. Implementations include:
/// - [`MockProvider`](crate::reference::MockProvider) for testing
/// - [`FastaProvider`](crate::reference::FastaProvider) for indexed FASTA files
pub trait SequenceProvider {
    /// Fetch a region of a contig
    ///
    /// # Arguments
    ///
    /// * `contig` - Contig name (e.g., "chr1", "chrX", "chrMT")
    /// * `start` - 0-based start position
    /// * `end` - 0-based end position (exclusive)
    fn fetch(&self, contig: &str, start: u64, end: u64) -> Result<String, FerroError>;

    /// Check if the provider has sequence for a contig
    fn has_contig(&self, contig: &str) -> bool {
        self.fetch(contig, 0, 1).is_ok()
    }
}

impl<P: SequenceProvider + ?Sized> SequenceProvider for &P {
    fn fetch(&self, contig: &str, start: u64, end: u64) -> Result<String, FerroError> {
        (**self).fetch(contig, start, end)
    }

    fn has_contig(&self, contig: &str) -> bool {
        (**self).has_contig(contig)
    }
}

/// Blanket implementation for boxed trait objects
impl SequenceProvider for Box<dyn SequenceProvider> {
    fn fetch(&self, contig: &str, start: u64, end: u64) -> Result<String, FerroError> {
        (**self).fetch(contig, start, end)
    }

    fn has_contig(&self, contig: &str) -> bool {
        (**self).has_contig(contig)
    }
}

/// Blanket implementation for boxed thread-safe trait objects
impl SequenceProvider for Box<dyn SequenceProvider + Send + Sync> {
    fn fetch(&self, contig: &str, start: u64, end: u64) -> Result<String, FerroError> {
        (**self).fetch(contig, start, end)
    }

    fn has_contig(&self, contig: &str) -> bool {
        (**self).has_contig(contig)
    }
}

impl<P: SequenceProvider + ?Sized> SequenceProvider for Arc<P> {
    fn fetch(&self, contig: &str, start: u64, end: u64) -> Result<String, FerroError> {
        (**self).fetch(contig, start, end)
    }

    fn has_contig(&self, contig: &str) -> bool {
        (**self).has_contig(contig)
    }
}

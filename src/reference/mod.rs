//! Reference data abstraction
//!
//! Provides the [`SequenceProvider`] trait and implementations for
//! accessing reference genome bases.

pub mod build;
pub mod fasta;
pub mod mock;
pub mod provider;

pub use build::GenomeBuild;
#[cfg(feature = "mmap")]
pub use fasta::MmapFastaProvider;
pub use fasta::FastaProvider;
pub use mock::MockProvider;
pub use provider::SequenceProvider;

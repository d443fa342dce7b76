//! Type-safe coordinate system wrappers
//!
//! VCF positions are 1-based while sequence providers take 0-based
//! half-open intervals. These newtypes make the basis explicit at the
//! boundary between the two.
//!
//! | Type | Basis | Use Cases |
//! |------|-------|-----------|
//! | [`ZeroBasedPos`] | 0-based | Provider fetches, FASTA offsets |
//! | [`OneBasedPos`] | 1-based | VCF POS, archive positions |
//!
//! # Examples
//!
//! ```
//! use ferro_vcfnorm::coords::{OneBasedPos, ZeroBasedPos};
//!
//! let ob = OneBasedPos::new(100);
//! assert_eq!(ob.to_zero_based(), ZeroBasedPos::new(99));
//! assert_eq!(ob.to_zero_based().to_one_based(), ob);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 0-based position (array-style indexing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZeroBasedPos(u64);

/// A 1-based position (VCF POS)
///
/// # Invariant
///
/// Position must be >= 1. Position 0 is invalid in 1-based systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OneBasedPos(u64);

impl ZeroBasedPos {
    /// Create a new 0-based position
    #[inline]
    pub const fn new(pos: u64) -> Self {
        Self(pos)
    }

    /// Get the raw value
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Convert to 1-based position
    #[inline]
    pub const fn to_one_based(self) -> OneBasedPos {
        OneBasedPos(self.0 + 1)
    }
}

impl OneBasedPos {
    /// Create a new 1-based position
    ///
    /// # Panics
    ///
    /// Panics if `pos` is 0. Use [`OneBasedPos::try_new`] for fallible
    /// construction.
    #[inline]
    pub const fn new(pos: u64) -> Self {
        assert!(pos > 0, "1-based position cannot be 0");
        Self(pos)
    }

    /// Create a new 1-based position, returning None for 0
    #[inline]
    pub const fn try_new(pos: u64) -> Option<Self> {
        if pos == 0 {
            None
        } else {
            Some(Self(pos))
        }
    }

    /// Get the raw value
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Convert to 0-based position
    #[inline]
    pub const fn to_zero_based(self) -> ZeroBasedPos {
        ZeroBasedPos(self.0 - 1)
    }

    /// The position of the preceding base, if there is one
    #[inline]
    pub const fn predecessor(self) -> Option<Self> {
        Self::try_new(self.0 - 1)
    }
}

impl fmt::Display for ZeroBasedPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for OneBasedPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 0-based half-open interval covered by an allele of `len` bases at VCF `pos`
///
/// Returns `None` if the interval end does not fit in a `u64`.
///
/// # Examples
///
/// ```
/// use ferro_vcfnorm::coords::{vcf_allele_interval, OneBasedPos};
///
/// assert_eq!(vcf_allele_interval(OneBasedPos::new(1000), 3), Some((999, 1002)));
/// assert_eq!(vcf_allele_interval(OneBasedPos::new(u64::MAX), 2), None);
/// ```
#[inline]
pub fn vcf_allele_interval(pos: OneBasedPos, len: usize) -> Option<(u64, u64)> {
    let start = pos.to_zero_based().value();
    let end = start.checked_add(u64::try_from(len).ok()?)?;
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let zb = ZeroBasedPos::new(41);
        assert_eq!(zb.to_one_based().value(), 42);
        assert_eq!(zb.to_one_based().to_zero_based(), zb);
    }

    #[test]
    fn test_try_new_rejects_zero() {
        assert!(OneBasedPos::try_new(0).is_none());
        assert_eq!(OneBasedPos::try_new(5).map(|p| p.value()), Some(5));
    }

    #[test]
    #[should_panic(expected = "cannot be 0")]
    fn test_new_panics_on_zero() {
        let _ = OneBasedPos::new(0);
    }

    #[test]
    fn test_predecessor() {
        assert_eq!(OneBasedPos::new(10).predecessor(), Some(OneBasedPos::new(9)));
        assert_eq!(OneBasedPos::new(1).predecessor(), None);
    }

    #[test]
    fn test_vcf_allele_interval() {
        assert_eq!(vcf_allele_interval(OneBasedPos::new(1), 1), Some((0, 1)));
        assert_eq!(vcf_allele_interval(OneBasedPos::new(999), 1), Some((998, 999)));
        assert_eq!(vcf_allele_interval(OneBasedPos::new(50), 0), Some((49, 49)));
    }

    #[test]
    fn test_vcf_allele_interval_at_end_of_range() {
        let last = OneBasedPos::new(u64::MAX);
        assert_eq!(vcf_allele_interval(last, 1), Some((u64::MAX - 1, u64::MAX)));
        assert_eq!(vcf_allele_interval(last, 2), None);
    }
}

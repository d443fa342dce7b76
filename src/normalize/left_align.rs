//! Left-alignment and trimming of VCF alleles
//!
//! Implementation of the trim-and-shift algorithm that brings a
//! `(pos, ref, alt)` triple into its left-aligned, minimal form.
//!
//! # Coordinate System
//!
//! | Value | Basis | Notes |
//! |-------|-------|-------|
//! | `VcfVariant::pos` | 1-based | First base of the reference allele |
//! | Provider fetch | 0-based | Half-open `[start, end)` |
//!
//! The reference allele at `pos` covers `[pos - 1, pos - 1 + len(ref))` and
//! the base preceding `pos` is `[pos - 2, pos - 1)`.

use crate::coords::{vcf_allele_interval, OneBasedPos};
use crate::error::FerroError;
use crate::reference::SequenceProvider;
use crate::vcf::VcfVariant;

/// Characters allowed in an allele before normalization
fn is_allowed_allele_char(c: char) -> bool {
    matches!(c, 'A' | 'C' | 'G' | 'T' | 'N' | '-')
}

/// Check if a single-base allele is a concrete nucleotide
fn is_concrete_base(allele: &str) -> bool {
    matches!(allele, "A" | "C" | "G" | "T")
}

/// Uppercase an allele, validate its alphabet and map a lone `-` to empty
fn prepare_allele(allele: &str) -> Result<String, FerroError> {
    let upper = allele.to_ascii_uppercase();
    if !upper.chars().all(is_allowed_allele_char) {
        return Err(FerroError::InvalidNucleotideSequence { sequence: upper });
    }
    if upper == "-" {
        Ok(String::new())
    } else {
        Ok(upper)
    }
}

/// Interval of an allele at `pos`, rejecting positions at the end of the `u64` range
fn allele_interval(chrom: &str, pos: OneBasedPos, len: usize) -> Result<(u64, u64), FerroError> {
    vcf_allele_interval(pos, len).ok_or_else(|| FerroError::InvalidCoordinates {
        msg: format!("Allele of {} bases at {}:{} overflows the coordinate range", len, chrom, pos),
    })
}

/// Fetch the single base immediately before `pos`
fn preceding_base<P: SequenceProvider + ?Sized>(
    provider: &P,
    chrom: &str,
    pos: u64,
) -> Result<String, FerroError> {
    let prev = OneBasedPos::try_new(pos)
        .and_then(OneBasedPos::predecessor)
        .ok_or_else(|| FerroError::BeforeContigStart {
            contig: chrom.to_string(),
            pos,
        })?;
    let (start, end) = allele_interval(chrom, prev, 1)?;
    let base = provider.fetch(chrom, start, end)?.to_ascii_uppercase();
    if base.len() != 1 {
        return Err(FerroError::InvalidCoordinates {
            msg: format!(
                "Expected one base at {}:{}-{}, got '{}'",
                chrom, start, end, base
            ),
        });
    }
    Ok(base)
}

/// Normalize a variant to its left-aligned, minimal representation
///
/// The alternate allele must not contain IUPAC ambiguity codes; expand
/// those first with [`expand_ambiguous`](crate::normalize::expand_ambiguous).
///
/// # Errors
///
/// - [`FerroError::InvalidNucleotideSequence`] if an allele contains a
///   character outside `{A,C,G,T,N,-}`
/// - [`FerroError::WrongRef`] if the reference allele does not match the
///   provider's sequence at `pos`
/// - [`FerroError::RefEqualsAlt`] if the alleles are identical
/// - [`FerroError::BeforeContigStart`] if left extension reaches base 1
/// - provider errors for missing contigs or out-of-range intervals
///
/// # Examples
///
/// ```
/// use ferro_vcfnorm::{left_align, MockProvider, VcfVariant};
///
/// let provider = MockProvider::with_test_data();
/// // Deleting one A from the AAAAA run at chr1:7-11 left-aligns to the
/// // base before the run.
/// let variant = VcfVariant::new("chr1", 10, "AA", "A");
/// let normalized = left_align(&provider, &variant).unwrap();
/// assert_eq!(normalized, VcfVariant::new("chr1", 6, "CA", "C"));
/// ```
pub fn left_align<P: SequenceProvider + ?Sized>(
    provider: &P,
    variant: &VcfVariant,
) -> Result<VcfVariant, FerroError> {
    let chrom = variant.chrom.as_str();
    let mut reference = prepare_allele(&variant.reference)?;
    let mut alternate = prepare_allele(&variant.alternate)?;
    let mut pos = variant.pos;

    if !reference.is_empty() {
        let anchor = OneBasedPos::try_new(pos).ok_or_else(|| FerroError::InvalidCoordinates {
            msg: format!("VCF position must be >= 1 at {}", variant.location()),
        })?;
        let (start, end) = allele_interval(chrom, anchor, reference.len())?;
        let actual = provider.fetch(chrom, start, end)?.to_ascii_uppercase();
        if actual != reference {
            return Err(FerroError::WrongRef {
                location: variant.location(),
                claimed: reference,
                actual,
            });
        }
    }

    if reference == alternate {
        return Err(FerroError::RefEqualsAlt {
            location: variant.location(),
            allele: reference,
        });
    }

    if reference.len() == 1
        && alternate.len() == 1
        && is_concrete_base(&reference)
        && is_concrete_base(&alternate)
    {
        return Ok(VcfVariant::new(chrom, pos, reference, alternate));
    }

    // Trim shared trailing bases, extending left whenever an allele empties
    loop {
        let mut changed = false;

        if !reference.is_empty()
            && !alternate.is_empty()
            && reference.as_bytes()[reference.len() - 1] == alternate.as_bytes()[alternate.len() - 1]
        {
            reference.pop();
            alternate.pop();
            changed = true;
        }

        if reference.is_empty() || alternate.is_empty() {
            let base = preceding_base(provider, chrom, pos)?;
            reference.insert_str(0, &base);
            alternate.insert_str(0, &base);
            pos -= 1;
            changed = true;
            log::trace!(
                "Extended {}:{} left to {}>{}",
                chrom,
                pos,
                reference,
                alternate
            );
        }

        if !changed {
            break;
        }
    }

    // Trim shared leading bases while both alleles keep at least one base
    let shared_prefix = reference
        .bytes()
        .zip(alternate.bytes())
        .take(reference.len().min(alternate.len()) - 1)
        .take_while(|(r, a)| r == a)
        .count();
    if shared_prefix > 0 {
        reference.drain(..shared_prefix);
        alternate.drain(..shared_prefix);
        pos += shared_prefix as u64;
    }

    Ok(VcfVariant::new(chrom, pos, reference, alternate))
}

/// Normalize raw VCF fields against a provider
///
/// Convenience wrapper around [`left_align`].
pub fn normalize_alleles<P: SequenceProvider + ?Sized>(
    provider: &P,
    chrom: &str,
    pos: u64,
    reference: &str,
    alternate: &str,
) -> Result<VcfVariant, FerroError> {
    left_align(provider, &VcfVariant::new(chrom, pos, reference, alternate))
}

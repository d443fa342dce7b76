//! IUPAC ambiguity code expansion
//!
//! An allele such as `RY` stands for every concrete allele obtained by
//! replacing each ambiguity letter with one of the bases it represents:
//! `AC`, `AT`, `GC`, `GT`. Expansion needs no reference sequence.
//!
//! `N` is not expanded: it is a valid base in VCF alleles.

/// Concrete bases represented by an IUPAC ambiguity letter
///
/// Returns `None` for concrete bases, `N`, and anything that is not an
/// ambiguity code. Input must be uppercase.
pub fn ambiguity_bases(code: u8) -> Option<&'static [u8]> {
    match code {
        b'R' => Some(b"AG"),
        b'Y' => Some(b"CT"),
        b'S' => Some(b"CG"),
        b'W' => Some(b"AT"),
        b'K' => Some(b"GT"),
        b'M' => Some(b"AC"),
        b'B' => Some(b"CGT"),
        b'D' => Some(b"AGT"),
        b'H' => Some(b"ACT"),
        b'V' => Some(b"ACG"),
        _ => None,
    }
}

/// Check if an allele contains any IUPAC ambiguity letter
pub fn has_ambiguity(allele: &str) -> bool {
    allele.bytes().any(|b| ambiguity_bases(b).is_some())
}

/// Lazy iterator over the concrete alleles an ambiguous allele represents
///
/// Created by [`expand_ambiguous`]. The worklist holds partially expanded
/// alleles; each step replaces the first remaining ambiguity letter, so the
/// stack never grows beyond the number of ambiguity letters times three.
/// Clone the iterator (or call [`expand_ambiguous`] again) to restart it.
#[derive(Debug, Clone)]
pub struct AmbiguityExpansion {
    stack: Vec<Vec<u8>>,
}

impl Iterator for AmbiguityExpansion {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while let Some(allele) = self.stack.pop() {
            let first_ambiguous = allele
                .iter()
                .enumerate()
                .find_map(|(i, &b)| ambiguity_bases(b).map(|bases| (i, bases)));

            match first_ambiguous {
                None => return Some(String::from_utf8_lossy(&allele).into_owned()),
                Some((i, bases)) => {
                    // Push in reverse so the first base is expanded first
                    for &base in bases.iter().rev() {
                        let mut substituted = allele.clone();
                        substituted[i] = base;
                        self.stack.push(substituted);
                    }
                }
            }
        }
        None
    }
}

/// Expand IUPAC ambiguity letters into every concrete allele
///
/// An allele without ambiguity letters yields itself once. Input must be
/// uppercase.
///
/// # Examples
///
/// ```
/// use ferro_vcfnorm::expand_ambiguous;
///
/// let alleles: Vec<String> = expand_ambiguous("RY").collect();
/// assert_eq!(alleles, vec!["AC", "AT", "GC", "GT"]);
///
/// let unchanged: Vec<String> = expand_ambiguous("AC").collect();
/// assert_eq!(unchanged, vec!["AC"]);
/// ```
pub fn expand_ambiguous(allele: &str) -> AmbiguityExpansion {
    AmbiguityExpansion {
        stack: vec![allele.as_bytes().to_vec()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_expand_single_code() {
        let alleles: Vec<String> = expand_ambiguous("R").collect();
        assert_eq!(alleles, vec!["A", "G"]);
    }

    #[test]
    fn test_expand_without_ambiguity() {
        let alleles: Vec<String> = expand_ambiguous("AC").collect();
        assert_eq!(alleles, vec!["AC"]);

        let alleles: Vec<String> = expand_ambiguous("").collect();
        assert_eq!(alleles, vec![""]);
    }

    #[test]
    fn test_expand_cross_product_in_position() {
        let alleles: HashSet<String> = expand_ambiguous("RY").collect();
        let expected: HashSet<String> = ["AC", "AT", "GC", "GT"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(alleles, expected);
    }

    #[test]
    fn test_expand_three_base_codes() {
        let alleles: Vec<String> = expand_ambiguous("ABA").collect();
        assert_eq!(alleles, vec!["ACA", "AGA", "ATA"]);
        assert_eq!(expand_ambiguous("BDHV").count(), 81);
    }

    #[test]
    fn test_every_code_expands_to_its_bases() {
        for (code, expected) in [
            ("R", "AG"),
            ("Y", "CT"),
            ("S", "CG"),
            ("W", "AT"),
            ("K", "GT"),
            ("M", "AC"),
            ("B", "CGT"),
            ("D", "AGT"),
            ("H", "ACT"),
            ("V", "ACG"),
        ] {
            let got: String = expand_ambiguous(code).collect();
            assert_eq!(got, expected, "expansion of {}", code);
        }
    }

    #[test]
    fn test_n_is_not_ambiguous() {
        assert!(!has_ambiguity("ACGTN"));
        assert!(has_ambiguity("ACGTW"));
        assert_eq!(expand_ambiguous("NN").collect::<Vec<_>>(), vec!["NN"]);
    }

    #[test]
    fn test_expansion_is_restartable() {
        let expansion = expand_ambiguous("MK");
        let first: Vec<String> = expansion.clone().collect();
        let second: Vec<String> = expansion.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_repeated_codes_expand_independently() {
        let alleles: Vec<String> = expand_ambiguous("SS").collect();
        assert_eq!(alleles, vec!["CC", "CG", "GC", "GG"]);
        let distinct: HashSet<String> = expand_ambiguous("RRR").collect();
        assert_eq!(distinct.len(), 8);
    }
}

//! Contig naming for primary human chromosomes.
//!
//! Normalized variants name contigs UCSC-style with a `chr` prefix over the
//! primary chromosomes 1-22, X, Y and MT. Archive records carry bare names
//! (`1`, `X`, `MT`), sometimes already prefixed, sometimes `M`.

/// Check whether a bare chromosome name is one of 1-22, X, Y, MT
pub fn is_primary_chromosome(bare: &str) -> bool {
    match bare {
        "X" | "Y" | "MT" => true,
        _ => bare
            .parse::<u8>()
            .map(|n| (1..=22).contains(&n) && !bare.starts_with('0'))
            .unwrap_or(false),
    }
}

/// Check whether a `chr`-prefixed contig name is a primary chromosome
pub fn is_primary_contig(contig: &str) -> bool {
    contig
        .strip_prefix("chr")
        .map(is_primary_chromosome)
        .unwrap_or(false)
}

/// Convert an archive chromosome name into the `chr`-prefixed contig name
///
/// Returns `None` for anything outside the primary chromosomes (unplaced
/// scaffolds, alt haplotypes, patches).
///
/// # Examples
///
/// ```
/// use ferro_vcfnorm::vcf::contig::ucsc_contig;
///
/// assert_eq!(ucsc_contig("1").as_deref(), Some("chr1"));
/// assert_eq!(ucsc_contig("chrX").as_deref(), Some("chrX"));
/// assert_eq!(ucsc_contig("M").as_deref(), Some("chrMT"));
/// assert_eq!(ucsc_contig("Un_gl000220"), None);
/// ```
pub fn ucsc_contig(chromosome: &str) -> Option<String> {
    let trimmed = chromosome.trim();
    let bare = trimmed.strip_prefix("chr").unwrap_or(trimmed);
    let bare = match bare.to_ascii_uppercase().as_str() {
        "M" | "MT" => "MT".to_string(),
        "X" => "X".to_string(),
        "Y" => "Y".to_string(),
        _ => bare.to_string(),
    };

    if is_primary_chromosome(&bare) {
        Some(format!("chr{}", bare))
    } else {
        None
    }
}

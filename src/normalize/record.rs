//! Cross-assembly record normalization
//!
//! Normalizes the GRCh37 and GRCh38 coordinates of an archive record and
//! emits one record per concrete alternate allele, pairing the two
//! assemblies' coordinates when they share an allele.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::clinvar::ArchiveRecord;
use crate::config::FerroConfig;
use crate::error::FerroError;
use crate::normalize::assembly::AssemblyNormalizer;
use crate::normalize::config::NormalizeConfig;
use crate::reference::{FastaProvider, GenomeBuild, SequenceProvider};
use crate::vcf::{ucsc_contig, VcfVariant};

/// The normalized coordinates of one concrete allele on both assemblies
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchedVariantPair {
    /// GRCh37 coordinates
    pub primary: Option<VcfVariant>,
    /// GRCh38 coordinates
    pub secondary: Option<VcfVariant>,
}

impl MatchedVariantPair {
    /// The variant for an assembly, if present
    pub fn get(&self, build: GenomeBuild) -> Option<&VcfVariant> {
        match build {
            GenomeBuild::GRCh37 => self.primary.as_ref(),
            GenomeBuild::GRCh38 => self.secondary.as_ref(),
        }
    }
}

/// Pair two assemblies' variants by their alternate allele
///
/// Keys are taken in first-seen order: every primary allele, then secondary
/// alleles not seen among the primaries. A repeated allele within one list
/// overwrites that list's slot.
///
/// Alleles are compared ignoring ASCII case, since alleles that were passed
/// through unnormalized keep the case they arrived in.
pub fn match_variants(
    primary: Vec<VcfVariant>,
    secondary: Vec<VcfVariant>,
) -> Vec<MatchedVariantPair> {
    let mut pairs: Vec<MatchedVariantPair> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for variant in primary {
        let slot = *index.entry(variant.alternate.to_ascii_uppercase()).or_insert_with(|| {
            pairs.push(MatchedVariantPair::default());
            pairs.len() - 1
        });
        pairs[slot].primary = Some(variant);
    }

    for variant in secondary {
        let slot = *index.entry(variant.alternate.to_ascii_uppercase()).or_insert_with(|| {
            pairs.push(MatchedVariantPair::default());
            pairs.len() - 1
        });
        pairs[slot].secondary = Some(variant);
    }

    pairs
}

/// Extract the first VCF-convention variant of an assembly
///
/// Returns the index of the location entry alongside the variant. Entries
/// missing any VCF field, or placed on a non-primary contig, are skipped.
pub fn extract_variant<R: ArchiveRecord>(
    record: &R,
    build: GenomeBuild,
) -> Option<(usize, VcfVariant)> {
    record
        .locations(build)
        .iter()
        .enumerate()
        .find_map(|(i, loc)| {
            let chrom = ucsc_contig(loc.chr.as_deref()?)?;
            let pos = loc.position_vcf?;
            let reference = loc.reference_allele_vcf.as_deref()?;
            let alternate = loc.alternate_allele_vcf.as_deref()?;
            Some((i, VcfVariant::new(chrom, pos, reference, alternate)))
        })
}

/// Normalizer for archive records carrying GRCh37 and GRCh38 coordinates
///
/// # Examples
///
/// ```
/// use ferro_vcfnorm::{ClinVarRecord, GenomeBuild, MockProvider, RecordNormalizer, SequenceLocation};
///
/// let mut grch38 = MockProvider::new();
/// grch38.add_region("chr1", 998, "CCAG");
/// let normalizer = RecordNormalizer::new(None, Some(grch38));
///
/// let record = ClinVarRecord::new("1", "example")
///     .with_location(GenomeBuild::GRCh38, SequenceLocation::vcf("1", 1000, "CAG", "CTG"));
/// let out = normalizer.normalize(&record).unwrap();
///
/// assert_eq!(out.len(), 1);
/// let loc = &out[0].grch38_locations[0];
/// assert_eq!(loc.position_vcf, Some(1001));
/// assert_eq!(loc.reference_allele_vcf.as_deref(), Some("A"));
/// assert_eq!(loc.alternate_allele_vcf.as_deref(), Some("T"));
/// ```
#[derive(Debug, Clone)]
pub struct RecordNormalizer<P> {
    grch37: AssemblyNormalizer<P>,
    grch38: AssemblyNormalizer<P>,
}

impl<P: SequenceProvider> RecordNormalizer<P> {
    /// Create a normalizer with default configuration
    pub fn new(grch37: Option<P>, grch38: Option<P>) -> Self {
        Self::with_config(grch37, grch38, NormalizeConfig::default())
    }

    /// Create a normalizer with custom configuration
    pub fn with_config(grch37: Option<P>, grch38: Option<P>, config: NormalizeConfig) -> Self {
        Self {
            grch37: AssemblyNormalizer::with_config(GenomeBuild::GRCh37, grch37, config.clone()),
            grch38: AssemblyNormalizer::with_config(GenomeBuild::GRCh38, grch38, config),
        }
    }

    /// The normalizer for one assembly
    pub fn assembly(&self, build: GenomeBuild) -> &AssemblyNormalizer<P> {
        match build {
            GenomeBuild::GRCh37 => &self.grch37,
            GenomeBuild::GRCh38 => &self.grch38,
        }
    }

    /// Normalize a record's coordinates on both assemblies
    ///
    /// Returns the input itself (borrowed) when there is nothing to change,
    /// otherwise one clone per concrete alternate allele with the extracted
    /// location entries overwritten. The input is never mutated.
    ///
    /// # Errors
    ///
    /// Only errors the assembly normalizers propagate: invalid alleles under
    /// [`InvalidAllelePolicy::Propagate`](crate::normalize::InvalidAllelePolicy::Propagate)
    /// and I/O failures.
    pub fn normalize<'a, R: ArchiveRecord>(
        &self,
        record: &'a R,
    ) -> Result<Vec<Cow<'a, R>>, FerroError> {
        let extracted37 = extract_variant(record, GenomeBuild::GRCh37);
        let extracted38 = extract_variant(record, GenomeBuild::GRCh38);

        if extracted37.is_none() && extracted38.is_none() {
            log::debug!("No VCF coordinates on either assembly; record unchanged");
            return Ok(vec![Cow::Borrowed(record)]);
        }

        let normalized37 = normalize_extracted(&self.grch37, extracted37.as_ref())?;
        let normalized38 = normalize_extracted(&self.grch38, extracted38.as_ref())?;

        if is_unchanged(extracted37.as_ref(), &normalized37)
            && is_unchanged(extracted38.as_ref(), &normalized38)
        {
            log::debug!("Record already normalized on both assemblies");
            return Ok(vec![Cow::Borrowed(record)]);
        }

        let pairs = match_variants(normalized37, normalized38);
        if pairs.is_empty() {
            log::debug!("Every allele was dropped; record unchanged");
            return Ok(vec![Cow::Borrowed(record)]);
        }
        log::debug!("Emitting {} normalized record(s)", pairs.len());

        let index37 = extracted37.map(|(i, _)| i);
        let index38 = extracted38.map(|(i, _)| i);
        Ok(pairs
            .iter()
            .map(|pair| {
                let mut clone = record.clone();
                overwrite(&mut clone, GenomeBuild::GRCh37, index37, pair.primary.as_ref());
                overwrite(&mut clone, GenomeBuild::GRCh38, index38, pair.secondary.as_ref());
                Cow::Owned(clone)
            })
            .collect())
    }
}

impl RecordNormalizer<FastaProvider> {
    /// Open the FASTA references named in a configuration
    ///
    /// An assembly without a configured path is left without a provider.
    pub fn from_config(config: &FerroConfig) -> Result<Self, FerroError> {
        let open = |build: GenomeBuild| -> Result<Option<FastaProvider>, FerroError> {
            config
                .reference_path(build)
                .map(FastaProvider::new)
                .transpose()
        };
        Ok(Self::with_config(
            open(GenomeBuild::GRCh37)?,
            open(GenomeBuild::GRCh38)?,
            config.to_normalize_config(),
        ))
    }
}

fn normalize_extracted<P: SequenceProvider>(
    normalizer: &AssemblyNormalizer<P>,
    extracted: Option<&(usize, VcfVariant)>,
) -> Result<Vec<VcfVariant>, FerroError> {
    match extracted {
        Some((_, variant)) => normalizer.normalize(variant),
        None => Ok(Vec::new()),
    }
}

/// Check if an assembly's output is exactly its single input variant
fn is_unchanged(extracted: Option<&(usize, VcfVariant)>, normalized: &[VcfVariant]) -> bool {
    match extracted {
        Some((_, variant)) => normalized.len() == 1 && normalized[0] == *variant,
        None => normalized.is_empty(),
    }
}

/// Write a variant's VCF fields into the extracted location entry
fn overwrite<R: ArchiveRecord>(
    record: &mut R,
    build: GenomeBuild,
    index: Option<usize>,
    variant: Option<&VcfVariant>,
) {
    let (Some(index), Some(variant)) = (index, variant) else {
        return;
    };
    if let Some(loc) = record.locations_mut(build).get_mut(index) {
        loc.position_vcf = Some(variant.pos);
        loc.reference_allele_vcf = Some(variant.reference.clone());
        loc.alternate_allele_vcf = Some(variant.alternate.clone());
    }
}

//! ClinVar data types.

use crate::reference::GenomeBuild;
use serde::{Deserialize, Serialize};

/// One placement of a variant on an assembly.
///
/// Mirrors ClinVar's `SequenceLocation` element. Normalization reads `chr`
/// and the three VCF-convention fields and writes back only the VCF fields;
/// everything else is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SequenceLocation {
    /// Chromosome as written in the archive ("1", "X", "MT")
    pub chr: Option<String>,
    /// Sequence accession (e.g., "NC_000001.11")
    pub accession: Option<String>,
    /// 1-based start of the variant span
    pub start: Option<u64>,
    /// 1-based inclusive end of the variant span
    pub stop: Option<u64>,
    /// Reference allele in VCF convention
    #[serde(rename = "referenceAlleleVCF")]
    pub reference_allele_vcf: Option<String>,
    /// Alternate allele in VCF convention
    #[serde(rename = "alternateAlleleVCF")]
    pub alternate_allele_vcf: Option<String>,
    /// 1-based VCF position
    #[serde(rename = "positionVCF")]
    pub position_vcf: Option<u64>,
}

impl SequenceLocation {
    /// Create a location carrying VCF-convention coordinates.
    pub fn vcf(
        chr: impl Into<String>,
        position: u64,
        reference: impl Into<String>,
        alternate: impl Into<String>,
    ) -> Self {
        Self {
            chr: Some(chr.into()),
            position_vcf: Some(position),
            reference_allele_vcf: Some(reference.into()),
            alternate_allele_vcf: Some(alternate.into()),
            ..Default::default()
        }
    }

    /// Check if all three VCF fields and the chromosome are present.
    pub fn has_vcf_coordinates(&self) -> bool {
        self.chr.is_some()
            && self.position_vcf.is_some()
            && self.reference_allele_vcf.is_some()
            && self.alternate_allele_vcf.is_some()
    }
}

/// A record with per-assembly location lists.
///
/// Implementors are cloned once per emitted normalized allele, so `Clone`
/// should copy every field.
pub trait ArchiveRecord: Clone {
    /// Location entries for an assembly, in archive order
    fn locations(&self, build: GenomeBuild) -> &[SequenceLocation];

    /// Mutable location entries for an assembly
    fn locations_mut(&mut self, build: GenomeBuild) -> &mut [SequenceLocation];
}

/// A ClinVar variant record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClinVarRecord {
    /// ClinVar Variation ID.
    pub variation_id: String,
    /// ClinVar Accession (e.g., "VCV000012345").
    pub accession: Option<String>,
    /// HGVS expression (typically the canonical expression).
    pub hgvs: String,
    /// Gene symbol.
    pub gene: Option<String>,
    /// Clinical significance as submitted.
    pub clinical_significance: Option<String>,
    /// Review status (raw string from ClinVar).
    pub review_status: Option<String>,
    /// Locations on GRCh37.
    #[serde(rename = "GRCh37")]
    pub grch37_locations: Vec<SequenceLocation>,
    /// Locations on GRCh38.
    #[serde(rename = "GRCh38")]
    pub grch38_locations: Vec<SequenceLocation>,
}

impl ClinVarRecord {
    /// Create a new ClinVar record.
    pub fn new(variation_id: impl Into<String>, hgvs: impl Into<String>) -> Self {
        Self {
            variation_id: variation_id.into(),
            hgvs: hgvs.into(),
            ..Default::default()
        }
    }

    /// Append a location for an assembly.
    pub fn with_location(mut self, build: GenomeBuild, location: SequenceLocation) -> Self {
        match build {
            GenomeBuild::GRCh37 => self.grch37_locations.push(location),
            GenomeBuild::GRCh38 => self.grch38_locations.push(location),
        }
        self
    }
}

impl ArchiveRecord for ClinVarRecord {
    fn locations(&self, build: GenomeBuild) -> &[SequenceLocation] {
        match build {
            GenomeBuild::GRCh37 => &self.grch37_locations,
            GenomeBuild::GRCh38 => &self.grch38_locations,
        }
    }

    fn locations_mut(&mut self, build: GenomeBuild) -> &mut [SequenceLocation] {
        match build {
            GenomeBuild::GRCh37 => &mut self.grch37_locations,
            GenomeBuild::GRCh38 => &mut self.grch38_locations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clinvar_record_new() {
        let record = ClinVarRecord::new("12345", "NM_000088.3:c.10A>G");
        assert_eq!(record.variation_id, "12345");
        assert!(record.grch37_locations.is_empty());
        assert!(record.grch38_locations.is_empty());
    }

    #[test]
    fn test_locations_by_build() {
        let record = ClinVarRecord::new("1", "x")
            .with_location(GenomeBuild::GRCh37, SequenceLocation::vcf("1", 100, "A", "G"))
            .with_location(GenomeBuild::GRCh38, SequenceLocation::vcf("1", 200, "A", "G"));
        assert_eq!(record.locations(GenomeBuild::GRCh37)[0].position_vcf, Some(100));
        assert_eq!(record.locations(GenomeBuild::GRCh38)[0].position_vcf, Some(200));
    }

    #[test]
    fn test_locations_mut_writes_through() {
        let mut record = ClinVarRecord::new("1", "x")
            .with_location(GenomeBuild::GRCh38, SequenceLocation::vcf("1", 200, "A", "G"));
        record.locations_mut(GenomeBuild::GRCh38)[0].position_vcf = Some(201);
        assert_eq!(record.grch38_locations[0].position_vcf, Some(201));
    }

    #[test]
    fn test_has_vcf_coordinates() {
        assert!(SequenceLocation::vcf("X", 5, "C", "T").has_vcf_coordinates());
        let partial = SequenceLocation {
            chr: Some("X".to_string()),
            start: Some(5),
            stop: Some(5),
            ..Default::default()
        };
        assert!(!partial.has_vcf_coordinates());
    }

    #[test]
    fn test_deserialize_clinvar_field_names() {
        let json = r#"{
            "variation_id": "9",
            "GRCh38": [{"chr": "7", "positionVCF": 117559590,
                        "referenceAlleleVCF": "ATCT", "alternateAlleleVCF": "A"}]
        }"#;
        let record: ClinVarRecord = serde_json::from_str(json).unwrap();
        let loc = &record.grch38_locations[0];
        assert_eq!(loc.position_vcf, Some(117559590));
        assert_eq!(loc.reference_allele_vcf.as_deref(), Some("ATCT"));
        assert!(record.grch37_locations.is_empty());
    }
}

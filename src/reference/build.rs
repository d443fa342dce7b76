//! Genome assemblies

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::FerroError;

/// Genome build/assembly version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GenomeBuild {
    /// GRCh37 / hg19
    GRCh37,
    /// GRCh38 / hg38
    GRCh38,
}

impl GenomeBuild {
    /// Both assemblies, in matching order (GRCh37 seeds the pairing)
    pub const ALL: [GenomeBuild; 2] = [GenomeBuild::GRCh37, GenomeBuild::GRCh38];

    /// The archive tag for this assembly
    pub fn as_str(&self) -> &'static str {
        match self {
            GenomeBuild::GRCh37 => "GRCh37",
            GenomeBuild::GRCh38 => "GRCh38",
        }
    }
}

impl std::fmt::Display for GenomeBuild {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GenomeBuild {
    type Err = FerroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "grch37" | "hg19" | "grch37.p13" => Ok(GenomeBuild::GRCh37),
            "grch38" | "hg38" => Ok(GenomeBuild::GRCh38),
            _ => Err(FerroError::UnknownAssembly {
                name: s.to_string(),
            }),
        }
    }
}

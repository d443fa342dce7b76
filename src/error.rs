//! Error types for ferro-vcfnorm
//!
//! Every failure carries a stable [`ErrorCode`] so callers can handle
//! errors programmatically, and reports whether it is recoverable, i.e.
//! whether the variant may be kept unnormalized instead of dropped.

use std::fmt;
use thiserror::Error;

/// Error codes for categorizing errors
///
/// These codes can be used for programmatic error handling
/// and for documentation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Input errors (E1xxx)
    /// Allele contains a character outside the nucleotide alphabet
    InvalidBase = 1001,
    /// Assembly name not recognized
    UnknownAssembly = 1002,

    // Reference errors (E2xxx)
    /// Contig not available from the provider
    ReferenceNotFound = 2001,
    /// Position or interval outside the contig
    PositionOutOfBounds = 2002,

    // Validation errors (E3xxx)
    /// Claimed reference allele disagrees with the reference sequence
    ReferenceMismatch = 3001,
    /// Reference and alternate alleles are identical
    RefEqualsAlt = 3002,

    // Normalization errors (E4xxx)
    /// Left extension would read before the first base of the contig
    BeforeContigStart = 4001,

    // IO errors (E9xxx)
    /// File IO error
    IoError = 9001,
    /// JSON parsing error
    JsonError = 9002,
    /// Configuration file error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E1001")
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Get a brief description of this error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::InvalidBase => "invalid nucleotide sequence",
            ErrorCode::UnknownAssembly => "unknown genome assembly",
            ErrorCode::ReferenceNotFound => "reference not found",
            ErrorCode::PositionOutOfBounds => "position out of bounds",
            ErrorCode::ReferenceMismatch => "reference sequence mismatch",
            ErrorCode::RefEqualsAlt => "reference allele equals alternate allele",
            ErrorCode::BeforeContigStart => "left extension before contig start",
            ErrorCode::IoError => "file I/O error",
            ErrorCode::JsonError => "JSON parsing error",
            ErrorCode::ConfigError => "configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for ferro-vcfnorm operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FerroError {
    /// Allele contains a character outside {A,C,G,T,N,-}
    #[error("Invalid nucleotide sequence: {sequence}")]
    InvalidNucleotideSequence { sequence: String },

    /// Claimed reference allele does not match the reference sequence
    #[error("Wrong reference at {location}: claimed {claimed}, reference has {actual}")]
    WrongRef {
        location: String,
        claimed: String,
        actual: String,
    },

    /// Reference and alternate alleles are the same
    #[error("Reference equals alternate at {location}: {allele}")]
    RefEqualsAlt { location: String, allele: String },

    /// Left-alignment would need a base before position 1
    #[error("Cannot extend {contig}:{pos} before the start of the contig")]
    BeforeContigStart { contig: String, pos: u64 },

    /// Unknown genome assembly name
    #[error("Unknown genome assembly: {name}")]
    UnknownAssembly { name: String },

    /// Contig not available from the sequence provider
    #[error("Reference not found: {id}")]
    ReferenceNotFound { id: String },

    /// Invalid coordinates provided
    #[error("Invalid coordinates: {msg}")]
    InvalidCoordinates { msg: String },

    /// IO error (for file operations)
    #[error("IO error: {msg}")]
    Io { msg: String },

    /// JSON parsing error
    #[error("JSON error: {msg}")]
    Json { msg: String },

    /// Configuration file error
    #[error("Config error: {msg}")]
    Config { msg: String },
}

impl FerroError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            FerroError::InvalidNucleotideSequence { .. } => ErrorCode::InvalidBase,
            FerroError::WrongRef { .. } => ErrorCode::ReferenceMismatch,
            FerroError::RefEqualsAlt { .. } => ErrorCode::RefEqualsAlt,
            FerroError::BeforeContigStart { .. } => ErrorCode::BeforeContigStart,
            FerroError::UnknownAssembly { .. } => ErrorCode::UnknownAssembly,
            FerroError::ReferenceNotFound { .. } => ErrorCode::ReferenceNotFound,
            FerroError::InvalidCoordinates { .. } => ErrorCode::PositionOutOfBounds,
            FerroError::Io { .. } => ErrorCode::IoError,
            FerroError::Json { .. } => ErrorCode::JsonError,
            FerroError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Whether the variant can be kept unnormalized after this error
    ///
    /// Reference disagreements, degenerate alleles and missing reference
    /// data are scoped to one allele and never drop a record.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FerroError::WrongRef { .. }
                | FerroError::RefEqualsAlt { .. }
                | FerroError::BeforeContigStart { .. }
                | FerroError::ReferenceNotFound { .. }
                | FerroError::InvalidCoordinates { .. }
        )
    }

    /// Get a formatted error message prefixed with its code
    pub fn detailed_message(&self) -> String {
        format!("[{}] {}", self.code(), self)
    }
}

impl From<std::io::Error> for FerroError {
    fn from(err: std::io::Error) -> Self {
        FerroError::Io {
            msg: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for FerroError {
    fn from(err: serde_json::Error) -> Self {
        FerroError::Json {
            msg: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for FerroError {
    fn from(err: toml::de::Error) -> Self {
        FerroError::Config {
            msg: err.to_string(),
        }
    }
}

//! Error types for cigarmap
//!
//! Defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cigarmap operations
#[derive(Debug, Error)]
pub enum CigarMapError {
    /// CIGAR mapping errors not tied to a transcript
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// A transcript whose CIGAR could not be mapped
    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    /// Mapping or query table parsing errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while building a coordinate map from a CIGAR string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// The CIGAR string is not a sequence of `<length><op>` tokens
    #[error("Malformed CIGAR '{cigar}': {reason}")]
    MalformedCigar { cigar: String, reason: String },

    /// The CIGAR string uses operations the mapper has no semantics for
    #[error("Unsupported CIGAR operation(s) {found:?} in '{cigar}', allowed operations: {allowed}")]
    UnsupportedOperation {
        cigar: String,
        /// Offending operation characters, sorted and deduplicated
        found: Vec<char>,
        allowed: String,
    },

    /// Configuration names an operation outside M, X, I, D
    #[error("Operation '{0}' cannot be enabled, only M, X, I and D carry mapping semantics")]
    InvalidSupportedOp(char),

    /// A recorded reference coordinate falls outside the `i64` range
    #[error("Reference coordinate out of range walking from start {reference_start}")]
    CoordinateOverflow { reference_start: i64 },

    /// The CIGAR consumes more query bases than a map may hold
    #[error("CIGAR spans {bases} query bases, maximum is {limit}")]
    MapTooLarge { bases: u64, limit: u64 },
}

impl MappingError {
    pub(crate) fn malformed(cigar: &str, reason: impl Into<String>) -> Self {
        MappingError::MalformedCigar {
            cigar: cigar.to_string(),
            reason: reason.into(),
        }
    }

    /// True for `MalformedCigar`
    pub fn is_malformed(&self) -> bool {
        matches!(self, MappingError::MalformedCigar { .. })
    }

    /// True for `UnsupportedOperation`
    pub fn is_unsupported(&self) -> bool {
        matches!(self, MappingError::UnsupportedOperation { .. })
    }
}

/// A mapping failure attributed to one transcript
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transcript '{transcript_id}': {source}")]
pub struct TranscriptError {
    pub transcript_id: String,
    /// Position of the record in the input (0-based)
    pub record_index: usize,
    #[source]
    pub source: MappingError,
}

/// Errors that can occur while reading mapping and query tables
#[derive(Debug, Error)]
pub enum ParseError {
    /// Wrong number of tab-separated fields
    #[error("Line {line}: expected {expected} tab-separated fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Field is not valid UTF-8
    #[error("Line {line}: invalid UTF-8 in field '{field}'")]
    InvalidUtf8 { line: usize, field: &'static str },

    /// Failed to parse integer
    #[error("Line {line}: failed to parse integer '{value}' in field '{field}'")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// Required field is empty
    #[error("Line {line}: field '{field}' is empty")]
    EmptyField { line: usize, field: &'static str },

    /// Input file not found
    #[error("Input file not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error during parsing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for cigarmap operations
pub type Result<T> = std::result::Result<T, CigarMapError>;

/// Result type alias for mapping operations
pub type MappingResult<T> = std::result::Result<T, MappingError>;

/// Result type alias for table parsing operations
pub type ParseResult<T> = std::result::Result<T, ParseError>;

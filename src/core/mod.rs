//! Core coordinate mapping functionality
//!
//! This module contains the CIGAR tokenizer, the coordinate map builder
//! and the per-transcript lookup index.

mod cigar;
mod error;
mod index;
pub mod io;
mod map;

pub use cigar::{
    parse_cigar, parse_operations, CigarKind, CigarOperation, CigarToken, OpClass, SupportedOps,
};
pub use error::{
    CigarMapError, MappingError, MappingResult, ParseError, ParseResult, Result, TranscriptError,
};
pub use index::{
    BuildPolicy, IndexBuild, LookupResult, MapConfig, TranscriptEntry, TranscriptMapIndex,
    TranscriptRecord,
};
pub use io::{detect_compression, ByteLineIterator, CompressionFormat, TableReader};
pub use map::{CoordinateMap, CoordinateMapBuilder, MAX_MAP_BASES};

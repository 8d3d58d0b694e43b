//! cigarmap - transcript-to-reference coordinate mapping from CIGAR strings
//!
//! Builds, for every transcript, a dense map from alignment-local offsets to
//! reference coordinates and answers point queries against it.
//!
//! # Features
//!
//! - Match/mismatch, insertion and deletion handling with exact offset bookkeeping
//! - Batch-fail or partial-success index construction
//! - Parallel map building with rayon
//! - Support for compressed input tables (gzip, bzip2)
//!
//! # Example
//!
//! ```
//! use cigarmap::{LookupResult, TranscriptMapIndex, TranscriptRecord};
//!
//! let index = TranscriptMapIndex::build(vec![
//!     TranscriptRecord::new("TR1", "CHR1", 3, "8M7D6M2I2M11D7M"),
//! ])?;
//!
//! assert_eq!(
//!     index.lookup("TR1", 8),
//!     LookupResult::Mapped { chromosome: "CHR1", coordinate: 18 }
//! );
//! assert_eq!(index.lookup("TR1", 25), LookupResult::OutOfRange { chromosome: "CHR1" });
//! # Ok::<(), cigarmap::TranscriptError>(())
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use crate::core::{
    parse_cigar, BuildPolicy, CigarMapError, CigarOperation, CoordinateMap, CoordinateMapBuilder,
    IndexBuild, LookupResult, MapConfig, MappingError, SupportedOps, TranscriptError,
    TranscriptMapIndex, TranscriptRecord,
};
pub use crate::formats::{Query, ReportConfig, ReportStats};

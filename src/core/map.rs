//! Coordinate map construction
//!
//! Walks a CIGAR operation sequence and records, for every alignment-local
//! offset, the reference coordinate it lands on.
//!
//! The walk keeps two cursors that both start one before the first base:
//! 1. Match/Mismatch advance both cursors and record an entry
//! 2. Insertion advances the local cursor only and records the current
//!    reference cursor (the last consumed reference base)
//! 3. Deletion advances the reference cursor only and records nothing
//!
//! Local offsets therefore form a dense range starting at 0, which is why the
//! map is a plain vector indexed by offset.

use crate::core::cigar::{parse_operations, CigarOperation, SupportedOps};
use crate::core::error::{MappingError, MappingResult};

/// Largest number of query bases a single map may hold
pub const MAX_MAP_BASES: u64 = 1 << 30;

/// Dense local-offset -> reference-coordinate map for one transcript
///
/// Offset `i` maps to `as_slice()[i]`. Coordinates are signed: a leading
/// insertion maps to `reference_start - 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinateMap {
    coords: Vec<i64>,
}

impl CoordinateMap {
    /// Reference coordinate for a local offset, `None` outside the domain
    pub fn get(&self, offset: usize) -> Option<i64> {
        self.coords.get(offset).copied()
    }

    /// Number of local offsets (matched, mismatched and inserted bases)
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Largest valid local offset
    pub fn last_offset(&self) -> Option<usize> {
        self.coords.len().checked_sub(1)
    }

    /// First and last mapped reference coordinate
    pub fn reference_span(&self) -> Option<(i64, i64)> {
        match (self.coords.first(), self.coords.last()) {
            (Some(first), Some(last)) => Some((*first, *last)),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.coords
    }

    /// Iterate `(local_offset, reference_coordinate)` pairs in offset order
    pub fn iter(&self) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.coords.iter().copied().enumerate()
    }
}

/// Builds coordinate maps from CIGAR strings
///
/// # Example
/// ```
/// use cigarmap::core::CoordinateMapBuilder;
///
/// let map = CoordinateMapBuilder::new().build("3M2D1I2M", 10).unwrap();
/// // 3M: 10..=12, 2D: skip 13 and 14, 1I: stays on 14, 2M: 15 and 16
/// assert_eq!(map.as_slice(), &[10, 11, 12, 14, 15, 16]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateMapBuilder {
    supported: SupportedOps,
}

impl CoordinateMapBuilder {
    /// Builder accepting `M`, `X`, `I` and `D`
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder accepting only the given operations
    pub fn with_supported(supported: SupportedOps) -> Self {
        Self { supported }
    }

    pub fn supported(&self) -> &SupportedOps {
        &self.supported
    }

    /// Build the map for one CIGAR string anchored at `reference_start`
    ///
    /// The whole CIGAR is validated before the walk starts: any malformed
    /// token or unsupported operation fails the build and no partial map
    /// is produced.
    pub fn build(&self, cigar: &str, reference_start: i64) -> MappingResult<CoordinateMap> {
        let ops = parse_operations(cigar, &self.supported)?;
        Self::walk(&ops, reference_start)
    }

    /// Walk already-validated operations
    ///
    /// Fails with `MapTooLarge` when the operations consume more than
    /// [`MAX_MAP_BASES`] query bases, and with `CoordinateOverflow` when a
    /// recorded coordinate does not fit in an `i64`.
    pub fn walk(ops: &[CigarOperation], reference_start: i64) -> MappingResult<CoordinateMap> {
        let query_bases = ops
            .iter()
            .filter(|op| op.consumes_query())
            .fold(0u64, |acc, op| acc.saturating_add(u64::from(op.len())));
        let too_large = || MappingError::MapTooLarge {
            bases: query_bases,
            limit: MAX_MAP_BASES,
        };
        if query_bases > MAX_MAP_BASES {
            return Err(too_large());
        }
        let capacity = usize::try_from(query_bases).map_err(|_| too_large())?;
        let mut coords = Vec::new();
        coords.try_reserve_exact(capacity).map_err(|_| too_large())?;

        let to_coord = |cursor: i128| {
            i64::try_from(cursor).map_err(|_| MappingError::CoordinateOverflow { reference_start })
        };

        // Cursor on the last consumed reference base, wide enough that only
        // recorded coordinates need a range check
        let mut cursor = i128::from(reference_start) - 1;

        for op in ops {
            match *op {
                CigarOperation::Match(n) | CigarOperation::Mismatch(n) => {
                    if n == 0 {
                        continue;
                    }
                    let first = to_coord(cursor + 1)?;
                    cursor += i128::from(n);
                    let last = to_coord(cursor)?;
                    coords.extend(first..=last);
                }
                CigarOperation::Insertion(n) => {
                    if n == 0 {
                        continue;
                    }
                    let coord = to_coord(cursor)?;
                    coords.extend(std::iter::repeat(coord).take(n as usize));
                }
                CigarOperation::Deletion(n) => {
                    cursor += i128::from(n);
                }
            }
        }

        debug_assert_eq!(coords.len() as u64, query_bases);
        Ok(CoordinateMap { coords })
    }
}

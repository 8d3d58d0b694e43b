//! Per-transcript coordinate map index
//!
//! Builds one `CoordinateMap` per transcript record and answers point
//! lookups by transcript id and local offset.

use crate::core::cigar::SupportedOps;
use crate::core::error::{MappingError, TranscriptError};
use crate::core::map::{CoordinateMap, CoordinateMapBuilder};
use rayon::prelude::*;
use std::collections::HashMap;

/// One row of mapping input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptRecord {
    pub transcript_id: String,
    pub chromosome: String,
    /// 0-based reference coordinate of local offset 0
    pub reference_start: i64,
    pub cigar: String,
}

impl TranscriptRecord {
    pub fn new(
        transcript_id: impl Into<String>,
        chromosome: impl Into<String>,
        reference_start: i64,
        cigar: impl Into<String>,
    ) -> Self {
        Self {
            transcript_id: transcript_id.into(),
            chromosome: chromosome.into(),
            reference_start,
            cigar: cigar.into(),
        }
    }
}

/// How index construction reacts to a transcript whose CIGAR fails to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildPolicy {
    /// The first failure in record order aborts the whole build
    #[default]
    BatchFail,
    /// Failures are collected and the remaining transcripts are indexed
    PartialSuccess,
}

/// Index construction settings
#[derive(Debug, Clone, Copy)]
pub struct MapConfig {
    /// Operations a CIGAR may contain
    pub supported: SupportedOps,
    pub policy: BuildPolicy,
    /// Worker threads for building maps; 1 builds sequentially
    pub threads: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            supported: SupportedOps::default(),
            policy: BuildPolicy::default(),
            threads: 1,
        }
    }
}

/// Outcome of a point lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupResult<'a> {
    /// Transcript id is not in the index
    NotFound,
    /// Transcript is known but the offset lies outside its map
    OutOfRange { chromosome: &'a str },
    /// Offset maps to a reference coordinate
    Mapped { chromosome: &'a str, coordinate: i64 },
}

impl LookupResult<'_> {
    pub fn is_mapped(&self) -> bool {
        matches!(self, LookupResult::Mapped { .. })
    }
}

/// An indexed transcript
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    pub transcript_id: String,
    pub chromosome: String,
    pub map: CoordinateMap,
}

/// Index of coordinate maps keyed by transcript id
///
/// Read-only once built; lookups take `&self` so the index can be shared
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct TranscriptMapIndex {
    /// Entries in first-seen input order
    entries: Vec<TranscriptEntry>,
    /// transcript_id -> position in `entries`
    positions: HashMap<String, usize>,
}

/// Index plus the transcripts left out of it
#[derive(Debug, Clone, Default)]
pub struct IndexBuild {
    pub index: TranscriptMapIndex,
    /// Always empty under `BuildPolicy::BatchFail`
    pub failures: Vec<TranscriptError>,
}

impl TranscriptMapIndex {
    /// Build with the default configuration (batch-fail, `MXID`, one thread)
    ///
    /// # Example
    /// ```
    /// use cigarmap::core::{LookupResult, TranscriptMapIndex, TranscriptRecord};
    ///
    /// let records = vec![TranscriptRecord::new("TR2", "CHR2", 10, "20M")];
    /// let index = TranscriptMapIndex::build(records).unwrap();
    /// assert_eq!(
    ///     index.lookup("TR2", 5),
    ///     LookupResult::Mapped { chromosome: "CHR2", coordinate: 15 }
    /// );
    /// assert_eq!(index.lookup("TR9", 0), LookupResult::NotFound);
    /// ```
    pub fn build(records: Vec<TranscriptRecord>) -> Result<Self, TranscriptError> {
        Self::build_with_config(records, &MapConfig::default()).map(|built| built.index)
    }

    /// Build with an explicit configuration
    ///
    /// Under `BatchFail` the error for the lowest-index failing record is
    /// returned regardless of thread count. Under `PartialSuccess` this never
    /// returns `Err`; failures are reported in `IndexBuild::failures`.
    pub fn build_with_config(
        records: Vec<TranscriptRecord>,
        config: &MapConfig,
    ) -> Result<IndexBuild, TranscriptError> {
        let builder = CoordinateMapBuilder::with_supported(config.supported);
        let total = records.len();

        let built = if config.threads > 1 {
            build_parallel(&records, builder, config.threads)
        } else {
            build_sequential(&records, builder, config.policy)
        };

        let mut result = IndexBuild::default();

        for (record_index, (record, outcome)) in records.into_iter().zip(built).enumerate() {
            match outcome {
                Ok(map) => result.index.insert(record, map),
                Err(source) => {
                    let error = TranscriptError {
                        transcript_id: record.transcript_id,
                        record_index,
                        source,
                    };
                    match config.policy {
                        BuildPolicy::BatchFail => {
                            log::error!("Index build aborted: {}", error);
                            return Err(error);
                        }
                        BuildPolicy::PartialSuccess => {
                            log::warn!("Skipping {}", error);
                            // A failing later record also drops an earlier map for the same id
                            result.index.remove(&error.transcript_id);
                            result.failures.push(error);
                        }
                    }
                }
            }
        }

        log::info!(
            "Indexed {} of {} transcript records ({} failed)",
            result.index.len(),
            total,
            result.failures.len()
        );

        Ok(result)
    }

    fn insert(&mut self, record: TranscriptRecord, map: CoordinateMap) {
        let entry = TranscriptEntry {
            transcript_id: record.transcript_id,
            chromosome: record.chromosome,
            map,
        };
        match self.positions.get(&entry.transcript_id) {
            Some(&pos) => {
                log::warn!(
                    "Duplicate transcript '{}', replacing earlier record",
                    entry.transcript_id
                );
                self.entries[pos] = entry;
            }
            None => {
                self.positions.insert(entry.transcript_id.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    fn remove(&mut self, transcript_id: &str) {
        if let Some(pos) = self.positions.remove(transcript_id) {
            log::warn!(
                "Dropping earlier record for transcript '{}' after a failed duplicate",
                transcript_id
            );
            self.entries.remove(pos);
            for p in self.positions.values_mut() {
                if *p > pos {
                    *p -= 1;
                }
            }
        }
    }

    /// Resolve a local offset on a transcript
    ///
    /// Negative offsets and offsets past the last mapped base are
    /// `OutOfRange`.
    pub fn lookup(&self, transcript_id: &str, local_offset: i64) -> LookupResult<'_> {
        let entry = match self.get(transcript_id) {
            Some(e) => e,
            None => return LookupResult::NotFound,
        };

        let coordinate = usize::try_from(local_offset)
            .ok()
            .and_then(|offset| entry.map.get(offset));

        match coordinate {
            Some(coordinate) => LookupResult::Mapped {
                chromosome: &entry.chromosome,
                coordinate,
            },
            None => LookupResult::OutOfRange {
                chromosome: &entry.chromosome,
            },
        }
    }

    pub fn get(&self, transcript_id: &str) -> Option<&TranscriptEntry> {
        self.positions
            .get(transcript_id)
            .map(|&pos| &self.entries[pos])
    }

    pub fn contains(&self, transcript_id: &str) -> bool {
        self.positions.contains_key(transcript_id)
    }

    /// Number of indexed transcripts
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Indexed transcripts in input order
    pub fn entries(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.entries.iter()
    }

    /// Total local offsets across all transcripts
    pub fn total_offsets(&self) -> usize {
        self.entries.iter().map(|e| e.map.len()).sum()
    }
}

/// Build maps in record order, stopping at the first failure under batch-fail
fn build_sequential(
    records: &[TranscriptRecord],
    builder: CoordinateMapBuilder,
    policy: BuildPolicy,
) -> Vec<Result<CoordinateMap, MappingError>> {
    let mut built = Vec::with_capacity(records.len());
    for record in records {
        let outcome = build_one(record, builder);
        let failed = outcome.is_err();
        built.push(outcome);
        if failed && policy == BuildPolicy::BatchFail {
            break;
        }
    }
    built
}

/// Build all maps on a dedicated rayon pool, keeping record order
fn build_parallel(
    records: &[TranscriptRecord],
    builder: CoordinateMapBuilder,
    threads: usize,
) -> Vec<Result<CoordinateMap, MappingError>> {
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(|| {
            records
                .par_iter()
                .map(|record| build_one(record, builder))
                .collect()
        }),
        Err(e) => {
            log::warn!("Failed to create thread pool ({}), building sequentially", e);
            build_sequential(records, builder, BuildPolicy::PartialSuccess)
        }
    }
}

fn build_one(
    record: &TranscriptRecord,
    builder: CoordinateMapBuilder,
) -> Result<CoordinateMap, MappingError> {
    let outcome = builder.build(&record.cigar, record.reference_start);
    if let Ok(map) = &outcome {
        log::debug!(
            "Built map for {} ({} offsets from {})",
            record.transcript_id,
            map.len(),
            record.cigar
        );
    }
    outcome
}

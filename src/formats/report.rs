//! Query report and map dump writers
//!
//! A report has one row per query, in query order, with four tab-separated
//! columns: transcript id, queried offset, chromosome and either the
//! reference coordinate or a status text.
//!
//! ```text
//! TR1  4   CHR1  7
//! TR2  20  CHR2  position out of range
//! TR9  0   na    transcript not found
//! ```

use super::query::Query;
use crate::core::io::create_buf_writer;
use crate::core::{LookupResult, TranscriptMapIndex};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Default report path
pub const DEFAULT_OUTPUT: &str = "query_results.txt";

/// Report rendering settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub output: PathBuf,
    /// Chromosome column for unknown transcripts
    pub placeholder_chrom: String,
    pub not_found_text: String,
    pub out_of_range_text: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            placeholder_chrom: "na".to_string(),
            not_found_text: "transcript not found".to_string(),
            out_of_range_text: "position out of range".to_string(),
        }
    }
}

/// Report statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportStats {
    pub total: usize,
    pub mapped: usize,
    pub not_found: usize,
    pub out_of_range: usize,
}

/// A query together with its lookup outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryRow<'a> {
    pub query: &'a Query,
    pub result: LookupResult<'a>,
}

/// Look up every query, keeping query order
pub fn resolve_queries<'a>(index: &'a TranscriptMapIndex, queries: &'a [Query]) -> Vec<QueryRow<'a>> {
    queries
        .iter()
        .map(|query| QueryRow {
            query,
            result: index.lookup(&query.transcript_id, query.offset),
        })
        .collect()
}

/// Render one report row without a trailing newline
pub fn format_row(row: &QueryRow<'_>, config: &ReportConfig) -> String {
    let (chrom, value) = match row.result {
        LookupResult::Mapped { chromosome, coordinate } => (chromosome, coordinate.to_string()),
        LookupResult::OutOfRange { chromosome } => (chromosome, config.out_of_range_text.clone()),
        LookupResult::NotFound => (
            config.placeholder_chrom.as_str(),
            config.not_found_text.clone(),
        ),
    };
    format!(
        "{}\t{}\t{}\t{}",
        row.query.transcript_id, row.query.offset, chrom, value
    )
}

/// Write report rows to any writer
pub fn write_report_to<W: Write>(
    writer: &mut W,
    rows: &[QueryRow<'_>],
    config: &ReportConfig,
) -> io::Result<ReportStats> {
    let mut stats = ReportStats::default();

    for row in rows {
        stats.total += 1;
        match row.result {
            LookupResult::Mapped { .. } => stats.mapped += 1,
            LookupResult::OutOfRange { .. } => stats.out_of_range += 1,
            LookupResult::NotFound => stats.not_found += 1,
        }
        writeln!(writer, "{}", format_row(row, config))?;
    }

    writer.flush()?;
    Ok(stats)
}

/// Write report rows to `config.output`
pub fn write_report(rows: &[QueryRow<'_>], config: &ReportConfig) -> io::Result<ReportStats> {
    let mut writer = create_buf_writer(&config.output)?;
    let stats = write_report_to(&mut writer, rows, config)?;
    log::info!(
        "Wrote {} report rows to {}",
        stats.total,
        config.output.display()
    );
    Ok(stats)
}

/// Write every `(transcript, chromosome, offset, coordinate)` of the index
///
/// Returns the number of rows written.
pub fn write_dump_to<W: Write>(writer: &mut W, index: &TranscriptMapIndex) -> io::Result<usize> {
    let mut rows = 0;
    for entry in index.entries() {
        for (offset, coordinate) in entry.map.iter() {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}",
                entry.transcript_id, entry.chromosome, offset, coordinate
            )?;
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}

/// Write the full index dump to a file
pub fn write_dump<P: AsRef<Path>>(index: &TranscriptMapIndex, path: P) -> io::Result<usize> {
    let mut writer = create_buf_writer(path.as_ref())?;
    let rows = write_dump_to(&mut writer, index)?;
    log::info!("Wrote {} map rows to {}", rows, path.as_ref().display());
    Ok(rows)
}

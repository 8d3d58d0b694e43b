//! Table adapters
//!
//! Readers for the mapping and query tables and the writers for query
//! reports and full map dumps.

pub mod query;
pub mod report;
pub mod transcripts;

pub use query::{parse_queries, read_queries, Query};
pub use report::{
    format_row, resolve_queries, write_dump, write_dump_to, write_report, write_report_to,
    QueryRow, ReportConfig, ReportStats,
};
pub use transcripts::{parse_transcript_records, read_transcript_records};

use crate::core::{ParseError, ParseResult};
use memchr::memchr;
use std::path::Path;

/// Split a line into tab-separated fields
pub(crate) fn split_tabs(line: &[u8]) -> Vec<&[u8]> {
    let mut fields = Vec::with_capacity(4);
    let mut start = 0;
    while let Some(tab_pos) = memchr(b'\t', &line[start..]) {
        fields.push(&line[start..start + tab_pos]);
        start += tab_pos + 1;
    }
    fields.push(&line[start..]);
    fields
}

/// True for lines that carry no record
pub(crate) fn is_skippable(line: &[u8]) -> bool {
    line.iter().all(|b| b.is_ascii_whitespace()) || line.first() == Some(&b'#')
}

/// Decode a field as trimmed UTF-8
pub(crate) fn field_str<'a>(
    field: &'a [u8],
    name: &'static str,
    line: usize,
) -> ParseResult<&'a str> {
    std::str::from_utf8(field)
        .map(str::trim)
        .map_err(|_| ParseError::InvalidUtf8 { line, field: name })
}

/// Decode a required, non-empty text field
pub(crate) fn required_str<'a>(
    field: &'a [u8],
    name: &'static str,
    line: usize,
) -> ParseResult<&'a str> {
    let value = field_str(field, name, line)?;
    if value.is_empty() {
        return Err(ParseError::EmptyField { line, field: name });
    }
    Ok(value)
}

/// Decode an integer field
pub(crate) fn parse_int(field: &[u8], name: &'static str, line: usize) -> ParseResult<i64> {
    let value = required_str(field, name, line)?;
    value.parse().map_err(|_| ParseError::InvalidNumber {
        line,
        field: name,
        value: value.to_string(),
    })
}

/// Open an input table, reporting a missing file as `FileNotFound`
pub(crate) fn open_table(path: &Path) -> ParseResult<crate::core::TableReader> {
    crate::core::TableReader::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ParseError::FileNotFound(path.to_path_buf())
        } else {
            ParseError::Io(e)
        }
    })
}

//! Query table reader
//!
//! Each line is `transcript_id<TAB>local_offset`. Offsets are signed; a
//! negative offset is a valid query that resolves to out of range.

use super::{is_skippable, open_table, parse_int, required_str, split_tabs};
use crate::core::{ByteLineIterator, ParseError, ParseResult};
use std::io::BufRead;
use std::path::Path;

/// A point query against the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub transcript_id: String,
    pub offset: i64,
}

impl Query {
    pub fn new(transcript_id: impl Into<String>, offset: i64) -> Self {
        Self {
            transcript_id: transcript_id.into(),
            offset,
        }
    }
}

/// Read all queries from a (possibly compressed) query table
pub fn read_queries<P: AsRef<Path>>(path: P) -> ParseResult<Vec<Query>> {
    let reader = open_table(path.as_ref())?;
    let queries = parse_queries(reader)?;
    log::info!("Loaded {} queries from {}", queries.len(), path.as_ref().display());
    Ok(queries)
}

/// Parse queries from any buffered reader
pub fn parse_queries<R: BufRead>(reader: R) -> ParseResult<Vec<Query>> {
    let mut lines = ByteLineIterator::new(reader);
    let mut queries = Vec::new();
    let mut line_no = 0;

    while let Some(line) = lines.next_line() {
        let line = line?;
        line_no += 1;
        if is_skippable(line) {
            continue;
        }

        let fields = split_tabs(line);
        if fields.len() != 2 {
            return Err(ParseError::FieldCount {
                line: line_no,
                expected: 2,
                found: fields.len(),
            });
        }

        let transcript_id = required_str(fields[0], "transcript_id", line_no)?;
        let offset = parse_int(fields[1], "local_offset", line_no)?;
        queries.push(Query::new(transcript_id, offset));
    }

    Ok(queries)
}

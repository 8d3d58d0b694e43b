//! Mapping table reader
//!
//! Each line holds one transcript record with four tab-separated fields and
//! no header:
//!
//! ```text
//! transcript_id  chromosome  reference_start  cigar
//! TR1            CHR1        3                8M7D6M2I2M11D7M
//! ```

use super::{field_str, is_skippable, open_table, parse_int, required_str, split_tabs};
use crate::core::{ByteLineIterator, ParseError, ParseResult, TranscriptRecord};
use std::io::BufRead;
use std::path::Path;

const FIELD_COUNT: usize = 4;

/// Read all transcript records from a (possibly compressed) mapping table
pub fn read_transcript_records<P: AsRef<Path>>(path: P) -> ParseResult<Vec<TranscriptRecord>> {
    let reader = open_table(path.as_ref())?;
    let records = parse_transcript_records(reader)?;
    log::info!(
        "Loaded {} transcript records from {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(records)
}

/// Parse transcript records from any buffered reader
///
/// Blank lines and lines starting with `#` are skipped. The CIGAR field is
/// kept verbatim; it is validated when the map is built.
pub fn parse_transcript_records<R: BufRead>(reader: R) -> ParseResult<Vec<TranscriptRecord>> {
    let mut lines = ByteLineIterator::new(reader);
    let mut records = Vec::new();
    let mut line_no = 0;

    while let Some(line) = lines.next_line() {
        let line = line?;
        line_no += 1;
        if is_skippable(line) {
            continue;
        }
        records.push(parse_record_line(line, line_no)?);
    }

    Ok(records)
}

fn parse_record_line(line: &[u8], line_no: usize) -> ParseResult<TranscriptRecord> {
    let fields = split_tabs(line);
    if fields.len() != FIELD_COUNT {
        return Err(ParseError::FieldCount {
            line: line_no,
            expected: FIELD_COUNT,
            found: fields.len(),
        });
    }

    let transcript_id = required_str(fields[0], "transcript_id", line_no)?;
    let chromosome = required_str(fields[1], "chromosome", line_no)?;
    let reference_start = parse_int(fields[2], "reference_start", line_no)?;
    if reference_start < 0 {
        return Err(ParseError::InvalidNumber {
            line: line_no,
            field: "reference_start",
            value: reference_start.to_string(),
        });
    }
    let cigar = field_str(fields[3], "cigar", line_no)?;

    Ok(TranscriptRecord::new(transcript_id, chromosome, reference_start, cigar))
}

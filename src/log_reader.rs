use std::fmt;

use chrono::{NaiveDateTime, Timelike};
use thiserror::Error;

use crate::log_line::RECORD_SEPARATOR;

/// Reader for the plain-text run logs.
///
/// This module turns persisted records (`DD/MM/YYYY HH:MM:SS:ffffff -> text`)
/// back into timestamps and sentences, for verification and offline tooling.

/// Why a line of a run log could not be read back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordParseError {
    #[error("line {line_no}: missing \" -> \" separator")]
    MissingSeparator { line_no: usize },

    #[error("line {line_no}: malformed timestamp {timestamp:?}")]
    BadTimestamp { line_no: usize, timestamp: String },
}

/// A single record read back from a run log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Local wall-clock time the line was ingested, to the microsecond.
    pub timestamp: NaiveDateTime,

    /// The sentence as it was logged (already stripped).
    pub text: String,
}

impl LogEntry {
    /// Renders the entry in the persisted format, without the newline.
    pub fn format(&self) -> String {
        format!(
            "{}{}{}",
            self.timestamp.format(crate::clock::RECORD_TIMESTAMP_FORMAT),
            RECORD_SEPARATOR,
            self.text
        )
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// Parses one record line (without its trailing newline).
///
/// `line_no` is only used in error messages.
///
/// # Examples
///
/// ```
/// # use sentence_logger::log_reader::parse_record;
/// # use chrono::Timelike;
/// let entry = parse_record("16/10/2026 09:41:07:000512 -> $PGRMZ,wobble", 1).unwrap();
/// assert_eq!(entry.text, "$PGRMZ,wobble");
/// assert_eq!(entry.timestamp.nanosecond(), 512_000);
/// ```
pub fn parse_record(line: &str, line_no: usize) -> Result<LogEntry, RecordParseError> {
    let (stamp, text) = line
        .split_once(RECORD_SEPARATOR)
        .ok_or(RecordParseError::MissingSeparator { line_no })?;

    let bad_timestamp = || RecordParseError::BadTimestamp {
        line_no,
        timestamp: stamp.to_owned(),
    };

    let (seconds, micros) = stamp.rsplit_once(':').ok_or_else(bad_timestamp)?;
    if micros.len() != 6 || !micros.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad_timestamp());
    }
    let micros: u32 = micros.parse().map_err(|_| bad_timestamp())?;

    let timestamp = NaiveDateTime::parse_from_str(seconds, "%d/%m/%Y %H:%M:%S")
        .ok()
        .and_then(|ts| ts.with_nanosecond(micros * 1_000))
        .ok_or_else(bad_timestamp)?;

    Ok(LogEntry {
        timestamp,
        text: text.to_owned(),
    })
}

/// Sequential reader over the contents of a run log.
///
/// Blank lines are skipped; everything else must be a well-formed record.
///
/// # Examples
///
/// ```
/// # use sentence_logger::LogReader;
/// let data = "16/10/2026 09:41:07:000001 -> $GNGLL,1\n\
///             16/10/2026 09:41:08:000002 -> garbage\n";
/// let texts: Vec<String> = LogReader::new(data)
///     .map(|entry| entry.unwrap().text)
///     .collect();
/// assert_eq!(texts, ["$GNGLL,1", "garbage"]);
/// ```
pub struct LogReader<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> LogReader<'a> {
    pub fn new(data: &'a str) -> Self {
        Self {
            lines: data.lines().enumerate(),
        }
    }

    /// Reads the next record, or `None` at end of input.
    pub fn read_entry(&mut self) -> Option<Result<LogEntry, RecordParseError>> {
        self.lines
            .by_ref()
            .find(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| parse_record(line, idx + 1))
    }
}

impl Iterator for LogReader<'_> {
    type Item = Result<LogEntry, RecordParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_entry()
    }
}

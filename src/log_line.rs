use std::fmt;

use chrono::{DateTime, Local};

use crate::clock::format_record_timestamp;

/// Separator between the timestamp and the sentence in a persisted record.
pub const RECORD_SEPARATOR: &str = " -> ";

/// One timestamped input line.
///
/// A `LogLine` is built once per successful read and never changes. Its
/// persisted form is `DD/MM/YYYY HH:MM:SS:ffffff -> <text>\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    timestamp: DateTime<Local>,
    text: String,
}

impl LogLine {
    /// Decodes raw bytes from the line source.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD instead of failing,
    /// and surrounding whitespace (including the line terminator) is stripped.
    ///
    /// # Examples
    ///
    /// ```
    /// # use chrono::Local;
    /// # use sentence_logger::LogLine;
    /// let line = LogLine::decode(b"  $GNGLL,1\r\n", Local::now());
    /// assert_eq!(line.text(), "$GNGLL,1");
    ///
    /// let garbled = LogLine::decode(b"$P\xffX\n", Local::now());
    /// assert_eq!(garbled.text(), "$P\u{FFFD}X");
    /// ```
    pub fn decode(raw: &[u8], timestamp: DateTime<Local>) -> Self {
        let text = String::from_utf8_lossy(raw).trim().to_owned();
        Self { timestamp, text }
    }

    pub fn timestamp(&self) -> &DateTime<Local> {
        &self.timestamp
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Renders the record exactly as it is appended to a log file,
    /// trailing newline included.
    pub fn to_record(&self) -> String {
        format!(
            "{}{}{}\n",
            format_record_timestamp(&self.timestamp),
            RECORD_SEPARATOR,
            self.text
        )
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            format_record_timestamp(&self.timestamp),
            RECORD_SEPARATOR,
            self.text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn at(micros: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2023, 12, 31, 23, 59, 58)
            .unwrap()
            .with_nanosecond(micros * 1_000)
            .unwrap()
    }

    #[test]
    fn test_record_format() {
        let line = LogLine::decode(b"!AIVDM,1,1,,B,abc,0*1A\r\n", at(7));
        assert_eq!(line.to_record(), "31/12/2023 23:59:58:000007 -> !AIVDM,1,1,,B,abc,0*1A\n");
        assert_eq!(line.to_string(), "31/12/2023 23:59:58:000007 -> !AIVDM,1,1,,B,abc,0*1A");
    }

    #[test]
    fn test_empty_line() {
        let line = LogLine::decode(b"\r\n", at(0));
        assert_eq!(line.text(), "");
        assert_eq!(line.to_record(), "31/12/2023 23:59:58:000000 -> \n");
    }

    #[test]
    fn test_only_invalid_bytes() {
        let line = LogLine::decode(&[0xC3, 0x28, b'\n'], at(1));
        assert_eq!(line.text(), "\u{FFFD}(");
    }
}

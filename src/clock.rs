use chrono::{DateTime, Local};

/// Wall-clock utilities for timestamping ingested sentences.
///
/// Every record carries a microsecond-resolution local timestamp, and every
/// run names its log files after the second the run started. Both formats
/// live here so the writer and the reader agree on them.

/// Format of the timestamp prepended to each persisted record.
///
/// Renders as `DD/MM/YYYY HH:MM:SS:ffffff`, e.g. `16/10/2026 09:41:07:000512`.
pub const RECORD_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S:%6f";

/// Format of the run-start stamp embedded in log file names (`DDMMYYYYHHMMSS`).
pub const RUN_STAMP_FORMAT: &str = "%d%m%Y%H%M%S";

/// Source of the current wall-clock time.
///
/// The pipeline reads it whenever it timestamps a line or checks the flush
/// cadence. Tests substitute a clock they step forward by hand, so the
/// cadence can be exercised without sleeping.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// The real local clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline(always)]
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Formats a record timestamp.
///
/// # Examples
///
/// ```
/// # use chrono::{Local, TimeZone, Timelike};
/// # use sentence_logger::clock::format_record_timestamp;
/// let ts = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap()
///     .with_nanosecond(42_000).unwrap();
/// assert_eq!(format_record_timestamp(&ts), "09/03/2024 07:05:01:000042");
/// ```
pub fn format_record_timestamp(ts: &DateTime<Local>) -> String {
    ts.format(RECORD_TIMESTAMP_FORMAT).to_string()
}

/// Formats the run stamp shared by the four log files of one run.
///
/// # Examples
///
/// ```
/// # use chrono::{Local, TimeZone};
/// # use sentence_logger::clock::format_run_stamp;
/// let start = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
/// assert_eq!(format_run_stamp(&start), "09032024070501");
/// ```
pub fn format_run_stamp(ts: &DateTime<Local>) -> String {
    ts.format(RUN_STAMP_FORMAT).to_string()
}

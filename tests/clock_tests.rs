use chrono::{Local, TimeZone, Timelike};
use sentence_logger::clock::{format_record_timestamp, format_run_stamp, Clock, SystemClock};
use std::thread;
use std::time::Duration;

#[test]
fn test_system_clock_moves_forward() {
    let clock = SystemClock;
    let first = clock.now();
    thread::sleep(Duration::from_millis(2));
    let second = clock.now();
    assert!(second > first, "Wall clock should advance");
}

#[test]
fn test_record_timestamp_has_microseconds() {
    let ts = Local
        .with_ymd_and_hms(2026, 10, 16, 9, 41, 7)
        .unwrap()
        .with_nanosecond(512_999)
        .unwrap();
    // Sub-microsecond digits are truncated, not rounded.
    assert_eq!(format_record_timestamp(&ts), "16/10/2026 09:41:07:000512");
}

#[test]
fn test_record_timestamp_width_is_fixed() {
    let clock = SystemClock;
    for _ in 0..100 {
        let formatted = format_record_timestamp(&clock.now());
        assert_eq!(formatted.len(), "DD/MM/YYYY HH:MM:SS:ffffff".len());
    }
}

#[test]
fn test_run_stamp_is_second_resolution() {
    let base = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let later_same_second = base.with_nanosecond(999_999_999).unwrap();
    assert_eq!(format_run_stamp(&base), "02012024030405");
    assert_eq!(format_run_stamp(&base), format_run_stamp(&later_same_second));
}

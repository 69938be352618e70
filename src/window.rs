//! Midnight window arithmetic
//!
//! A reading reported up to 15 minutes either side of midnight belongs to
//! that midnight boundary. This module decides window membership, detects
//! exact-midnight timestamps and assigns each boundary reading to its
//! target midnight. All timestamps are naive wall-clock values; applying a
//! timezone offset here would silently shift the window boundaries.

use crate::types::{MeasurementRecord, MidnightKey};
use chrono::{NaiveDateTime, NaiveTime, Timelike};

/// Timestamp format used by `for_datetime`
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Window opens at 23:45:00, inclusive
const WINDOW_OPEN_SECS: u32 = 23 * 3600 + 45 * 60;
/// Window closes at 00:15:00, inclusive
const WINDOW_CLOSE_SECS: u32 = 15 * 60;

/// Parse a naive `for_datetime` string. Malformed input yields `None`,
/// which every check in this module treats as "never in window, never
/// midnight" rather than an error.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, DATETIME_FORMAT).ok()
}

/// True when the clock time falls in [23:45:00, 23:59:59] or
/// [00:00:00, 00:15:00], inclusive on both ends.
pub fn is_in_midnight_window(ts: NaiveDateTime) -> bool {
    let secs = ts.time().num_seconds_from_midnight();
    secs >= WINDOW_OPEN_SECS || secs <= WINDOW_CLOSE_SECS
}

/// True when the clock time is midnight. Seconds are ignored, matching the
/// hour/minute check the rest of the pipeline was calibrated against.
pub fn is_midnight(ts: NaiveDateTime) -> bool {
    ts.hour() == 0 && ts.minute() == 0
}

/// The midnight a boundary-window timestamp is attributed to: a 23:xx
/// reading belongs to the following day's midnight, a 00:xx reading to the
/// same day's. Returns `None` only when the following day does not exist
/// (the calendar maximum).
pub fn target_midnight(ts: NaiveDateTime) -> Option<MidnightKey> {
    let date = if ts.hour() >= 23 {
        ts.date().succ_opt()?
    } else {
        ts.date()
    };
    Some(MidnightKey::new(date.and_time(NaiveTime::MIN)))
}

/// Window membership for a record, defaulting to false on an unparseable
/// `for_datetime`.
pub fn record_in_midnight_window(record: &MeasurementRecord) -> bool {
    parse_datetime(&record.for_datetime).is_some_and(is_in_midnight_window)
}

/// The subset of records inside any midnight window
pub fn midnight_window_records(records: &[MeasurementRecord]) -> Vec<MeasurementRecord> {
    records
        .iter()
        .filter(|r| record_in_midnight_window(r))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(text: &str) -> NaiveDateTime {
        parse_datetime(text).unwrap()
    }

    #[test]
    fn test_window_boundaries() {
        assert!(!is_in_midnight_window(ts("2025-12-09 23:44:59")));
        assert!(is_in_midnight_window(ts("2025-12-09 23:45:00")));
        assert!(is_in_midnight_window(ts("2025-12-09 23:59:59")));
        assert!(is_in_midnight_window(ts("2025-12-10 00:00:00")));
        assert!(is_in_midnight_window(ts("2025-12-10 00:15:00")));
        assert!(!is_in_midnight_window(ts("2025-12-10 00:15:01")));
        assert!(!is_in_midnight_window(ts("2025-12-10 12:00:00")));
    }

    #[test]
    fn test_is_midnight_ignores_seconds() {
        assert!(is_midnight(ts("2025-12-08 00:00:00")));
        assert!(is_midnight(ts("2025-12-08 00:00:30")));
        assert!(!is_midnight(ts("2025-12-08 00:01:00")));
        assert!(!is_midnight(ts("2025-12-08 23:00:00")));
    }

    #[test]
    fn test_target_midnight_assignment() {
        // Late-evening readings belong to the following day's midnight
        let late = target_midnight(ts("2025-12-09 23:50:00")).unwrap();
        assert_eq!(late.date_time(), ts("2025-12-10 00:00:00"));

        // Early-morning readings belong to the same day's midnight
        let early = target_midnight(ts("2025-12-09 00:10:00")).unwrap();
        assert_eq!(early.date_time(), ts("2025-12-09 00:00:00"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_datetime("not a date").is_none());
        assert!(parse_datetime("2025-12-09T23:50:00Z").is_none());
        assert!(parse_datetime("").is_none());
    }

    #[test]
    fn test_record_window_default_false_on_bad_timestamp() {
        let record = MeasurementRecord {
            id: "1".to_string(),
            value: "10".to_string(),
            source_id: String::new(),
            source_instance_id: String::new(),
            source_time: String::new(),
            for_datetime: "garbage".to_string(),
            created_at: String::new(),
            updated_at: String::new(),
            place_of_measurement_id: "774".to_string(),
            measurement_method_id: "333965".to_string(),
        };
        assert!(!record_in_midnight_window(&record));
    }
}

//! Wire date handling.
//!
//! Backends send dates as ISO-8601 strings, except for a few legacy fields
//! that carry a millisecond Unix epoch. Internally every date is a
//! `DateTime<Utc>`; on the wire it is always written back as ISO-8601 in UTC
//! with at least millisecond precision (`2024-03-01T10:00:00.000Z`). Finer
//! instants keep their micro- or nanoseconds.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Timelike, Utc};

/// Parses an ISO-8601 date or date-time.
///
/// Accepts RFC 3339 with any offset, a naive date-time (interpreted as UTC)
/// and a bare calendar date (midnight UTC).
#[must_use]
pub fn parse_iso(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Converts a millisecond Unix epoch into a date.
#[must_use]
pub fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// Formats a date for the wire without losing precision.
#[must_use]
pub fn to_iso(dt: &DateTime<Utc>) -> String {
    let format = if dt.nanosecond() % 1_000_000 == 0 {
        SecondsFormat::Millis
    } else {
        SecondsFormat::AutoSi
    };
    dt.to_rfc3339_opts(format, true)
}

//! Epoch-millisecond helpers.
//!
//! Storage keeps instants as Unix epoch milliseconds and days as UTC
//! `YYYY-MM-DD` strings; this module is the only place converting between
//! those and `chrono` types.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Current time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// UTC calendar day of `epoch_ms`, formatted as `YYYY-MM-DD`.
pub fn utc_date(epoch_ms: i64) -> String {
    to_datetime(epoch_ms).format("%Y-%m-%d").to_string()
}

/// RFC 3339 rendering of `epoch_ms` with a `Z` suffix.
pub fn to_iso8601(epoch_ms: i64) -> String {
    to_datetime(epoch_ms).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parses an ISO-8601 date or date-time into epoch milliseconds.
///
/// Accepted shapes:
/// - RFC 3339 with offset (`2025-01-31T12:00:00+02:00`)
/// - naive date-time, read as UTC (`2025-01-31T12:00:00`, `2025-01-31 12:00`)
/// - plain date, read as UTC midnight (`2025-01-31`)
pub fn parse_iso8601(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.timestamp_millis());
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp_millis())
}

fn to_datetime(epoch_ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(epoch_ms).unwrap_or_default()
}

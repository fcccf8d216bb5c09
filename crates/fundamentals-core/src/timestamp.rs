//! Timestamp codec for text-backed stores
//!
//! SQLite has no timestamp type, so timestamps live in TEXT cells. Writes use
//! one canonical form, `YYYY-MM-DD HH:MM:SS[.ffffff]+00:00`, which is also
//! what Python's sqlite3 adapter produces for aware UTC datetimes. Within that
//! form byte order equals time order, which range queries depend on.
//!
//! Reads accept the canonical form plus a few common variants, each parsed
//! through an explicit format string.

use crate::errors::{FundError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Offset-aware formats tried in order
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Naive formats, read as UTC
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Render a timestamp in the canonical stored form
///
/// Precision is truncated to microseconds; the fraction is omitted when it is
/// zero.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    let micros = ts.timestamp_subsec_micros();
    if micros == 0 {
        format!("{}+00:00", ts.format("%Y-%m-%d %H:%M:%S"))
    } else {
        format!("{}.{:06}+00:00", ts.format("%Y-%m-%d %H:%M:%S"), micros)
    }
}

/// Parse a stored timestamp
///
/// # Errors
///
/// Returns `FundError::MalformedTimestamp` when no accepted format matches.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let s = raw.trim();

    for fmt in OFFSET_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(s, fmt) {
            return Ok(ts.with_timezone(&Utc));
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    if let Some(naive) = NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(Utc.from_utc_datetime(&naive));
    }

    Err(FundError::MalformedTimestamp {
        raw: raw.to_string(),
    })
}

/// Interpret a numeric cell as Unix seconds
///
/// # Errors
///
/// Returns `FundError::MalformedTimestamp` for non-finite or out-of-range
/// values.
pub fn from_unix_seconds(secs: f64) -> Result<DateTime<Utc>> {
    let malformed = || FundError::MalformedTimestamp {
        raw: secs.to_string(),
    };
    if !secs.is_finite() {
        return Err(malformed());
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos).ok_or_else(malformed)
}

//! Decoding of stored cells into timestamps and floats

#![allow(clippy::result_large_err)]

use crate::errors::Result;
use chrono::{DateTime, Utc};
use fundamentals_core::errors::FundError;
use fundamentals_core::timestamp::{format_timestamp, from_unix_seconds, parse_timestamp};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;
use rusqlite::Connection;

/// SQL function rewriting a date cell into canonical timestamp text
///
/// Range filters compare `fundamentals_ts(column)` against canonical
/// bounds, so every cell the decoder accepts (bare dates, naive or offset
/// datetimes, Unix seconds) is ordered by time rather than by its raw bytes.
pub(crate) const CANONICAL_TS_FN: &str = "fundamentals_ts";

/// Register `CANONICAL_TS_FN` on `conn`
///
/// Registering again replaces the previous definition.
pub(crate) fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        CANONICAL_TS_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(canonical_timestamp(ctx.get_raw(0))),
    )?;
    Ok(())
}

/// Canonical text for a date cell
///
/// Undecodable text passes through unchanged so it still compares by its
/// bytes and the decoder reports it when the row is read. NULL and blobs
/// stay NULL and never match a range.
fn canonical_timestamp(cell: ValueRef<'_>) -> Option<String> {
    match timestamp_from_cell(cell) {
        Ok(ts) => Some(format_timestamp(&ts)),
        Err(_) => match cell {
            ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        },
    }
}

/// Decode a date cell
///
/// Text goes through the timestamp parser; numbers are Unix seconds.
pub(crate) fn timestamp_from_cell(cell: ValueRef<'_>) -> Result<DateTime<Utc>> {
    let ts = match cell {
        ValueRef::Text(bytes) => parse_timestamp(&String::from_utf8_lossy(bytes))?,
        ValueRef::Integer(secs) => from_unix_seconds(secs as f64)?,
        ValueRef::Real(secs) => from_unix_seconds(secs)?,
        ValueRef::Null => {
            return Err(FundError::MalformedTimestamp {
                raw: "NULL".to_string(),
            }
            .into())
        }
        ValueRef::Blob(_) => {
            return Err(FundError::MalformedTimestamp {
                raw: "<blob>".to_string(),
            }
            .into())
        }
    };
    Ok(ts)
}

/// Coerce a value cell to a float
///
/// `None` means the row exists but holds no value (NULL or empty text).
pub(crate) fn value_from_cell(cell: ValueRef<'_>) -> Result<Option<f64>> {
    match cell {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(i) => Ok(Some(i as f64)),
        ValueRef::Real(f) => Ok(Some(f)),
        ValueRef::Text(bytes) => {
            let text = String::from_utf8_lossy(bytes);
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<f64>().map(Some).map_err(|_| {
                FundError::MalformedValue {
                    reason: format!("text '{}' is not a number", text),
                }
                .into()
            })
        }
        ValueRef::Blob(_) => Err(FundError::MalformedValue {
            reason: "blob cannot be read as a number".to_string(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fundamentals_core::FundErrorKind;

    #[test]
    fn test_timestamp_cells() {
        let expected = Utc.with_ymd_and_hms(2013, 8, 21, 0, 0, 0).unwrap();
        assert_eq!(
            timestamp_from_cell(ValueRef::Text(b"2013-08-21 00:00:00+00:00")).unwrap(),
            expected
        );
        assert_eq!(
            timestamp_from_cell(ValueRef::Integer(1_377_043_200)).unwrap(),
            expected
        );
        let err = timestamp_from_cell(ValueRef::Null).unwrap_err();
        assert_eq!(err.kind(), FundErrorKind::MalformedTimestamp);
    }

    #[test]
    fn test_value_cells() {
        assert_eq!(value_from_cell(ValueRef::Real(1.23)).unwrap(), Some(1.23));
        assert_eq!(value_from_cell(ValueRef::Integer(7)).unwrap(), Some(7.0));
        assert_eq!(value_from_cell(ValueRef::Text(b" 4.5 ")).unwrap(), Some(4.5));
        assert_eq!(value_from_cell(ValueRef::Text(b"")).unwrap(), None);
        assert_eq!(value_from_cell(ValueRef::Null).unwrap(), None);
        assert_eq!(value_from_cell(ValueRef::Real(0.0)).unwrap(), Some(0.0));
    }

    #[test]
    fn test_canonical_timestamp_normalises_accepted_forms() {
        let canonical = Some("2013-08-21 00:00:00+00:00".to_string());
        assert_eq!(canonical_timestamp(ValueRef::Text(b"2013-08-21")), canonical);
        assert_eq!(
            canonical_timestamp(ValueRef::Text(b"2013-08-21 00:00:00")),
            canonical
        );
        assert_eq!(
            canonical_timestamp(ValueRef::Text(b"2013-08-21 02:00:00+02:00")),
            canonical
        );
        assert_eq!(canonical_timestamp(ValueRef::Integer(1_377_043_200)), canonical);
        assert_eq!(
            canonical_timestamp(ValueRef::Text(b"2013-08-21 lunchtime")),
            Some("2013-08-21 lunchtime".to_string())
        );
        assert_eq!(canonical_timestamp(ValueRef::Null), None);
    }

    #[test]
    fn test_registered_function_is_callable_from_sql() {
        let conn = Connection::open_in_memory().unwrap();
        register_functions(&conn).unwrap();

        let text: String = conn
            .query_row("SELECT fundamentals_ts('2013-06-30')", [], |row| row.get(0))
            .unwrap();
        assert_eq!(text, "2013-06-30 00:00:00+00:00");
    }

    #[test]
    fn test_unreadable_values_are_errors() {
        let err = value_from_cell(ValueRef::Text(b"n/a")).unwrap_err();
        assert_eq!(err.kind(), FundErrorKind::MalformedValue);
        assert!(value_from_cell(ValueRef::Blob(&[1, 2, 3])).is_err());
    }
}

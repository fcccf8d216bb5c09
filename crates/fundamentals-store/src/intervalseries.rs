//! Interval series driver
//!
//! One row per (start, end, symbol, metric) interval. Overlapping intervals
//! are stored as given; a lookup inside an overlap returns whichever row
//! SQLite finds first.

#![allow(clippy::result_large_err)]

use crate::codec::{timestamp_from_cell, value_from_cell, CANONICAL_TS_FN};
use crate::driver::{SqliteDriver, TableSchema};
use crate::errors::Result;
use chrono::{DateTime, Utc};
use fundamentals_core::config::SeriesConfig;
use fundamentals_core::ident::TableName;
use fundamentals_core::model::IntervalRecord;
use fundamentals_core::timestamp::format_timestamp;
use fundamentals_core::{log_op_end, log_op_error, log_op_start};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension};
use std::time::Instant;

/// Table layout for interval series
pub struct IntervalSchema;

impl TableSchema for IntervalSchema {
    const KIND: &'static str = "interval";

    fn create_statements(table: &TableName) -> Vec<String> {
        vec![format!(
            "CREATE TABLE IF NOT EXISTS {} (start TIMESTAMP, \"end\" TIMESTAMP, symbol TEXT, metric TEXT, value REAL)",
            table
        )]
    }
}

/// Reads and writes one metric's values valid over a date range
#[derive(Debug)]
pub struct SqliteIntervalseries<'conn> {
    base: SqliteDriver<'conn>,
}

impl<'conn> SqliteIntervalseries<'conn> {
    pub fn new(conn: &'conn Connection, table: &str, metric: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base: SqliteDriver::open::<IntervalSchema>(conn, table, metric)?,
        })
    }

    pub fn from_config(conn: &'conn Connection, config: &SeriesConfig) -> Result<Self> {
        Ok(Self {
            base: SqliteDriver::from_config::<IntervalSchema>(conn, config)?,
        })
    }

    pub fn table(&self) -> &TableName {
        self.base.table()
    }

    pub fn metric(&self) -> &str {
        self.base.metric()
    }

    /// Value of the metric for `symbol` on `date`
    ///
    /// - `None`: no interval covers `date`
    /// - `Some(NaN)`: a covering interval exists but its value is NULL, empty
    ///   or zero
    /// - `Some(v)`: the covering interval's value
    pub fn get(&self, symbol: &str, date: DateTime<Utc>) -> Result<Option<f64>> {
        log_op_start!(
            "interval_get",
            table = self.table().as_str(),
            metric = self.metric(),
            symbol = symbol
        );
        let started = Instant::now();

        let value = self.lookup(symbol, date).map_err(|e| {
            log_op_error!(
                "interval_get",
                e,
                duration_ms = started.elapsed().as_millis() as u64,
                symbol = symbol
            );
            e
        })?;

        log_op_end!(
            "interval_get",
            duration_ms = started.elapsed().as_millis() as u64,
            symbol = symbol,
            found = value.is_some()
        );
        Ok(value)
    }

    fn lookup(&self, symbol: &str, date: DateTime<Utc>) -> Result<Option<f64>> {
        let sql = format!(
            "SELECT value FROM {t} WHERE metric = ?1 AND symbol = ?2 AND {f}(start) <= ?3 AND ?3 <= {f}(\"end\") LIMIT 1",
            t = self.table(),
            f = CANONICAL_TS_FN
        );
        let mut stmt = self.base.connection().prepare_cached(&sql)?;
        let cell = stmt
            .query_row(
                rusqlite::params![self.metric(), symbol, format_timestamp(&date)],
                |row| row.get::<_, Value>("value"),
            )
            .optional()?;

        match cell {
            None => Ok(None),
            Some(cell) => {
                // NULL, empty text and zero all read as "no value"
                let value = value_from_cell((&cell).into())?.filter(|v| *v != 0.0);
                Ok(Some(value.unwrap_or(f64::NAN)))
            }
        }
    }

    /// Store `value` for `symbol` over `[start, end]`
    ///
    /// No overlap checks; repeating a call stores a second row. A NaN value
    /// is stored as NULL and reads back as NaN.
    pub fn set_interval(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        value: f64,
    ) -> Result<()> {
        log_op_start!(
            "interval_set",
            table = self.table().as_str(),
            metric = self.metric(),
            symbol = symbol
        );
        let started = Instant::now();

        self.base
            .write(|conn| {
                let sql = format!(
                    "INSERT INTO {} (symbol, start, \"end\", metric, value) VALUES (?1, ?2, ?3, ?4, ?5)",
                    self.table()
                );
                conn.prepare_cached(&sql)?.execute(rusqlite::params![
                    symbol,
                    format_timestamp(&start),
                    format_timestamp(&end),
                    self.metric(),
                    value,
                ])?;
                Ok(())
            })
            .map_err(|e| {
                log_op_error!(
                    "interval_set",
                    e,
                    duration_ms = started.elapsed().as_millis() as u64,
                    symbol = symbol
                );
                e
            })?;

        log_op_end!(
            "interval_set",
            duration_ms = started.elapsed().as_millis() as u64,
            symbol = symbol
        );
        Ok(())
    }

    /// Every stored interval for `symbol`, ordered by start
    ///
    /// Values are listed as stored: a zero stays zero here.
    pub fn intervals(&self, symbol: &str) -> Result<Vec<IntervalRecord>> {
        let sql = format!(
            "SELECT start, \"end\", value FROM {t} WHERE metric = ?1 AND symbol = ?2 ORDER BY {f}(start), {f}(\"end\")",
            t = self.table(),
            f = CANONICAL_TS_FN
        );
        let mut stmt = self.base.connection().prepare_cached(&sql)?;
        let cells = stmt
            .query_map(rusqlite::params![self.metric(), symbol], |row| {
                Ok((
                    row.get::<_, Value>("start")?,
                    row.get::<_, Value>("end")?,
                    row.get::<_, Value>("value")?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let records = cells
            .iter()
            .map(|(start, end, value)| -> Result<IntervalRecord> {
                Ok(IntervalRecord::new(
                    symbol,
                    timestamp_from_cell(start.into())?,
                    timestamp_from_cell(end.into())?,
                    self.metric(),
                    value_from_cell(value.into())?.unwrap_or(f64::NAN),
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(
            table = self.table().as_str(),
            symbol = symbol,
            rows = records.len(),
            "listed intervals"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_statement_quotes_end_column() {
        let table = TableName::parse("eps_intervals").unwrap();
        let stmts = IntervalSchema::create_statements(&table);
        assert_eq!(stmts.len(), 1, "interval tables carry no extra index");
        assert!(stmts[0].contains("\"end\" TIMESTAMP"));
    }
}

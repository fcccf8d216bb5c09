//! Point series driver
//!
//! One row per (date, symbol, metric) observation. Rows are only ever
//! appended: writing the same observation twice stores it twice.

#![allow(clippy::result_large_err)]

use crate::codec::{timestamp_from_cell, value_from_cell, CANONICAL_TS_FN};
use crate::driver::{SqliteDriver, TableSchema};
use crate::errors::Result;
use chrono::{DateTime, Utc};
use fundamentals_core::config::SeriesConfig;
use fundamentals_core::ident::TableName;
use fundamentals_core::model::{DateRange, PointRecord};
use fundamentals_core::timestamp::format_timestamp;
use fundamentals_core::{log_op_end, log_op_error, log_op_start};
use rusqlite::types::{Value, ValueRef};
use rusqlite::Connection;
use std::borrow::Borrow;
use std::time::Instant;

/// Table layout for point series
pub struct PointSchema;

impl PointSchema {
    /// Name of the composite lookup index for `table`
    pub fn index_name(table: &TableName) -> String {
        format!("{}_date_symbol_metric_idx", table)
    }
}

impl TableSchema for PointSchema {
    const KIND: &'static str = "point";

    fn create_statements(table: &TableName) -> Vec<String> {
        vec![
            format!(
                "CREATE TABLE IF NOT EXISTS {} (date TIMESTAMP, symbol TEXT, metric TEXT, value REAL)",
                table
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS {} ON {} (date, symbol, metric)",
                Self::index_name(table),
                table
            ),
        ]
    }
}

/// Rows fetched by a point series lookup
///
/// Rows are read from the store up front; each one is decoded only when the
/// iterator reaches it. Order is whatever the store returned, which is not
/// necessarily chronological.
#[derive(Debug)]
pub struct PointRows {
    rows: std::vec::IntoIter<(Value, Value)>,
}

impl PointRows {
    fn decode(date: &Value, value: &Value) -> Result<(DateTime<Utc>, f64)> {
        let date = timestamp_from_cell(ValueRef::from(date))?;
        let value = value_from_cell(ValueRef::from(value))?.unwrap_or(f64::NAN);
        Ok((date, value))
    }
}

impl Iterator for PointRows {
    type Item = Result<(DateTime<Utc>, f64)>;

    fn next(&mut self) -> Option<Self::Item> {
        let (date, value) = self.rows.next()?;
        Some(Self::decode(&date, &value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for PointRows {}

/// Reads and writes one metric's values indexed by exact timestamp
#[derive(Debug)]
pub struct SqliteTimeseries<'conn> {
    base: SqliteDriver<'conn>,
}

impl<'conn> SqliteTimeseries<'conn> {
    /// Bind to `table` for `metric`, creating the table and its index if needed
    pub fn new(conn: &'conn Connection, table: &str, metric: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base: SqliteDriver::open::<PointSchema>(conn, table, metric)?,
        })
    }

    pub fn from_config(conn: &'conn Connection, config: &SeriesConfig) -> Result<Self> {
        Ok(Self {
            base: SqliteDriver::from_config::<PointSchema>(conn, config)?,
        })
    }

    pub fn table(&self) -> &TableName {
        self.base.table()
    }

    pub fn metric(&self) -> &str {
        self.base.metric()
    }

    /// All stored values for `symbol` between the earliest and latest of `dates`
    ///
    /// Both ends are inclusive. `dates` may be in any order; only its minimum
    /// and maximum matter.
    ///
    /// # Errors
    ///
    /// `EmptyDates` if `dates` is empty, otherwise any SQLite failure. Decoding
    /// failures surface per row from the returned iterator.
    pub fn get<I>(&self, symbol: &str, dates: I) -> Result<PointRows>
    where
        I: IntoIterator,
        I::Item: Borrow<DateTime<Utc>>,
    {
        let range = DateRange::spanning(dates)?;
        self.get_range(symbol, range.start, range.end)
    }

    /// All stored values for `symbol` with `start <= date <= end`
    pub fn get_range(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PointRows> {
        log_op_start!(
            "point_get",
            table = self.table().as_str(),
            metric = self.metric(),
            symbol = symbol
        );
        let started = Instant::now();

        let rows = self.select_range(symbol, start, end).map_err(|e| {
            log_op_error!(
                "point_get",
                e,
                duration_ms = started.elapsed().as_millis() as u64,
                symbol = symbol
            );
            e
        })?;

        log_op_end!(
            "point_get",
            duration_ms = started.elapsed().as_millis() as u64,
            symbol = symbol,
            rows = rows.len()
        );
        Ok(PointRows {
            rows: rows.into_iter(),
        })
    }

    /// Like `get`, but decodes every row into a full `PointRecord`
    pub fn get_records<I>(&self, symbol: &str, dates: I) -> Result<Vec<PointRecord>>
    where
        I: IntoIterator,
        I::Item: Borrow<DateTime<Utc>>,
    {
        self.get(symbol, dates)?
            .map(|row| -> Result<PointRecord> {
                let (date, value) = row?;
                Ok(PointRecord::new(symbol, date, self.metric(), value))
            })
            .collect()
    }

    fn select_range(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<(Value, Value)>> {
        let sql = format!(
            "SELECT value, date FROM {} WHERE symbol = ?1 AND {}(date) BETWEEN ?2 AND ?3 AND metric = ?4",
            self.table(),
            CANONICAL_TS_FN
        );
        let mut stmt = self.base.connection().prepare_cached(&sql)?;
        let rows = stmt
            .query_map(
                rusqlite::params![
                    symbol,
                    format_timestamp(&start),
                    format_timestamp(&end),
                    self.metric(),
                ],
                |row| Ok((row.get::<_, Value>("date")?, row.get::<_, Value>("value")?)),
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Append one row per `(date, value)` pair for `symbol`
    ///
    /// Each pair is its own INSERT, all inside one transaction: either every
    /// pair is stored or, on failure, none are. Returns the number of rows
    /// written. A NaN value is stored as NULL.
    pub fn set<I>(&self, symbol: &str, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = (DateTime<Utc>, f64)>,
    {
        log_op_start!(
            "point_set",
            table = self.table().as_str(),
            metric = self.metric(),
            symbol = symbol
        );
        let started = Instant::now();

        let written = self
            .base
            .write(|conn| {
                let sql = format!(
                    "INSERT INTO {} (symbol, date, metric, value) VALUES (?1, ?2, ?3, ?4)",
                    self.table()
                );
                let mut stmt = conn.prepare_cached(&sql)?;
                let mut written = 0usize;
                for (date, value) in records {
                    stmt.execute(rusqlite::params![
                        symbol,
                        format_timestamp(&date),
                        self.metric(),
                        value,
                    ])?;
                    written += 1;
                }
                Ok(written)
            })
            .map_err(|e| {
                log_op_error!(
                    "point_set",
                    e,
                    duration_ms = started.elapsed().as_millis() as u64,
                    symbol = symbol
                );
                e
            })?;

        log_op_end!(
            "point_set",
            duration_ms = started.elapsed().as_millis() as u64,
            symbol = symbol,
            rows = written
        );
        Ok(written)
    }
}

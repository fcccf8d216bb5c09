//! Base driver shared by the series drivers
//!
//! A driver borrows one connection, validates its table name once, and makes
//! sure the table exists before handing out any read or write.

#![allow(clippy::result_large_err)]

use crate::codec::register_functions;
use crate::errors::Result;
use fundamentals_core::config::SeriesConfig;
use fundamentals_core::ident::TableName;
use fundamentals_core::{log_op_end, log_op_error, log_op_start};
use rusqlite::Connection;
use std::time::Instant;

/// DDL for one kind of series table
pub trait TableSchema {
    /// Short name used in log events
    const KIND: &'static str;

    /// `CREATE ... IF NOT EXISTS` statements, run in order
    fn create_statements(table: &TableName) -> Vec<String>;
}

/// Connection, table and metric binding common to every series driver
#[derive(Debug)]
pub struct SqliteDriver<'conn> {
    conn: &'conn Connection,
    table: TableName,
    metric: String,
}

impl<'conn> SqliteDriver<'conn> {
    /// Bind to `table` and `metric`, creating the table if it is absent
    ///
    /// Also registers the timestamp SQL function the series queries use.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidIdentifier` if `table` is not a plain identifier,
    /// or with the SQLite error if table creation fails.
    pub fn open<S: TableSchema>(
        conn: &'conn Connection,
        table: &str,
        metric: impl Into<String>,
    ) -> Result<Self> {
        let table = TableName::parse(table)?;
        let metric = metric.into();
        register_functions(conn)?;
        ensure_table::<S>(conn, &table)?;
        Ok(Self {
            conn,
            table,
            metric,
        })
    }

    pub fn from_config<S: TableSchema>(
        conn: &'conn Connection,
        config: &SeriesConfig,
    ) -> Result<Self> {
        config.validate()?;
        Self::open::<S>(conn, &config.table, config.metric.clone())
    }

    pub fn connection(&self) -> &'conn Connection {
        self.conn
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// Run `f` as one unit of work
    ///
    /// Commits when `f` succeeds and rolls back when it fails. If the caller
    /// already holds an open transaction on the connection, `f` runs inside
    /// it and the caller decides when to commit.
    pub(crate) fn write<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        in_unit_of_work(self.conn, f)
    }
}

fn in_unit_of_work<T>(conn: &Connection, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
    if !conn.is_autocommit() {
        return f(conn);
    }
    let tx = conn.unchecked_transaction()?;
    let out = f(&tx)?;
    tx.commit()?;
    Ok(out)
}

/// Create the table (and any companion objects) for schema `S`
pub fn ensure_table<S: TableSchema>(conn: &Connection, table: &TableName) -> Result<()> {
    log_op_start!("ensure_table", table = table.as_str(), kind = S::KIND);
    let start = Instant::now();

    in_unit_of_work(conn, |conn| {
        for stmt in S::create_statements(table) {
            conn.execute(&stmt, [])?;
        }
        Ok(())
    })
    .map_err(|e| {
        log_op_error!(
            "ensure_table",
            e,
            duration_ms = start.elapsed().as_millis() as u64,
            table = table.as_str()
        );
        e
    })?;

    log_op_end!(
        "ensure_table",
        duration_ms = start.elapsed().as_millis() as u64,
        table = table.as_str()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundamentals_core::FundErrorKind;

    struct Scratch;

    impl TableSchema for Scratch {
        const KIND: &'static str = "scratch";

        fn create_statements(table: &TableName) -> Vec<String> {
            vec![format!("CREATE TABLE IF NOT EXISTS {} (x REAL)", table)]
        }
    }

    struct Broken;

    impl TableSchema for Broken {
        const KIND: &'static str = "broken";

        fn create_statements(table: &TableName) -> Vec<String> {
            vec![
                format!("CREATE TABLE IF NOT EXISTS {} (x REAL)", table),
                "CREATE NONSENSE".to_string(),
            ]
        }
    }

    fn table_count(conn: &Connection, name: &str) -> i64 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_open_creates_table_and_binds_metric() {
        let conn = Connection::open_in_memory().unwrap();
        let driver = SqliteDriver::open::<Scratch>(&conn, "scratch", "eps").unwrap();

        assert_eq!(driver.table().as_str(), "scratch");
        assert_eq!(driver.metric(), "eps");
        assert_eq!(table_count(&conn, "scratch"), 1);
    }

    #[test]
    fn test_invalid_table_never_reaches_sqlite() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteDriver::open::<Scratch>(&conn, "x; DROP TABLE y", "eps").unwrap_err();

        assert_eq!(err.kind(), FundErrorKind::InvalidIdentifier);
        let tables: i64 = conn
            .query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| row.get(0))
            .unwrap();
        assert_eq!(tables, 0);
    }

    #[test]
    fn test_failed_creation_rolls_back() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteDriver::open::<Broken>(&conn, "broken", "eps").unwrap_err();

        assert!(err.as_sqlite().is_some());
        assert_eq!(table_count(&conn, "broken"), 0);
        assert!(conn.is_autocommit());
    }

    #[test]
    fn test_write_joins_caller_transaction() {
        let conn = Connection::open_in_memory().unwrap();
        let driver = SqliteDriver::open::<Scratch>(&conn, "scratch", "eps").unwrap();

        conn.execute_batch("BEGIN").unwrap();
        driver
            .write(|conn| Ok(conn.execute("INSERT INTO scratch (x) VALUES (1.0)", [])?))
            .unwrap();
        assert!(!conn.is_autocommit(), "caller's transaction stays open");
        conn.execute_batch("ROLLBACK").unwrap();

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM scratch", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 0);
    }
}

//! Database connection management
//!
//! Drivers never open connections themselves; these helpers exist for the
//! owning application and for tests.

#![allow(clippy::result_large_err)]

use crate::errors::Result;
use fundamentals_core::config::StoreConfig;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Ok(Connection::open(path)?)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Ok(Connection::open_in_memory()?)
}

/// Open the database described by `config` and apply its settings
pub fn open_with_config(config: &StoreConfig) -> Result<Connection> {
    let conn = match &config.path {
        Some(path) => open(path)?,
        None => open_in_memory()?,
    };
    configure(&conn, config)?;
    Ok(conn)
}

/// Apply journal mode and busy timeout from `config`
pub fn configure(conn: &Connection, config: &StoreConfig) -> Result<()> {
    // journal_mode answers with the mode actually in effect; in-memory
    // databases stay in "memory" whatever is requested
    let mode: String = conn.pragma_update_and_check(
        None,
        "journal_mode",
        config.journal_mode.as_pragma(),
        |row| row.get(0),
    )?;
    tracing::debug!(requested = config.journal_mode.as_pragma(), mode = %mode, "journal mode set");

    if let Some(ms) = config.busy_timeout_ms {
        conn.busy_timeout(Duration::from_millis(ms))?;
    }

    Ok(())
}

/// Report the journal mode currently in effect
pub fn journal_mode(conn: &Connection) -> Result<String> {
    Ok(conn.pragma_query_value(None, "journal_mode", |row| row.get(0))?)
}

//! Fundamentals Store - SQLite persistence for financial metric series
//!
//! Provides:
//! - Connection helpers driven by `StoreConfig`
//! - A base driver that validates table names and creates tables on demand
//! - `SqliteTimeseries`: values indexed by exact timestamp
//! - `SqliteIntervalseries`: values valid over a date range

mod codec;
pub mod db;
pub mod driver;
pub mod errors;
pub mod intervalseries;
pub mod timeseries;

// Re-export key types
pub use driver::{SqliteDriver, TableSchema};
pub use errors::{Result, StoreError};
pub use intervalseries::SqliteIntervalseries;
pub use timeseries::{PointRows, SqliteTimeseries};

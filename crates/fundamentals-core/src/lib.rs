//! Fundamentals Core - storage-independent building blocks
//!
//! - Error taxonomy with stable codes
//! - Structured logging facility
//! - SQL identifier validation for caller-supplied table names
//! - Timestamp codec for text-backed stores
//! - Point and interval record model
//! - Configuration values for drivers and the embedded store

pub mod config;
pub mod errors;
pub mod ident;
pub mod logging_facility;
pub mod model;
pub mod timestamp;

// Re-export commonly used types
pub use config::{JournalMode, SeriesConfig, StoreConfig};
pub use errors::{FundError, FundErrorKind, Result};
pub use ident::TableName;
pub use model::{DateRange, IntervalRecord, PointRecord};

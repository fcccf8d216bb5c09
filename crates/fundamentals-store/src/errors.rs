//! Error handling for fundamentals-store
//!
//! SQLite failures are carried through untouched; callers can still match on
//! the underlying `rusqlite::Error`.

use fundamentals_core::errors::{FundError, FundErrorKind};
use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Validation or decoding failure raised by fundamentals-core
    #[error(transparent)]
    Core(#[from] FundError),

    /// Failure reported by SQLite
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    /// Get the error kind
    pub fn kind(&self) -> FundErrorKind {
        match self {
            StoreError::Core(err) => err.kind(),
            StoreError::Sqlite(_) => FundErrorKind::Persistence,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// The SQLite error, if this came from the store
    pub fn as_sqlite(&self) -> Option<&rusqlite::Error> {
        match self {
            StoreError::Sqlite(err) => Some(err),
            StoreError::Core(_) => None,
        }
    }
}

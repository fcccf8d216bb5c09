//! SQL identifier validation
//!
//! Table names are interpolated into SQL text because SQLite cannot bind
//! identifiers as parameters. `TableName` is the only way to get a name into
//! a statement, and it only exists for names that pass the whitelist.

use crate::errors::{FundError, Result};
use std::fmt;

/// Longest table name accepted
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// A table name that is safe to interpolate into SQL
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    /// Validate `name` against `^[A-Za-z_][A-Za-z0-9_]*$`
    ///
    /// # Errors
    ///
    /// Returns `FundError::InvalidIdentifier` if the name is empty, too long,
    /// uses the reserved `sqlite_` prefix, or contains anything outside ASCII
    /// letters, digits and underscore.
    pub fn parse(name: &str) -> Result<Self> {
        let invalid = |reason: &str| FundError::InvalidIdentifier {
            identifier: name.to_string(),
            reason: reason.to_string(),
        };

        let mut chars = name.chars();
        let first = chars.next().ok_or_else(|| invalid("empty"))?;
        if name.len() > MAX_IDENTIFIER_LEN {
            return Err(invalid("longer than 64 characters"));
        }
        if !(first.is_ascii_alphabetic() || first == '_') {
            return Err(invalid("must start with a letter or underscore"));
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid("only ASCII letters, digits and '_' are allowed"));
        }
        if name.to_ascii_lowercase().starts_with("sqlite_") {
            return Err(invalid("the sqlite_ prefix is reserved"));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for TableName {
    type Error = FundError;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

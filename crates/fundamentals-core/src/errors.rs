use thiserror::Error;

/// Result type alias using FundError
pub type Result<T> = std::result::Result<T, FundError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers and tests can match on
/// without depending on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundErrorKind {
    // Structural/Validation
    InvalidIdentifier,
    EmptyDates,
    InvalidConfig,

    // Stored data
    MalformedTimestamp,
    MalformedValue,

    // Integration/IO
    Persistence,
}

impl FundErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            FundErrorKind::InvalidIdentifier => "ERR_INVALID_IDENTIFIER",
            FundErrorKind::EmptyDates => "ERR_EMPTY_DATES",
            FundErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            FundErrorKind::MalformedTimestamp => "ERR_MALFORMED_TIMESTAMP",
            FundErrorKind::MalformedValue => "ERR_MALFORMED_VALUE",
            FundErrorKind::Persistence => "ERR_PERSISTENCE",
        }
    }
}

// ========== End Error Facility ==========

/// Errors raised by the fundamentals core before or after talking to a store
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FundError {
    /// A table name failed validation and was never interpolated into SQL
    #[error("Invalid SQL identifier '{identifier}': {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    /// A point-series lookup was given no dates to bound the range
    #[error("At least one date is required to bound a point series lookup")]
    EmptyDates,

    /// A stored timestamp could not be parsed by any accepted format
    #[error("Malformed stored timestamp '{raw}'")]
    MalformedTimestamp { raw: String },

    /// A stored value could not be coerced to a float
    #[error("Malformed stored value: {reason}")]
    MalformedValue { reason: String },

    /// Configuration could not be parsed or failed validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl FundError {
    /// Get the error kind
    pub fn kind(&self) -> FundErrorKind {
        match self {
            FundError::InvalidIdentifier { .. } => FundErrorKind::InvalidIdentifier,
            FundError::EmptyDates => FundErrorKind::EmptyDates,
            FundError::MalformedTimestamp { .. } => FundErrorKind::MalformedTimestamp,
            FundError::MalformedValue { .. } => FundErrorKind::MalformedValue,
            FundError::InvalidConfig { .. } => FundErrorKind::InvalidConfig,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        let err = FundError::InvalidIdentifier {
            identifier: "bad name".to_string(),
            reason: "contains whitespace".to_string(),
        };
        assert_eq!(err.kind(), FundErrorKind::InvalidIdentifier);
        assert_eq!(err.code(), "ERR_INVALID_IDENTIFIER");
    }

    #[test]
    fn test_display_includes_raw_timestamp() {
        let err = FundError::MalformedTimestamp {
            raw: "yesterday".to_string(),
        };
        assert!(err.to_string().contains("yesterday"));
    }
}

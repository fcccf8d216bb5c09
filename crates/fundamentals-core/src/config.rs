//! Configuration values supplied by the owning application
//!
//! Nothing here reads files. The application may build these directly or
//! deserialize them from its own TOML with `from_toml_str`.

use crate::errors::{FundError, Result};
use crate::ident::TableName;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;

fn parse_toml<T: DeserializeOwned>(raw: &str) -> Result<T> {
    toml::from_str(raw).map_err(|e| FundError::InvalidConfig {
        reason: e.to_string(),
    })
}

/// Binding of one driver to a table and a metric
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesConfig {
    pub table: String,
    pub metric: String,
}

impl SeriesConfig {
    pub fn new(table: impl Into<String>, metric: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            metric: metric.into(),
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = parse_toml(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the table name and return it in validated form
    pub fn validate(&self) -> Result<TableName> {
        if self.metric.is_empty() {
            return Err(FundError::InvalidConfig {
                reason: "metric must not be empty".to_string(),
            });
        }
        TableName::parse(&self.table)
    }
}

/// SQLite journal mode applied by `db::configure`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalMode {
    /// SQLite's rollback journal; also switches a WAL file back
    #[default]
    Delete,
    Wal,
    Memory,
}

impl JournalMode {
    pub fn as_pragma(&self) -> &'static str {
        match self {
            JournalMode::Delete => "DELETE",
            JournalMode::Wal => "WAL",
            JournalMode::Memory => "MEMORY",
        }
    }
}

/// How to open the embedded store
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Database file; `None` opens an in-memory database
    pub path: Option<PathBuf>,
    pub journal_mode: JournalMode,
    /// SQLite busy timeout; unset keeps SQLite's default
    pub busy_timeout_ms: Option<u64>,
}

impl StoreConfig {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        parse_toml(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FundErrorKind;

    #[test]
    fn test_series_config_from_toml() {
        let config = SeriesConfig::from_toml_str(
            r#"
            table = "eps_series"
            metric = "eps"
            "#,
        )
        .unwrap();
        assert_eq!(config, SeriesConfig::new("eps_series", "eps"));
    }

    #[test]
    fn test_series_config_rejects_bad_table() {
        let err = SeriesConfig::from_toml_str(
            r#"
            table = "eps; DROP TABLE eps"
            metric = "eps"
            "#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), FundErrorKind::InvalidIdentifier);
    }

    #[test]
    fn test_series_config_rejects_empty_metric() {
        let err = SeriesConfig::new("eps_series", "").validate().unwrap_err();
        assert_eq!(err.kind(), FundErrorKind::InvalidConfig);
    }

    #[test]
    fn test_store_config_defaults_to_memory() {
        let config = StoreConfig::from_toml_str("").unwrap();
        assert_eq!(config, StoreConfig::in_memory());
        assert!(config.path.is_none());
        assert_eq!(config.journal_mode.as_pragma(), "DELETE");
    }

    #[test]
    fn test_store_config_full() {
        let config = StoreConfig::from_toml_str(
            r#"
            path = "/var/lib/fundamentals/store.db"
            journal_mode = "wal"
            busy_timeout_ms = 2500
            "#,
        )
        .unwrap();
        assert_eq!(config.journal_mode, JournalMode::Wal);
        assert_eq!(config.busy_timeout_ms, Some(2500));
        assert_eq!(
            config.path.as_deref(),
            Some(std::path::Path::new("/var/lib/fundamentals/store.db"))
        );
    }

    #[test]
    fn test_store_config_unknown_key_is_error() {
        let err = StoreConfig::from_toml_str("journal = \"wal\"").unwrap_err();
        assert_eq!(err.code(), "ERR_INVALID_CONFIG");
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Value of a named metric for a symbol at one instant
///
/// Point records are append-only: nothing makes (symbol, date, metric)
/// unique, so writing the same record twice stores it twice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    /// Instrument identifier, e.g. "AAPL"
    pub symbol: String,

    /// Instant the value applies to
    pub date: DateTime<Utc>,

    /// Metric name, e.g. "close_price"
    pub metric: String,

    /// Metric value; NaN marks a stored null
    pub value: f64,
}

impl PointRecord {
    pub fn new(
        symbol: impl Into<String>,
        date: DateTime<Utc>,
        metric: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            date,
            metric: metric.into(),
            value,
        }
    }

    /// The (date, value) pair a point series driver reads and writes
    pub fn as_pair(&self) -> (DateTime<Utc>, f64) {
        (self.date, self.value)
    }
}

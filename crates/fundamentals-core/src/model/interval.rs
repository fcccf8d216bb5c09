use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Value of a named metric for a symbol over `[start, end]`
///
/// Both bounds are inclusive when reading. Overlapping intervals for the same
/// symbol and metric are allowed and are not reconciled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalRecord {
    pub symbol: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub metric: String,
    pub value: f64,
}

impl IntervalRecord {
    pub fn new(
        symbol: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        metric: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            start,
            end,
            metric: metric.into(),
            value,
        }
    }

    /// Whether `date` falls inside the interval, bounds included
    pub fn contains(&self, date: &DateTime<Utc>) -> bool {
        self.start <= *date && *date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_contains_is_inclusive() {
        let start = Utc.with_ymd_and_hms(2013, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2013, 3, 31, 0, 0, 0).unwrap();
        let record = IntervalRecord::new("AAPL", start, end, "eps", 4.56);

        assert!(record.contains(&start));
        assert!(record.contains(&end));
        assert!(record.contains(&(start + Duration::days(10))));
        assert!(!record.contains(&(start - Duration::seconds(1))));
        assert!(!record.contains(&(end + Duration::seconds(1))));
    }
}

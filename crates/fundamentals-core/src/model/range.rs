use crate::errors::{FundError, Result};
use chrono::{DateTime, Utc};
use std::borrow::Borrow;

/// Inclusive `[start, end]` bounds for a point series lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Smallest range covering every date in `dates`
    ///
    /// Order and duplicates in `dates` do not matter.
    ///
    /// # Errors
    ///
    /// Returns `FundError::EmptyDates` when `dates` yields nothing.
    pub fn spanning<I>(dates: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Borrow<DateTime<Utc>>,
    {
        let mut iter = dates.into_iter().map(|d| *Borrow::<DateTime<Utc>>::borrow(&d));
        let first = iter.next().ok_or(FundError::EmptyDates)?;
        let (start, end) = iter.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Ok(Self { start, end })
    }
}

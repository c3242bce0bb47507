use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Inclusive history window. Ordering is checked by [`DateRange::validate`], not on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Midnight UTC on both dates.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: start.and_time(chrono::NaiveTime::MIN).and_utc(),
            end: end.and_time(chrono::NaiveTime::MIN).and_utc(),
        }
    }

    pub fn validate(&self) -> Result<(), FetchError> {
        if self.end < self.start {
            return Err(FetchError::InvalidDateRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    pub fn period1(&self) -> i64 {
        self.start.timestamp()
    }

    pub fn period2(&self) -> i64 {
        self.end.timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn accepts_ordered_and_equal_bounds() {
        DateRange::from_dates(date(2024, 1, 1), date(2024, 6, 1))
            .validate()
            .expect("ordered range");
        DateRange::from_dates(date(2024, 1, 1), date(2024, 1, 1))
            .validate()
            .expect("empty range is still ordered");
    }

    #[test]
    fn rejects_inverted_bounds() {
        let range = DateRange::from_dates(date(2024, 6, 1), date(2024, 1, 1));
        let err = range.validate().expect_err("inverted");
        assert!(matches!(err, FetchError::InvalidDateRange { .. }));
        assert!(err.is_validation());
    }

    #[test]
    fn exposes_unix_periods() {
        let range = DateRange::from_dates(date(1970, 1, 2), date(1970, 1, 3));
        assert_eq!(range.period1(), 86_400);
        assert_eq!(range.period2(), 172_800);
    }
}

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Every span string the provider understands.
///
/// Only the sampling granularities (`1m` through `3mo`) are valid as a history
/// interval; the longer spans are range selectors and fail [`validate_interval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeSpan {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "2m")]
    TwoMinutes,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "60m")]
    SixtyMinutes,
    #[serde(rename = "90m")]
    NinetyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1wk")]
    OneWeek,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "max")]
    Max,
}

impl TimeSpan {
    pub const ALL: [Self; 20] = [
        Self::OneMinute,
        Self::TwoMinutes,
        Self::FiveMinutes,
        Self::FifteenMinutes,
        Self::ThirtyMinutes,
        Self::SixtyMinutes,
        Self::NinetyMinutes,
        Self::OneHour,
        Self::OneDay,
        Self::FiveDays,
        Self::OneWeek,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::OneYear,
        Self::TwoYears,
        Self::FiveYears,
        Self::TenYears,
        Self::YearToDate,
        Self::Max,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::TwoMinutes => "2m",
            Self::FiveMinutes => "5m",
            Self::FifteenMinutes => "15m",
            Self::ThirtyMinutes => "30m",
            Self::SixtyMinutes => "60m",
            Self::NinetyMinutes => "90m",
            Self::OneHour => "1h",
            Self::OneDay => "1d",
            Self::FiveDays => "5d",
            Self::OneWeek => "1wk",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::TenYears => "10y",
            Self::YearToDate => "ytd",
            Self::Max => "max",
        }
    }

    pub const fn is_sampling_interval(self) -> bool {
        matches!(
            self,
            Self::OneMinute
                | Self::TwoMinutes
                | Self::FiveMinutes
                | Self::FifteenMinutes
                | Self::ThirtyMinutes
                | Self::SixtyMinutes
                | Self::NinetyMinutes
                | Self::OneHour
                | Self::OneDay
                | Self::FiveDays
                | Self::OneWeek
                | Self::OneMonth
                | Self::ThreeMonths
        )
    }
}

impl Display for TimeSpan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeSpan {
    type Err = FetchError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|span| span.as_str() == needle)
            .ok_or_else(|| FetchError::InvalidInterval(value.trim().to_owned()))
    }
}

/// Reject spans that cannot be used as a history sampling interval.
pub fn validate_interval(interval: TimeSpan) -> Result<(), FetchError> {
    if interval.is_sampling_interval() {
        Ok(())
    } else {
        Err(FetchError::InvalidInterval(interval.as_str().to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_known_span() {
        for span in TimeSpan::ALL {
            assert_eq!(TimeSpan::from_str(span.as_str()).unwrap(), span);
        }
        assert_eq!(TimeSpan::from_str(" 1WK ").unwrap(), TimeSpan::OneWeek);
    }

    #[test]
    fn rejects_unknown_span() {
        let err = TimeSpan::from_str("2h").expect_err("must fail");
        assert_eq!(err, FetchError::InvalidInterval("2h".into()));
    }

    #[test]
    fn range_only_spans_are_not_intervals() {
        let accepted: Vec<_> = TimeSpan::ALL
            .into_iter()
            .filter(|span| validate_interval(*span).is_ok())
            .collect();
        assert_eq!(accepted.len(), 13);
        assert_eq!(accepted.last(), Some(&TimeSpan::ThreeMonths));
        assert!(validate_interval(TimeSpan::SixMonths).is_err());
        assert!(validate_interval(TimeSpan::Max).is_err());
    }

    #[test]
    fn serializes_as_provider_string() {
        let json = serde_json::to_string(&TimeSpan::OneWeek).unwrap();
        assert_eq!(json, "\"1wk\"");
    }
}

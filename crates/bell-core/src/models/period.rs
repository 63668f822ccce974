//! Monthly billing periods
//!
//! Reports are grouped by the calendar month in which a call ended. Periods
//! are written as `MM/YYYY` in query strings.

use crate::{AppError, AppResult};
use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

static PERIOD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{1,2})/([0-9]{4})$").expect("period pattern is valid"));

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BillingPeriod {
    first_day: NaiveDate,
}

impl BillingPeriod {
    pub fn new(year: i32, month: u32) -> AppResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first_day| Self { first_day })
            .ok_or_else(|| AppError::InvalidPeriod(format!("{:02}/{:04}", month, year)))
    }

    /// Parse `MM/YYYY` (a single-digit month is accepted)
    pub fn parse(value: &str) -> AppResult<Self> {
        let caps = PERIOD_RE
            .captures(value.trim())
            .ok_or_else(|| AppError::InvalidPeriod(value.to_string()))?;

        let month: u32 = caps[1]
            .parse()
            .map_err(|_| AppError::InvalidPeriod(value.to_string()))?;
        let year: i32 = caps[2]
            .parse()
            .map_err(|_| AppError::InvalidPeriod(value.to_string()))?;

        Self::new(year, month).map_err(|_| AppError::InvalidPeriod(value.to_string()))
    }

    /// The most recent month that has fully elapsed at `now`
    pub fn last_closed(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let first_of_month = today.with_day(1).unwrap_or(today);
        let first_day = first_of_month
            .checked_sub_months(Months::new(1))
            .unwrap_or(first_of_month);
        Self { first_day }
    }

    /// Use the requested period, or fall back to the last closed one
    pub fn resolve(requested: Option<&str>, now: DateTime<Utc>) -> AppResult<Self> {
        match requested {
            Some(value) if !value.is_empty() => Self::parse(value),
            _ => Ok(Self::last_closed(now)),
        }
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    /// Half-open `[start, end)` range of instants in the period
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let next = self
            .first_day
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX);
        (
            self.first_day.and_time(NaiveTime::MIN).and_utc(),
            next.and_time(NaiveTime::MIN).and_utc(),
        )
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let (start, end) = self.bounds();
        start <= instant && instant < end
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month(), self.year())
    }
}

impl Serialize for BillingPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_period() {
        let period = BillingPeriod::parse("02/2016").unwrap();
        assert_eq!(period.year(), 2016);
        assert_eq!(period.month(), 2);

        let period = BillingPeriod::parse("2/2016").unwrap();
        assert_eq!(period.month(), 2);
        assert_eq!(period.to_string(), "02/2016");
    }

    #[test]
    fn test_parse_invalid_period() {
        for value in ["2/16", "13/2016", "00/2016", "2016/02", "02-2016", "02/2016x", "٠٢/٢٠١٦"] {
            assert!(
                matches!(BillingPeriod::parse(value), Err(AppError::InvalidPeriod(_))),
                "{} should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_last_closed_period() {
        let now = "2016-03-15T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let period = BillingPeriod::last_closed(now);
        assert_eq!((period.year(), period.month()), (2016, 2));

        let now = "2017-01-31T23:59:59Z".parse::<DateTime<Utc>>().unwrap();
        let period = BillingPeriod::last_closed(now);
        assert_eq!((period.year(), period.month()), (2016, 12));
    }

    #[test]
    fn test_resolve_defaults_to_last_closed() {
        let now = "2016-03-15T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(
            BillingPeriod::resolve(None, now).unwrap(),
            BillingPeriod::new(2016, 2).unwrap()
        );
        assert_eq!(
            BillingPeriod::resolve(Some(""), now).unwrap(),
            BillingPeriod::new(2016, 2).unwrap()
        );
        assert!(BillingPeriod::resolve(Some("2/16"), now).is_err());
    }

    #[test]
    fn test_bounds() {
        let period = BillingPeriod::new(2016, 2).unwrap();
        let (start, end) = period.bounds();
        assert_eq!(start.to_rfc3339(), "2016-02-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2016-03-01T00:00:00+00:00");

        assert!(period.contains("2016-02-29T23:59:59Z".parse().unwrap()));
        assert!(!period.contains("2016-03-01T00:00:00Z".parse().unwrap()));

        let december = BillingPeriod::new(2016, 12).unwrap();
        assert_eq!(december.bounds().1.to_rfc3339(), "2017-01-01T00:00:00+00:00");
    }
}

//! Fee schedule model
//!
//! A fee schedule splits the day into two rate tiers, `standard` and
//! `reduced`. Each tier carries a flat charge billed once per call and a
//! per-minute charge billed for every whole minute spent inside its daily
//! window.

use crate::{AppError, AppResult};
use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds in a calendar day
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Rate tier identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierKind {
    /// Daytime rate
    Standard,
    /// Night rate
    Reduced,
}

impl TierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TierKind::Standard => "standard",
            TierKind::Reduced => "reduced",
        }
    }
}

impl fmt::Display for TierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Daily time-of-day window, both ends inclusive at second precision
///
/// A window whose start is later than its end wraps past midnight
/// (e.g. 22:00:00 to 05:59:59).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub starts_at: NaiveTime,
    pub ends_at: NaiveTime,
}

impl TimeWindow {
    pub fn new(starts_at: NaiveTime, ends_at: NaiveTime) -> Self {
        Self { starts_at, ends_at }
    }

    #[inline]
    fn start_secs(&self) -> i64 {
        i64::from(self.starts_at.num_seconds_from_midnight())
    }

    #[inline]
    fn end_secs(&self) -> i64 {
        i64::from(self.ends_at.num_seconds_from_midnight())
    }

    /// Whether the window crosses midnight
    #[inline]
    pub fn wraps_midnight(&self) -> bool {
        self.start_secs() > self.end_secs()
    }

    /// Check whether a time-of-day falls inside the window
    ///
    /// Sub-second precision is ignored, so the whole ending second is
    /// inside the window.
    pub fn contains(&self, time: NaiveTime) -> bool {
        let t = i64::from(time.num_seconds_from_midnight());
        if self.wraps_midnight() {
            t >= self.start_secs() || t <= self.end_secs()
        } else {
            self.start_secs() <= t && t <= self.end_secs()
        }
    }

    /// Number of distinct seconds of the day covered by the window
    pub fn covered_seconds(&self) -> i64 {
        (self.end_secs() - self.start_secs()).rem_euclid(SECONDS_PER_DAY) + 1
    }

    /// Day-local segments of the window as `(from, to)` second offsets
    /// from midnight
    ///
    /// Minutes are measured from the configured start to the configured end
    /// time-of-day. A wrapping window is split at midnight into a morning
    /// and an evening segment.
    pub fn daily_segments(&self) -> Vec<(i64, i64)> {
        if self.wraps_midnight() {
            vec![(0, self.end_secs()), (self.start_secs(), SECONDS_PER_DAY)]
        } else {
            vec![(self.start_secs(), self.end_secs())]
        }
    }
}

/// A single rate tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    /// Charged once per call whose start falls in this tier
    pub flat_charge: Decimal,

    /// Charged for every whole minute spent in this tier's window
    pub per_minute_charge: Decimal,

    /// Daily window start (inclusive)
    pub starts_at: NaiveTime,

    /// Daily window end (inclusive)
    pub ends_at: NaiveTime,
}

impl Tier {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.starts_at, self.ends_at)
    }
}

/// Immutable two-tier fee schedule
///
/// Can only be built through [`FeeSchedule::new`], which guarantees that the
/// two tier windows partition the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeSchedule {
    standard: Tier,
    reduced: Tier,
}

impl FeeSchedule {
    /// Build a schedule, rejecting tiers that do not partition the day
    pub fn new(standard: Tier, reduced: Tier) -> AppResult<Self> {
        for (kind, tier) in [(TierKind::Standard, &standard), (TierKind::Reduced, &reduced)] {
            if tier.flat_charge.is_sign_negative() || tier.per_minute_charge.is_sign_negative() {
                return Err(AppError::InvalidSchedule(format!(
                    "{} tier has a negative charge",
                    kind
                )));
            }
        }

        let std_window = standard.window();
        let red_window = reduced.window();

        let covered = std_window.covered_seconds() + red_window.covered_seconds();
        let contiguous = red_window.start_secs() == (std_window.end_secs() + 1) % SECONDS_PER_DAY
            && std_window.start_secs() == (red_window.end_secs() + 1) % SECONDS_PER_DAY;

        if covered != SECONDS_PER_DAY || !contiguous {
            return Err(AppError::InvalidSchedule(format!(
                "standard {} to {} and reduced {} to {} do not partition the day",
                standard.starts_at, standard.ends_at, reduced.starts_at, reduced.ends_at
            )));
        }

        Ok(Self { standard, reduced })
    }

    pub fn standard(&self) -> &Tier {
        &self.standard
    }

    pub fn reduced(&self) -> &Tier {
        &self.reduced
    }

    pub fn tier(&self, kind: TierKind) -> &Tier {
        match kind {
            TierKind::Standard => &self.standard,
            TierKind::Reduced => &self.reduced,
        }
    }

    /// Classify a time-of-day (full time, second precision)
    pub fn tier_at(&self, time: NaiveTime) -> TierKind {
        if self.standard.window().contains(time) {
            TierKind::Standard
        } else {
            TierKind::Reduced
        }
    }
}

/// A completed call's time span
///
/// `ended_at >= started_at` is enforced on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CallInterval {
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
}

impl CallInterval {
    /// Create an interval, rejecting a negative duration
    pub fn new(started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> AppResult<Self> {
        if ended_at < started_at {
            return Err(AppError::ContractViolation(format!(
                "call ends at {} before it starts at {}",
                ended_at.to_rfc3339(),
                started_at.to_rfc3339()
            )));
        }
        Ok(Self {
            started_at,
            ended_at,
        })
    }

    #[inline]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[inline]
    pub fn ended_at(&self) -> DateTime<Utc> {
        self.ended_at
    }

    #[inline]
    pub fn duration(&self) -> Duration {
        self.ended_at - self.started_at
    }

    /// Whole minutes in the call, partial minutes truncated
    #[inline]
    pub fn whole_minutes(&self) -> i64 {
        self.duration().num_seconds() / 60
    }
}

/// Priced call breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricingResult {
    /// Tier covering the call's start moment
    pub start_tier: TierKind,

    pub flat_charge: Decimal,

    pub standard_minutes: i64,

    pub reduced_minutes: i64,

    pub per_minute_total: Decimal,

    /// `flat_charge + per_minute_total`, unrounded
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn tier(start: NaiveTime, end: NaiveTime) -> Tier {
        Tier {
            flat_charge: dec!(0.36),
            per_minute_charge: dec!(0.09),
            starts_at: start,
            ends_at: end,
        }
    }

    #[test]
    fn test_window_contains() {
        let day = TimeWindow::new(hms(6, 0, 0), hms(21, 59, 59));
        assert!(day.contains(hms(6, 0, 0)));
        assert!(day.contains(hms(21, 59, 59)));
        assert!(!day.contains(hms(22, 0, 0)));
        assert!(!day.contains(hms(5, 59, 59)));

        let night = TimeWindow::new(hms(22, 0, 0), hms(5, 59, 59));
        assert!(night.wraps_midnight());
        assert!(night.contains(hms(23, 30, 0)));
        assert!(night.contains(hms(0, 0, 0)));
        assert!(night.contains(hms(5, 59, 59)));
        assert!(!night.contains(hms(6, 0, 0)));
    }

    #[test]
    fn test_window_contains_ignores_subseconds() {
        let day = TimeWindow::new(hms(6, 0, 0), hms(21, 59, 59));
        let late = NaiveTime::from_hms_milli_opt(21, 59, 59, 900).unwrap();
        assert!(day.contains(late));
    }

    #[test]
    fn test_window_segments() {
        let day = TimeWindow::new(hms(6, 0, 0), hms(21, 59, 59));
        assert_eq!(day.daily_segments(), vec![(21_600, 79_199)]);

        let night = TimeWindow::new(hms(22, 0, 0), hms(5, 59, 59));
        assert_eq!(
            night.daily_segments(),
            vec![(0, 21_599), (79_200, SECONDS_PER_DAY)]
        );
    }

    #[test]
    fn test_covered_seconds() {
        let day = TimeWindow::new(hms(6, 0, 0), hms(21, 59, 59));
        let night = TimeWindow::new(hms(22, 0, 0), hms(5, 59, 59));
        assert_eq!(day.covered_seconds() + night.covered_seconds(), SECONDS_PER_DAY);
    }

    #[test]
    fn test_schedule_partition_accepted() {
        let schedule = FeeSchedule::new(
            tier(hms(6, 0, 0), hms(21, 59, 59)),
            tier(hms(22, 0, 0), hms(5, 59, 59)),
        )
        .unwrap();

        assert_eq!(schedule.tier_at(hms(15, 0, 0)), TierKind::Standard);
        assert_eq!(schedule.tier_at(hms(21, 59, 59)), TierKind::Standard);
        assert_eq!(schedule.tier_at(hms(22, 0, 0)), TierKind::Reduced);
        assert_eq!(schedule.tier_at(hms(4, 57, 13)), TierKind::Reduced);
    }

    #[test]
    fn test_schedule_with_wrapping_standard() {
        let schedule = FeeSchedule::new(
            tier(hms(20, 0, 0), hms(7, 59, 59)),
            tier(hms(8, 0, 0), hms(19, 59, 59)),
        )
        .unwrap();
        assert_eq!(schedule.tier_at(hms(2, 0, 0)), TierKind::Standard);
        assert_eq!(schedule.tier_at(hms(12, 0, 0)), TierKind::Reduced);
    }

    #[test]
    fn test_schedule_gap_rejected() {
        let result = FeeSchedule::new(
            tier(hms(6, 0, 0), hms(20, 59, 59)),
            tier(hms(22, 0, 0), hms(5, 59, 59)),
        );
        match result {
            Err(AppError::InvalidSchedule(message)) => assert_eq!(
                message,
                "standard 06:00:00 to 20:59:59 and reduced 22:00:00 to 05:59:59 do not partition the day"
            ),
            other => panic!("expected InvalidSchedule, got {:?}", other),
        }
    }

    #[test]
    fn test_schedule_overlap_rejected() {
        let result = FeeSchedule::new(
            tier(hms(0, 0, 0), hms(23, 59, 59)),
            tier(hms(0, 0, 0), hms(23, 59, 59)),
        );
        assert!(matches!(result, Err(AppError::InvalidSchedule(_))));
    }

    #[test]
    fn test_schedule_negative_charge_rejected() {
        let mut reduced = tier(hms(22, 0, 0), hms(5, 59, 59));
        reduced.per_minute_charge = dec!(-0.01);
        let result = FeeSchedule::new(tier(hms(6, 0, 0), hms(21, 59, 59)), reduced);
        assert!(matches!(result, Err(AppError::InvalidSchedule(_))));
    }

    #[test]
    fn test_call_interval_rejects_negative_duration() {
        let start = "2016-01-01T15:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let end = "2016-01-01T14:59:59Z".parse::<DateTime<Utc>>().unwrap();
        assert!(matches!(
            CallInterval::new(start, end),
            Err(AppError::ContractViolation(_))
        ));
    }

    #[test]
    fn test_call_interval_whole_minutes() {
        let start = "2016-01-01T15:00:01Z".parse::<DateTime<Utc>>().unwrap();
        let end = "2016-01-01T15:50:37Z".parse::<DateTime<Utc>>().unwrap();
        let call = CallInterval::new(start, end).unwrap();
        assert_eq!(call.whole_minutes(), 50);

        let zero = CallInterval::new(start, start).unwrap();
        assert_eq!(zero.whole_minutes(), 0);
    }
}

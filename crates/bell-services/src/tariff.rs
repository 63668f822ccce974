//! Tariff pricing engine
//!
//! Prices a completed call against a two-tier fee schedule. The flat charge
//! comes from the tier covering the call's start moment; per-minute charges
//! come from splitting the call by calendar day and intersecting each day
//! with the standard tier's window.

use bell_core::{
    models::{CallInterval, FeeSchedule, PricingResult, TierKind},
    AppResult,
};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Price a call
///
/// Standard minutes are the whole minutes of each day's intersection with
/// the standard window, truncated per day. Every other whole minute of the
/// call is a reduced minute, so the two counts always add up to the call's
/// whole minutes regardless of how many days it spans.
pub fn price(call: &CallInterval, schedule: &FeeSchedule) -> PricingResult {
    let start_tier = schedule.tier_at(call.started_at().time());
    let flat_charge = schedule.tier(start_tier).flat_charge;

    let standard_minutes = standard_minutes(call, schedule);
    let reduced_minutes = (call.whole_minutes() - standard_minutes).max(0);

    let per_minute_total = Decimal::from(standard_minutes) * schedule.standard().per_minute_charge
        + Decimal::from(reduced_minutes) * schedule.reduced().per_minute_charge;

    PricingResult {
        start_tier,
        flat_charge,
        standard_minutes,
        reduced_minutes,
        per_minute_total,
        total: flat_charge + per_minute_total,
    }
}

/// Sum of whole standard-window minutes over every calendar day the call spans
fn standard_minutes(call: &CallInterval, schedule: &FeeSchedule) -> i64 {
    let segments = schedule.standard().window().daily_segments();
    let first_day = call.started_at().date_naive();
    let days = (call.ended_at().date_naive() - first_day).num_days();

    let mut minutes = 0;
    for offset in 0..=days {
        let midnight = (first_day + Duration::days(offset))
            .and_time(NaiveTime::MIN)
            .and_utc();

        for &(from, to) in &segments {
            let overlap = overlap(
                (midnight + Duration::seconds(from), midnight + Duration::seconds(to)),
                (call.started_at(), call.ended_at()),
            );
            minutes += overlap.num_seconds() / 60;
        }
    }
    minutes
}

fn overlap(
    (a_start, a_end): (DateTime<Utc>, DateTime<Utc>),
    (b_start, b_end): (DateTime<Utc>, DateTime<Utc>),
) -> Duration {
    let start = a_start.max(b_start);
    let end = a_end.min(b_end);
    if end > start {
        end - start
    } else {
        Duration::zero()
    }
}

/// Shared handle to the pricing engine and its fee schedule
#[derive(Debug, Clone)]
pub struct TariffEngine {
    schedule: Arc<FeeSchedule>,
}

impl TariffEngine {
    pub fn new(schedule: Arc<FeeSchedule>) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &FeeSchedule {
        &self.schedule
    }

    /// Classify a moment by the tier covering its time-of-day
    pub fn tier_at(&self, at: DateTime<Utc>) -> TierKind {
        self.schedule.tier_at(at.time())
    }

    #[instrument(skip(self), fields(started_at = %call.started_at(), ended_at = %call.ended_at()))]
    pub fn price(&self, call: &CallInterval) -> PricingResult {
        let result = price(call, &self.schedule);
        debug!(
            "Priced call: tier={}, standard={}min, reduced={}min, total={}",
            result.start_tier, result.standard_minutes, result.reduced_minutes, result.total
        );
        result
    }

    /// Price an interval given as raw timestamps, rejecting negative durations
    pub fn quote(&self, started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> AppResult<PricingResult> {
        let call = CallInterval::new(started_at, ended_at)?;
        Ok(self.price(&call))
    }
}

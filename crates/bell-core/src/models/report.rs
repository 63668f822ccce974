//! Report model
//!
//! One report line per completed call, priced at creation time. Reports are
//! what subscribers see on their monthly statement.

use super::tariff::{CallInterval, PricingResult};
use crate::format::duration_label;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Decimal places kept for stored prices
pub const PRICE_SCALE: u32 = 2;

/// Priced call report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Unique identifier (0 until persisted)
    pub id: i64,

    /// Originating call identifier (one report per call)
    pub call_id: i64,

    /// Subscriber billed for the call
    pub subscriber: String,

    /// Called number
    pub destination: String,

    pub call_started_at: DateTime<Utc>,

    pub call_ended_at: DateTime<Utc>,

    /// Call price rounded to cents
    pub price: Decimal,

    pub created_at: DateTime<Utc>,
}

impl Report {
    /// Build a report line from a priced call
    pub fn new(
        call_id: i64,
        subscriber: impl Into<String>,
        destination: impl Into<String>,
        interval: &CallInterval,
        pricing: &PricingResult,
    ) -> Self {
        Self {
            id: 0,
            call_id,
            subscriber: subscriber.into(),
            destination: destination.into(),
            call_started_at: interval.started_at(),
            call_ended_at: interval.ended_at(),
            price: round_price(pricing.total),
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn call_start_date(&self) -> NaiveDate {
        self.call_started_at.date_naive()
    }

    #[inline]
    pub fn call_start_time(&self) -> NaiveTime {
        self.call_started_at.time()
    }

    #[inline]
    pub fn call_duration(&self) -> Duration {
        self.call_ended_at - self.call_started_at
    }

    /// Duration as `{h}h{m}m{s}s`
    pub fn call_duration_label(&self) -> String {
        duration_label(self.call_duration())
    }
}

/// Round half to even at cent precision
pub fn round_price(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointNearestEven)
}

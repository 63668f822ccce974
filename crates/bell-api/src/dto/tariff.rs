//! Tariff DTOs

use bell_core::{
    models::{round_price, PricingResult, TierKind},
    CurrencyFormat,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ad-hoc price request for an interval
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequest {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

/// Pricing breakdown
#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    pub start_tier: TierKind,
    pub flat_charge: Decimal,
    pub standard_minutes: i64,
    pub reduced_minutes: i64,
    pub per_minute_total: Decimal,
    /// Unrounded total
    pub total: Decimal,
    /// Total rounded to cents and formatted
    pub price: String,
}

impl QuoteResponse {
    pub fn from_pricing(result: PricingResult, currency: &CurrencyFormat) -> Self {
        Self {
            price: currency.format(round_price(result.total)),
            start_tier: result.start_tier,
            flat_charge: result.flat_charge,
            standard_minutes: result.standard_minutes,
            reduced_minutes: result.reduced_minutes,
            per_minute_total: result.per_minute_total,
            total: result.total,
        }
    }
}

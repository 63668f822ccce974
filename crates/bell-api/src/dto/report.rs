//! Report DTOs

use super::common::PaginationParams;
use bell_core::{models::Report, CurrencyFormat};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Report listing query
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReportQuery {
    /// Billing period as `MM/YYYY`, defaults to the last closed month
    pub period: Option<String>,

    #[serde(flatten)]
    #[validate(nested)]
    pub pagination: PaginationParams,
}

/// A single billed call as shown on a subscriber's bill
#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub call_id: i64,
    pub destination: String,
    pub call_start_date: NaiveDate,
    /// `HH:MM:SS`
    pub call_start_time: String,
    /// `{h}h{m}m{s}s`
    pub call_duration: String,
    /// Currency label, e.g. `R$ 11,16`
    pub price: String,
}

impl ReportResponse {
    pub fn from_report(report: &Report, currency: &CurrencyFormat) -> Self {
        Self {
            call_id: report.call_id,
            destination: report.destination.clone(),
            call_start_date: report.call_start_date(),
            call_start_time: report.call_start_time().format("%H:%M:%S").to_string(),
            call_duration: report.call_duration_label(),
            price: currency.format(report.price),
        }
    }
}

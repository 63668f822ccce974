//! Report handlers

use crate::dto::{ReportQuery, ReportResponse};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use bell_core::{
    models::{BillingPeriod, PhoneNumber},
    AppError,
};
use chrono::Utc;
use tracing::{debug, instrument, warn};
use validator::Validate;

/// List a subscriber's billed calls for a period
///
/// GET /api/v1/reports/{subscriber}?period=MM/YYYY
#[instrument(skip(state, query))]
pub async fn list_reports(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| {
        warn!("Report query validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let subscriber = PhoneNumber::parse(path.trim())?;
    let period = BillingPeriod::resolve(query.period.as_deref(), Utc::now())?;

    debug!(subscriber = %subscriber, period = %period, "Listing reports");

    let pagination = &query.pagination;
    let (reports, total) = state
        .reports
        .list(
            subscriber.as_str(),
            period,
            pagination.limit(),
            pagination.offset(),
        )
        .await?;

    let data: Vec<ReportResponse> = reports
        .iter()
        .map(|r| ReportResponse::from_report(r, &state.currency))
        .collect();

    Ok(HttpResponse::Ok().json(pagination.paginate(data, total)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/reports/{subscriber}", web::get().to(list_reports));
}

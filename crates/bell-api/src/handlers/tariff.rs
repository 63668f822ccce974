//! Tariff handlers

use crate::dto::{ApiResponse, QuoteRequest, QuoteResponse};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use bell_core::AppError;
use tracing::instrument;

/// Current fee schedule
///
/// GET /api/v1/tariff
pub async fn get_schedule(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(state.engine.schedule()))
}

/// Price an arbitrary interval
///
/// POST /api/v1/tariff/quote
#[instrument(skip(state))]
pub async fn quote(
    state: web::Data<AppState>,
    req: web::Json<QuoteRequest>,
) -> Result<HttpResponse, AppError> {
    let result = state.engine.quote(req.started_at, req.ended_at)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(QuoteResponse::from_pricing(
        result,
        &state.currency,
    ))))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tariff")
            .route("", web::get().to(get_schedule))
            .route("/quote", web::post().to(quote)),
    );
}

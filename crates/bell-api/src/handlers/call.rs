//! Call event handlers
//!
//! Intake for start and end events emitted by the switch. Either event may
//! arrive first; the one that completes the call returns its report line.

use crate::dto::{ApiResponse, CallRecordResponse, EndRecordRequest, StartRecordRequest};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use bell_core::AppError;
use tracing::{debug, instrument, warn};
use validator::Validate;

/// Record a call start
///
/// POST /api/v1/calls/start
#[instrument(skip(state, req), fields(call_id = req.call_id))]
pub async fn start_record(
    state: web::Data<AppState>,
    req: web::Json<StartRecordRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Start event validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let event = req.to_event()?;
    debug!(source = %event.source, destination = %event.destination, "Recording call start");

    let outcome = state.calls.record_start(&event).await?;
    let response = CallRecordResponse::from_outcome(outcome, &state.currency);

    Ok(HttpResponse::Created().json(ApiResponse::success(response)))
}

/// Record a call end
///
/// POST /api/v1/calls/end
#[instrument(skip(state, req), fields(call_id = req.call_id))]
pub async fn end_record(
    state: web::Data<AppState>,
    req: web::Json<EndRecordRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("End event validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let outcome = state.calls.record_end(&req.to_event()).await?;
    let response = CallRecordResponse::from_outcome(outcome, &state.currency);

    Ok(HttpResponse::Created().json(ApiResponse::success(response)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/calls")
            .route("/start", web::post().to(start_record))
            .route("/end", web::post().to(end_record)),
    );
}

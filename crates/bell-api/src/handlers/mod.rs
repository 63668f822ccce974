//! HTTP request handlers

pub mod call;
pub mod report;
pub mod tariff;

use actix_web::{error::InternalError, web, ResponseError};
use bell_core::AppError;

pub use call::configure as configure_calls;
pub use report::configure as configure_reports;
pub use tariff::configure as configure_tariff;

/// Register every versioned route on the given scope
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_calls)
        .configure(configure_reports)
        .configure(configure_tariff);
}

/// JSON body extractor config answering malformed payloads with the error envelope
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = AppError::Validation(err.to_string()).error_response();
        InternalError::from_response(err, response).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response = AppError::InvalidInput(err.to_string()).error_response();
        InternalError::from_response(err, response).into()
    })
}

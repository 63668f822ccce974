//! API layer for Bell Billing
//!
//! HTTP handlers for call event intake, subscriber reports and tariff quotes.

#![forbid(unsafe_code)]

pub mod dto;
pub mod handlers;
pub mod state;

// Re-export DTOs (common types)
pub use dto::{ApiResponse, PaginationParams};

pub use handlers::{configure_routes, json_config, query_config};
pub use state::AppState;

//! Bell Billing Core Library
//!
//! This crate provides the foundational types, traits, and error handling
//! for the Bell Billing system. It includes:
//!
//! - Domain models (fee schedule, call records, reports, billing periods)
//! - Repository traits for storage backends
//! - Unified error handling with HTTP response mapping
//! - Application configuration
//! - Currency and duration display formatting

pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod traits;

pub use config::AppConfig;
pub use error::AppError;
pub use format::CurrencyFormat;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

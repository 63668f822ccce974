//! Bell Billing Database Layer
//!
//! This crate provides PostgreSQL access and repository implementations
//! for the Bell Billing system. It includes:
//!
//! - Connection pool management with sqlx
//! - Embedded schema migrations
//! - PostgreSQL repositories for call records and reports
//! - In-memory repositories for tests and local runs

pub mod memory;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, run_migrations};
pub use repositories::*;

// Re-export commonly used types
pub use bell_core::{AppError, AppResult};
pub use sqlx::{PgPool, Postgres};

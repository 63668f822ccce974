//! Repository implementations
//!
//! Concrete implementations of the repository traits defined in bell-core,
//! using sqlx for PostgreSQL access.

pub mod record_repo;
pub mod report_repo;

pub use record_repo::PgCallRecordRepository;
pub use report_repo::PgReportRepository;

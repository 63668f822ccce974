//! Business logic services for Bell Billing
//!
//! This crate contains the services that turn switch call events into
//! priced billing reports.
//!
//! # Services
//!
//! - `TariffEngine` - Two-tier call pricing against a fee schedule
//! - `CallRecordService` - Start/end event bookkeeping per call
//! - `ReportService` - Report creation on call completion and per-period listing

pub mod call_records;
pub mod reports;
pub mod tariff;

pub use call_records::{CallRecordService, RecordOutcome};
pub use reports::ReportService;
pub use tariff::{price, TariffEngine};

//! Domain models for Bell Billing
//!
//! This module contains all the core domain models used throughout the application.

pub mod call_record;
pub mod period;
pub mod phone;
pub mod report;
pub mod tariff;

pub use call_record::{CallRecord, EndEvent, StartEvent};
pub use period::BillingPeriod;
pub use phone::PhoneNumber;
pub use report::{round_price, Report};
pub use tariff::{CallInterval, FeeSchedule, PricingResult, Tier, TierKind, TimeWindow};

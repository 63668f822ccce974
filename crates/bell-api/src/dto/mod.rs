//! Data Transfer Objects (DTOs) for API requests and responses

pub mod call;
pub mod common;
pub mod report;
pub mod tariff;

pub use call::*;
pub use common::*;
pub use report::*;
pub use tariff::*;

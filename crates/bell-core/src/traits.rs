//! Common traits for repositories
//!
//! Defines abstractions for storage of call records and reports.

use crate::error::AppError;
use crate::models::{CallRecord, Report};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Mutation applied to a call record under the repository's write lock
pub type RecordChange<'a> = &'a (dyn Fn(&mut CallRecord) -> Result<(), AppError> + Send + Sync);

/// Call record repository
#[async_trait]
pub trait CallRecordRepository: Send + Sync {
    /// Find record by switch call identifier
    async fn find_by_call_id(&self, call_id: i64) -> Result<Option<CallRecord>, AppError>;

    /// Load the record for `call_id` (a fresh one if absent), apply `change`
    /// and store the result
    ///
    /// Writers of the same call are serialized: `change` always sees the
    /// latest stored state. Nothing is stored when `change` fails.
    async fn modify(&self, call_id: i64, change: RecordChange<'_>) -> Result<CallRecord, AppError>;
}

/// Report repository
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Find the report created for a call
    async fn find_by_call_id(&self, call_id: i64) -> Result<Option<Report>, AppError>;

    /// Store a report; an existing report for the same call is returned unchanged
    async fn create(&self, report: &Report) -> Result<Report, AppError>;

    /// Reports for a subscriber whose call ended in `[start, end)`, in
    /// insertion order, with the total match count
    async fn list_for_subscriber(
        &self,
        subscriber: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Report>, i64), AppError>;
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(total: i64, page: i64, per_page: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };

        Self {
            total,
            page,
            per_page,
            total_pages,
        }
    }
}

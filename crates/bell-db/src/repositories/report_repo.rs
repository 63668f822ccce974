//! Report repository implementation
//!
//! PostgreSQL-backed storage for priced call reports.

use bell_core::{models::Report, traits::ReportRepository, AppError, AppResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of ReportRepository
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const REPORT_SELECT_COLUMNS: &str = r#"
    id, call_id, subscriber, destination,
    call_started_at, call_ended_at,
    price, created_at
"#;

#[async_trait]
impl ReportRepository for PgReportRepository {
    #[instrument(skip(self))]
    async fn find_by_call_id(&self, call_id: i64) -> AppResult<Option<Report>> {
        let query = format!(
            "SELECT {} FROM reports WHERE call_id = $1",
            REPORT_SELECT_COLUMNS
        );

        let row = sqlx::query_as::<sqlx::Postgres, ReportRow>(&query)
            .bind(call_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding report for call {}: {}", call_id, e);
                AppError::Database(format!("Failed to find report: {}", e))
            })?;

        Ok(row.map(Into::into))
    }

    #[instrument(skip(self, report), fields(call_id = report.call_id))]
    async fn create(&self, report: &Report) -> AppResult<Report> {
        debug!("Creating report for call: {}", report.call_id);

        sqlx::query(
            r#"
            INSERT INTO reports (
                call_id, subscriber, destination,
                call_started_at, call_ended_at, price
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (call_id) DO NOTHING
            "#,
        )
        .bind(report.call_id)
        .bind(&report.subscriber)
        .bind(&report.destination)
        .bind(report.call_started_at)
        .bind(report.call_ended_at)
        .bind(report.price)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating report: {}", e);
            AppError::Database(format!("Failed to create report: {}", e))
        })?;

        self.find_by_call_id(report.call_id).await?.ok_or_else(|| {
            AppError::Internal(format!("Report for call {} vanished", report.call_id))
        })
    }

    #[instrument(skip(self))]
    async fn list_for_subscriber(
        &self,
        subscriber: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Report>, i64)> {
        let where_clause =
            "WHERE subscriber = $1 AND call_ended_at >= $2 AND call_ended_at < $3";

        let count_query = format!("SELECT COUNT(*) FROM reports {}", where_clause);
        let (total,): (i64,) = sqlx::query_as(&count_query)
            .bind(subscriber)
            .bind(start)
            .bind(end)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting reports: {}", e);
                AppError::Database(format!("Failed to count reports: {}", e))
            })?;

        let query = format!(
            "SELECT {} FROM reports {} ORDER BY id ASC LIMIT $4 OFFSET $5",
            REPORT_SELECT_COLUMNS, where_clause
        );
        let rows = sqlx::query_as::<sqlx::Postgres, ReportRow>(&query)
            .bind(subscriber)
            .bind(start)
            .bind(end)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error listing reports: {}", e);
                AppError::Database(format!("Failed to list reports: {}", e))
            })?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReportRow {
    id: i64,
    call_id: i64,
    subscriber: String,
    destination: String,
    call_started_at: DateTime<Utc>,
    call_ended_at: DateTime<Utc>,
    price: Decimal,
    created_at: DateTime<Utc>,
}

impl From<ReportRow> for Report {
    fn from(row: ReportRow) -> Self {
        Self {
            id: row.id,
            call_id: row.call_id,
            subscriber: row.subscriber,
            destination: row.destination,
            call_started_at: row.call_started_at,
            call_ended_at: row.call_ended_at,
            price: row.price,
            created_at: row.created_at,
        }
    }
}

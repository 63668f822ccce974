//! Call record repository implementation
//!
//! PostgreSQL-backed storage for call records keyed by the switch call
//! identifier. Uses runtime queries (not compile-time macros) to avoid
//! requiring a database connection at build time.

use bell_core::{
    models::CallRecord,
    traits::{CallRecordRepository, RecordChange},
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of CallRecordRepository
pub struct PgCallRecordRepository {
    pool: PgPool,
}

impl PgCallRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const RECORD_SELECT_COLUMNS: &str = r#"
    id, call_id, source, destination,
    started_at, ended_at,
    created_at, updated_at
"#;

#[async_trait]
impl CallRecordRepository for PgCallRecordRepository {
    #[instrument(skip(self))]
    async fn find_by_call_id(&self, call_id: i64) -> AppResult<Option<CallRecord>> {
        debug!("Finding call record: {}", call_id);

        let query = format!(
            "SELECT {} FROM call_records WHERE call_id = $1",
            RECORD_SELECT_COLUMNS
        );

        let row = sqlx::query_as::<sqlx::Postgres, CallRecordRow>(&query)
            .bind(call_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding call record {}: {}", call_id, e);
                AppError::Database(format!("Failed to find call record: {}", e))
            })?;

        Ok(row.map(Into::into))
    }

    /// Row-locked read-modify-write
    ///
    /// The row is created if missing, then locked with `FOR UPDATE` so a
    /// concurrent event for the same call waits and re-reads the committed
    /// state. A failed `change` rolls the transaction back.
    #[instrument(skip(self, change))]
    async fn modify(&self, call_id: i64, change: RecordChange<'_>) -> AppResult<CallRecord> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to start transaction: {}", e);
            AppError::Database(format!("Failed to start transaction: {}", e))
        })?;

        sqlx::query("INSERT INTO call_records (call_id) VALUES ($1) ON CONFLICT (call_id) DO NOTHING")
            .bind(call_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!("Database error creating call record {}: {}", call_id, e);
                AppError::Database(format!("Failed to create call record: {}", e))
            })?;

        let query = format!(
            "SELECT {} FROM call_records WHERE call_id = $1 FOR UPDATE",
            RECORD_SELECT_COLUMNS
        );
        let row = sqlx::query_as::<sqlx::Postgres, CallRecordRow>(&query)
            .bind(call_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                error!("Database error locking call record {}: {}", call_id, e);
                AppError::Database(format!("Failed to lock call record: {}", e))
            })?;

        let mut record: CallRecord = row.into();
        change(&mut record)?;

        let query = format!(
            r#"
            UPDATE call_records SET
                source = $2,
                destination = $3,
                started_at = $4,
                ended_at = $5,
                updated_at = NOW()
            WHERE call_id = $1
            RETURNING {}
            "#,
            RECORD_SELECT_COLUMNS
        );
        let row = sqlx::query_as::<sqlx::Postgres, CallRecordRow>(&query)
            .bind(call_id)
            .bind(&record.source)
            .bind(&record.destination)
            .bind(record.started_at)
            .bind(record.ended_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                error!("Database error saving call record {}: {}", call_id, e);
                AppError::Database(format!("Failed to save call record: {}", e))
            })?;

        tx.commit().await.map_err(|e| {
            error!("Failed to commit call record {}: {}", call_id, e);
            AppError::Database(format!("Failed to commit transaction: {}", e))
        })?;

        debug!("Saved call record id={}", row.id);
        Ok(row.into())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CallRecordRow {
    id: i64,
    call_id: i64,
    source: Option<String>,
    destination: Option<String>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CallRecordRow> for CallRecord {
    fn from(row: CallRecordRow) -> Self {
        Self {
            id: row.id,
            call_id: row.call_id,
            source: row.source,
            destination: row.destination,
            started_at: row.started_at,
            ended_at: row.ended_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_record_row_conversion() {
        let now = Utc::now();
        let row = CallRecordRow {
            id: 1,
            call_id: 70,
            source: Some("99988526423".to_string()),
            destination: Some("9993468278".to_string()),
            started_at: Some(now),
            ended_at: None,
            created_at: now,
            updated_at: now,
        };

        let record: CallRecord = row.into();
        assert_eq!(record.call_id, 70);
        assert!(record.start_recorded());
        assert!(!record.is_completed());
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn test_modify_rolls_back_rejected_change() {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost/bell".to_string());
        let pool = crate::create_pool(&database_url, Some(2)).await.unwrap();
        crate::run_migrations(&pool).await.unwrap();
        let repo = PgCallRecordRepository::new(pool);

        let call_id = Utc::now().timestamp_micros();
        let start: DateTime<Utc> = "2016-02-29T12:00:00Z".parse().unwrap();

        let started = repo
            .modify(call_id, &|record: &mut CallRecord| {
                record.source = Some("99988526423".to_string());
                record.destination = Some("9993468278".to_string());
                record.started_at = Some(start);
                Ok(())
            })
            .await
            .unwrap();
        assert!(started.start_recorded());

        let rejected = repo
            .modify(call_id, &|_: &mut CallRecord| {
                Err(AppError::Validation("rejected".to_string()))
            })
            .await;
        assert!(rejected.is_err());

        let stored = repo.find_by_call_id(call_id).await.unwrap().unwrap();
        assert_eq!(stored.started_at, Some(start));
        assert!(!stored.end_recorded());
    }
}

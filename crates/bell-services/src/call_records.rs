//! Call record service
//!
//! Applies start and end events from the switch to the per-call record.
//! Events for a call may arrive in either order; the event that completes
//! the record triggers report creation.

use bell_core::{
    models::{CallRecord, EndEvent, Report, StartEvent},
    traits::{CallRecordRepository, RecordChange},
    AppError, AppResult,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::reports::ReportService;

/// State of a call after an event was applied
#[derive(Debug, Clone)]
pub struct RecordOutcome {
    pub record: CallRecord,
    /// Present when this event completed the call
    pub report: Option<Report>,
}

pub struct CallRecordService {
    record_repo: Arc<dyn CallRecordRepository>,
    reports: Arc<ReportService>,
}

impl CallRecordService {
    pub fn new(record_repo: Arc<dyn CallRecordRepository>, reports: Arc<ReportService>) -> Self {
        Self {
            record_repo,
            reports,
        }
    }

    #[instrument(skip(self), fields(call_id = event.call_id))]
    pub async fn record_start(&self, event: &StartEvent) -> AppResult<RecordOutcome> {
        let outcome = self
            .apply(event.call_id, &|record: &mut CallRecord| {
                record.apply_start(event)?;
                ensure_ordered(record)
            })
            .await?;

        info!(
            "Start recorded: call={}, source={}, destination={}",
            event.call_id, event.source, event.destination
        );
        Ok(outcome)
    }

    #[instrument(skip(self), fields(call_id = event.call_id))]
    pub async fn record_end(&self, event: &EndEvent) -> AppResult<RecordOutcome> {
        let outcome = self
            .apply(event.call_id, &|record: &mut CallRecord| {
                record.apply_end(event)?;
                ensure_ordered(record)
            })
            .await?;

        info!("End recorded: call={}", event.call_id);
        Ok(outcome)
    }

    /// Apply an event under the record lock, then report the call if the
    /// event completed it
    async fn apply(&self, call_id: i64, change: RecordChange<'_>) -> AppResult<RecordOutcome> {
        let record = match self.record_repo.modify(call_id, change).await {
            Ok(record) => record,
            Err(AppError::RecordCompleted(id)) => {
                warn!("Event rejected for completed call {}", id);
                self.ensure_report(id).await;
                return Err(AppError::RecordCompleted(id));
            }
            Err(e) => {
                warn!("Event rejected for call {}: {}", call_id, e);
                return Err(e);
            }
        };

        let report = if record.is_completed() {
            Some(self.reports.create_for_record(&record).await?)
        } else {
            None
        };

        Ok(RecordOutcome { record, report })
    }

    /// Create the report of a completed call if an earlier attempt failed
    async fn ensure_report(&self, call_id: i64) {
        let record = match self.record_repo.find_by_call_id(call_id).await {
            Ok(Some(record)) if record.is_completed() => record,
            Ok(_) => return,
            Err(e) => {
                warn!("Could not load call {} to check its report: {}", call_id, e);
                return;
            }
        };

        if let Err(e) = self.reports.create_for_record(&record).await {
            warn!("Report for completed call {} still missing: {}", call_id, e);
        }
    }
}

/// A completed record must form a valid interval
fn ensure_ordered(record: &CallRecord) -> AppResult<()> {
    match record.interval() {
        Some(Err(e)) => Err(e),
        _ => Ok(()),
    }
}

//! In-memory repositories
//!
//! Process-local implementations of the repository traits with the same
//! keying and ordering rules as the PostgreSQL ones. Used by service and
//! handler tests.

use bell_core::{
    models::{CallRecord, Report},
    traits::{CallRecordRepository, RecordChange, ReportRepository},
    AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct MemoryCallRecordRepository {
    records: RwLock<HashMap<i64, CallRecord>>,
}

impl MemoryCallRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CallRecordRepository for MemoryCallRecordRepository {
    async fn find_by_call_id(&self, call_id: i64) -> AppResult<Option<CallRecord>> {
        Ok(self.records.read().get(&call_id).cloned())
    }

    async fn modify(&self, call_id: i64, change: RecordChange<'_>) -> AppResult<CallRecord> {
        let mut records = self.records.write();
        let mut record = match records.get(&call_id) {
            Some(existing) => existing.clone(),
            None => CallRecord {
                id: records.len() as i64 + 1,
                ..CallRecord::new(call_id)
            },
        };

        change(&mut record)?;
        record.updated_at = Utc::now();
        records.insert(call_id, record.clone());
        Ok(record)
    }
}

/// Reports kept in insertion order
#[derive(Default)]
pub struct MemoryReportRepository {
    reports: RwLock<Vec<Report>>,
}

impl MemoryReportRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.reports.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.read().is_empty()
    }
}

#[async_trait]
impl ReportRepository for MemoryReportRepository {
    async fn find_by_call_id(&self, call_id: i64) -> AppResult<Option<Report>> {
        Ok(self
            .reports
            .read()
            .iter()
            .find(|r| r.call_id == call_id)
            .cloned())
    }

    async fn create(&self, report: &Report) -> AppResult<Report> {
        let mut reports = self.reports.write();
        if let Some(existing) = reports.iter().find(|r| r.call_id == report.call_id) {
            return Ok(existing.clone());
        }

        let stored = Report {
            id: reports.len() as i64 + 1,
            ..report.clone()
        };
        reports.push(stored.clone());
        Ok(stored)
    }

    async fn list_for_subscriber(
        &self,
        subscriber: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Report>, i64)> {
        let reports = self.reports.read();
        let matching: Vec<&Report> = reports
            .iter()
            .filter(|r| {
                r.subscriber == subscriber && r.call_ended_at >= start && r.call_ended_at < end
            })
            .collect();

        let page = matching
            .iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|r| (*r).clone())
            .collect();

        Ok((page, matching.len() as i64))
    }
}

//! Report service
//!
//! Creates the priced report line for a completed call and lists a
//! subscriber's reports for a billing period.

use bell_core::{
    models::{BillingPeriod, CallRecord, Report},
    traits::ReportRepository,
    AppError, AppResult,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::tariff::TariffEngine;

pub struct ReportService {
    report_repo: Arc<dyn ReportRepository>,
    engine: TariffEngine,
}

impl ReportService {
    pub fn new(report_repo: Arc<dyn ReportRepository>, engine: TariffEngine) -> Self {
        Self {
            report_repo,
            engine,
        }
    }

    pub fn engine(&self) -> &TariffEngine {
        &self.engine
    }

    /// Price a completed record and persist its report
    ///
    /// A report already stored for the same call is returned as is.
    #[instrument(skip(self, record), fields(call_id = record.call_id))]
    pub async fn create_for_record(&self, record: &CallRecord) -> AppResult<Report> {
        let interval = record.interval().ok_or_else(|| {
            AppError::InvalidInput(format!("call {} is not completed", record.call_id))
        })??;

        let (subscriber, destination) = match (&record.source, &record.destination) {
            (Some(source), Some(destination)) => (source.as_str(), destination.as_str()),
            _ => return Err(AppError::MissingField("source/destination".to_string())),
        };

        let pricing = self.engine.price(&interval);
        let report = Report::new(record.call_id, subscriber, destination, &interval, &pricing);
        let saved = self.report_repo.create(&report).await?;

        info!(
            "Report created: call={}, subscriber={}, price={}",
            saved.call_id, saved.subscriber, saved.price
        );
        Ok(saved)
    }

    /// Reports for calls that ended within the period, in insertion order
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        subscriber: &str,
        period: BillingPeriod,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Report>, i64)> {
        let (start, end) = period.bounds();
        let (reports, total) = self
            .report_repo
            .list_for_subscriber(subscriber, start, end, limit, offset)
            .await?;

        debug!(
            "Found {} of {} reports for {} in {}",
            reports.len(),
            total,
            subscriber,
            period
        );
        Ok((reports, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bell_core::config::FeesConfig;
    use bell_db::memory::MemoryReportRepository;
    use chrono::{DateTime, Utc};
    use rust_decimal_macros::dec;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn service() -> (ReportService, Arc<MemoryReportRepository>) {
        let repo = Arc::new(MemoryReportRepository::new());
        let engine = TariffEngine::new(Arc::new(FeesConfig::default().schedule().unwrap()));
        (ReportService::new(repo.clone(), engine), repo)
    }

    fn completed(call_id: i64, source: &str, start: &str, end: &str) -> CallRecord {
        let mut record = CallRecord::new(call_id);
        record.source = Some(source.to_string());
        record.destination = Some("9993468278".to_string());
        record.started_at = Some(ts(start));
        record.ended_at = Some(ts(end));
        record
    }

    #[tokio::test]
    async fn test_create_for_completed_record() {
        let (service, _) = service();
        let record = completed(70, "99988526423", "2016-02-29T12:00:00Z", "2016-02-29T14:00:00Z");

        let report = service.create_for_record(&record).await.unwrap();
        assert_eq!(report.call_id, 70);
        assert_eq!(report.subscriber, "99988526423");
        assert_eq!(report.destination, "9993468278");
        assert_eq!(report.price, dec!(11.16));
        assert_eq!(report.call_duration_label(), "2h0m0s");
    }

    #[tokio::test]
    async fn test_create_is_idempotent() {
        let (service, repo) = service();
        let record = completed(71, "99988526423", "2016-02-29T12:00:00Z", "2016-02-29T12:05:00Z");

        let first = service.create_for_record(&record).await.unwrap();
        let second = service.create_for_record(&record).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_incomplete_record() {
        let (service, _) = service();
        let mut record = CallRecord::new(72);
        record.started_at = Some(ts("2016-02-29T12:00:00Z"));

        let result = service.create_for_record(&record).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_list_filters_by_end_month() {
        let (service, _) = service();
        let subscriber = "99988526423";

        // Starts in February, ends in March
        for record in [
            completed(1, subscriber, "2016-02-29T23:50:00Z", "2016-03-01T00:10:00Z"),
            completed(2, subscriber, "2016-02-10T10:00:00Z", "2016-02-10T10:10:00Z"),
            completed(3, subscriber, "2016-03-05T10:00:00Z", "2016-03-05T10:10:00Z"),
            completed(4, "11987654321", "2016-03-05T10:00:00Z", "2016-03-05T10:10:00Z"),
        ] {
            service.create_for_record(&record).await.unwrap();
        }

        let march = BillingPeriod::new(2016, 3).unwrap();
        let (reports, total) = service.list(subscriber, march, 10, 0).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(
            reports.iter().map(|r| r.call_id).collect::<Vec<_>>(),
            vec![1, 3]
        );

        let (page, total) = service.list(subscriber, march, 1, 1).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(page[0].call_id, 3);

        let february = BillingPeriod::new(2016, 2).unwrap();
        let (reports, _) = service.list(subscriber, february, 10, 0).await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].call_id, 2);
    }
}

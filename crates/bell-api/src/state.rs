//! Shared application state handed to every handler

use bell_core::{
    traits::{CallRecordRepository, ReportRepository},
    CurrencyFormat,
};
use bell_services::{CallRecordService, ReportService, TariffEngine};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub calls: Arc<CallRecordService>,
    pub reports: Arc<ReportService>,
    pub engine: TariffEngine,
    pub currency: CurrencyFormat,
}

impl AppState {
    /// Wire the services over the given repositories
    pub fn new(
        record_repo: Arc<dyn CallRecordRepository>,
        report_repo: Arc<dyn ReportRepository>,
        engine: TariffEngine,
        currency: CurrencyFormat,
    ) -> Self {
        let reports = Arc::new(ReportService::new(report_repo, engine.clone()));
        let calls = Arc::new(CallRecordService::new(record_repo, reports.clone()));
        Self {
            calls,
            reports,
            engine,
            currency,
        }
    }
}

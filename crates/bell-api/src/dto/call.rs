//! Call event DTOs

use super::common::deserialize_number_from_string;
use super::report::ReportResponse;
use bell_core::{
    models::{EndEvent, PhoneNumber, StartEvent},
    AppResult, CurrencyFormat,
};
use bell_services::RecordOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Start-of-call event from the switch
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StartRecordRequest {
    /// Switch call identifier, a number or a numeric string
    #[serde(deserialize_with = "deserialize_number_from_string")]
    #[validate(range(min = 0))]
    pub call_id: i64,

    #[validate(length(min = 1, message = "This field is required"))]
    pub source: String,

    #[validate(length(min = 1, message = "This field is required"))]
    pub destination: String,

    pub timestamp: DateTime<Utc>,
}

impl StartRecordRequest {
    pub fn to_event(&self) -> AppResult<StartEvent> {
        Ok(StartEvent {
            call_id: self.call_id,
            source: PhoneNumber::parse(self.source.trim())?,
            destination: PhoneNumber::parse(self.destination.trim())?,
            timestamp: self.timestamp,
        })
    }
}

/// End-of-call event from the switch
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EndRecordRequest {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    #[validate(range(min = 0))]
    pub call_id: i64,

    pub timestamp: DateTime<Utc>,
}

impl EndRecordRequest {
    pub fn to_event(&self) -> EndEvent {
        EndEvent {
            call_id: self.call_id,
            timestamp: self.timestamp,
        }
    }
}

/// Call record state after an event
#[derive(Debug, Clone, Serialize)]
pub struct CallRecordResponse {
    pub call_id: i64,
    pub source: Option<String>,
    pub destination: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub completed: bool,
    /// Report line, present once both events are recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportResponse>,
}

impl CallRecordResponse {
    pub fn from_outcome(outcome: RecordOutcome, currency: &CurrencyFormat) -> Self {
        let RecordOutcome { record, report } = outcome;
        Self {
            call_id: record.call_id,
            completed: record.is_completed(),
            source: record.source,
            destination: record.destination,
            started_at: record.started_at,
            ended_at: record.ended_at,
            report: report.map(|r| ReportResponse::from_report(&r, currency)),
        }
    }
}

//! Call record model
//!
//! A call record is assembled from two independent events: a start event
//! carrying source, destination and start timestamp, and an end event
//! carrying the end timestamp. Events may arrive in either order.

use super::phone::PhoneNumber;
use super::tariff::CallInterval;
use crate::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Call record keyed by the PBX call identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Unique identifier (0 until persisted)
    pub id: i64,

    /// Call identifier supplied by the switch
    pub call_id: i64,

    /// Calling subscriber
    pub source: Option<String>,

    /// Called number
    pub destination: Option<String>,

    /// Call start timestamp
    pub started_at: Option<DateTime<Utc>>,

    /// Call end timestamp
    pub ended_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Start-of-call event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartEvent {
    pub call_id: i64,
    pub source: PhoneNumber,
    pub destination: PhoneNumber,
    pub timestamp: DateTime<Utc>,
}

/// End-of-call event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndEvent {
    pub call_id: i64,
    pub timestamp: DateTime<Utc>,
}

impl CallRecord {
    /// Create an empty record for a call
    pub fn new(call_id: i64) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            call_id,
            source: None,
            destination: None,
            started_at: None,
            ended_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Source, destination and start time are all present
    #[inline]
    pub fn start_recorded(&self) -> bool {
        self.source.is_some() && self.destination.is_some() && self.started_at.is_some()
    }

    #[inline]
    pub fn end_recorded(&self) -> bool {
        self.ended_at.is_some()
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.start_recorded() && self.end_recorded()
    }

    /// The call span, once both events have been recorded
    pub fn interval(&self) -> Option<AppResult<CallInterval>> {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) if self.is_completed() => Some(CallInterval::new(start, end)),
            _ => None,
        }
    }

    /// Apply a start event
    pub fn apply_start(&mut self, event: &StartEvent) -> AppResult<()> {
        if self.is_completed() {
            return Err(AppError::RecordCompleted(self.call_id));
        }
        if self.start_recorded() {
            return Err(AppError::StartAlreadyRecorded(self.call_id));
        }
        if let Some(ended_at) = self.ended_at {
            if ended_at < event.timestamp {
                return Err(AppError::Validation(
                    "timestamp: Call end time before start time".to_string(),
                ));
            }
        }

        self.source = Some(event.source.to_string());
        self.destination = Some(event.destination.to_string());
        self.started_at = Some(event.timestamp);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Apply an end event
    pub fn apply_end(&mut self, event: &EndEvent) -> AppResult<()> {
        if self.is_completed() {
            return Err(AppError::RecordCompleted(self.call_id));
        }
        if self.end_recorded() {
            return Err(AppError::EndAlreadyRecorded(self.call_id));
        }
        if let Some(started_at) = self.started_at {
            if started_at > event.timestamp {
                return Err(AppError::Validation(
                    "timestamp: Call start time after end time".to_string(),
                ));
            }
        }

        self.ended_at = Some(event.timestamp);
        self.updated_at = Utc::now();
        Ok(())
    }
}

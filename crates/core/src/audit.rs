//! Audit trail for every state-changing operation.
//!
//! Every mutation records who acted, when, and the before/after snapshots.
//! Writes are fail-closed: a mutation whose audit entry cannot be persisted
//! must not commit, so sink errors surface as operation errors rather than
//! being logged and dropped.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Mutex;
use thiserror::Error;

use furlough_shared::types::{AuditEntryId, EmployeeId};

/// The kind of operation an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEvent {
    /// A leave request was created.
    RequestCreated,
    /// An approval step was decided.
    StepDecided,
    /// A finalized approval was reversed.
    ApprovalReversed,
    /// Days were deducted from a balance.
    BalanceDeducted,
    /// Days were restored to a balance.
    BalanceRestored,
    /// A balance account was opened.
    BalanceOpened,
    /// A balance was settled at year-end.
    BalanceSettled,
    /// Expired carried-forward days were forfeited.
    CarryoverExpired,
    /// An encashment request was created.
    EncashmentCreated,
    /// An encashment request was decided.
    EncashmentDecided,
}

impl AuditEvent {
    /// Returns the string representation of the event.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequestCreated => "request_created",
            Self::StepDecided => "step_decided",
            Self::ApprovalReversed => "approval_reversed",
            Self::BalanceDeducted => "balance_deducted",
            Self::BalanceRestored => "balance_restored",
            Self::BalanceOpened => "balance_opened",
            Self::BalanceSettled => "balance_settled",
            Self::CarryoverExpired => "carryover_expired",
            Self::EncashmentCreated => "encashment_created",
            Self::EncashmentDecided => "encashment_decided",
        }
    }
}

/// One immutable audit record.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    /// Unique identifier.
    pub id: AuditEntryId,
    /// What happened.
    pub event: AuditEvent,
    /// Who performed the operation, when one is attributable.
    pub actor: Option<EmployeeId>,
    /// When the entry was written.
    pub at: DateTime<Utc>,
    /// State before the mutation.
    pub before: Option<serde_json::Value>,
    /// State after the mutation.
    pub after: Option<serde_json::Value>,
    /// Free-form operation context (amounts, reasons, levels).
    pub metadata: serde_json::Value,
}

impl AuditEntry {
    /// Creates an entry for the given event, timestamped now.
    #[must_use]
    pub fn new(event: AuditEvent, actor: Option<EmployeeId>) -> Self {
        Self {
            id: AuditEntryId::new(),
            event,
            actor,
            at: Utc::now(),
            before: None,
            after: None,
            metadata: serde_json::Value::Null,
        }
    }

    /// Attaches a before snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialized.
    pub fn with_before<T: Serialize>(mut self, state: &T) -> Result<Self, AuditError> {
        self.before = Some(serde_json::to_value(state)?);
        Ok(self)
    }

    /// Attaches an after snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialized.
    pub fn with_after<T: Serialize>(mut self, state: &T) -> Result<Self, AuditError> {
        self.after = Some(serde_json::to_value(state)?);
        Ok(self)
    }

    /// Attaches operation metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata cannot be serialized.
    pub fn with_metadata<T: Serialize>(mut self, metadata: &T) -> Result<Self, AuditError> {
        self.metadata = serde_json::to_value(metadata)?;
        Ok(self)
    }
}

/// Errors raised while recording audit entries.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The sink refused or failed to persist the entry.
    #[error("Audit sink failure: {0}")]
    Sink(String),

    /// A snapshot could not be serialized.
    #[error("Audit serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AuditError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Sink(_) | Self::Serialization(_) => "INVARIANT_VIOLATION",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        500
    }
}

/// Destination for audit entries.
///
/// Implementations must treat a returned error as "nothing was recorded";
/// callers abort the surrounding mutation when recording fails.
pub trait AuditSink: Send + Sync {
    /// Persists one audit entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry could not be durably recorded.
    fn record(&self, entry: AuditEntry) -> Result<(), AuditError>;
}

/// In-memory audit sink backed by a mutex-guarded vector.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all recorded entries, in write order.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry lock is poisoned.
    pub fn entries(&self) -> Result<Vec<AuditEntry>, AuditError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| AuditError::Sink(e.to_string()))?;
        Ok(guard.clone())
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, entry: AuditEntry) -> Result<(), AuditError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| AuditError::Sink(e.to_string()))?;
        guard.push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemoryAuditSink::new();
        sink.record(AuditEntry::new(AuditEvent::RequestCreated, None))
            .unwrap();
        sink.record(AuditEntry::new(AuditEvent::BalanceDeducted, None))
            .unwrap();

        let entries = sink.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event, AuditEvent::RequestCreated);
        assert_eq!(entries[1].event, AuditEvent::BalanceDeducted);
    }

    #[test]
    fn test_entry_snapshots() {
        let entry = AuditEntry::new(AuditEvent::BalanceDeducted, Some(EmployeeId::new()))
            .with_before(&json!({"remaining": "10"}))
            .unwrap()
            .with_after(&json!({"remaining": "7"}))
            .unwrap()
            .with_metadata(&json!({"days": "3"}))
            .unwrap();

        assert_eq!(entry.before.unwrap()["remaining"], "10");
        assert_eq!(entry.after.unwrap()["remaining"], "7");
        assert_eq!(entry.metadata["days"], "3");
    }

    #[test]
    fn test_event_names() {
        assert_eq!(AuditEvent::StepDecided.as_str(), "step_decided");
        assert_eq!(AuditEvent::BalanceSettled.as_str(), "balance_settled");
    }
}

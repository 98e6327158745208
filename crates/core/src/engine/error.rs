//! Umbrella error for engine operations.

use thiserror::Error;

use crate::audit::AuditError;
use crate::encashment::error::EncashmentError;
use crate::ledger::error::LedgerError;
use crate::settlement::error::SettlementError;
use crate::workflow::chain::ChainError;
use crate::workflow::error::WorkflowError;

/// Any error an engine operation can return.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A workflow rule rejected the operation.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// Approval chain resolution failed.
    #[error(transparent)]
    Chain(#[from] ChainError),

    /// A balance ledger operation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// An encashment operation failed.
    #[error(transparent)]
    Encashment(#[from] EncashmentError),

    /// A settlement run failed.
    #[error(transparent)]
    Settlement(#[from] SettlementError),

    /// An audit entry could not be recorded.
    #[error(transparent)]
    Audit(#[from] AuditError),

    /// Operation input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl EngineError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Workflow(e) => e.status_code(),
            Self::Chain(e) => e.status_code(),
            Self::Ledger(e) => e.status_code(),
            Self::Encashment(e) => e.status_code(),
            Self::Settlement(e) => e.status_code(),
            Self::Audit(e) => e.status_code(),
            Self::Validation(_) => 400,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Workflow(e) => e.error_code(),
            Self::Chain(e) => e.error_code(),
            Self::Ledger(e) => e.error_code(),
            Self::Encashment(e) => e.error_code(),
            Self::Settlement(e) => e.error_code(),
            Self::Audit(e) => e.error_code(),
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use furlough_shared::types::{DayCount, LeaveRequestId};

    #[test]
    fn test_delegated_codes() {
        let err = EngineError::from(WorkflowError::RequestNotFound(LeaveRequestId::new()));
        assert_eq!(err.status_code(), 404);

        let err = EngineError::from(LedgerError::InsufficientBalance {
            requested: DayCount::whole(5),
            available: DayCount::whole(2),
        });
        assert_eq!(err.error_code(), "INSUFFICIENT_BALANCE");
        assert_eq!(err.status_code(), 409);

        let err = EngineError::Validation("end date before start date".to_string());
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.status_code(), 400);
    }
}

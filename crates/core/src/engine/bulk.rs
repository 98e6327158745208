//! Bulk decision outcome types.

use serde::Serialize;

use furlough_shared::types::LeaveRequestId;

use crate::engine::error::EngineError;

/// One request that failed inside a bulk operation.
#[derive(Debug, Clone, Serialize)]
pub struct BulkFailure {
    /// The failing request.
    pub request_id: LeaveRequestId,
    /// Machine-readable error code.
    pub error_code: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl BulkFailure {
    /// Captures an engine error against a request.
    #[must_use]
    pub fn from_error(request_id: LeaveRequestId, error: &EngineError) -> Self {
        Self {
            request_id,
            error_code: error.error_code(),
            message: error.to_string(),
        }
    }
}

/// Outcome of a bulk decision.
///
/// Each item succeeds or fails on its own; one failure never rolls back
/// the others.
#[derive(Debug, Clone, Serialize)]
pub struct BulkOutcome {
    /// Requests decided successfully.
    pub processed_count: usize,
    /// Requests that failed.
    pub failed_count: usize,
    /// IDs of the successfully decided requests, in input order.
    pub success: Vec<LeaveRequestId>,
    /// Failures with their typed error codes.
    pub failed: Vec<BulkFailure>,
}

impl BulkOutcome {
    /// An empty outcome.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            processed_count: 0,
            failed_count: 0,
            success: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Records a success.
    pub fn record_success(&mut self, request_id: LeaveRequestId) {
        self.processed_count += 1;
        self.success.push(request_id);
    }

    /// Records a failure.
    pub fn record_failure(&mut self, request_id: LeaveRequestId, error: &EngineError) {
        self.failed_count += 1;
        self.failed.push(BulkFailure::from_error(request_id, error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::error::WorkflowError;

    #[test]
    fn test_outcome_counters() {
        let mut outcome = BulkOutcome::empty();
        let ok_id = LeaveRequestId::new();
        let bad_id = LeaveRequestId::new();

        outcome.record_success(ok_id);
        outcome.record_failure(
            bad_id,
            &EngineError::from(WorkflowError::RequestNotFound(bad_id)),
        );

        assert_eq!(outcome.processed_count, 1);
        assert_eq!(outcome.failed_count, 1);
        assert_eq!(outcome.success, vec![ok_id]);
        assert_eq!(outcome.failed[0].error_code, "REQUEST_NOT_FOUND");
    }
}

//! Compliance validation seam.
//!
//! Approval decisions pass through a compliance validator before any
//! balance is touched. The validator is an injected collaborator so
//! deployments can plug in statutory rule engines; the engine only
//! requires that a failing report blocks the decision.

use serde::Serialize;

use furlough_shared::types::EmployeeId;

use crate::workflow::role::ApproverRole;
use crate::workflow::types::LeaveRequest;

/// Result of running compliance checks against a request.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceReport {
    /// True if the request may proceed.
    pub valid: bool,
    /// Human-readable violations; empty when `valid`.
    pub errors: Vec<String>,
}

impl ComplianceReport {
    /// A passing report.
    #[must_use]
    pub fn passing() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// A failing report with the given violations.
    #[must_use]
    pub fn failing(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
        }
    }
}

impl Default for ComplianceReport {
    fn default() -> Self {
        Self::passing()
    }
}

/// Validates a request against statutory and policy rules.
pub trait ComplianceValidator: Send + Sync {
    /// Checks the request before an approval decision is accepted.
    ///
    /// Receives who is approving as well as in what capacity, so
    /// implementations can enforce identity-based rules (self-approval,
    /// per-person delegation limits) in addition to role-based ones.
    fn validate_before_approval(
        &self,
        request: &LeaveRequest,
        approver_id: EmployeeId,
        approver_role: ApproverRole,
    ) -> ComplianceReport;
}

/// A validator that accepts every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl ComplianceValidator for AllowAll {
    fn validate_before_approval(
        &self,
        _request: &LeaveRequest,
        _approver_id: EmployeeId,
        _approver_role: ApproverRole,
    ) -> ComplianceReport {
        ComplianceReport::passing()
    }
}

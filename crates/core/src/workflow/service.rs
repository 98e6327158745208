//! Approval state machine for leave requests.
//!
//! All functions here are pure: `apply_decision` computes the complete
//! outcome of a decision on a copy of the step list and never mutates its
//! input. Committing the outcome (and the ledger side effects it calls
//! for) is the engine's job, which is what guarantees that a failed
//! decision leaves the stored request byte-for-byte unchanged.

use chrono::{DateTime, Utc};

use furlough_shared::types::EmployeeId;

use crate::workflow::error::WorkflowError;
use crate::workflow::types::{
    ApprovalStep, Decision, LeaveRequest, RequestStatus, StepStatus,
};
use crate::workflow::role::ApproverRole;

/// Ledger side effect called for by a decision outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceEffect {
    /// No balance movement.
    None,
    /// The request entered approved/recorded: deduct its day count.
    Deduct,
}

/// The computed result of applying one decision.
#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    /// The step list after the decision.
    pub steps: Vec<ApprovalStep>,
    /// The recomputed aggregate status.
    pub status: RequestStatus,
    /// The ledger effect the engine must perform before committing.
    pub balance_effect: BalanceEffect,
}

/// Stateless service implementing the approval state machine.
pub struct ApprovalService;

impl ApprovalService {
    /// Recomputes the aggregate status from step statuses.
    ///
    /// Pure and deterministic: `rejected` if any step is rejected;
    /// `completion_status` if every step is approved or skipped;
    /// otherwise `pending`.
    #[must_use]
    pub fn aggregate_status(steps: &[ApprovalStep], completion_status: RequestStatus) -> RequestStatus {
        if steps.iter().any(|s| s.status == StepStatus::Rejected) {
            return RequestStatus::Rejected;
        }
        if !steps.is_empty() && steps.iter().all(|s| s.status.is_satisfied()) {
            return completion_status;
        }
        RequestStatus::Pending
    }

    /// Returns the lowest pending level whose lower levels are all terminal.
    ///
    /// This is the only level a decision can land on right now; `None` if
    /// every step is terminal.
    #[must_use]
    pub fn actionable_level(steps: &[ApprovalStep]) -> Option<u8> {
        let mut ordered: Vec<&ApprovalStep> = steps.iter().collect();
        ordered.sort_by_key(|s| s.level);

        ordered
            .into_iter()
            .find(|s| s.status == StepStatus::Pending)
            .map(|s| s.level)
    }

    /// Applies a decision at `level`, computing the full outcome on a copy.
    ///
    /// Checks, in order: the request is not locked; the level exists; the
    /// step is still pending; every lower level is terminal; the actor's
    /// role satisfies the step's assigned role. A rejection short-circuits
    /// the chain, marking every other pending step as skipped.
    ///
    /// # Errors
    ///
    /// Returns the corresponding `WorkflowError` when any check fails; the
    /// input request is never modified.
    pub fn apply_decision(
        request: &LeaveRequest,
        level: u8,
        decision: Decision,
        actor_id: EmployeeId,
        actor_role: ApproverRole,
        comments: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<DecisionOutcome, WorkflowError> {
        if request.locked {
            return Err(WorkflowError::AlreadyFinalized {
                request: request.id,
                status: request.status,
            });
        }

        let step = request
            .step_at(level)
            .ok_or(WorkflowError::UnknownLevel { level })?;

        if step.status != StepStatus::Pending {
            return Err(WorkflowError::StepAlreadyDecided {
                level,
                status: step.status,
            });
        }

        if let Some(blocking_level) = request
            .steps
            .iter()
            .filter(|s| s.level < level && !s.status.is_terminal())
            .map(|s| s.level)
            .min()
        {
            return Err(WorkflowError::OutOfSequence {
                level,
                blocking_level,
            });
        }

        if !actor_role.satisfies(step.approver_role) {
            return Err(WorkflowError::PermissionDenied {
                actor_role,
                required_role: step.approver_role,
            });
        }

        if decision == Decision::Reject
            && comments.as_deref().is_none_or(|c| c.trim().is_empty())
        {
            return Err(WorkflowError::RejectionCommentsRequired);
        }

        let mut steps = request.steps.clone();
        for s in &mut steps {
            if s.level == level {
                s.status = match decision {
                    Decision::Approve => StepStatus::Approved,
                    Decision::Reject => StepStatus::Rejected,
                };
                s.approver_id = Some(actor_id);
                s.comments = comments.clone();
                s.decided_at = Some(now);
            } else if decision == Decision::Reject && s.status == StepStatus::Pending {
                // Short-circuit: a rejection skips every remaining step.
                s.status = StepStatus::Skipped;
            }
        }

        let status = Self::aggregate_status(&steps, request.completion_status);

        let balance_effect = if status.consumes_balance() && !request.status.consumes_balance() {
            BalanceEffect::Deduct
        } else {
            BalanceEffect::None
        };

        Ok(DecisionOutcome {
            steps,
            status,
            balance_effect,
        })
    }
}

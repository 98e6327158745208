//! Encashment request validation and decision logic.
//!
//! Stateless, like the approval state machine: creation and decision are
//! validated against snapshots, outputs are computed on copies, and the
//! engine commits them. The balance deduction itself goes through the
//! ledger store at decision time.

use chrono::Utc;
use rust_decimal::Decimal;

use furlough_shared::types::{DayCount, EmployeeId, EncashmentId};

use crate::encashment::error::EncashmentError;
use crate::encashment::types::{
    EmploymentStatus, EncashmentReason, EncashmentRequest, EncashmentStatus,
};
use crate::workflow::role::ApproverRole;
use crate::workflow::types::{Decision, LeaveType};

/// Stateless encashment rules.
pub struct EncashmentService;

impl EncashmentService {
    /// Validates a creation and returns the pending request.
    ///
    /// `available` is the current remaining balance for the account; the
    /// engine re-validates it again at approval time.
    ///
    /// # Errors
    ///
    /// Returns `ReasonPreconditionFailed` when the reason does not match
    /// the employment status, `ReasonDetailsRequired` for special
    /// authorization without detail, or `Validation` for a non-positive
    /// or unaffordable day count.
    pub fn create(
        employee_id: EmployeeId,
        leave_type: LeaveType,
        days: DayCount,
        reason: EncashmentReason,
        reason_details: Option<String>,
        employment_status: EmploymentStatus,
        available: DayCount,
    ) -> Result<EncashmentRequest, EncashmentError> {
        Self::check_reason(reason, employment_status, reason_details.as_deref())?;

        if !days.is_positive() {
            return Err(EncashmentError::Validation(format!(
                "day count must be positive, got {days}"
            )));
        }
        if days > available {
            return Err(EncashmentError::Validation(format!(
                "requested {days} days but only {available} remain"
            )));
        }

        Ok(EncashmentRequest {
            id: EncashmentId::new(),
            employee_id,
            leave_type,
            days,
            reason,
            reason_details,
            status: EncashmentStatus::Pending,
            amount: None,
            created_at: Utc::now(),
        })
    }

    /// Checks that `actor_role` may decide encashment requests.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` for any role other than human
    /// resources or administrator.
    pub fn check_decider(actor_role: ApproverRole) -> Result<(), EncashmentError> {
        if matches!(
            actor_role,
            ApproverRole::HumanResources | ApproverRole::Administrator
        ) {
            Ok(())
        } else {
            Err(EncashmentError::PermissionDenied(
                actor_role.as_str().to_string(),
            ))
        }
    }

    /// Computes the decided request without committing it.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyFinalized` if the request has been decided.
    pub fn apply_decision(
        request: &EncashmentRequest,
        decision: Decision,
        amount: Option<Decimal>,
    ) -> Result<EncashmentRequest, EncashmentError> {
        if request.status.is_terminal() {
            return Err(EncashmentError::AlreadyFinalized(request.id));
        }

        let mut next = request.clone();
        match decision {
            Decision::Approve => {
                next.status = EncashmentStatus::Approved;
                next.amount = amount;
            }
            Decision::Reject => next.status = EncashmentStatus::Rejected,
        }
        Ok(next)
    }

    fn check_reason(
        reason: EncashmentReason,
        employment_status: EmploymentStatus,
        reason_details: Option<&str>,
    ) -> Result<(), EncashmentError> {
        match reason {
            EncashmentReason::Retirement if employment_status != EmploymentStatus::Retiring => {
                Err(EncashmentError::ReasonPreconditionFailed {
                    reason,
                    status: employment_status,
                })
            }
            EncashmentReason::Exit if employment_status != EmploymentStatus::Exiting => {
                Err(EncashmentError::ReasonPreconditionFailed {
                    reason,
                    status: employment_status,
                })
            }
            EncashmentReason::SpecialAuthorization
                if reason_details.is_none_or(|d| d.trim().is_empty()) =>
            {
                Err(EncashmentError::ReasonDetailsRequired)
            }
            _ => Ok(()),
        }
    }
}

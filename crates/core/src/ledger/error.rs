//! Balance ledger error types.

use thiserror::Error;

use furlough_shared::types::{DayCount, EmployeeId};

use crate::audit::AuditError;
use crate::workflow::types::LeaveType;

/// Errors that can occur during balance ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The requested deduction exceeds the remaining balance.
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Days the operation tried to deduct.
        requested: DayCount,
        /// Days actually available.
        available: DayCount,
    },

    /// No balance account exists for the employee and leave type.
    #[error("No {leave_type} balance account for employee {employee_id}")]
    AccountNotFound {
        /// The employee.
        employee_id: EmployeeId,
        /// The leave type.
        leave_type: LeaveType,
    },

    /// A balance account already exists for the employee and leave type.
    #[error("A {leave_type} balance account already exists for employee {employee_id}")]
    AccountAlreadyOpen {
        /// The employee.
        employee_id: EmployeeId,
        /// The leave type.
        leave_type: LeaveType,
    },

    /// The day count for a mutation must be strictly positive.
    #[error("Day count must be positive, got {0}")]
    InvalidAmount(DayCount),

    /// No entitlement policy is configured for the leave type.
    #[error("No entitlement policy configured for leave type {0}")]
    NoPolicy(LeaveType),

    /// A malformed policy table entry.
    #[error("Invalid policy configuration: {0}")]
    Configuration(String),

    /// A mutation would break a ledger invariant.
    #[error("Ledger invariant violation: {0}")]
    InvariantViolation(String),

    /// The audit entry for a mutation could not be recorded.
    #[error(transparent)]
    Audit(#[from] AuditError),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::AccountNotFound { .. } | Self::AccountAlreadyOpen { .. } => "VALIDATION_ERROR",
            Self::InvalidAmount(_) => "VALIDATION_ERROR",
            Self::NoPolicy(_) | Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::InvariantViolation(_) => "INVARIANT_VIOLATION",
            Self::Audit(e) => e.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidAmount(_) => 400,
            Self::AccountNotFound { .. } => 404,
            Self::InsufficientBalance { .. } | Self::AccountAlreadyOpen { .. } => 409,
            Self::NoPolicy(_)
            | Self::Configuration(_)
            | Self::InvariantViolation(_) => 500,
            Self::Audit(e) => e.status_code(),
        }
    }
}

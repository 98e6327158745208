//! Encashment domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use furlough_shared::types::{DayCount, EmployeeId, EncashmentId};

use crate::workflow::types::LeaveType;

/// Why an employee is converting leave days to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncashmentReason {
    /// Payout on retirement.
    Retirement,
    /// Payout on leaving the institution.
    Exit,
    /// Payout specially authorized while still employed.
    SpecialAuthorization,
}

impl EncashmentReason {
    /// Returns the string representation of the reason.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retirement => "retirement",
            Self::Exit => "exit",
            Self::SpecialAuthorization => "special_authorization",
        }
    }
}

impl fmt::Display for EncashmentReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The employee's employment status, supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    /// Employed with no pending separation.
    Active,
    /// Retirement in progress.
    Retiring,
    /// Separation in progress.
    Exiting,
}

/// Status of an encashment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncashmentStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved; days deducted.
    Approved,
    /// Rejected; no balance effect.
    Rejected,
}

impl EncashmentStatus {
    /// Returns true if the status is terminal.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for EncashmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request to convert leave days into pay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncashmentRequest {
    /// Unique identifier.
    pub id: EncashmentId,
    /// The requesting employee.
    pub employee_id: EmployeeId,
    /// The leave type being encashed.
    pub leave_type: LeaveType,
    /// Days to convert.
    pub days: DayCount,
    /// Why the conversion is requested.
    pub reason: EncashmentReason,
    /// Supporting detail; mandatory for special authorization.
    pub reason_details: Option<String>,
    /// Current status.
    pub status: EncashmentStatus,
    /// Monetary amount recorded at approval, if any. Payroll math is an
    /// external concern; this is a pass-through figure.
    pub amount: Option<Decimal>,
    /// When the request was submitted.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_terminal() {
        assert!(!EncashmentStatus::Pending.is_terminal());
        assert!(EncashmentStatus::Approved.is_terminal());
        assert!(EncashmentStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_reason_names() {
        assert_eq!(EncashmentReason::Retirement.as_str(), "retirement");
        assert_eq!(
            EncashmentReason::SpecialAuthorization.as_str(),
            "special_authorization"
        );
    }
}

//! Leave request domain types.
//!
//! This module defines the normalized request model: the leave type
//! taxonomy, request and step statuses, and the request aggregate itself.
//! Approval progress is a single ordered list of steps; there is no
//! secondary loosely-typed representation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use furlough_shared::types::{DayCount, EmployeeId, LeaveRequestId};

use crate::workflow::role::{ApproverRole, EmployeeGrade};

/// Category of absence entitlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Annual recreation leave.
    Annual,
    /// Sick leave.
    Sick,
    /// Special service leave.
    SpecialService,
    /// Training leave.
    Training,
    /// Study leave.
    Study,
    /// Maternity leave.
    Maternity,
    /// Paternity leave.
    Paternity,
    /// Compassionate leave.
    Compassionate,
    /// Unpaid leave.
    Unpaid,
}

impl LeaveType {
    /// All leave types, in display order.
    pub const ALL: [Self; 9] = [
        Self::Annual,
        Self::Sick,
        Self::SpecialService,
        Self::Training,
        Self::Study,
        Self::Maternity,
        Self::Paternity,
        Self::Compassionate,
        Self::Unpaid,
    ];

    /// Parse a leave type from a string, tolerating case and separators.
    pub fn parse(s: &str) -> Option<Self> {
        let canonical: String = s
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match canonical.as_str() {
            "annual" => Some(Self::Annual),
            "sick" => Some(Self::Sick),
            "specialservice" => Some(Self::SpecialService),
            "training" => Some(Self::Training),
            "study" => Some(Self::Study),
            "maternity" => Some(Self::Maternity),
            "paternity" => Some(Self::Paternity),
            "compassionate" => Some(Self::Compassionate),
            "unpaid" => Some(Self::Unpaid),
            _ => None,
        }
    }

    /// Returns the string representation of the leave type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Sick => "sick",
            Self::SpecialService => "special_service",
            Self::Training => "training",
            Self::Study => "study",
            Self::Maternity => "maternity",
            Self::Paternity => "paternity",
            Self::Compassionate => "compassionate",
            Self::Unpaid => "unpaid",
        }
    }
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregate status of a leave request.
///
/// The valid transitions are:
/// - Pending → Approved (every step approved or skipped)
/// - Pending → Recorded (as Approved, for the most senior grade)
/// - Pending → Rejected (any step rejected)
/// - Approved/Recorded → Rejected (explicit reversal only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// At least one step is still awaiting a decision.
    Pending,
    /// Every step signed off; balance has been deducted.
    Approved,
    /// A step was rejected, or an approval was reversed.
    Rejected,
    /// Administratively logged rather than peer-approved; balance deducted.
    Recorded,
}

impl RequestStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Recorded => "recorded",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "recorded" => Some(Self::Recorded),
            _ => None,
        }
    }

    /// Returns true if the status is terminal.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns true if the status consumed balance on entry.
    #[must_use]
    pub fn consumes_balance(&self) -> bool {
        matches!(self, Self::Approved | Self::Recorded)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of one approval step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved by the assigned role.
    Approved,
    /// Rejected by the assigned role.
    Rejected,
    /// Bypassed because another step rejected first.
    Skipped,
}

impl StepStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Skipped => "skipped",
        }
    }

    /// Returns true if the step no longer awaits a decision.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns true if the step counts as satisfied for routing purposes.
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Self::Approved | Self::Skipped)
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A decision an approver can make on a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Approve the step.
    Approve,
    /// Reject the step (short-circuits the whole request).
    Reject,
}

/// One stage in a request's required sign-off sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalStep {
    /// Level number, unique and ascending from 1 within a request.
    pub level: u8,
    /// Role whose holder must decide this step.
    pub approver_role: ApproverRole,
    /// Current status of the step.
    pub status: StepStatus,
    /// The employee who decided the step, once decided.
    pub approver_id: Option<EmployeeId>,
    /// Optional comments from the approver.
    pub comments: Option<String>,
    /// When the step was decided.
    pub decided_at: Option<DateTime<Utc>>,
}

impl ApprovalStep {
    /// Creates a pending step for the given level and role.
    #[must_use]
    pub fn pending(level: u8, approver_role: ApproverRole) -> Self {
        Self {
            level,
            approver_role,
            status: StepStatus::Pending,
            approver_id: None,
            comments: None,
            decided_at: None,
        }
    }
}

/// An employee's organizational placement, supplied by the caller.
///
/// Role-permission lookup and the personnel registry are external
/// collaborators; the engine only needs placement to route the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgPlacement {
    /// The employee's grade.
    pub grade: EmployeeGrade,
    /// Unit name.
    pub unit: String,
    /// Directorate name.
    pub directorate: String,
}

/// A leave request moving through the approval chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier.
    pub id: LeaveRequestId,
    /// The requesting employee.
    pub employee_id: EmployeeId,
    /// Category of leave requested.
    pub leave_type: LeaveType,
    /// First day of absence.
    pub start_date: NaiveDate,
    /// Last day of absence (inclusive).
    pub end_date: NaiveDate,
    /// Working days consumed by the request.
    pub day_count: DayCount,
    /// Aggregate status, derived from the steps; never set by callers.
    pub status: RequestStatus,
    /// Terminal status when every step signs off (`Approved` or `Recorded`).
    pub completion_status: RequestStatus,
    /// Once true, only the explicit reversal operation may touch the request.
    pub locked: bool,
    /// True once the balance deduction for this request has committed.
    pub deducted: bool,
    /// Ordered approval steps.
    pub steps: Vec<ApprovalStep>,
    /// When the request was submitted.
    pub created_at: DateTime<Utc>,
}

impl LeaveRequest {
    /// Returns the step at `level`, if the chain has one.
    #[must_use]
    pub fn step_at(&self, level: u8) -> Option<&ApprovalStep> {
        self.steps.iter().find(|s| s.level == level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leave_type_parse_round_trip() {
        for lt in LeaveType::ALL {
            assert_eq!(LeaveType::parse(lt.as_str()), Some(lt));
        }
        assert_eq!(LeaveType::parse("Special Service"), Some(LeaveType::SpecialService));
        assert_eq!(LeaveType::parse("sabbatical"), None);
    }

    #[test]
    fn test_request_status_terminal() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
        assert!(RequestStatus::Recorded.is_terminal());
    }

    #[test]
    fn test_request_status_consumes_balance() {
        assert!(RequestStatus::Approved.consumes_balance());
        assert!(RequestStatus::Recorded.consumes_balance());
        assert!(!RequestStatus::Pending.consumes_balance());
        assert!(!RequestStatus::Rejected.consumes_balance());
    }

    #[test]
    fn test_request_status_parse() {
        assert_eq!(RequestStatus::parse("PENDING"), Some(RequestStatus::Pending));
        assert_eq!(RequestStatus::parse("recorded"), Some(RequestStatus::Recorded));
        assert_eq!(RequestStatus::parse("draft"), None);
    }

    #[test]
    fn test_step_status_satisfied() {
        assert!(StepStatus::Approved.is_satisfied());
        assert!(StepStatus::Skipped.is_satisfied());
        assert!(!StepStatus::Pending.is_satisfied());
        assert!(!StepStatus::Rejected.is_satisfied());
    }

    #[test]
    fn test_pending_step_shape() {
        let step = ApprovalStep::pending(2, ApproverRole::DirectorateHead);
        assert_eq!(step.level, 2);
        assert_eq!(step.status, StepStatus::Pending);
        assert!(step.approver_id.is_none());
        assert!(step.decided_at.is_none());
    }
}

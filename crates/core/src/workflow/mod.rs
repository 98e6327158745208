//! Leave request lifecycle for Furlough.
//!
//! This module implements the leave request state machine, the approval
//! chain builder, and the role/grade taxonomy.
//!
//! # Modules
//!
//! - `types` - Request domain types (LeaveRequest, ApprovalStep, statuses)
//! - `role` - Approver roles and employee grades with canonical parsing
//! - `chain` - Approval chain resolution from routing rules
//! - `error` - Workflow-specific error types
//! - `service` - The pure decision state machine

pub mod chain;
pub mod error;
pub mod role;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use chain::{ApprovalChain, ChainBuilder, ChainError, ChainRule};
pub use error::WorkflowError;
pub use role::{ApproverRole, EmployeeGrade};
pub use service::{ApprovalService, BalanceEffect, DecisionOutcome};
pub use types::{
    ApprovalStep, Decision, LeaveRequest, LeaveType, OrgPlacement, RequestStatus, StepStatus,
};

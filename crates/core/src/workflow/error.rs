//! Workflow error types for the leave request lifecycle.
//!
//! This module defines all error types that can occur while driving a
//! request through its approval chain.

use thiserror::Error;

use furlough_shared::types::LeaveRequestId;

use crate::workflow::role::ApproverRole;
use crate::workflow::types::{RequestStatus, StepStatus};

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Leave request not found.
    #[error("Leave request {0} not found")]
    RequestNotFound(LeaveRequestId),

    /// Attempted to decide a request that already reached a terminal state.
    #[error("Request {request} is already finalized with status {status}")]
    AlreadyFinalized {
        /// The request being decided.
        request: LeaveRequestId,
        /// Its terminal status.
        status: RequestStatus,
    },

    /// The request's chain has no step at the given level.
    #[error("Request has no approval step at level {level}")]
    UnknownLevel {
        /// The requested level.
        level: u8,
    },

    /// The step at this level has already been decided.
    #[error("Step at level {level} is already {status}")]
    StepAlreadyDecided {
        /// The level of the step.
        level: u8,
        /// Its current status.
        status: StepStatus,
    },

    /// A lower-level step is still pending.
    #[error("Cannot decide level {level}: level {blocking_level} is still pending")]
    OutOfSequence {
        /// The level being decided.
        level: u8,
        /// The lowest unresolved lower level.
        blocking_level: u8,
    },

    /// The actor's role does not match the step's assigned role.
    #[error("Role {actor_role} may not decide a step assigned to {required_role}")]
    PermissionDenied {
        /// The actor's role.
        actor_role: ApproverRole,
        /// The role assigned to the step.
        required_role: ApproverRole,
    },

    /// Rejection requires a non-empty comment.
    #[error("Rejection comments are required")]
    RejectionCommentsRequired,

    /// The injected compliance check failed.
    #[error("Compliance check failed: {}", errors.join("; "))]
    Compliance {
        /// Messages from the compliance validator.
        errors: Vec<String>,
    },

    /// Request input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Reversal requires a non-empty reason.
    #[error("Reversal reason is required")]
    ReversalReasonRequired,

    /// Attempted to reverse a request that is not approved or recorded.
    #[error("Request {request} cannot be reversed from status {status}")]
    NotReversible {
        /// The request being reversed.
        request: LeaveRequestId,
        /// Its current status.
        status: RequestStatus,
    },
}

impl WorkflowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::RequestNotFound(_) => 404,
            Self::AlreadyFinalized { .. } | Self::NotReversible { .. } => 409,
            Self::UnknownLevel { .. }
            | Self::Validation(_)
            | Self::RejectionCommentsRequired
            | Self::ReversalReasonRequired => 400,
            Self::StepAlreadyDecided { .. } | Self::OutOfSequence { .. } => 409,
            Self::PermissionDenied { .. } => 403,
            Self::Compliance { .. } => 422,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::RequestNotFound(_) => "REQUEST_NOT_FOUND",
            Self::AlreadyFinalized { .. } => "ALREADY_FINALIZED",
            Self::UnknownLevel { .. } => "UNKNOWN_LEVEL",
            Self::StepAlreadyDecided { .. } | Self::OutOfSequence { .. } => "SEQUENCING_ERROR",
            Self::PermissionDenied { .. } => "PERMISSION_DENIED",
            Self::RejectionCommentsRequired => "REJECTION_COMMENTS_REQUIRED",
            Self::Compliance { .. } => "COMPLIANCE_FAILED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::ReversalReasonRequired => "REVERSAL_REASON_REQUIRED",
            Self::NotReversible { .. } => "NOT_REVERSIBLE",
        }
    }
}

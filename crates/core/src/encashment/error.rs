//! Encashment error types.

use thiserror::Error;

use furlough_shared::types::EncashmentId;

use crate::encashment::types::{EmploymentStatus, EncashmentReason};
use crate::ledger::error::LedgerError;

/// Errors that can occur during encashment operations.
#[derive(Debug, Error)]
pub enum EncashmentError {
    /// The reason requires a different employment status.
    #[error("Reason {reason} is not available with employment status {status:?}")]
    ReasonPreconditionFailed {
        /// The requested reason.
        reason: EncashmentReason,
        /// The employee's actual status.
        status: EmploymentStatus,
    },

    /// Special authorization requires supporting detail.
    #[error("Reason details are required for special authorization")]
    ReasonDetailsRequired,

    /// Encashment request not found.
    #[error("Encashment request not found: {0}")]
    NotFound(EncashmentId),

    /// The request has already been decided.
    #[error("Encashment request {0} is already finalized")]
    AlreadyFinalized(EncashmentId),

    /// Only human resources or an administrator may decide encashments.
    #[error("Role {0} may not decide encashment requests")]
    PermissionDenied(String),

    /// An invalid field on the request.
    #[error("Invalid encashment request: {0}")]
    Validation(String),

    /// The underlying balance operation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl EncashmentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ReasonPreconditionFailed { .. }
            | Self::ReasonDetailsRequired
            | Self::NotFound(_)
            | Self::Validation(_) => "VALIDATION_ERROR",
            Self::AlreadyFinalized(_) => "ALREADY_FINALIZED",
            Self::PermissionDenied(_) => "PERMISSION_DENIED",
            Self::Ledger(e) => e.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ReasonPreconditionFailed { .. }
            | Self::ReasonDetailsRequired
            | Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::AlreadyFinalized(_) => 409,
            Self::PermissionDenied(_) => 403,
            Self::Ledger(e) => e.status_code(),
        }
    }
}

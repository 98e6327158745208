//! Notification dispatch seam.
//!
//! Delivery (email, in-app, chat) is an external collaborator. The engine
//! emits lifecycle events after a mutation commits; dispatch failures are
//! logged and never roll back the operation that triggered them.

use serde::Serialize;
use thiserror::Error;

use furlough_shared::types::{DayCount, EmployeeId, EncashmentId, LeaveRequestId};

use crate::encashment::types::EncashmentStatus;
use crate::workflow::types::{LeaveType, RequestStatus};

/// A lifecycle event worth telling someone about.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LeaveEvent {
    /// A request was submitted and awaits its first approval.
    RequestSubmitted {
        /// The request.
        request_id: LeaveRequestId,
        /// The requesting employee.
        employee_id: EmployeeId,
        /// Leave type requested.
        leave_type: LeaveType,
        /// Days requested.
        day_count: DayCount,
    },
    /// A request reached a terminal status.
    RequestFinalized {
        /// The request.
        request_id: LeaveRequestId,
        /// The requesting employee.
        employee_id: EmployeeId,
        /// The terminal status.
        status: RequestStatus,
    },
    /// A finalized approval was reversed.
    ApprovalReversed {
        /// The request.
        request_id: LeaveRequestId,
        /// The requesting employee.
        employee_id: EmployeeId,
        /// Days restored to the balance.
        restored: DayCount,
    },
    /// An encashment request was decided.
    EncashmentDecided {
        /// The encashment request.
        encashment_id: EncashmentId,
        /// The requesting employee.
        employee_id: EmployeeId,
        /// The terminal status.
        status: EncashmentStatus,
    },
    /// A leave year was settled.
    SettlementCompleted {
        /// The settled year.
        year: i32,
        /// Accounts settled.
        settled_count: usize,
    },
}

/// Errors raised by a dispatcher.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The delivery channel failed.
    #[error("Notification delivery failure: {0}")]
    Delivery(String),
}

/// Delivers lifecycle events to interested parties.
pub trait NotificationDispatcher: Send + Sync {
    /// Dispatches one event.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery failed; callers log and continue.
    fn dispatch(&self, event: &LeaveEvent) -> Result<(), NotificationError>;
}

/// A dispatcher that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDispatcher;

impl NotificationDispatcher for NullDispatcher {
    fn dispatch(&self, _event: &LeaveEvent) -> Result<(), NotificationError> {
        Ok(())
    }
}

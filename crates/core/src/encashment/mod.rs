//! Leave encashment.
//!
//! Employees separating from the institution (or specially authorized)
//! may convert remaining leave days into pay. Requests are gated at
//! creation, decided by human resources, and deduct through the same
//! ledger path as approved leave.

pub mod error;
pub mod service;
pub mod types;

pub use error::EncashmentError;
pub use service::EncashmentService;
pub use types::{EmploymentStatus, EncashmentReason, EncashmentRequest, EncashmentStatus};

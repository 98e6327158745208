//! Core business logic for Furlough.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, invariants, and the leave lifecycle state machine live here.
//!
//! # Modules
//!
//! - `workflow` - Leave request lifecycle: roles, approval chains, state machine
//! - `ledger` - Per-employee, per-leave-type balance ledger
//! - `settlement` - Year-end carry-forward and forfeiture job
//! - `encashment` - Conversion of unused balance into a monetary claim
//! - `audit` - Append-only audit trail seam
//! - `compliance` - Pre-approval compliance check seam
//! - `notification` - Best-effort notification seam
//! - `engine` - Orchestrator tying the above together

pub mod audit;
pub mod compliance;
pub mod encashment;
pub mod engine;
pub mod ledger;
pub mod notification;
pub mod settlement;
pub mod workflow;

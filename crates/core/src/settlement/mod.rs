//! Year-end settlement.
//!
//! At the close of a leave year every balance account is settled: up to
//! the policy cap carries forward (with an expiry), the rest is
//! forfeited, and the next period opens with a fresh entitlement.

pub mod error;
pub mod job;
pub mod period;

pub use error::SettlementError;
pub use job::{SettlementFailure, SettlementSummary, YearEndSettlement};
pub use period::SettlementPeriod;

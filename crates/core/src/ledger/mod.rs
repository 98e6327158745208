//! Leave balance ledger.
//!
//! Balances are per `(employee, leave type)` accounts. Deductions,
//! restores, and year-end settlement all validate before mutating and
//! record an audit entry before committing.
//!
//! # Modules
//!
//! - `balance` - Account model and pure settlement math
//! - `policy` - Entitlement policy table
//! - `store` - Concurrent account store
//! - `error` - Ledger error types

pub mod balance;
pub mod error;
pub mod policy;
pub mod store;

#[cfg(test)]
mod store_props;

pub use balance::{split_for_settlement, LeaveBalance, SettlementSplit};
pub use error::LedgerError;
pub use policy::{LeavePolicy, PolicyTable};
pub use store::BalanceStore;

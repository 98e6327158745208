//! Entitlement policy table.
//!
//! The table maps each leave type to its annual grant and carry-forward
//! cap. Built-in defaults cover every leave type; configuration entries
//! override them per deployment.

use std::collections::HashMap;

use furlough_shared::config::PolicyConfig;
use furlough_shared::types::DayCount;

use crate::ledger::error::LedgerError;
use crate::workflow::types::LeaveType;

/// Entitlement policy for one leave type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeavePolicy {
    /// The leave type this policy governs.
    pub leave_type: LeaveType,
    /// Days granted at the start of each leave year.
    pub annual_entitlement: DayCount,
    /// Maximum days that may carry forward at year-end.
    pub max_carryover: DayCount,
}

/// The full policy table for a deployment.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    policies: HashMap<LeaveType, LeavePolicy>,
    /// Months after year-end before carried-forward days expire.
    pub carryover_expiry_months: u32,
}

impl PolicyTable {
    /// The built-in defaults.
    #[must_use]
    pub fn defaults() -> Self {
        let entries = [
            (LeaveType::Annual, 30, 5),
            (LeaveType::Sick, 15, 0),
            (LeaveType::SpecialService, 10, 0),
            (LeaveType::Training, 12, 3),
            (LeaveType::Study, 10, 0),
            (LeaveType::Maternity, 90, 0),
            (LeaveType::Paternity, 10, 0),
            (LeaveType::Compassionate, 7, 0),
            (LeaveType::Unpaid, 90, 0),
        ];

        let policies = entries
            .into_iter()
            .map(|(leave_type, entitlement, carryover)| {
                (
                    leave_type,
                    LeavePolicy {
                        leave_type,
                        annual_entitlement: DayCount::whole(entitlement),
                        max_carryover: DayCount::whole(carryover),
                    },
                )
            })
            .collect();

        Self {
            policies,
            carryover_expiry_months: 6,
        }
    }

    /// Builds a table from configuration, overriding the defaults.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Configuration` for unknown leave type names or
    /// negative day counts.
    pub fn from_config(config: &PolicyConfig) -> Result<Self, LedgerError> {
        let mut table = Self::defaults();
        table.carryover_expiry_months = config.carryover_expiry_months;

        for entry in &config.leave_policies {
            let leave_type = LeaveType::parse(&entry.leave_type).ok_or_else(|| {
                LedgerError::Configuration(format!("unknown leave type: {}", entry.leave_type))
            })?;

            let annual_entitlement = DayCount::new(entry.annual_entitlement);
            let max_carryover = DayCount::new(entry.max_carryover);
            if annual_entitlement.is_negative() || max_carryover.is_negative() {
                return Err(LedgerError::Configuration(format!(
                    "negative day counts in policy for {leave_type}"
                )));
            }

            table.policies.insert(
                leave_type,
                LeavePolicy {
                    leave_type,
                    annual_entitlement,
                    max_carryover,
                },
            );
        }

        Ok(table)
    }

    /// Looks up the policy for a leave type.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NoPolicy` if the table has no entry.
    pub fn policy_for(&self, leave_type: LeaveType) -> Result<&LeavePolicy, LedgerError> {
        self.policies
            .get(&leave_type)
            .ok_or(LedgerError::NoPolicy(leave_type))
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::defaults()
    }
}

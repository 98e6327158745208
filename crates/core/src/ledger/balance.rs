//! Leave balance account model and pure settlement math.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use furlough_shared::types::{DayCount, EmployeeId};

use crate::workflow::types::LeaveType;

/// One employee's balance for one leave type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// The account holder.
    pub employee_id: EmployeeId,
    /// The leave type this account tracks.
    pub leave_type: LeaveType,
    /// Days currently available.
    pub remaining: DayCount,
    /// The annual entitlement the current period opened with.
    pub entitlement_ceiling: DayCount,
    /// Days carried in from the previous period.
    pub carry_forward: DayCount,
    /// Deadline after which carried-forward days are forfeited.
    pub expires_at: Option<NaiveDate>,
}

impl LeaveBalance {
    /// Opens a fresh account with the full annual entitlement.
    #[must_use]
    pub fn open(
        employee_id: EmployeeId,
        leave_type: LeaveType,
        annual_entitlement: DayCount,
    ) -> Self {
        Self {
            employee_id,
            leave_type,
            remaining: annual_entitlement,
            entitlement_ceiling: annual_entitlement,
            carry_forward: DayCount::ZERO,
            expires_at: None,
        }
    }

    /// The most the account may ever hold: this period's entitlement plus
    /// whatever carried in.
    #[must_use]
    pub fn ceiling(&self) -> DayCount {
        self.entitlement_ceiling + self.carry_forward
    }

    /// Returns the days that would be forfeited if carried-forward days
    /// have passed their expiry as of `today`.
    #[must_use]
    pub fn expired_carryover(&self, today: NaiveDate) -> DayCount {
        match self.expires_at {
            Some(deadline) if today > deadline && self.carry_forward.is_positive() => {
                self.carry_forward.min(self.remaining)
            }
            _ => DayCount::ZERO,
        }
    }
}

/// How a remaining balance divides at year-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SettlementSplit {
    /// Days carried into the next period.
    pub carried: DayCount,
    /// Days forfeited.
    pub forfeited: DayCount,
}

/// Splits a remaining balance into carried and forfeited parts.
///
/// The carried part is capped at `max_carryover`; everything above the cap
/// is forfeited. The split always conserves the input:
/// `carried + forfeited == remaining`.
#[must_use]
pub fn split_for_settlement(remaining: DayCount, max_carryover: DayCount) -> SettlementSplit {
    let cap = if max_carryover.is_negative() {
        DayCount::ZERO
    } else {
        max_carryover
    };
    let carried = remaining.min(cap);
    SettlementSplit {
        carried,
        forfeited: remaining - carried,
    }
}

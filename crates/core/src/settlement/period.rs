//! Leave year periods.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One leave year, identified by its calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettlementPeriod(pub i32);

impl SettlementPeriod {
    /// Creates a period for the given calendar year.
    #[must_use]
    pub const fn new(year: i32) -> Self {
        Self(year)
    }

    /// The calendar year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.0
    }

    /// The period this one settles into.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// The date on which days carried out of this period expire:
    /// the last day of the grace window, `expiry_months` into the next
    /// year.
    #[must_use]
    pub fn carryover_expiry(&self, expiry_months: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.next().year(), 1, 1)
            .and_then(|d| d.checked_add_months(Months::new(expiry_months)))
            .and_then(|d| d.checked_sub_days(Days::new(1)))
    }
}

impl fmt::Display for SettlementPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

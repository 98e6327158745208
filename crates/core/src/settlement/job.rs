//! Year-end settlement job.
//!
//! Settles every balance account for a leave year exactly once. Each
//! account settles independently; one failing account is reported in the
//! summary and never aborts the rest of the run.

use dashmap::DashSet;
use serde::Serialize;

use furlough_shared::types::{DayCount, EmployeeId};

use crate::ledger::policy::PolicyTable;
use crate::ledger::store::BalanceStore;
use crate::settlement::error::SettlementError;
use crate::settlement::period::SettlementPeriod;
use crate::workflow::types::LeaveType;

/// One account that could not be settled.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementFailure {
    /// The account holder.
    pub employee_id: EmployeeId,
    /// The leave type.
    pub leave_type: LeaveType,
    /// Why settlement failed.
    pub reason: String,
}

/// Outcome of one settlement run.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementSummary {
    /// The period that was settled.
    pub period: SettlementPeriod,
    /// Accounts settled successfully.
    pub settled_count: usize,
    /// Accounts that failed, with reasons.
    pub failed: Vec<SettlementFailure>,
    /// Total days carried into the next period.
    pub total_carried: DayCount,
    /// Total days forfeited.
    pub total_forfeited: DayCount,
}

/// Runs year-end settlement, at most once per period.
#[derive(Debug, Default)]
pub struct YearEndSettlement {
    settled_periods: DashSet<SettlementPeriod>,
}

impl YearEndSettlement {
    /// Creates a job with no settled periods.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the period has already been settled.
    #[must_use]
    pub fn is_settled(&self, period: SettlementPeriod) -> bool {
        self.settled_periods.contains(&period)
    }

    /// Settles every account in `store` for `period`.
    ///
    /// The period is marked settled before any account is touched, so a
    /// concurrent or repeated run for the same period is refused. The
    /// marker stays in place even if individual accounts fail; failed
    /// accounts are listed in the summary for operator follow-up.
    ///
    /// # Errors
    ///
    /// Returns `PeriodAlreadySettled` for a repeat run, or
    /// `InvalidExpiry` if no carryover deadline can be derived.
    pub fn run(
        &self,
        period: SettlementPeriod,
        store: &BalanceStore,
        policies: &PolicyTable,
    ) -> Result<SettlementSummary, SettlementError> {
        let expiry = period
            .carryover_expiry(policies.carryover_expiry_months)
            .ok_or(SettlementError::InvalidExpiry(period))?;

        if !self.settled_periods.insert(period) {
            return Err(SettlementError::PeriodAlreadySettled(period));
        }

        tracing::info!(%period, "starting year-end settlement");

        let mut summary = SettlementSummary {
            period,
            settled_count: 0,
            failed: Vec::new(),
            total_carried: DayCount::ZERO,
            total_forfeited: DayCount::ZERO,
        };

        for (employee_id, leave_type) in store.account_keys() {
            let result = policies
                .policy_for(leave_type)
                .and_then(|policy| store.settle(employee_id, leave_type, policy, expiry));

            match result {
                Ok(split) => {
                    summary.settled_count += 1;
                    summary.total_carried = summary.total_carried + split.carried;
                    summary.total_forfeited = summary.total_forfeited + split.forfeited;
                }
                Err(e) => {
                    tracing::warn!(
                        %employee_id,
                        %leave_type,
                        error = %e,
                        "account failed to settle"
                    );
                    summary.failed.push(SettlementFailure {
                        employee_id,
                        leave_type,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            %period,
            settled = summary.settled_count,
            failed = summary.failed.len(),
            carried = %summary.total_carried,
            forfeited = %summary.total_forfeited,
            "year-end settlement finished"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::MemoryAuditSink;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn setup() -> (BalanceStore, PolicyTable, YearEndSettlement) {
        (
            BalanceStore::new(Arc::new(MemoryAuditSink::new())),
            PolicyTable::defaults(),
            YearEndSettlement::new(),
        )
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, 1).unwrap()
    }

    #[test]
    fn test_settles_every_account() {
        let (store, policies, job) = setup();
        let a = EmployeeId::new();
        let b = EmployeeId::new();
        let annual = *policies.policy_for(LeaveType::Annual).unwrap();
        store.open_account(a, LeaveType::Annual, &annual).unwrap();
        store.open_account(b, LeaveType::Annual, &annual).unwrap();
        store
            .deduct(a, LeaveType::Annual, DayCount::whole(28), today(), None)
            .unwrap();

        let summary = job
            .run(SettlementPeriod::new(2026), &store, &policies)
            .unwrap();
        assert_eq!(summary.settled_count, 2);
        assert!(summary.failed.is_empty());
        // a: 2 remain, both carry; b: 30 remain, 5 carry and 25 forfeit.
        assert_eq!(summary.total_carried, DayCount::whole(7));
        assert_eq!(summary.total_forfeited, DayCount::whole(25));

        let carried = store.get(a, LeaveType::Annual).unwrap();
        assert_eq!(carried.remaining, DayCount::whole(32));
        assert_eq!(
            carried.expires_at,
            NaiveDate::from_ymd_opt(2027, 6, 30)
        );
    }

    #[test]
    fn test_drained_account_still_refilled() {
        let (store, policies, job) = setup();
        let employee = EmployeeId::new();
        let annual = *policies.policy_for(LeaveType::Annual).unwrap();
        store
            .open_account(employee, LeaveType::Annual, &annual)
            .unwrap();
        store
            .deduct(employee, LeaveType::Annual, DayCount::whole(30), today(), None)
            .unwrap();

        let summary = job
            .run(SettlementPeriod::new(2026), &store, &policies)
            .unwrap();
        assert_eq!(summary.settled_count, 1);
        assert_eq!(summary.total_carried, DayCount::ZERO);
        assert_eq!(summary.total_forfeited, DayCount::ZERO);

        // Nothing carries, but the next period's entitlement opens.
        let refilled = store.get(employee, LeaveType::Annual).unwrap();
        assert_eq!(refilled.remaining, DayCount::whole(30));
        assert_eq!(refilled.expires_at, None);
    }

    #[test]
    fn test_second_run_refused() {
        let (store, policies, job) = setup();
        let period = SettlementPeriod::new(2026);
        job.run(period, &store, &policies).unwrap();

        assert!(matches!(
            job.run(period, &store, &policies),
            Err(SettlementError::PeriodAlreadySettled(_))
        ));
        assert!(job.is_settled(period));
    }

    #[test]
    fn test_different_periods_both_run() {
        let (store, policies, job) = setup();
        job.run(SettlementPeriod::new(2026), &store, &policies)
            .unwrap();
        assert!(job
            .run(SettlementPeriod::new(2027), &store, &policies)
            .is_ok());
    }
}

//! Property-based tests for the balance store.

use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use furlough_shared::types::{DayCount, EmployeeId};

use crate::audit::MemoryAuditSink;
use crate::ledger::balance::split_for_settlement;
use crate::ledger::policy::LeavePolicy;
use crate::ledger::store::BalanceStore;
use crate::workflow::types::LeaveType;

/// Day counts in half-day increments, 0 to 50 days.
fn day_count_strategy() -> impl Strategy<Value = DayCount> {
    (0i64..=100).prop_map(|halves| DayCount::new(Decimal::new(halves * 5, 1)))
}

fn positive_day_count_strategy() -> impl Strategy<Value = DayCount> {
    (1i64..=100).prop_map(|halves| DayCount::new(Decimal::new(halves * 5, 1)))
}

#[derive(Debug, Clone)]
enum Op {
    Deduct(DayCount),
    Restore(DayCount),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        positive_day_count_strategy().prop_map(Op::Deduct),
        positive_day_count_strategy().prop_map(Op::Restore),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The settlement split always conserves the remainder and never
    /// carries more than the cap.
    #[test]
    fn prop_split_conserves_days(
        remaining in day_count_strategy(),
        cap in day_count_strategy(),
    ) {
        let split = split_for_settlement(remaining, cap);
        prop_assert_eq!(split.carried + split.forfeited, remaining);
        prop_assert!(split.carried <= cap);
        prop_assert!(!split.carried.is_negative());
        prop_assert!(!split.forfeited.is_negative());
    }

    /// No sequence of deducts and restores drives a balance negative or
    /// above its ceiling; failed operations change nothing.
    #[test]
    fn prop_balance_stays_within_bounds(ops in prop::collection::vec(op_strategy(), 1..30)) {
        let store = BalanceStore::new(Arc::new(MemoryAuditSink::new()));
        let employee = EmployeeId::new();
        let policy = LeavePolicy {
            leave_type: LeaveType::Annual,
            annual_entitlement: DayCount::whole(30),
            max_carryover: DayCount::whole(5),
        };
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        store.open_account(employee, LeaveType::Annual, &policy).unwrap();

        for op in ops {
            let before = store.remaining(employee, LeaveType::Annual).unwrap();
            let result = match op {
                Op::Deduct(days) => store
                    .deduct(employee, LeaveType::Annual, days, today, None)
                    .map(|b| b.remaining),
                Op::Restore(days) => store
                    .restore(employee, LeaveType::Annual, days, None)
                    .map(|b| b.remaining),
            };

            let after = store.remaining(employee, LeaveType::Annual).unwrap();
            match result {
                Ok(reported) => prop_assert_eq!(reported, after),
                Err(_) => prop_assert_eq!(before, after),
            }
            prop_assert!(!after.is_negative());
            prop_assert!(after <= DayCount::whole(30));
        }
    }

    /// Settlement leaves the next period at entitlement plus carried days,
    /// with the carried part never exceeding the cap.
    #[test]
    fn prop_settlement_refill(spent in day_count_strategy()) {
        prop_assume!(spent <= DayCount::whole(30));

        let store = BalanceStore::new(Arc::new(MemoryAuditSink::new()));
        let employee = EmployeeId::new();
        let policy = LeavePolicy {
            leave_type: LeaveType::Annual,
            annual_entitlement: DayCount::whole(30),
            max_carryover: DayCount::whole(5),
        };
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        store.open_account(employee, LeaveType::Annual, &policy).unwrap();
        if spent.is_positive() {
            store.deduct(employee, LeaveType::Annual, spent, today, None).unwrap();
        }

        let expiry = NaiveDate::from_ymd_opt(2027, 6, 30).unwrap();
        let split = store
            .settle(employee, LeaveType::Annual, &policy, expiry)
            .unwrap();
        let balance = store.get(employee, LeaveType::Annual).unwrap();

        prop_assert!(split.carried <= policy.max_carryover);
        prop_assert_eq!(
            balance.remaining,
            policy.annual_entitlement + split.carried
        );
        prop_assert_eq!(balance.carry_forward, split.carried);
    }
}

//! Concurrent balance store.
//!
//! Each `(employee, leave type)` account lives in a `DashMap` entry; the
//! entry guard is the serialization point, so check-then-write sequences
//! are atomic per account. The audit entry for a mutation is recorded
//! *before* the mutation commits: if the sink fails, the balance is left
//! untouched and the operation errors out.
//!
//! Lock order is always account entry first, audit sink second.

use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;

use furlough_shared::types::{DayCount, EmployeeId};

use crate::audit::{AuditEntry, AuditEvent, AuditSink};
use crate::ledger::balance::{split_for_settlement, LeaveBalance, SettlementSplit};
use crate::ledger::error::LedgerError;
use crate::ledger::policy::LeavePolicy;
use crate::workflow::types::LeaveType;

type AccountKey = (EmployeeId, LeaveType);

/// Thread-safe store of leave balance accounts.
pub struct BalanceStore {
    accounts: DashMap<AccountKey, LeaveBalance>,
    audit: Arc<dyn AuditSink>,
}

impl BalanceStore {
    /// Creates an empty store writing audit entries to `audit`.
    #[must_use]
    pub fn new(audit: Arc<dyn AuditSink>) -> Self {
        Self {
            accounts: DashMap::new(),
            audit,
        }
    }

    /// Opens an account with the policy's full annual entitlement.
    ///
    /// # Errors
    ///
    /// Returns `AccountAlreadyOpen` if the account exists, or an audit
    /// error if the opening could not be recorded.
    pub fn open_account(
        &self,
        employee_id: EmployeeId,
        leave_type: LeaveType,
        policy: &LeavePolicy,
    ) -> Result<LeaveBalance, LedgerError> {
        self.open_account_seeded(LeaveBalance::open(
            employee_id,
            leave_type,
            policy.annual_entitlement,
        ))
    }

    /// Opens an account with an explicit starting balance.
    ///
    /// # Errors
    ///
    /// Returns `AccountAlreadyOpen` if the account exists, `InvalidAmount`
    /// for a negative starting balance, or an audit error.
    pub fn open_account_seeded(&self, balance: LeaveBalance) -> Result<LeaveBalance, LedgerError> {
        if balance.remaining.is_negative() {
            return Err(LedgerError::InvalidAmount(balance.remaining));
        }

        let key = (balance.employee_id, balance.leave_type);
        match self.accounts.entry(key) {
            dashmap::Entry::Occupied(_) => Err(LedgerError::AccountAlreadyOpen {
                employee_id: balance.employee_id,
                leave_type: balance.leave_type,
            }),
            dashmap::Entry::Vacant(slot) => {
                self.audit.record(
                    AuditEntry::new(AuditEvent::BalanceOpened, None).with_after(&balance)?,
                )?;
                let opened = balance.clone();
                slot.insert(balance);
                Ok(opened)
            }
        }
    }

    /// Deducts `days` from an account.
    ///
    /// Expired carried-forward days are forfeited first, then the
    /// deduction is validated against what remains.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for a non-positive count,
    /// `AccountNotFound`, `InsufficientBalance`, or an audit error (in
    /// which case nothing was deducted).
    pub fn deduct(
        &self,
        employee_id: EmployeeId,
        leave_type: LeaveType,
        days: DayCount,
        today: NaiveDate,
        actor: Option<EmployeeId>,
    ) -> Result<LeaveBalance, LedgerError> {
        if !days.is_positive() {
            return Err(LedgerError::InvalidAmount(days));
        }

        let mut entry = self.accounts.get_mut(&(employee_id, leave_type)).ok_or(
            LedgerError::AccountNotFound {
                employee_id,
                leave_type,
            },
        )?;

        self.apply_expiry(&mut entry, today)?;

        if entry.remaining < days {
            return Err(LedgerError::InsufficientBalance {
                requested: days,
                available: entry.remaining,
            });
        }

        let mut next = entry.clone();
        next.remaining = next.remaining - days;

        self.audit.record(
            AuditEntry::new(AuditEvent::BalanceDeducted, actor)
                .with_before(&*entry)?
                .with_after(&next)?
                .with_metadata(&serde_json::json!({ "days": days }))?,
        )?;

        *entry = next.clone();
        Ok(next)
    }

    /// Restores `days` to an account, e.g. when an approval is reversed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for a non-positive count, `AccountNotFound`,
    /// `InvariantViolation` if the restore would push the balance above
    /// its ceiling, or an audit error (in which case nothing changed).
    pub fn restore(
        &self,
        employee_id: EmployeeId,
        leave_type: LeaveType,
        days: DayCount,
        actor: Option<EmployeeId>,
    ) -> Result<LeaveBalance, LedgerError> {
        if !days.is_positive() {
            return Err(LedgerError::InvalidAmount(days));
        }

        let mut entry = self.accounts.get_mut(&(employee_id, leave_type)).ok_or(
            LedgerError::AccountNotFound {
                employee_id,
                leave_type,
            },
        )?;

        let restored = entry.remaining + days;
        if restored > entry.ceiling() {
            return Err(LedgerError::InvariantViolation(format!(
                "restore of {days} would exceed ceiling {} for employee {employee_id}",
                entry.ceiling()
            )));
        }

        let mut next = entry.clone();
        next.remaining = restored;

        self.audit.record(
            AuditEntry::new(AuditEvent::BalanceRestored, actor)
                .with_before(&*entry)?
                .with_after(&next)?
                .with_metadata(&serde_json::json!({ "days": days }))?,
        )?;

        *entry = next.clone();
        Ok(next)
    }

    /// Settles an account at year-end: splits the remainder into carried
    /// and forfeited parts and opens the next period.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or an audit error (in which case the
    /// account still holds its pre-settlement state).
    pub fn settle(
        &self,
        employee_id: EmployeeId,
        leave_type: LeaveType,
        policy: &LeavePolicy,
        carryover_expires_at: NaiveDate,
    ) -> Result<SettlementSplit, LedgerError> {
        let mut entry = self.accounts.get_mut(&(employee_id, leave_type)).ok_or(
            LedgerError::AccountNotFound {
                employee_id,
                leave_type,
            },
        )?;

        let split = split_for_settlement(entry.remaining, policy.max_carryover);

        let mut next = entry.clone();
        next.remaining = policy.annual_entitlement + split.carried;
        next.entitlement_ceiling = policy.annual_entitlement;
        next.carry_forward = split.carried;
        next.expires_at = split.carried.is_positive().then_some(carryover_expires_at);

        self.audit.record(
            AuditEntry::new(AuditEvent::BalanceSettled, None)
                .with_before(&*entry)?
                .with_after(&next)?
                .with_metadata(&serde_json::json!({
                    "carried": split.carried,
                    "forfeited": split.forfeited,
                }))?,
        )?;

        *entry = next;
        Ok(split)
    }

    /// Returns a snapshot of one account.
    #[must_use]
    pub fn get(&self, employee_id: EmployeeId, leave_type: LeaveType) -> Option<LeaveBalance> {
        self.accounts
            .get(&(employee_id, leave_type))
            .map(|b| b.clone())
    }

    /// Returns the remaining days on one account.
    #[must_use]
    pub fn remaining(&self, employee_id: EmployeeId, leave_type: LeaveType) -> Option<DayCount> {
        self.accounts
            .get(&(employee_id, leave_type))
            .map(|b| b.remaining)
    }

    /// Returns every account key currently in the store.
    #[must_use]
    pub fn account_keys(&self) -> Vec<AccountKey> {
        self.accounts.iter().map(|e| *e.key()).collect()
    }

    fn apply_expiry(
        &self,
        entry: &mut LeaveBalance,
        today: NaiveDate,
    ) -> Result<(), LedgerError> {
        let expired = entry.expired_carryover(today);
        if !expired.is_positive() {
            return Ok(());
        }

        let mut next = entry.clone();
        next.remaining = next.remaining - expired;
        next.carry_forward = DayCount::ZERO;
        next.expires_at = None;

        self.audit.record(
            AuditEntry::new(AuditEvent::CarryoverExpired, None)
                .with_before(&*entry)?
                .with_after(&next)?
                .with_metadata(&serde_json::json!({ "forfeited": expired }))?,
        )?;

        *entry = next;
        Ok(())
    }
}

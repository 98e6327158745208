//! The leave engine: orchestration of requests, balances, settlement,
//! and encashment.
//!
//! The engine owns the stores and drives the stateless services against
//! them. Every mutation validates first, records its audit entry, and
//! only then commits; a failure at any stage leaves all state unchanged
//! (balance side effects that already committed are compensated).
//!
//! Lock order is always request entry first, balance entry second. No
//! operation ever holds two request entries, so distinct requests and
//! distinct accounts proceed without contention.

pub mod bulk;
pub mod error;

pub use bulk::{BulkFailure, BulkOutcome};
pub use error::EngineError;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;

use furlough_shared::config::PolicyConfig;
use furlough_shared::types::{
    DayCount, EmployeeId, EncashmentId, LeaveRequestId, PageRequest, PageResponse,
};

use crate::audit::{AuditEntry, AuditEvent, AuditSink, MemoryAuditSink};
use crate::compliance::{AllowAll, ComplianceValidator};
use crate::encashment::service::EncashmentService;
use crate::encashment::types::{EmploymentStatus, EncashmentReason, EncashmentRequest};
use crate::ledger::balance::LeaveBalance;
use crate::ledger::error::LedgerError;
use crate::ledger::policy::PolicyTable;
use crate::ledger::store::BalanceStore;
use crate::notification::{LeaveEvent, NotificationDispatcher, NullDispatcher};
use crate::settlement::job::{SettlementSummary, YearEndSettlement};
use crate::settlement::period::SettlementPeriod;
use crate::workflow::chain::ChainBuilder;
use crate::workflow::error::WorkflowError;
use crate::workflow::role::ApproverRole;
use crate::workflow::service::{ApprovalService, BalanceEffect};
use crate::workflow::types::{
    Decision, LeaveRequest, LeaveType, OrgPlacement, RequestStatus,
};

/// Input for creating a leave request.
#[derive(Debug, Clone)]
pub struct NewLeaveRequest {
    /// The requesting employee.
    pub employee_id: EmployeeId,
    /// The employee's organizational placement.
    pub placement: OrgPlacement,
    /// Category of leave requested.
    pub leave_type: LeaveType,
    /// First day of absence.
    pub start_date: NaiveDate,
    /// Last day of absence (inclusive).
    pub end_date: NaiveDate,
    /// Working days the absence consumes.
    pub day_count: DayCount,
}

/// Input for creating an encashment request.
#[derive(Debug, Clone)]
pub struct NewEncashment {
    /// The requesting employee.
    pub employee_id: EmployeeId,
    /// The leave type being encashed.
    pub leave_type: LeaveType,
    /// Days to convert.
    pub days: DayCount,
    /// Why the conversion is requested.
    pub reason: EncashmentReason,
    /// Supporting detail; mandatory for special authorization.
    pub reason_details: Option<String>,
    /// The employee's employment status, from the personnel registry.
    pub employment_status: EmploymentStatus,
}

/// Filter for the request list surface. Empty fields match everything.
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    /// Restrict to one employee.
    pub employee_id: Option<EmployeeId>,
    /// Restrict to one leave type.
    pub leave_type: Option<LeaveType>,
    /// Restrict to one status.
    pub status: Option<RequestStatus>,
}

/// Orchestrates the leave request lifecycle end to end.
pub struct LeaveEngine {
    requests: DashMap<LeaveRequestId, LeaveRequest>,
    encashments: DashMap<EncashmentId, EncashmentRequest>,
    balances: BalanceStore,
    chain: ChainBuilder,
    policies: PolicyTable,
    settlement: YearEndSettlement,
    audit: Arc<dyn AuditSink>,
    compliance: Arc<dyn ComplianceValidator>,
    notifier: Arc<dyn NotificationDispatcher>,
}

impl Default for LeaveEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LeaveEngine {
    /// Creates an engine with built-in rules, policies, and no-op
    /// collaborators.
    #[must_use]
    pub fn new() -> Self {
        Self::with_collaborators(
            ChainBuilder::with_default_rules(),
            PolicyTable::defaults(),
            Arc::new(MemoryAuditSink::new()),
            Arc::new(AllowAll),
            Arc::new(NullDispatcher),
        )
    }

    /// Creates an engine from deployment configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unparseable rule or policy
    /// entries.
    pub fn from_config(config: &PolicyConfig) -> Result<Self, EngineError> {
        Ok(Self::with_collaborators(
            ChainBuilder::from_config(&config.chain_rules)?,
            PolicyTable::from_config(config)?,
            Arc::new(MemoryAuditSink::new()),
            Arc::new(AllowAll),
            Arc::new(NullDispatcher),
        ))
    }

    /// Creates an engine with explicit rules and collaborators.
    #[must_use]
    pub fn with_collaborators(
        chain: ChainBuilder,
        policies: PolicyTable,
        audit: Arc<dyn AuditSink>,
        compliance: Arc<dyn ComplianceValidator>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            requests: DashMap::new(),
            encashments: DashMap::new(),
            balances: BalanceStore::new(audit.clone()),
            chain,
            policies,
            settlement: YearEndSettlement::new(),
            audit,
            compliance,
            notifier,
        }
    }

    // ========================================================================
    // Balance accounts
    // ========================================================================

    /// Opens a balance account with the policy's annual entitlement.
    ///
    /// # Errors
    ///
    /// Returns a ledger error if no policy exists or the account is
    /// already open.
    pub fn open_balance(
        &self,
        employee_id: EmployeeId,
        leave_type: LeaveType,
    ) -> Result<LeaveBalance, EngineError> {
        let policy = self.policies.policy_for(leave_type)?;
        Ok(self.balances.open_account(employee_id, leave_type, policy)?)
    }

    /// Opens a balance account with an explicit remaining count, e.g.
    /// when migrating mid-year balances in.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `remaining` exceeds the policy
    /// ceiling, or a ledger error if the account is already open.
    pub fn open_balance_with(
        &self,
        employee_id: EmployeeId,
        leave_type: LeaveType,
        remaining: DayCount,
    ) -> Result<LeaveBalance, EngineError> {
        let policy = self.policies.policy_for(leave_type)?;
        if remaining > policy.annual_entitlement {
            return Err(EngineError::Validation(format!(
                "starting balance {remaining} exceeds the {} entitlement of {}",
                leave_type, policy.annual_entitlement
            )));
        }
        let mut balance = LeaveBalance::open(employee_id, leave_type, policy.annual_entitlement);
        balance.remaining = remaining;
        Ok(self.balances.open_account_seeded(balance)?)
    }

    /// Returns a snapshot of one balance account.
    #[must_use]
    pub fn balance(&self, employee_id: EmployeeId, leave_type: LeaveType) -> Option<LeaveBalance> {
        self.balances.get(employee_id, leave_type)
    }

    // ========================================================================
    // Leave requests
    // ========================================================================

    /// Creates a leave request with its resolved approval chain.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad date range or day count, a
    /// chain error when no rule matches, or a ledger error when the
    /// balance account is missing or too small.
    pub fn create_leave_request(
        &self,
        input: NewLeaveRequest,
    ) -> Result<LeaveRequest, EngineError> {
        if input.end_date < input.start_date {
            return Err(EngineError::Validation(format!(
                "end date {} is before start date {}",
                input.end_date, input.start_date
            )));
        }
        if !input.day_count.is_positive() {
            return Err(EngineError::Validation(format!(
                "day count must be positive, got {}",
                input.day_count
            )));
        }

        let available = self
            .balances
            .remaining(input.employee_id, input.leave_type)
            .ok_or(LedgerError::AccountNotFound {
                employee_id: input.employee_id,
                leave_type: input.leave_type,
            })?;
        if available < input.day_count {
            return Err(LedgerError::InsufficientBalance {
                requested: input.day_count,
                available,
            }
            .into());
        }

        let chain = self.chain.build(&input.placement, input.leave_type)?;

        let request = LeaveRequest {
            id: LeaveRequestId::new(),
            employee_id: input.employee_id,
            leave_type: input.leave_type,
            start_date: input.start_date,
            end_date: input.end_date,
            day_count: input.day_count,
            status: RequestStatus::Pending,
            completion_status: chain.completion_status,
            locked: false,
            deducted: false,
            steps: chain.steps,
            created_at: Utc::now(),
        };

        self.audit.record(
            AuditEntry::new(AuditEvent::RequestCreated, Some(input.employee_id))
                .with_after(&request)?,
        )?;
        self.requests.insert(request.id, request.clone());

        tracing::info!(
            request_id = %request.id,
            employee_id = %request.employee_id,
            leave_type = %request.leave_type,
            days = %request.day_count,
            "leave request created"
        );
        self.notify(&LeaveEvent::RequestSubmitted {
            request_id: request.id,
            employee_id: request.employee_id,
            leave_type: request.leave_type,
            day_count: request.day_count,
        });

        Ok(request)
    }

    /// Decides one approval step.
    ///
    /// If the decision finalizes the request into approved or recorded,
    /// the balance deduction happens before the request commits; an
    /// insufficient balance aborts the whole transition and the request
    /// stays pending at this level.
    ///
    /// # Errors
    ///
    /// Returns workflow errors for sequencing, permission, and state
    /// violations, a compliance error when the validator fails the
    /// request, or a ledger error when the deduction fails.
    pub fn decide(
        &self,
        request_id: LeaveRequestId,
        level: u8,
        decision: Decision,
        actor_id: EmployeeId,
        actor_role: ApproverRole,
        comments: Option<String>,
    ) -> Result<LeaveRequest, EngineError> {
        let mut entry = self
            .requests
            .get_mut(&request_id)
            .ok_or(WorkflowError::RequestNotFound(request_id))?;

        let outcome = ApprovalService::apply_decision(
            &entry,
            level,
            decision,
            actor_id,
            actor_role,
            comments,
            Utc::now(),
        )?;

        if decision == Decision::Approve {
            let report = self
                .compliance
                .validate_before_approval(&entry, actor_id, actor_role);
            if !report.valid {
                return Err(WorkflowError::Compliance {
                    errors: report.errors,
                }
                .into());
            }
        }

        let deducts = outcome.balance_effect == BalanceEffect::Deduct;
        if deducts {
            self.balances.deduct(
                entry.employee_id,
                entry.leave_type,
                entry.day_count,
                Utc::now().date_naive(),
                Some(actor_id),
            )?;
        }

        let before = entry.clone();
        let mut next = before.clone();
        next.steps = outcome.steps;
        next.status = outcome.status;
        if next.status.is_terminal() {
            next.locked = true;
        }
        if deducts {
            next.deducted = true;
        }

        let audited = (|| {
            self.audit.record(
                AuditEntry::new(AuditEvent::StepDecided, Some(actor_id))
                    .with_before(&before)?
                    .with_after(&next)?
                    .with_metadata(&serde_json::json!({
                        "level": level,
                        "decision": decision,
                    }))?,
            )
        })();
        if let Err(audit_err) = audited {
            if deducts {
                // Compensate the committed deduction.
                if let Err(restore_err) = self.balances.restore(
                    before.employee_id,
                    before.leave_type,
                    before.day_count,
                    Some(actor_id),
                ) {
                    tracing::error!(
                        request_id = %request_id,
                        error = %restore_err,
                        "failed to compensate deduction after audit failure"
                    );
                }
            }
            return Err(audit_err.into());
        }

        *entry = next.clone();
        drop(entry);

        tracing::info!(
            request_id = %request_id,
            level,
            status = %next.status,
            "approval step decided"
        );
        if next.status.is_terminal() {
            self.notify(&LeaveEvent::RequestFinalized {
                request_id: next.id,
                employee_id: next.employee_id,
                status: next.status,
            });
        }

        Ok(next)
    }

    /// Reverses a finalized approval: restores the deducted days and
    /// marks the request rejected. The only way to touch a locked
    /// request.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` for non-administrators,
    /// `ReversalReasonRequired` for an empty reason, `NotReversible` if
    /// the request never consumed balance, and an invariant violation if
    /// it claims approval without a recorded deduction.
    pub fn reverse_approval(
        &self,
        request_id: LeaveRequestId,
        actor_id: EmployeeId,
        actor_role: ApproverRole,
        reason: &str,
    ) -> Result<LeaveRequest, EngineError> {
        if actor_role != ApproverRole::Administrator {
            return Err(WorkflowError::PermissionDenied {
                actor_role,
                required_role: ApproverRole::Administrator,
            }
            .into());
        }
        if reason.trim().is_empty() {
            return Err(WorkflowError::ReversalReasonRequired.into());
        }

        let mut entry = self
            .requests
            .get_mut(&request_id)
            .ok_or(WorkflowError::RequestNotFound(request_id))?;

        if !entry.status.consumes_balance() {
            return Err(WorkflowError::NotReversible {
                request: request_id,
                status: entry.status,
            }
            .into());
        }
        if !entry.deducted {
            return Err(LedgerError::InvariantViolation(format!(
                "request {request_id} is {} but has no recorded deduction",
                entry.status
            ))
            .into());
        }

        self.balances.restore(
            entry.employee_id,
            entry.leave_type,
            entry.day_count,
            Some(actor_id),
        )?;

        let before = entry.clone();
        let mut next = before.clone();
        next.status = RequestStatus::Rejected;
        next.deducted = false;

        let audited = (|| {
            self.audit.record(
                AuditEntry::new(AuditEvent::ApprovalReversed, Some(actor_id))
                    .with_before(&before)?
                    .with_after(&next)?
                    .with_metadata(&serde_json::json!({ "reason": reason }))?,
            )
        })();
        if let Err(audit_err) = audited {
            // Compensate the committed restore.
            if let Err(deduct_err) = self.balances.deduct(
                before.employee_id,
                before.leave_type,
                before.day_count,
                Utc::now().date_naive(),
                Some(actor_id),
            ) {
                tracing::error!(
                    request_id = %request_id,
                    error = %deduct_err,
                    "failed to compensate restore after audit failure"
                );
            }
            return Err(audit_err.into());
        }

        *entry = next.clone();
        drop(entry);

        tracing::info!(request_id = %request_id, "approval reversed");
        self.notify(&LeaveEvent::ApprovalReversed {
            request_id: next.id,
            employee_id: next.employee_id,
            restored: next.day_count,
        });

        Ok(next)
    }

    /// Decides many requests, each at its own actionable level.
    ///
    /// Items succeed or fail independently; failures are reported with
    /// their typed error codes and never roll back the others.
    pub fn bulk_decide(
        &self,
        request_ids: &[LeaveRequestId],
        decision: Decision,
        actor_id: EmployeeId,
        actor_role: ApproverRole,
        comments: Option<String>,
    ) -> BulkOutcome {
        let mut outcome = BulkOutcome::empty();

        for &request_id in request_ids {
            let result = self.actionable_level(request_id).and_then(|level| {
                self.decide(
                    request_id,
                    level,
                    decision,
                    actor_id,
                    actor_role,
                    comments.clone(),
                )
            });

            match result {
                Ok(_) => outcome.record_success(request_id),
                Err(e) => {
                    tracing::warn!(
                        request_id = %request_id,
                        error = %e,
                        "bulk decision item failed"
                    );
                    outcome.record_failure(request_id, &e);
                }
            }
        }

        tracing::info!(
            processed = outcome.processed_count,
            failed = outcome.failed_count,
            "bulk decision finished"
        );
        outcome
    }

    /// Returns one request by ID.
    #[must_use]
    pub fn request(&self, request_id: LeaveRequestId) -> Option<LeaveRequest> {
        self.requests.get(&request_id).map(|r| r.clone())
    }

    /// Lists requests matching `filter`, newest first.
    #[must_use]
    pub fn list_requests(
        &self,
        filter: &RequestFilter,
        page: &PageRequest,
    ) -> PageResponse<LeaveRequest> {
        let mut matching: Vec<LeaveRequest> = self
            .requests
            .iter()
            .filter(|r| filter.employee_id.is_none_or(|id| r.employee_id == id))
            .filter(|r| filter.leave_type.is_none_or(|lt| r.leave_type == lt))
            .filter(|r| filter.status.is_none_or(|s| r.status == s))
            .map(|r| r.clone())
            .collect();

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.0.cmp(&b.id.0)));

        let total = matching.len() as u64;
        let data: Vec<LeaveRequest> = matching
            .into_iter()
            .skip(page.offset())
            .take(page.limit())
            .collect();

        PageResponse::new(data, page.page, page.per_page, total)
    }

    // ========================================================================
    // Settlement
    // ========================================================================

    /// Runs year-end settlement for `period` over every open account.
    ///
    /// # Errors
    ///
    /// Returns `PeriodAlreadySettled` for a repeat run.
    pub fn run_year_end_settlement(
        &self,
        period: SettlementPeriod,
    ) -> Result<SettlementSummary, EngineError> {
        let summary = self
            .settlement
            .run(period, &self.balances, &self.policies)?;
        self.notify(&LeaveEvent::SettlementCompleted {
            year: period.year(),
            settled_count: summary.settled_count,
        });
        Ok(summary)
    }

    // ========================================================================
    // Encashment
    // ========================================================================

    /// Creates an encashment request.
    ///
    /// # Errors
    ///
    /// Returns encashment validation errors, or a ledger error when the
    /// balance account is missing.
    pub fn create_encashment(
        &self,
        input: NewEncashment,
    ) -> Result<EncashmentRequest, EngineError> {
        let available = self
            .balances
            .remaining(input.employee_id, input.leave_type)
            .ok_or(LedgerError::AccountNotFound {
                employee_id: input.employee_id,
                leave_type: input.leave_type,
            })?;

        let request = EncashmentService::create(
            input.employee_id,
            input.leave_type,
            input.days,
            input.reason,
            input.reason_details,
            input.employment_status,
            available,
        )?;

        self.audit.record(
            AuditEntry::new(AuditEvent::EncashmentCreated, Some(input.employee_id))
                .with_after(&request)?,
        )?;
        self.encashments.insert(request.id, request.clone());

        tracing::info!(
            encashment_id = %request.id,
            employee_id = %request.employee_id,
            days = %request.days,
            reason = %request.reason,
            "encashment request created"
        );
        Ok(request)
    }

    /// Decides an encashment request. Approval re-validates the balance
    /// and deducts; rejection has no balance effect.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` for roles other than human resources
    /// and administrator, `AlreadyFinalized` for decided requests, and a
    /// ledger error when the deduction fails.
    pub fn decide_encashment(
        &self,
        encashment_id: EncashmentId,
        decision: Decision,
        actor_id: EmployeeId,
        actor_role: ApproverRole,
        amount: Option<Decimal>,
    ) -> Result<EncashmentRequest, EngineError> {
        // Not-found before permission, matching `decide`.
        let mut entry = self
            .encashments
            .get_mut(&encashment_id)
            .ok_or(crate::encashment::error::EncashmentError::NotFound(
                encashment_id,
            ))?;

        EncashmentService::check_decider(actor_role)?;

        let next = EncashmentService::apply_decision(&entry, decision, amount)?;

        let deducts = decision == Decision::Approve;
        if deducts {
            self.balances.deduct(
                entry.employee_id,
                entry.leave_type,
                entry.days,
                Utc::now().date_naive(),
                Some(actor_id),
            )?;
        }

        let before = entry.clone();
        let audited = (|| {
            self.audit.record(
                AuditEntry::new(AuditEvent::EncashmentDecided, Some(actor_id))
                    .with_before(&before)?
                    .with_after(&next)?,
            )
        })();
        if let Err(audit_err) = audited {
            if deducts {
                if let Err(restore_err) = self.balances.restore(
                    before.employee_id,
                    before.leave_type,
                    before.days,
                    Some(actor_id),
                ) {
                    tracing::error!(
                        encashment_id = %encashment_id,
                        error = %restore_err,
                        "failed to compensate deduction after audit failure"
                    );
                }
            }
            return Err(audit_err.into());
        }

        *entry = next.clone();
        drop(entry);

        tracing::info!(
            encashment_id = %encashment_id,
            status = %next.status,
            "encashment decided"
        );
        self.notify(&LeaveEvent::EncashmentDecided {
            encashment_id: next.id,
            employee_id: next.employee_id,
            status: next.status,
        });

        Ok(next)
    }

    /// Returns one encashment request by ID.
    #[must_use]
    pub fn encashment(&self, encashment_id: EncashmentId) -> Option<EncashmentRequest> {
        self.encashments.get(&encashment_id).map(|r| r.clone())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn actionable_level(&self, request_id: LeaveRequestId) -> Result<u8, EngineError> {
        let entry = self
            .requests
            .get(&request_id)
            .ok_or(WorkflowError::RequestNotFound(request_id))?;

        ApprovalService::actionable_level(&entry.steps).ok_or_else(|| {
            WorkflowError::AlreadyFinalized {
                request: request_id,
                status: entry.status,
            }
            .into()
        })
    }

    fn notify(&self, event: &LeaveEvent) {
        if let Err(e) = self.notifier.dispatch(event) {
            tracing::warn!(error = %e, "notification dispatch failed");
        }
    }
}

//! Property-based tests for the approval state machine.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;

use furlough_shared::types::{DayCount, EmployeeId, LeaveRequestId};

use crate::workflow::role::ApproverRole;
use crate::workflow::service::ApprovalService;
use crate::workflow::types::{
    ApprovalStep, Decision, LeaveRequest, LeaveType, RequestStatus, StepStatus,
};
use crate::workflow::error::WorkflowError;

fn step_status_strategy() -> impl Strategy<Value = StepStatus> {
    prop_oneof![
        Just(StepStatus::Pending),
        Just(StepStatus::Approved),
        Just(StepStatus::Rejected),
        Just(StepStatus::Skipped),
    ]
}

fn role_strategy() -> impl Strategy<Value = ApproverRole> {
    prop_oneof![
        Just(ApproverRole::Supervisor),
        Just(ApproverRole::UnitHead),
        Just(ApproverRole::DirectorateHead),
        Just(ApproverRole::HumanResources),
        Just(ApproverRole::SecretaryGeneral),
    ]
}

fn steps_strategy(max_len: usize) -> impl Strategy<Value = Vec<ApprovalStep>> {
    prop::collection::vec((step_status_strategy(), role_strategy()), 1..=max_len).prop_map(
        |entries| {
            entries
                .into_iter()
                .enumerate()
                .map(|(index, (status, role))| {
                    let mut step =
                        ApprovalStep::pending(u8::try_from(index + 1).unwrap_or(u8::MAX), role);
                    step.status = status;
                    step
                })
                .collect()
        },
    )
}

fn completion_strategy() -> impl Strategy<Value = RequestStatus> {
    prop_oneof![Just(RequestStatus::Approved), Just(RequestStatus::Recorded)]
}

fn pending_request(steps: Vec<ApprovalStep>) -> LeaveRequest {
    LeaveRequest {
        id: LeaveRequestId::new(),
        employee_id: EmployeeId::new(),
        leave_type: LeaveType::Annual,
        start_date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 6, 5).unwrap(),
        day_count: DayCount::whole(5),
        status: RequestStatus::Pending,
        completion_status: RequestStatus::Approved,
        locked: false,
        deducted: false,
        steps,
        created_at: Utc::now(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Aggregate status is a deterministic function of step statuses.
    #[test]
    fn prop_aggregate_is_deterministic(
        steps in steps_strategy(5),
        completion in completion_strategy(),
    ) {
        let first = ApprovalService::aggregate_status(&steps, completion);
        let second = ApprovalService::aggregate_status(&steps, completion);
        prop_assert_eq!(first, second);
    }

    /// Any rejected step forces the aggregate to rejected.
    #[test]
    fn prop_any_rejection_wins(
        steps in steps_strategy(5),
        completion in completion_strategy(),
    ) {
        prop_assume!(steps.iter().any(|s| s.status == StepStatus::Rejected));
        prop_assert_eq!(
            ApprovalService::aggregate_status(&steps, completion),
            RequestStatus::Rejected
        );
    }

    /// Every step approved or skipped yields the completion status.
    #[test]
    fn prop_all_satisfied_completes(
        steps in steps_strategy(5),
        completion in completion_strategy(),
    ) {
        prop_assume!(steps.iter().all(|s| s.status.is_satisfied()));
        prop_assert_eq!(
            ApprovalService::aggregate_status(&steps, completion),
            completion
        );
    }

    /// Anything else stays pending.
    #[test]
    fn prop_otherwise_pending(
        steps in steps_strategy(5),
        completion in completion_strategy(),
    ) {
        prop_assume!(!steps.iter().any(|s| s.status == StepStatus::Rejected));
        prop_assume!(!steps.iter().all(|s| s.status.is_satisfied()));
        prop_assert_eq!(
            ApprovalService::aggregate_status(&steps, completion),
            RequestStatus::Pending
        );
    }

    /// The actionable level is always a pending step with all lower
    /// levels terminal.
    #[test]
    fn prop_actionable_level_is_unblocked(steps in steps_strategy(5)) {
        if let Some(level) = ApprovalService::actionable_level(&steps) {
            let step = steps.iter().find(|s| s.level == level).expect("level exists");
            prop_assert_eq!(step.status, StepStatus::Pending);
            for lower in steps.iter().filter(|s| s.level < level) {
                prop_assert!(lower.status.is_terminal());
            }
        } else {
            prop_assert!(steps.iter().all(|s| s.status.is_terminal()));
        }
    }

    /// Deciding level N while level N-1 is pending always fails with a
    /// sequencing error, for every N > 1.
    #[test]
    fn prop_out_of_order_always_sequencing_error(
        len in 2usize..=5,
        offset in 1usize..=4,
    ) {
        let steps: Vec<ApprovalStep> = (1..=len)
            .map(|level| {
                ApprovalStep::pending(
                    u8::try_from(level).unwrap_or(u8::MAX),
                    ApproverRole::UnitHead,
                )
            })
            .collect();
        let request = pending_request(steps);

        let level = u8::try_from((offset % (len - 1)) + 2).unwrap_or(u8::MAX);
        prop_assume!(usize::from(level) <= len);

        let result = ApprovalService::apply_decision(
            &request,
            level,
            Decision::Approve,
            EmployeeId::new(),
            ApproverRole::Administrator,
            None,
            Utc::now(),
        );

        let is_sequencing = matches!(result, Err(WorkflowError::OutOfSequence { .. }));
        prop_assert!(is_sequencing);
    }

    /// A failed decision never mutates the request (pure function), and a
    /// successful one never leaves the decided step pending.
    #[test]
    fn prop_apply_decision_never_mutates_input(
        steps in steps_strategy(4),
        level in 1u8..=4,
    ) {
        let request = pending_request(steps);
        let before = request.clone();

        let result = ApprovalService::apply_decision(
            &request,
            level,
            Decision::Approve,
            EmployeeId::new(),
            ApproverRole::Administrator,
            None,
            Utc::now(),
        );

        prop_assert_eq!(&request, &before);
        if let Ok(outcome) = result {
            let decided = outcome.steps.iter().find(|s| s.level == level);
            prop_assert_eq!(
                decided.map(|s| s.status),
                Some(StepStatus::Approved)
            );
        }
    }
}

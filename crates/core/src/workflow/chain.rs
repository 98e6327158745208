//! Approval chain builder.
//!
//! Given an employee's organizational placement and a leave type, resolves
//! the ordered sequence of approval levels the request must pass through.
//! Routing is rule-table driven: rules are matched by grade and leave type,
//! and when several match, the one with the lowest priority value wins.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use furlough_shared::config::ChainRuleEntry;

use crate::workflow::role::{ApproverRole, EmployeeGrade};
use crate::workflow::types::{ApprovalStep, LeaveType, OrgPlacement, RequestStatus};

/// A routing rule mapping grades and leave types to an approval chain.
///
/// Empty `grades` or `leave_types` means the rule applies to all of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainRule {
    /// Employee grades this rule applies to (empty = all).
    pub grades: Vec<EmployeeGrade>,
    /// Leave types this rule applies to (empty = all).
    pub leave_types: Vec<LeaveType>,
    /// Ordered approver roles, one per level, lowest level first.
    pub levels: Vec<ApproverRole>,
    /// Terminal status once every level signs off.
    pub completion_status: RequestStatus,
    /// Priority for rule selection (lower = higher priority).
    pub priority: i16,
}

/// A resolved approval chain for one request.
#[derive(Debug, Clone)]
pub struct ApprovalChain {
    /// Pending steps, numbered ascending from 1.
    pub steps: Vec<ApprovalStep>,
    /// Terminal status once every step signs off.
    pub completion_status: RequestStatus,
}

/// Errors raised while resolving or loading chain rules.
#[derive(Debug, Error)]
pub enum ChainError {
    /// No rule matches the employee's grade and leave type.
    #[error("No approval chain configured for grade {grade} and leave type {leave_type}")]
    NoChainConfigured {
        /// The employee's grade.
        grade: EmployeeGrade,
        /// The requested leave type.
        leave_type: LeaveType,
    },

    /// A matching rule resolved to zero levels.
    #[error("Approval chain for grade {grade} has no levels")]
    EmptyChain {
        /// The employee's grade.
        grade: EmployeeGrade,
    },

    /// A configured name did not canonicalize to a known value.
    #[error("Unknown {kind} name in chain configuration: {name}")]
    UnknownName {
        /// What kind of name failed to parse ("role", "grade", ...).
        kind: &'static str,
        /// The offending configured value.
        name: String,
    },

    /// A rule's completion status is not a valid terminal outcome.
    #[error("Completion status must be 'approved' or 'recorded', got {0}")]
    InvalidCompletionStatus(String),
}

impl ChainError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        500
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        "CONFIGURATION_ERROR"
    }
}

/// Resolves approval chains from a rule table.
#[derive(Debug, Clone)]
pub struct ChainBuilder {
    rules: Vec<ChainRule>,
}

impl ChainBuilder {
    /// Creates a builder over an explicit rule table.
    #[must_use]
    pub fn new(rules: Vec<ChainRule>) -> Self {
        Self { rules }
    }

    /// Creates a builder with the standard directorate-hierarchy rules.
    ///
    /// - Staff and senior staff route through their unit head, then the
    ///   directorate head.
    /// - Unit heads route through the directorate head, then human resources.
    /// - Directors route directly to the secretary general.
    /// - The secretary general's own requests are logged by human resources
    ///   and complete as `Recorded`, not `Approved`.
    /// - Maternity and study leave add a human resources level for staff
    ///   grades (entitlement verification).
    #[must_use]
    pub fn with_default_rules() -> Self {
        Self::new(vec![
            ChainRule {
                grades: vec![EmployeeGrade::SecretaryGeneral],
                leave_types: vec![],
                levels: vec![ApproverRole::HumanResources],
                completion_status: RequestStatus::Recorded,
                priority: 5,
            },
            ChainRule {
                grades: vec![EmployeeGrade::Director],
                leave_types: vec![],
                levels: vec![ApproverRole::SecretaryGeneral],
                completion_status: RequestStatus::Approved,
                priority: 10,
            },
            ChainRule {
                grades: vec![EmployeeGrade::UnitHead],
                leave_types: vec![],
                levels: vec![ApproverRole::DirectorateHead, ApproverRole::HumanResources],
                completion_status: RequestStatus::Approved,
                priority: 20,
            },
            ChainRule {
                grades: vec![EmployeeGrade::Staff, EmployeeGrade::SeniorStaff],
                leave_types: vec![LeaveType::Maternity, LeaveType::Study],
                levels: vec![
                    ApproverRole::UnitHead,
                    ApproverRole::DirectorateHead,
                    ApproverRole::HumanResources,
                ],
                completion_status: RequestStatus::Approved,
                priority: 25,
            },
            ChainRule {
                grades: vec![EmployeeGrade::Staff, EmployeeGrade::SeniorStaff],
                leave_types: vec![],
                levels: vec![ApproverRole::UnitHead, ApproverRole::DirectorateHead],
                completion_status: RequestStatus::Approved,
                priority: 30,
            },
        ])
    }

    /// Canonicalizes configuration entries into a builder.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::UnknownName` for role, grade, or leave-type
    /// names that do not parse, and `ChainError::InvalidCompletionStatus`
    /// for a completion status outside `approved`/`recorded`.
    pub fn from_config(entries: &[ChainRuleEntry]) -> Result<Self, ChainError> {
        let mut rules = Vec::with_capacity(entries.len());

        for entry in entries {
            let grades = entry
                .grades
                .iter()
                .map(|name| {
                    EmployeeGrade::parse(name).ok_or_else(|| ChainError::UnknownName {
                        kind: "grade",
                        name: name.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let leave_types = entry
                .leave_types
                .iter()
                .map(|name| {
                    LeaveType::parse(name).ok_or_else(|| ChainError::UnknownName {
                        kind: "leave type",
                        name: name.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let levels = entry
                .levels
                .iter()
                .map(|name| {
                    ApproverRole::parse(name).ok_or_else(|| ChainError::UnknownName {
                        kind: "role",
                        name: name.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let completion_status = match RequestStatus::parse(&entry.completion_status) {
                Some(status) if status.consumes_balance() => status,
                _ => {
                    return Err(ChainError::InvalidCompletionStatus(
                        entry.completion_status.clone(),
                    ));
                }
            };

            rules.push(ChainRule {
                grades,
                leave_types,
                levels,
                completion_status,
                priority: entry.priority,
            });
        }

        Ok(Self::new(rules))
    }

    /// Resolves the approval chain for an employee and leave type.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::NoChainConfigured` when no rule matches, and
    /// `ChainError::EmptyChain` when the winning rule has zero levels.
    pub fn build(
        &self,
        placement: &OrgPlacement,
        leave_type: LeaveType,
    ) -> Result<ApprovalChain, ChainError> {
        let mut applicable: Vec<&ChainRule> = self
            .rules
            .iter()
            .filter(|r| r.grades.is_empty() || r.grades.contains(&placement.grade))
            .filter(|r| r.leave_types.is_empty() || r.leave_types.contains(&leave_type))
            .collect();

        // Sort by priority (lower = higher priority)
        applicable.sort_by_key(|r| r.priority);

        let rule = applicable
            .first()
            .ok_or(ChainError::NoChainConfigured {
                grade: placement.grade,
                leave_type,
            })?;

        if rule.levels.is_empty() {
            return Err(ChainError::EmptyChain {
                grade: placement.grade,
            });
        }

        let steps = rule
            .levels
            .iter()
            .enumerate()
            .map(|(index, role)| {
                let level = u8::try_from(index + 1).unwrap_or(u8::MAX);
                ApprovalStep::pending(level, *role)
            })
            .collect();

        Ok(ApprovalChain {
            steps,
            completion_status: rule.completion_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(grade: EmployeeGrade) -> OrgPlacement {
        OrgPlacement {
            grade,
            unit: "Registry".to_string(),
            directorate: "Corporate Services".to_string(),
        }
    }

    #[test]
    fn test_staff_annual_chain() {
        let builder = ChainBuilder::with_default_rules();
        let chain = builder
            .build(&placement(EmployeeGrade::Staff), LeaveType::Annual)
            .unwrap();

        assert_eq!(chain.steps.len(), 2);
        assert_eq!(chain.steps[0].level, 1);
        assert_eq!(chain.steps[0].approver_role, ApproverRole::UnitHead);
        assert_eq!(chain.steps[1].level, 2);
        assert_eq!(chain.steps[1].approver_role, ApproverRole::DirectorateHead);
        assert_eq!(chain.completion_status, RequestStatus::Approved);
    }

    #[test]
    fn test_staff_maternity_adds_hr_level() {
        let builder = ChainBuilder::with_default_rules();
        let chain = builder
            .build(&placement(EmployeeGrade::Staff), LeaveType::Maternity)
            .unwrap();

        assert_eq!(chain.steps.len(), 3);
        assert_eq!(chain.steps[2].approver_role, ApproverRole::HumanResources);
    }

    #[test]
    fn test_director_routes_to_secretary_general() {
        let builder = ChainBuilder::with_default_rules();
        let chain = builder
            .build(&placement(EmployeeGrade::Director), LeaveType::Annual)
            .unwrap();

        assert_eq!(chain.steps.len(), 1);
        assert_eq!(chain.steps[0].approver_role, ApproverRole::SecretaryGeneral);
        assert_eq!(chain.completion_status, RequestStatus::Approved);
    }

    #[test]
    fn test_most_senior_grade_completes_as_recorded() {
        let builder = ChainBuilder::with_default_rules();
        let chain = builder
            .build(&placement(EmployeeGrade::SecretaryGeneral), LeaveType::Annual)
            .unwrap();

        assert_eq!(chain.completion_status, RequestStatus::Recorded);
        assert_eq!(chain.steps.len(), 1);
    }

    #[test]
    fn test_every_default_chain_has_at_least_one_level() {
        let builder = ChainBuilder::with_default_rules();
        for grade in [
            EmployeeGrade::Staff,
            EmployeeGrade::SeniorStaff,
            EmployeeGrade::UnitHead,
            EmployeeGrade::Director,
            EmployeeGrade::SecretaryGeneral,
        ] {
            for leave_type in LeaveType::ALL {
                let chain = builder.build(&placement(grade), leave_type).unwrap();
                assert!(!chain.steps.is_empty());
            }
        }
    }

    #[test]
    fn test_no_rules_is_configuration_error() {
        let builder = ChainBuilder::new(vec![]);
        let err = builder
            .build(&placement(EmployeeGrade::Staff), LeaveType::Annual)
            .unwrap_err();
        assert!(matches!(err, ChainError::NoChainConfigured { .. }));
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_empty_levels_is_configuration_error() {
        let builder = ChainBuilder::new(vec![ChainRule {
            grades: vec![],
            leave_types: vec![],
            levels: vec![],
            completion_status: RequestStatus::Approved,
            priority: 1,
        }]);
        let err = builder
            .build(&placement(EmployeeGrade::Staff), LeaveType::Annual)
            .unwrap_err();
        assert!(matches!(err, ChainError::EmptyChain { .. }));
    }

    #[test]
    fn test_lower_priority_value_wins() {
        let builder = ChainBuilder::new(vec![
            ChainRule {
                grades: vec![],
                leave_types: vec![],
                levels: vec![ApproverRole::HumanResources],
                completion_status: RequestStatus::Approved,
                priority: 50,
            },
            ChainRule {
                grades: vec![],
                leave_types: vec![],
                levels: vec![ApproverRole::Supervisor],
                completion_status: RequestStatus::Approved,
                priority: 1,
            },
        ]);
        let chain = builder
            .build(&placement(EmployeeGrade::Staff), LeaveType::Sick)
            .unwrap();
        assert_eq!(chain.steps[0].approver_role, ApproverRole::Supervisor);
    }

    #[test]
    fn test_from_config_canonicalizes_names() {
        let entries = vec![ChainRuleEntry {
            grades: vec!["Senior Staff".to_string()],
            leave_types: vec!["ANNUAL".to_string()],
            levels: vec!["Unit Head".to_string(), "hr".to_string()],
            completion_status: "approved".to_string(),
            priority: 10,
        }];

        let builder = ChainBuilder::from_config(&entries).unwrap();
        let chain = builder
            .build(&placement(EmployeeGrade::SeniorStaff), LeaveType::Annual)
            .unwrap();
        assert_eq!(chain.steps.len(), 2);
        assert_eq!(chain.steps[1].approver_role, ApproverRole::HumanResources);
    }

    #[test]
    fn test_from_config_rejects_unknown_role() {
        let entries = vec![ChainRuleEntry {
            grades: vec![],
            leave_types: vec![],
            levels: vec!["payroll_officer".to_string()],
            completion_status: "approved".to_string(),
            priority: 1,
        }];

        let err = ChainBuilder::from_config(&entries).unwrap_err();
        assert!(matches!(err, ChainError::UnknownName { kind: "role", .. }));
    }

    #[test]
    fn test_from_config_rejects_pending_completion() {
        let entries = vec![ChainRuleEntry {
            grades: vec![],
            leave_types: vec![],
            levels: vec!["unit_head".to_string()],
            completion_status: "pending".to_string(),
            priority: 1,
        }];

        let err = ChainBuilder::from_config(&entries).unwrap_err();
        assert!(matches!(err, ChainError::InvalidCompletionStatus(_)));
    }
}

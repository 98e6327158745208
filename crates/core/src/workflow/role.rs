//! Approver roles and employee grades.
//!
//! The upstream systems this replaces compared roles as ad hoc strings with
//! many case variants. Here both hierarchies are closed enums with a single
//! canonicalization function at the boundary; unknown names fail parsing
//! instead of silently never matching.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role an approver holds in the organizational hierarchy.
///
/// Roles are ordered from lowest to highest privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApproverRole {
    /// Immediate supervisor of the requesting employee.
    Supervisor = 0,
    /// Head of the employee's unit.
    UnitHead = 1,
    /// Head of the employee's directorate.
    DirectorateHead = 2,
    /// Human resources officer.
    HumanResources = 3,
    /// The secretary general of the organization.
    SecretaryGeneral = 4,
    /// System administrator; may decide any approval level.
    Administrator = 5,
}

impl ApproverRole {
    /// Parse a role from a string, tolerating case and separator variants.
    pub fn parse(s: &str) -> Option<Self> {
        let canonical: String = s
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match canonical.as_str() {
            "supervisor" => Some(Self::Supervisor),
            "unithead" => Some(Self::UnitHead),
            "directoratehead" => Some(Self::DirectorateHead),
            "humanresources" | "hr" => Some(Self::HumanResources),
            "secretarygeneral" => Some(Self::SecretaryGeneral),
            "administrator" | "admin" => Some(Self::Administrator),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Supervisor => "supervisor",
            Self::UnitHead => "unit_head",
            Self::DirectorateHead => "directorate_head",
            Self::HumanResources => "human_resources",
            Self::SecretaryGeneral => "secretary_general",
            Self::Administrator => "administrator",
        }
    }

    /// Returns true if this role may decide a step assigned to `required`.
    ///
    /// A role satisfies its own steps; the administrator override satisfies
    /// every step.
    #[must_use]
    pub fn satisfies(&self, required: Self) -> bool {
        *self == required || *self == Self::Administrator
    }
}

impl fmt::Display for ApproverRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Grade of an employee in the civil-service rank structure.
///
/// Ordered from most junior to most senior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeGrade {
    /// Regular staff member.
    Staff = 0,
    /// Senior staff member.
    SeniorStaff = 1,
    /// Head of a unit.
    UnitHead = 2,
    /// Director of a directorate.
    Director = 3,
    /// The most senior grade; requests are recorded, not peer-approved.
    SecretaryGeneral = 4,
}

impl EmployeeGrade {
    /// Parse a grade from a string, tolerating case and separator variants.
    pub fn parse(s: &str) -> Option<Self> {
        let canonical: String = s
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match canonical.as_str() {
            "staff" => Some(Self::Staff),
            "seniorstaff" => Some(Self::SeniorStaff),
            "unithead" => Some(Self::UnitHead),
            "director" => Some(Self::Director),
            "secretarygeneral" => Some(Self::SecretaryGeneral),
            _ => None,
        }
    }

    /// Returns the string representation of the grade.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::SeniorStaff => "senior_staff",
            Self::UnitHead => "unit_head",
            Self::Director => "director",
            Self::SecretaryGeneral => "secretary_general",
        }
    }

    /// Returns true for the most senior grade.
    #[must_use]
    pub fn is_most_senior(&self) -> bool {
        matches!(self, Self::SecretaryGeneral)
    }
}

impl fmt::Display for EmployeeGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("supervisor", Some(ApproverRole::Supervisor))]
    #[case("UNIT_HEAD", Some(ApproverRole::UnitHead))]
    #[case("Unit Head", Some(ApproverRole::UnitHead))]
    #[case("unithead", Some(ApproverRole::UnitHead))]
    #[case("Directorate-Head", Some(ApproverRole::DirectorateHead))]
    #[case("HR", Some(ApproverRole::HumanResources))]
    #[case("admin", Some(ApproverRole::Administrator))]
    #[case("accountant", None)]
    fn test_role_parse_case_variants(#[case] input: &str, #[case] expected: Option<ApproverRole>) {
        assert_eq!(ApproverRole::parse(input), expected);
    }

    #[test]
    fn test_role_as_str_round_trip() {
        for role in [
            ApproverRole::Supervisor,
            ApproverRole::UnitHead,
            ApproverRole::DirectorateHead,
            ApproverRole::HumanResources,
            ApproverRole::SecretaryGeneral,
            ApproverRole::Administrator,
        ] {
            assert_eq!(ApproverRole::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_role_satisfies() {
        assert!(ApproverRole::UnitHead.satisfies(ApproverRole::UnitHead));
        assert!(ApproverRole::Administrator.satisfies(ApproverRole::UnitHead));
        assert!(ApproverRole::Administrator.satisfies(ApproverRole::SecretaryGeneral));
        assert!(!ApproverRole::SecretaryGeneral.satisfies(ApproverRole::UnitHead));
        assert!(!ApproverRole::UnitHead.satisfies(ApproverRole::DirectorateHead));
    }

    #[test]
    fn test_role_ordering() {
        assert!(ApproverRole::Supervisor < ApproverRole::UnitHead);
        assert!(ApproverRole::UnitHead < ApproverRole::DirectorateHead);
        assert!(ApproverRole::SecretaryGeneral < ApproverRole::Administrator);
    }

    #[test]
    fn test_grade_parse_variants() {
        assert_eq!(EmployeeGrade::parse("staff"), Some(EmployeeGrade::Staff));
        assert_eq!(
            EmployeeGrade::parse("Senior Staff"),
            Some(EmployeeGrade::SeniorStaff)
        );
        assert_eq!(
            EmployeeGrade::parse("SECRETARY_GENERAL"),
            Some(EmployeeGrade::SecretaryGeneral)
        );
        assert_eq!(EmployeeGrade::parse("intern"), None);
    }

    #[test]
    fn test_grade_most_senior() {
        assert!(EmployeeGrade::SecretaryGeneral.is_most_senior());
        assert!(!EmployeeGrade::Director.is_most_senior());
    }

    #[test]
    fn test_grade_as_str_round_trip() {
        for grade in [
            EmployeeGrade::Staff,
            EmployeeGrade::SeniorStaff,
            EmployeeGrade::UnitHead,
            EmployeeGrade::Director,
            EmployeeGrade::SecretaryGeneral,
        ] {
            assert_eq!(EmployeeGrade::parse(grade.as_str()), Some(grade));
        }
    }
}

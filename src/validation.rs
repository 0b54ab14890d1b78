//! Input validation.
//!
//! Every rule is checked independently and all violations are
//! collected.  Each violation names the field it belongs to, so
//! presentation layers can highlight fields without parsing message
//! text; [`map_messages_to_fields`] remains for callers that only
//! hold the message list.

use crate::models::{ErrorKind, FieldKey, RoiInput, ValidationError};
use std::collections::BTreeMap;

pub const USERS_NOT_POSITIVE: &str = "Please enter a valid number of users (must be greater than 0)";
pub const USERS_TOO_MANY: &str = "Number of users cannot exceed 1,000,000";

const MAX_USERS: f64 = 1_000_000.0;

/// A `0 <= value <= max` rule for one numeric field.
struct RangeRule {
    field: FieldKey,
    max: f64,
    max_kind: ErrorKind,
    negative: &'static str,
    too_high: &'static str,
}

const RANGE_RULES: &[RangeRule] = &[
    RangeRule {
        field: FieldKey::SalaryEmployee,
        max: 1_000_000.0,
        max_kind: ErrorKind::UnusuallyHigh,
        negative: "Employee salary cannot be negative",
        too_high: "Employee salary seems unusually high (over €1,000,000)",
    },
    RangeRule {
        field: FieldKey::SalaryAdmin,
        max: 1_000_000.0,
        max_kind: ErrorKind::UnusuallyHigh,
        negative: "Admin salary cannot be negative",
        too_high: "Admin salary seems unusually high (over €1,000,000)",
    },
    RangeRule {
        field: FieldKey::TimeAdminManualMins,
        max: 1440.0,
        max_kind: ErrorKind::ExceedsLimit,
        negative: "Admin time cannot be negative",
        too_high: "Admin time cannot exceed 24 hours (1440 minutes)",
    },
    RangeRule {
        field: FieldKey::TimeAdminHabitusMins,
        max: 1440.0,
        max_kind: ErrorKind::ExceedsLimit,
        negative: "Habitus admin time cannot be negative",
        too_high: "Habitus admin time cannot exceed 24 hours (1440 minutes)",
    },
    RangeRule {
        field: FieldKey::AssessmentsPerUser,
        max: 10.0,
        max_kind: ErrorKind::UnusuallyHigh,
        negative: "Assessments per user cannot be negative",
        too_high: "Assessments per user seems unusually high (over 10)",
    },
    RangeRule {
        field: FieldKey::AbsenceDays,
        max: 365.0,
        max_kind: ErrorKind::ExceedsLimit,
        negative: "Absence days cannot be negative",
        too_high: "Absence days cannot exceed 365 days per year",
    },
    RangeRule {
        field: FieldKey::PresenteeismHours,
        max: 40.0,
        max_kind: ErrorKind::ExceedsLimit,
        negative: "Presenteeism hours cannot be negative",
        too_high: "Presenteeism hours cannot exceed 40 hours per week",
    },
    RangeRule {
        field: FieldKey::DiscomfortRate,
        max: 1.0,
        max_kind: ErrorKind::ExceedsLimit,
        negative: "Discomfort rate cannot be negative",
        too_high: "Discomfort rate cannot exceed 100%",
    },
    RangeRule {
        field: FieldKey::ReferralRate,
        max: 1.0,
        max_kind: ErrorKind::ExceedsLimit,
        negative: "Referral rate cannot be negative",
        too_high: "Referral rate cannot exceed 100%",
    },
    RangeRule {
        field: FieldKey::AssessorCost,
        max: 10_000.0,
        max_kind: ErrorKind::UnusuallyHigh,
        negative: "Assessor cost cannot be negative",
        too_high: "Assessor cost seems unusually high (over €10,000)",
    },
    RangeRule {
        field: FieldKey::AssessorTimeHrs,
        max: 24.0,
        max_kind: ErrorKind::ExceedsLimit,
        negative: "Assessor time cannot be negative",
        too_high: "Assessor time cannot exceed 24 hours",
    },
];

impl RangeRule {
    fn check(&self, value: f64) -> Option<ValidationError> {
        if value < 0.0 {
            Some(ValidationError::new(self.field, ErrorKind::Negative, self.negative))
        } else if value > self.max {
            Some(ValidationError::new(self.field, self.max_kind, self.too_high))
        } else {
            None
        }
    }
}

fn check_users(users: f64) -> Option<ValidationError> {
    // NaN fails the first comparison and is reported as missing.
    if !(users > 0.0) {
        Some(ValidationError::new(FieldKey::Users, ErrorKind::NotPositive, USERS_NOT_POSITIVE))
    } else if users > MAX_USERS {
        Some(ValidationError::new(FieldKey::Users, ErrorKind::ExceedsLimit, USERS_TOO_MANY))
    } else {
        None
    }
}

/// Numeric value of `field`, or `None` for non-numeric fields and an
/// unset software-minutes override.
fn numeric_value(input: &RoiInput, field: FieldKey) -> Option<f64> {
    match field {
        FieldKey::Users => Some(input.users),
        FieldKey::SalaryEmployee => Some(input.salary_employee),
        FieldKey::SalaryAdmin => Some(input.salary_admin),
        FieldKey::TimeAdminManualMins => Some(input.time_admin_manual_mins),
        FieldKey::TimeAdminHabitusMins => input.time_admin_habitus_mins,
        FieldKey::AssessmentsPerUser => Some(input.assessments_per_user),
        FieldKey::AbsenceDays => Some(input.absence_days),
        FieldKey::PresenteeismHours => Some(input.presenteeism_hours),
        FieldKey::DiscomfortRate => Some(input.discomfort_rate),
        FieldKey::ReferralRate => Some(input.referral_rate),
        FieldKey::AssessorCost => Some(input.assessor_cost),
        FieldKey::AssessorTimeHrs => Some(input.assessor_time_hrs),
        FieldKey::Sector
        | FieldKey::UseAssessorCosts
        | FieldKey::AssessorType
        | FieldKey::Currency => None,
    }
}

/// Validates a whole input record.  An empty vector means valid.
pub fn validate(input: &RoiInput) -> Vec<ValidationError> {
    check_users(input.users)
        .into_iter()
        .chain(RANGE_RULES.iter().filter_map(|rule| {
            numeric_value(input, rule.field).and_then(|value| rule.check(value))
        }))
        .collect()
}

/// Validates a single field value as the user types.
///
/// Salary fields use a field-neutral wording here since the form shows
/// the message next to the field.  Fields without a rule return `None`.
pub fn validate_field(field: FieldKey, value: f64) -> Option<String> {
    match field {
        FieldKey::Users => check_users(value).map(|e| e.message),
        FieldKey::SalaryEmployee | FieldKey::SalaryAdmin => {
            if value < 0.0 {
                Some("Salary cannot be negative".to_string())
            } else if value > 1_000_000.0 {
                Some("Salary seems unusually high (over €1,000,000)".to_string())
            } else {
                None
            }
        }
        _ => RANGE_RULES
            .iter()
            .find(|rule| rule.field == field)
            .and_then(|rule| rule.check(value))
            .map(|e| e.message),
    }
}

/// Maps structured violations to the first message for each field.
pub fn field_errors(violations: &[ValidationError]) -> BTreeMap<FieldKey, String> {
    let mut map = BTreeMap::new();
    for violation in violations {
        map.entry(violation.field)
            .or_insert_with(|| violation.message.clone());
    }
    map
}

// Checked in order; "Habitus admin time" must precede "Admin time".
const MESSAGE_PHRASES: &[(&str, FieldKey)] = &[
    ("users", FieldKey::Users),
    ("Employee salary", FieldKey::SalaryEmployee),
    ("Admin salary", FieldKey::SalaryAdmin),
    ("Habitus admin time", FieldKey::TimeAdminHabitusMins),
    ("Admin time", FieldKey::TimeAdminManualMins),
    ("Assessments per user", FieldKey::AssessmentsPerUser),
    ("Absence days", FieldKey::AbsenceDays),
    ("Presenteeism hours", FieldKey::PresenteeismHours),
    ("Discomfort rate", FieldKey::DiscomfortRate),
    ("Referral rate", FieldKey::ReferralRate),
    ("Assessor cost", FieldKey::AssessorCost),
    ("Assessor time", FieldKey::AssessorTimeHrs),
];

/// Maps plain error messages to fields by matching fixed phrases.
/// Messages that match no phrase are dropped; `None` yields an empty
/// map.
pub fn map_messages_to_fields<S: AsRef<str>>(messages: Option<&[S]>) -> BTreeMap<FieldKey, String> {
    let mut map = BTreeMap::new();
    for message in messages.unwrap_or_default() {
        let message = message.as_ref();
        if let Some((_, field)) = MESSAGE_PHRASES
            .iter()
            .find(|(phrase, _)| message.contains(phrase))
        {
            map.entry(*field).or_insert_with(|| message.to_string());
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_input() -> RoiInput {
        RoiInput {
            users: 100.0,
            salary_employee: 65000.0,
            salary_admin: 45000.0,
            time_admin_manual_mins: 15.0,
            time_admin_habitus_mins: Some(8.0),
            assessments_per_user: 1.0,
            absence_days: 2.0,
            presenteeism_hours: 0.8,
            discomfort_rate: 0.10,
            referral_rate: 0.02,
            assessor_cost: 50.0,
            assessor_time_hrs: 1.0,
            ..RoiInput::default()
        }
    }

    fn messages(input: &RoiInput) -> Vec<String> {
        validate(input).into_iter().map(|e| e.message).collect()
    }

    #[test]
    fn test_valid_input_has_no_errors() {
        assert!(validate(&valid_input()).is_empty());
    }

    #[test]
    fn test_users_must_be_positive() {
        for users in [0.0, -10.0, f64::NAN] {
            let input = RoiInput { users, ..valid_input() };
            assert_eq!(messages(&input), vec![USERS_NOT_POSITIVE.to_string()]);
        }
    }

    #[test]
    fn test_negative_salaries_report_both_fields() {
        let input = RoiInput {
            salary_employee: -50000.0,
            salary_admin: -30000.0,
            ..valid_input()
        };
        let errors = validate(&input);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, FieldKey::SalaryEmployee);
        assert_eq!(errors[0].kind, ErrorKind::Negative);
        assert_eq!(errors[0].message, "Employee salary cannot be negative");
        assert_eq!(errors[1].message, "Admin salary cannot be negative");
    }

    #[test]
    fn test_extreme_values_are_all_collected() {
        let input = RoiInput {
            users: 2_000_000.0,
            salary_employee: 2_000_000.0,
            time_admin_manual_mins: 2000.0,
            absence_days: 400.0,
            presenteeism_hours: 50.0,
            discomfort_rate: 1.5,
            referral_rate: 1.2,
            ..valid_input()
        };
        assert_eq!(
            messages(&input),
            vec![
                USERS_TOO_MANY.to_string(),
                "Employee salary seems unusually high (over €1,000,000)".to_string(),
                "Admin time cannot exceed 24 hours (1440 minutes)".to_string(),
                "Absence days cannot exceed 365 days per year".to_string(),
                "Presenteeism hours cannot exceed 40 hours per week".to_string(),
                "Discomfort rate cannot exceed 100%".to_string(),
                "Referral rate cannot exceed 100%".to_string(),
            ]
        );
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let input = RoiInput {
            users: 1_000_000.0,
            salary_employee: 1_000_000.0,
            time_admin_manual_mins: 1440.0,
            assessments_per_user: 10.0,
            absence_days: 365.0,
            presenteeism_hours: 40.0,
            discomfort_rate: 1.0,
            referral_rate: 1.0,
            assessor_cost: 10_000.0,
            assessor_time_hrs: 24.0,
            ..valid_input()
        };
        assert!(validate(&input).is_empty());
    }

    #[test]
    fn test_assessor_and_habitus_rules() {
        let input = RoiInput {
            time_admin_habitus_mins: Some(-1.0),
            assessor_cost: 20_000.0,
            assessor_time_hrs: 30.0,
            ..valid_input()
        };
        let errors = validate(&input);
        let kinds: Vec<_> = errors.iter().map(|e| (e.field, e.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (FieldKey::TimeAdminHabitusMins, ErrorKind::Negative),
                (FieldKey::AssessorCost, ErrorKind::UnusuallyHigh),
                (FieldKey::AssessorTimeHrs, ErrorKind::ExceedsLimit),
            ]
        );
    }

    #[test]
    fn test_validate_field() {
        assert_eq!(validate_field(FieldKey::Users, -10.0).as_deref(), Some(USERS_NOT_POSITIVE));
        assert_eq!(validate_field(FieldKey::Users, 0.0).as_deref(), Some(USERS_NOT_POSITIVE));
        assert_eq!(validate_field(FieldKey::Users, 2_000_000.0).as_deref(), Some(USERS_TOO_MANY));
        assert_eq!(validate_field(FieldKey::Users, 100.0), None);

        assert_eq!(
            validate_field(FieldKey::SalaryEmployee, -50000.0).as_deref(),
            Some("Salary cannot be negative")
        );
        assert_eq!(
            validate_field(FieldKey::SalaryAdmin, 2_000_000.0).as_deref(),
            Some("Salary seems unusually high (over €1,000,000)")
        );
        assert_eq!(validate_field(FieldKey::SalaryEmployee, 65000.0), None);

        assert_eq!(
            validate_field(FieldKey::DiscomfortRate, -0.1).as_deref(),
            Some("Discomfort rate cannot be negative")
        );
        assert_eq!(
            validate_field(FieldKey::ReferralRate, 1.2).as_deref(),
            Some("Referral rate cannot exceed 100%")
        );
        assert_eq!(validate_field(FieldKey::DiscomfortRate, 0.1), None);
        assert_eq!(validate_field(FieldKey::Currency, 100.0), None);
    }

    #[test]
    fn test_field_errors_keeps_first_message() {
        let violations = vec![
            ValidationError::new(FieldKey::Users, ErrorKind::NotPositive, "first"),
            ValidationError::new(FieldKey::Users, ErrorKind::ExceedsLimit, "second"),
            ValidationError::new(FieldKey::AbsenceDays, ErrorKind::Negative, "absence"),
        ];
        let map = field_errors(&violations);
        assert_eq!(map.len(), 2);
        assert_eq!(map[&FieldKey::Users], "first");
        assert_eq!(map[&FieldKey::AbsenceDays], "absence");
    }

    #[test]
    fn test_map_messages_to_fields() {
        let errors = [
            "Employee salary cannot be negative",
            "Admin salary cannot be negative",
            "Discomfort rate cannot exceed 100%",
            "Number of users cannot exceed 1,000,000",
            "Habitus admin time cannot be negative",
            "Something unrelated",
        ];
        let map = map_messages_to_fields(Some(&errors[..]));
        assert_eq!(map.len(), 5);
        assert_eq!(map[&FieldKey::SalaryEmployee], "Employee salary cannot be negative");
        assert_eq!(map[&FieldKey::SalaryAdmin], "Admin salary cannot be negative");
        assert_eq!(map[&FieldKey::DiscomfortRate], "Discomfort rate cannot exceed 100%");
        assert_eq!(map[&FieldKey::Users], "Number of users cannot exceed 1,000,000");
        assert_eq!(
            map[&FieldKey::TimeAdminHabitusMins],
            "Habitus admin time cannot be negative"
        );
    }

    #[test]
    fn test_map_messages_handles_empty_and_absent() {
        let empty: [String; 0] = [];
        assert!(map_messages_to_fields(Some(&empty[..])).is_empty());
        assert!(map_messages_to_fields::<String>(None).is_empty());
    }

    #[test]
    fn test_every_validation_message_maps_back_to_its_field() {
        let input = RoiInput {
            users: -1.0,
            salary_employee: -1.0,
            salary_admin: -1.0,
            time_admin_manual_mins: -1.0,
            time_admin_habitus_mins: Some(-1.0),
            assessments_per_user: -1.0,
            absence_days: -1.0,
            presenteeism_hours: -1.0,
            discomfort_rate: -1.0,
            referral_rate: -1.0,
            assessor_cost: -1.0,
            assessor_time_hrs: -1.0,
            ..RoiInput::default()
        };
        let violations = validate(&input);
        let messages: Vec<String> = violations.iter().map(|v| v.message.clone()).collect();
        assert_eq!(map_messages_to_fields(Some(&messages[..])), field_errors(&violations));
    }
}

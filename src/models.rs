//! Data models for the ROI Engine.
//!
//! The `models` module defines the serialisable structs and enums
//! that make up the engine's input and output: the organisational
//! input record, the enumerations it draws from, validation errors
//! and the calculation result.  They derive `Serialize` and
//! `Deserialize` so that they can be transmitted over the HTTP API
//! or handed to a presentation layer unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Industry sector of the organisation.  Informational for the
/// engine's math; used by callers to pick sector defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Sector {
    Technology,
    Healthcare,
    Education,
    Manufacturing,
    #[serde(rename = "Financial Services")]
    FinancialServices,
    Retail,
    #[serde(rename = "Public Sector")]
    PublicSector,
    #[default]
    Other,
}

impl Sector {
    /// Every sector, in the order they are offered to users.
    pub const ALL: [Sector; 8] = [
        Sector::Technology,
        Sector::Healthcare,
        Sector::Education,
        Sector::Manufacturing,
        Sector::FinancialServices,
        Sector::Retail,
        Sector::PublicSector,
        Sector::Other,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Sector::Technology => "Technology",
            Sector::Healthcare => "Healthcare",
            Sector::Education => "Education",
            Sector::Manufacturing => "Manufacturing",
            Sector::FinancialServices => "Financial Services",
            Sector::Retail => "Retail",
            Sector::PublicSector => "Public Sector",
            Sector::Other => "Other",
        }
    }

    /// Looks a sector up by its display name.
    pub fn from_name(name: &str) -> Option<Sector> {
        Sector::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Who carries out professional DSE assessments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessorType {
    /// Internal staff; costed at the admin hourly rate.
    #[default]
    Internal,
    /// External consultants; costed per assessment.
    External,
}

/// Display currency.  This is a label only, no conversion is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "GBP")]
    Gbp,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Usd => "USD",
        }
    }
}

/// Which flow the caller is presenting.  Only affects display (the
/// quick flow caps the ROI shown), never the computed result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Quick,
    Advanced,
}

/// Input to the ROI engine.
///
/// One record per calculation.  Missing numeric fields deserialise as
/// zero, so an absent `users` count is reported as invalid rather
/// than rejected by the decoder.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiInput {
    /// Number of display screen equipment users.
    pub users: f64,
    pub sector: Sector,
    /// Average annual salary of DSE users.
    pub salary_employee: f64,
    /// Average annual salary of administrative staff.
    pub salary_admin: f64,
    /// Minutes of manual assessment administration per user per year.
    pub time_admin_manual_mins: f64,
    /// Minutes of administration per user per year with the software.
    /// `None` means "use the configured constant"; see
    /// [`RoiInput::normalized`].
    pub time_admin_habitus_mins: Option<f64>,
    pub assessments_per_user: f64,
    /// Absence days per year per affected user.
    pub absence_days: f64,
    /// Hours of reduced productivity per week per affected user.
    pub presenteeism_hours: f64,
    /// Fraction of users with musculoskeletal symptoms (0 to 1).
    pub discomfort_rate: f64,
    pub use_assessor_costs: bool,
    /// Fraction of users referred to a professional assessor (0 to 1).
    pub referral_rate: f64,
    pub assessor_type: AssessorType,
    /// Cost per assessment for external assessors.
    pub assessor_cost: f64,
    /// Hours per assessment for internal assessors.
    pub assessor_time_hrs: f64,
    pub currency: Currency,
}

impl RoiInput {
    /// Returns a copy with every optional field filled in, so that
    /// validation and calculation see the same fully populated record.
    pub fn normalized(&self, software_minutes_per_user: f64) -> RoiInput {
        let mut input = self.clone();
        if input.time_admin_habitus_mins.is_none() {
            input.time_admin_habitus_mins = Some(software_minutes_per_user);
        }
        input
    }

    /// Software administration minutes, falling back to `default` when
    /// the record has not been normalised.
    pub fn habitus_minutes_or(&self, default: f64) -> f64 {
        self.time_admin_habitus_mins.unwrap_or(default)
    }
}

/// Identifies a field of [`RoiInput`].  Used to key validation errors
/// and tooltips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Users,
    Sector,
    SalaryEmployee,
    SalaryAdmin,
    TimeAdminManualMins,
    TimeAdminHabitusMins,
    AssessmentsPerUser,
    AbsenceDays,
    PresenteeismHours,
    DiscomfortRate,
    UseAssessorCosts,
    ReferralRate,
    AssessorType,
    AssessorCost,
    AssessorTimeHrs,
    Currency,
}

impl FieldKey {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKey::Users => "users",
            FieldKey::Sector => "sector",
            FieldKey::SalaryEmployee => "salary_employee",
            FieldKey::SalaryAdmin => "salary_admin",
            FieldKey::TimeAdminManualMins => "time_admin_manual_mins",
            FieldKey::TimeAdminHabitusMins => "time_admin_habitus_mins",
            FieldKey::AssessmentsPerUser => "assessments_per_user",
            FieldKey::AbsenceDays => "absence_days",
            FieldKey::PresenteeismHours => "presenteeism_hours",
            FieldKey::DiscomfortRate => "discomfort_rate",
            FieldKey::UseAssessorCosts => "use_assessor_costs",
            FieldKey::ReferralRate => "referral_rate",
            FieldKey::AssessorType => "assessor_type",
            FieldKey::AssessorCost => "assessor_cost",
            FieldKey::AssessorTimeHrs => "assessor_time_hrs",
            FieldKey::Currency => "currency",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The rule a field broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing, zero or negative where a positive value is required.
    NotPositive,
    Negative,
    /// Above a hard physical limit (hours in a day, days in a year).
    ExceedsLimit,
    /// Above a plausibility threshold.
    UnusuallyHigh,
}

/// A single validation failure, tied to the field that caused it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: FieldKey,
    pub kind: ErrorKind,
    /// Human‑readable description shown next to the field.
    pub message: String,
}

impl ValidationError {
    pub fn new(field: FieldKey, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            message: message.into(),
        }
    }
}

/// Admin hours, absence days and assessor cost at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub admin_hours: f64,
    pub absence_days: f64,
    pub assessor_cost: f64,
}

/// Unrounded per-category savings for a validated input.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SavingsBreakdown {
    pub admin_hours_saved: f64,
    pub admin_saving: f64,
    pub affected_users: f64,
    pub absence_saving: f64,
    pub presenteeism_hours_saved: f64,
    pub presenteeism_saving: f64,
    pub assessor_cost_saving: f64,
    pub before: Snapshot,
    pub after: Snapshot,
}

/// Headline financial metrics derived from license cost and savings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_saving: f64,
    pub net_benefit: f64,
    pub roi_pct: f64,
    pub payback_months: f64,
}

/// The result of an ROI calculation.
///
/// An invalid result carries the error list and zeros in every
/// numeric field, so consumers can render it without special cases.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalculationResult {
    #[serde(rename = "isValid")]
    pub is_valid: bool,
    /// Validation messages, one per violated rule.
    pub errors: Vec<String>,
    /// The same failures in structured form.
    pub violations: Vec<ValidationError>,
    pub license_cost: f64,
    pub total_saving: f64,
    pub net_benefit: f64,
    pub roi_pct: f64,
    pub payback_months: f64,
    pub admin_saving: f64,
    pub absence_saving: f64,
    pub presenteeism_saving: f64,
    pub assessor_cost_saving: f64,
    pub before: Snapshot,
    pub after: Snapshot,
    pub price_per_user: f64,
}

impl CalculationResult {
    /// A zeroed result carrying the given validation failures.
    pub fn invalid(violations: Vec<ValidationError>) -> Self {
        Self {
            is_valid: false,
            errors: violations.iter().map(|v| v.message.clone()).collect(),
            violations,
            ..Self::default()
        }
    }

    /// All numeric fields, in declaration order.
    pub fn numeric_fields(&self) -> [f64; 16] {
        [
            self.license_cost,
            self.total_saving,
            self.net_benefit,
            self.roi_pct,
            self.payback_months,
            self.admin_saving,
            self.absence_saving,
            self.presenteeism_saving,
            self.assessor_cost_saving,
            self.before.admin_hours,
            self.before.absence_days,
            self.before.assessor_cost,
            self.after.admin_hours,
            self.after.absence_days,
            self.after.assessor_cost,
            self.price_per_user,
        ]
    }
}

/// One sector's default scenario, as produced by
/// [`compare_sectors`](crate::engine::compare_sectors).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorComparison {
    pub sector: Sector,
    pub result: CalculationResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_deserialize_as_zero() {
        let input: RoiInput = serde_json::from_value(json!({"sector": "Financial Services"})).unwrap();
        assert_eq!(input.users, 0.0);
        assert_eq!(input.sector, Sector::FinancialServices);
        assert_eq!(input.time_admin_habitus_mins, None);
        assert_eq!(input.currency, Currency::Eur);
    }

    #[test]
    fn test_normalized_fills_only_absent_software_minutes() {
        let input = RoiInput::default();
        assert_eq!(input.normalized(8.0).time_admin_habitus_mins, Some(8.0));

        let explicit = RoiInput {
            time_admin_habitus_mins: Some(0.0),
            ..RoiInput::default()
        };
        assert_eq!(explicit.normalized(8.0).time_admin_habitus_mins, Some(0.0));
    }

    #[test]
    fn test_invalid_result_is_zeroed() {
        let result = CalculationResult::invalid(vec![ValidationError::new(
            FieldKey::Users,
            ErrorKind::NotPositive,
            "bad users",
        )]);
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["bad users".to_string()]);
        assert!(result.numeric_fields().iter().all(|v| *v == 0.0));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["isValid"], json!(false));
        assert_eq!(value["violations"][0]["field"], json!("users"));
    }

    #[test]
    fn test_sector_comparison_serializes_sector_name() {
        let comparison = SectorComparison {
            sector: Sector::PublicSector,
            result: CalculationResult::default(),
        };
        let value = serde_json::to_value(&comparison).unwrap();
        assert_eq!(value["sector"], json!("Public Sector"));
        assert_eq!(value["result"]["isValid"], json!(false));
        let parsed: SectorComparison = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, comparison);
    }

    #[test]
    fn test_sector_names_round_trip() {
        for sector in Sector::ALL {
            assert_eq!(Sector::from_name(sector.name()), Some(sector));
        }
        assert_eq!(Sector::from_name("Aerospace"), None);
    }
}

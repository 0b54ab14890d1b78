//! Configuration table for the ROI engine.
//!
//! The `config` module holds the static data the engine depends on:
//! pricing tiers, numeric constants, sector defaults and the tooltip
//! and source-citation text consumed by presentation layers.  A
//! [`CalculatorConfig`] is immutable once built; it is passed by
//! reference to every calculation so that tests can supply alternate
//! tier or constant sets.  Tables may be loaded from a JSON file, in
//! which case they are checked with [`CalculatorConfig::check`] before
//! use.

use crate::error::ConfigError;
use crate::models::{AssessorType, Currency, FieldKey, RoiInput, Sector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Numeric constants used by the calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    /// Starting discomfort rate for a fresh input record.
    pub discomfort_rate: f64,
    pub manual_minutes_per_user: f64,
    /// Administration minutes per user with the software.  Used when
    /// an input does not override it.
    pub software_minutes_per_user: f64,
    /// Reduction applied to both absence and presenteeism.
    pub absence_reduction_pct: f64,
    /// Reduction in assessor referrals.
    pub assessment_reduction_pct: f64,
    pub presenteeism_hours: f64,
    pub working_weeks: f64,
    pub working_days: f64,
    /// Annual working hours.
    pub working_hours: f64,
    /// Highest ROI percentage shown in the quick flow.
    pub roi_cap_quick: f64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            discomfort_rate: 0.10,
            manual_minutes_per_user: 20.0,
            software_minutes_per_user: 8.0,
            absence_reduction_pct: 0.25,
            assessment_reduction_pct: 0.30,
            presenteeism_hours: 1.0,
            working_weeks: 48.0,
            working_days: 220.0,
            working_hours: 1680.0,
            roi_cap_quick: 500.0,
        }
    }
}

/// A volume-discount breakpoint: organisations with at least
/// `min_users` users pay `price` per user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingTier {
    pub min_users: f64,
    pub price: f64,
}

/// Sector-specific starting values for an input record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorDefaults {
    pub salary_employee: f64,
    pub salary_admin: f64,
    pub absence_days: f64,
    pub presenteeism_hours: f64,
    pub referral_rate: f64,
    pub assessor_type: AssessorType,
    pub assessor_cost: f64,
    pub assessor_time_hrs: f64,
    pub assessments_per_user: f64,
    pub time_admin_manual_mins: f64,
}

impl SectorDefaults {
    /// Overwrites the sector-controlled fields of `input`.
    pub fn apply_to(&self, input: &mut RoiInput) {
        input.salary_employee = self.salary_employee;
        input.salary_admin = self.salary_admin;
        input.absence_days = self.absence_days;
        input.presenteeism_hours = self.presenteeism_hours;
        input.referral_rate = self.referral_rate;
        input.assessor_type = self.assessor_type;
        input.assessor_cost = self.assessor_cost;
        input.assessor_time_hrs = self.assessor_time_hrs;
        input.assessments_per_user = self.assessments_per_user;
        input.time_admin_manual_mins = self.time_admin_manual_mins;
    }

    /// Returns whether `field` of `input` still holds this sector's
    /// value.  Fields the sector does not control are never defaults.
    pub fn matches(&self, input: &RoiInput, field: FieldKey) -> bool {
        match field {
            FieldKey::SalaryEmployee => input.salary_employee == self.salary_employee,
            FieldKey::SalaryAdmin => input.salary_admin == self.salary_admin,
            FieldKey::AbsenceDays => input.absence_days == self.absence_days,
            FieldKey::PresenteeismHours => input.presenteeism_hours == self.presenteeism_hours,
            FieldKey::ReferralRate => input.referral_rate == self.referral_rate,
            FieldKey::AssessorType => input.assessor_type == self.assessor_type,
            FieldKey::AssessorCost => input.assessor_cost == self.assessor_cost,
            FieldKey::AssessorTimeHrs => input.assessor_time_hrs == self.assessor_time_hrs,
            FieldKey::AssessmentsPerUser => input.assessments_per_user == self.assessments_per_user,
            FieldKey::TimeAdminManualMins => {
                input.time_admin_manual_mins == self.time_admin_manual_mins
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyInfo {
    pub code: Currency,
    pub symbol: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessorTypeInfo {
    pub value: AssessorType,
    pub label: String,
}

/// The full configuration table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    pub defaults: Defaults,
    /// Sorted ascending by `min_users`; the first tier starts at 0.
    pub pricing_tiers: Vec<PricingTier>,
    pub sector_defaults: BTreeMap<Sector, SectorDefaults>,
    pub currencies: Vec<CurrencyInfo>,
    pub assessor_types: Vec<AssessorTypeInfo>,
    /// Help text per input field.
    pub tooltips: BTreeMap<FieldKey, String>,
    /// Citations for the assumptions behind the defaults.
    pub sources: BTreeMap<String, String>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

#[allow(clippy::too_many_arguments)]
fn sector(
    salary_employee: f64,
    salary_admin: f64,
    absence_days: f64,
    presenteeism_hours: f64,
    referral_rate: f64,
    assessor_type: AssessorType,
    assessor_cost: f64,
    time_admin_manual_mins: f64,
) -> SectorDefaults {
    SectorDefaults {
        salary_employee,
        salary_admin,
        absence_days,
        presenteeism_hours,
        referral_rate,
        assessor_type,
        assessor_cost,
        assessor_time_hrs: 1.0,
        assessments_per_user: 1.0,
        time_admin_manual_mins,
    }
}

impl CalculatorConfig {
    /// The table the product ships with.
    pub fn builtin() -> Self {
        use AssessorType::{External, Internal};

        let pricing_tiers = [
            (0.0, 19.13),
            (500.0, 13.00),
            (800.0, 10.00),
            (1000.0, 8.83),
            (2000.0, 6.00),
            (5000.0, 3.60),
        ]
        .into_iter()
        .map(|(min_users, price)| PricingTier { min_users, price })
        .collect();

        let sector_defaults = BTreeMap::from([
            (Sector::Technology, sector(65000.0, 45000.0, 2.0, 0.8, 0.02, Internal, 50.0, 15.0)),
            (Sector::Healthcare, sector(55000.0, 40000.0, 3.0, 1.2, 0.05, External, 80.0, 25.0)),
            (Sector::Education, sector(42000.0, 38000.0, 2.5, 1.0, 0.03, Internal, 40.0, 20.0)),
            (Sector::Manufacturing, sector(48000.0, 35000.0, 3.5, 1.5, 0.04, External, 60.0, 30.0)),
            (Sector::FinancialServices, sector(75000.0, 50000.0, 1.8, 0.7, 0.02, Internal, 70.0, 18.0)),
            (Sector::Retail, sector(32000.0, 28000.0, 4.0, 1.8, 0.06, External, 45.0, 35.0)),
            (Sector::PublicSector, sector(45000.0, 40000.0, 3.2, 1.1, 0.04, Internal, 45.0, 22.0)),
            (Sector::Other, sector(50000.0, 40000.0, 2.5, 1.0, 0.03, Internal, 50.0, 20.0)),
        ]);

        let currencies = vec![
            CurrencyInfo { code: Currency::Eur, symbol: "€".into(), name: "Euro".into() },
            CurrencyInfo { code: Currency::Gbp, symbol: "£".into(), name: "British Pound".into() },
            CurrencyInfo { code: Currency::Usd, symbol: "$".into(), name: "US Dollar".into() },
        ];

        let assessor_types = vec![
            AssessorTypeInfo { value: Internal, label: "Internal Staff".into() },
            AssessorTypeInfo { value: External, label: "External Consultant".into() },
        ];

        let tooltips = [
            (FieldKey::Users, "Number of employees who use display screen equipment (DSE) in your organization"),
            (FieldKey::Sector, "Select your industry sector to apply relevant salary and health statistics defaults"),
            (FieldKey::SalaryEmployee, "Average annual salary of DSE users. Used to calculate absence and presenteeism costs"),
            (FieldKey::SalaryAdmin, "Average annual salary of administrative staff. Used to calculate admin time savings"),
            (FieldKey::TimeAdminManualMins, "Minutes spent per user per year on manual DSE assessment administration"),
            (FieldKey::TimeAdminHabitusMins, "Fixed at 8 minutes per user per year with Habitus software"),
            (FieldKey::AssessmentsPerUser, "Number of DSE assessments conducted per user per year (typically 1.0)"),
            (FieldKey::AbsenceDays, "Average days of absence per affected employee due to DSE-related issues"),
            (FieldKey::PresenteeismHours, "Hours per week of reduced productivity due to DSE discomfort"),
            (FieldKey::DiscomfortRate, "Percentage of DSE users who experience musculoskeletal symptoms"),
            (FieldKey::UseAssessorCosts, "Include savings from reduced need for professional DSE assessors"),
            (FieldKey::ReferralRate, "Percentage of users referred to professional DSE assessors"),
            (FieldKey::AssessorType, "Whether assessors are internal staff or external consultants"),
            (FieldKey::AssessorCost, "Cost per assessment session or hourly rate for external consultants"),
            (FieldKey::AssessorTimeHrs, "Time spent per internal assessment (hours)"),
            (FieldKey::Currency, "Select your preferred currency for all calculations. Note: This is symbolic only - no actual exchange rate conversion is applied."),
        ]
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect();

        let sources = [
            ("discomfort_rate", "HSE UK, EU-OSHA"),
            ("absence_days", "HSA, ESENER 2023"),
            ("presenteeism_hours", "CIPD"),
            ("time_admin_manual_mins", "Consultant average"),
            ("time_admin_habitus_mins", "Internal benchmark"),
            ("salary_data", "Industry averages, national statistics"),
            ("referral_rate", "Industry best practice"),
            ("assessor_costs", "Market research, consultant rates"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            defaults: Defaults::default(),
            pricing_tiers,
            sector_defaults,
            currencies,
            assessor_types,
            tooltips,
            sources,
        }
    }

    /// Checks the invariants the engine relies on.
    pub fn check(&self) -> Result<(), ConfigError> {
        let first = self
            .pricing_tiers
            .first()
            .ok_or_else(|| ConfigError::InvalidTable("no pricing tiers".into()))?;
        if first.min_users != 0.0 {
            return Err(ConfigError::InvalidTable(format!(
                "lowest pricing tier must start at 0 users, found {}",
                first.min_users
            )));
        }
        for pair in self.pricing_tiers.windows(2) {
            if !(pair[1].min_users > pair[0].min_users) {
                return Err(ConfigError::InvalidTable(format!(
                    "pricing tier minimums must be strictly increasing ({} then {})",
                    pair[0].min_users, pair[1].min_users
                )));
            }
        }
        if let Some(tier) = self
            .pricing_tiers
            .iter()
            .find(|t| !t.price.is_finite() || t.price < 0.0)
        {
            return Err(ConfigError::InvalidTable(format!(
                "pricing tier at {} users has invalid price {}",
                tier.min_users, tier.price
            )));
        }

        let d = &self.defaults;
        for (name, value) in [
            ("working_hours", d.working_hours),
            ("working_days", d.working_days),
            ("working_weeks", d.working_weeks),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::InvalidTable(format!(
                    "{name} must be a positive number, found {value}"
                )));
            }
        }
        for (name, value) in [
            ("absence_reduction_pct", d.absence_reduction_pct),
            ("assessment_reduction_pct", d.assessment_reduction_pct),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidTable(format!(
                    "{name} must be between 0 and 1, found {value}"
                )));
            }
        }
        if !(0.0..=1440.0).contains(&d.software_minutes_per_user) {
            return Err(ConfigError::InvalidTable(format!(
                "software_minutes_per_user must be between 0 and 1440, found {}",
                d.software_minutes_per_user
            )));
        }
        if !d.roi_cap_quick.is_finite() || d.roi_cap_quick < 0.0 {
            return Err(ConfigError::InvalidTable(format!(
                "roi_cap_quick must be a non-negative number, found {}",
                d.roi_cap_quick
            )));
        }
        Ok(())
    }

    pub fn sector_defaults(&self, sector: Sector) -> Option<&SectorDefaults> {
        self.sector_defaults.get(&sector)
    }

    /// Overlays `sector`'s defaults onto `input` and selects that
    /// sector.  Other fields, including `users`, are kept.
    pub fn apply_sector_defaults(&self, input: &RoiInput, sector: Sector) -> RoiInput {
        let mut next = input.clone();
        next.sector = sector;
        match self.sector_defaults(sector) {
            Some(defaults) => defaults.apply_to(&mut next),
            None => warn!(%sector, "no defaults configured for sector"),
        }
        next
    }

    /// Re-applies the defaults of the input's current sector, keeping
    /// the user count and sector.
    pub fn reset_to_sector_defaults(&self, input: &RoiInput) -> RoiInput {
        self.apply_sector_defaults(input, input.sector)
    }

    pub fn is_sector_default(&self, input: &RoiInput, field: FieldKey) -> bool {
        self.sector_defaults(input.sector)
            .map(|defaults| defaults.matches(input, field))
            .unwrap_or(false)
    }

    /// A fresh input record for `users` users in `sector`, with
    /// assessor costs disabled.
    pub fn input_for_sector(&self, users: f64, sector: Sector) -> RoiInput {
        let base = RoiInput {
            users,
            discomfort_rate: self.defaults.discomfort_rate,
            presenteeism_hours: self.defaults.presenteeism_hours,
            time_admin_manual_mins: self.defaults.manual_minutes_per_user,
            ..RoiInput::default()
        };
        self.apply_sector_defaults(&base, sector)
    }
}

/// Load a configuration table from a JSON file and check it.
pub fn load_config_from_file(path: &Path) -> Result<CalculatorConfig, ConfigError> {
    let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config: CalculatorConfig =
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    config.check()?;
    debug!(
        path = %path.display(),
        tiers = config.pricing_tiers.len(),
        sectors = config.sector_defaults.len(),
        "loaded configuration table"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_table_passes_checks() {
        let config = CalculatorConfig::builtin();
        assert!(config.check().is_ok());
        assert_eq!(config.sector_defaults.len(), Sector::ALL.len());
        assert_eq!(config.pricing_tiers[0].min_users, 0.0);
    }

    #[test]
    fn test_check_rejects_unsorted_tiers() {
        let mut config = CalculatorConfig::builtin();
        config.pricing_tiers.swap(1, 2);
        let err = config.check().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTable(_)));
    }

    #[test]
    fn test_check_rejects_missing_floor_tier() {
        let mut config = CalculatorConfig::builtin();
        config.pricing_tiers.remove(0);
        assert!(config.check().is_err());

        config.pricing_tiers.clear();
        assert!(config.check().is_err());
    }

    #[test]
    fn test_check_rejects_zero_working_hours() {
        let mut config = CalculatorConfig::builtin();
        config.defaults.working_hours = 0.0;
        assert!(config.check().is_err());
    }

    #[test]
    fn test_check_rejects_out_of_range_software_minutes() {
        for minutes in [-5.0, 1441.0, f64::NAN, f64::INFINITY] {
            let mut config = CalculatorConfig::builtin();
            config.defaults.software_minutes_per_user = minutes;
            let err = config.check().unwrap_err();
            assert!(err.to_string().contains("software_minutes_per_user"));
        }
        let mut config = CalculatorConfig::builtin();
        config.defaults.software_minutes_per_user = 0.0;
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_check_rejects_bad_roi_cap() {
        for cap in [-1.0, f64::NAN, f64::INFINITY] {
            let mut config = CalculatorConfig::builtin();
            config.defaults.roi_cap_quick = cap;
            let err = config.check().unwrap_err();
            assert!(err.to_string().contains("roi_cap_quick"));
        }
    }

    #[test]
    fn test_apply_sector_defaults_keeps_users() {
        let config = CalculatorConfig::builtin();
        let input = RoiInput {
            users: 250.0,
            discomfort_rate: 0.2,
            ..RoiInput::default()
        };
        let next = config.apply_sector_defaults(&input, Sector::Healthcare);
        assert_eq!(next.users, 250.0);
        assert_eq!(next.sector, Sector::Healthcare);
        assert_eq!(next.salary_employee, 55000.0);
        assert_eq!(next.assessor_type, AssessorType::External);
        assert_eq!(next.discomfort_rate, 0.2);
    }

    #[test]
    fn test_reset_and_is_sector_default() {
        let config = CalculatorConfig::builtin();
        let mut input = config.input_for_sector(100.0, Sector::Retail);
        assert!(config.is_sector_default(&input, FieldKey::SalaryEmployee));
        assert!(!config.is_sector_default(&input, FieldKey::DiscomfortRate));

        input.salary_employee = 1.0;
        input.users = 42.0;
        assert!(!config.is_sector_default(&input, FieldKey::SalaryEmployee));

        let reset = config.reset_to_sector_defaults(&input);
        assert_eq!(reset.users, 42.0);
        assert_eq!(reset.salary_employee, 32000.0);
        assert!(config.is_sector_default(&reset, FieldKey::SalaryEmployee));
    }

    #[test]
    fn test_table_survives_json() {
        let config = CalculatorConfig::builtin();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: CalculatorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_config_from_file_reports_missing_file() {
        let err = load_config_from_file(Path::new("/nonexistent/roi-config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}

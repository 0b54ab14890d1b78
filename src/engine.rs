//! ROI computation engine.
//!
//! The `engine` module turns a [`RoiInput`] into a
//! [`CalculationResult`].  A calculation is a pure function of the
//! input and a shared, read-only [`CalculatorConfig`]: the input is
//! normalised, validated, then priced and broken down into savings
//! categories before the headline metrics are derived.  Independent
//! calculations can be run in parallel with [`rayon`] through
//! [`calculate_batch`] and [`compare_sectors`].

use crate::config::CalculatorConfig;
use crate::models::{
    AssessorType, CalculationResult, FinancialSummary, Mode, RoiInput, SavingsBreakdown, Sector,
    SectorComparison, Snapshot,
};
use crate::pricing::resolve_price_per_user;
use crate::validation::validate;
use rayon::prelude::*;
use tracing::debug;

/// Rounds to two decimal places, halves upward.  Non-finite values
/// become 0.
pub fn safe_round(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let rounded = (value * 100.0 + 0.5).floor() / 100.0;
    if rounded.is_finite() {
        rounded
    } else {
        0.0
    }
}

/// Caps an ROI percentage for display in the quick flow.  The advanced
/// flow shows the raw figure.
pub fn apply_roi_cap(roi_pct: f64, mode: Mode, config: &CalculatorConfig) -> f64 {
    match mode {
        Mode::Quick => roi_pct.min(config.defaults.roi_cap_quick),
        Mode::Advanced => roi_pct,
    }
}

/// Computes the per-category savings of an already validated input.
pub fn compute_savings(input: &RoiInput, config: &CalculatorConfig) -> SavingsBreakdown {
    let d = &config.defaults;
    let software_minutes = input.habitus_minutes_or(d.software_minutes_per_user);

    let hourly_admin_cost = input.salary_admin / d.working_hours;
    let hourly_employee_cost = input.salary_employee / d.working_hours;
    let day_cost = input.salary_employee / d.working_days;

    // Admin time
    let assessments = input.users * input.assessments_per_user;
    let manual_admin_hours = assessments * input.time_admin_manual_mins / 60.0;
    let habitus_admin_hours = assessments * software_minutes / 60.0;
    let admin_hours_saved = (manual_admin_hours - habitus_admin_hours).max(0.0);
    let admin_saving = admin_hours_saved * hourly_admin_cost;

    // Absence and presenteeism share the same reduction factor.
    let affected = input.users * input.discomfort_rate;
    let absence_days_before = affected * input.absence_days;
    let absence_saving = absence_days_before * day_cost * d.absence_reduction_pct;
    let presenteeism_hours_saved =
        affected * input.presenteeism_hours * d.working_weeks * d.absence_reduction_pct;
    let presenteeism_saving = presenteeism_hours_saved * hourly_employee_cost;

    let (assessor_before, assessor_after) = if input.use_assessor_costs {
        let referred = input.users * input.referral_rate;
        let cost_per_assessment = match input.assessor_type {
            AssessorType::Internal => input.assessor_time_hrs * hourly_admin_cost,
            AssessorType::External => input.assessor_cost,
        };
        let before = referred * cost_per_assessment;
        (before, before * (1.0 - d.assessment_reduction_pct))
    } else {
        (0.0, 0.0)
    };

    SavingsBreakdown {
        admin_hours_saved,
        admin_saving,
        affected_users: affected,
        absence_saving,
        presenteeism_hours_saved,
        presenteeism_saving,
        assessor_cost_saving: assessor_before - assessor_after,
        before: Snapshot {
            admin_hours: manual_admin_hours,
            absence_days: absence_days_before,
            assessor_cost: assessor_before,
        },
        after: Snapshot {
            admin_hours: habitus_admin_hours,
            absence_days: absence_days_before * (1.0 - d.absence_reduction_pct),
            assessor_cost: assessor_after,
        },
    }
}

/// Derives the headline metrics.  Assessor savings count as a savings
/// category.  ROI is 0 when there is no license cost and payback is 0
/// when there are no savings.
pub fn summarize(
    license_cost: f64,
    admin_saving: f64,
    absence_saving: f64,
    presenteeism_saving: f64,
    assessor_saving: f64,
) -> FinancialSummary {
    let total_saving = admin_saving + absence_saving + presenteeism_saving + assessor_saving;
    let net_benefit = total_saving - license_cost;
    let roi_pct = if license_cost > 0.0 {
        net_benefit / license_cost * 100.0
    } else {
        0.0
    };
    let payback_months = if total_saving > 0.0 {
        license_cost / (total_saving / 12.0)
    } else {
        0.0
    };
    FinancialSummary {
        total_saving,
        net_benefit,
        roi_pct,
        payback_months,
    }
}

fn round_snapshot(snapshot: Snapshot) -> Snapshot {
    Snapshot {
        admin_hours: safe_round(snapshot.admin_hours),
        absence_days: safe_round(snapshot.absence_days),
        assessor_cost: safe_round(snapshot.assessor_cost),
    }
}

/// Runs a full ROI calculation.
///
/// Never panics for any input: invalid records produce a zeroed result
/// carrying every validation error.
pub fn calculate(input: &RoiInput, config: &CalculatorConfig) -> CalculationResult {
    let input = input.normalized(config.defaults.software_minutes_per_user);

    let violations = validate(&input);
    if !violations.is_empty() {
        debug!(errors = violations.len(), "rejected ROI input");
        return CalculationResult::invalid(violations);
    }

    let savings = compute_savings(&input, config);
    let price_per_user = resolve_price_per_user(&config.pricing_tiers, input.users);
    let license_cost = input.users * price_per_user;
    let summary = summarize(
        license_cost,
        savings.admin_saving,
        savings.absence_saving,
        savings.presenteeism_saving,
        savings.assessor_cost_saving,
    );
    debug!(
        users = input.users,
        sector = %input.sector,
        license_cost,
        total_saving = summary.total_saving,
        roi_pct = summary.roi_pct,
        "calculated ROI"
    );

    CalculationResult {
        is_valid: true,
        errors: Vec::new(),
        violations: Vec::new(),
        license_cost: safe_round(license_cost),
        total_saving: safe_round(summary.total_saving),
        net_benefit: safe_round(summary.net_benefit),
        roi_pct: safe_round(summary.roi_pct),
        payback_months: safe_round(summary.payback_months),
        admin_saving: safe_round(savings.admin_saving),
        absence_saving: safe_round(savings.absence_saving),
        presenteeism_saving: safe_round(savings.presenteeism_saving),
        assessor_cost_saving: safe_round(savings.assessor_cost_saving),
        before: round_snapshot(savings.before),
        after: round_snapshot(savings.after),
        price_per_user: safe_round(price_per_user),
    }
}

/// Calculates independent inputs in parallel.  Results are returned in
/// input order.
pub fn calculate_batch(inputs: &[RoiInput], config: &CalculatorConfig) -> Vec<CalculationResult> {
    inputs
        .par_iter()
        .map(|input| calculate(input, config))
        .collect()
}

/// Calculates every sector's default scenario at the given headcount.
pub fn compare_sectors(users: f64, config: &CalculatorConfig) -> Vec<SectorComparison> {
    Sector::ALL
        .par_iter()
        .map(|&sector| SectorComparison {
            sector,
            result: calculate(&config.input_for_sector(users, sector), config),
        })
        .collect()
}

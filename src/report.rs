//! Lead-capture report.
//!
//! [`RoiReport`] is the document model behind the exported PDF: every
//! figure is already formatted, so a renderer only lays it out.  The
//! `Display` implementation gives a plain-text rendition.

use crate::config::CalculatorConfig;
use crate::error::ReportError;
use crate::format::{display_roi, format_currency, format_months, format_percentage};
use crate::models::{CalculationResult, Mode, RoiInput};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const REPORT_TITLE: &str = "DSE ROI Analysis Report";

pub const DISCLAIMER: &str = "This calculator provides an ROI estimate based on configurable \
assumptions and inputs. Figures are illustrative only and do not constitute financial advice \
or guarantee. Actual results may vary. Habitus Health Ltd. accepts no liability for business \
decisions made based on this tool.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLine {
    pub label: String,
    pub value: String,
}

impl ReportLine {
    fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

/// A before/after row.  `improvement_pct` is the relative reduction,
/// 0 when there was nothing to reduce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub metric: String,
    pub before: String,
    pub after: String,
    pub improvement_pct: f64,
}

impl ComparisonRow {
    fn new(metric: &str, before: f64, after: f64, render: impl Fn(f64) -> String) -> Self {
        let improvement_pct = if before > 0.0 {
            (before - after) / before * 100.0
        } else {
            0.0
        };
        Self {
            metric: metric.to_string(),
            before: render(before),
            after: render(after),
            improvement_pct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumption {
    pub label: String,
    pub value: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiReport {
    pub client_name: String,
    pub title: String,
    pub subtitle: String,
    pub mode: Mode,
    pub headline: Vec<ReportLine>,
    pub comparison: Vec<ComparisonRow>,
    /// Non-zero savings categories only.
    pub savings: Vec<ReportLine>,
    pub assumptions: Vec<Assumption>,
    pub summary: String,
    pub disclaimer: String,
}

impl RoiReport {
    /// Builds a report for a client from an input and its result.
    pub fn build(
        client_name: &str,
        input: &RoiInput,
        result: &CalculationResult,
        mode: Mode,
        config: &CalculatorConfig,
    ) -> Result<Self, ReportError> {
        let client_name = client_name.trim();
        if client_name.is_empty() {
            return Err(ReportError::MissingClientName);
        }
        if !result.is_valid {
            return Err(ReportError::InvalidInputs(result.errors.clone()));
        }

        let code = input.currency.code();
        let money = |amount: f64| format_currency(amount, code, config);
        let roi = display_roi(result.roi_pct, mode, config);
        let payback = format_months(result.payback_months);

        let headline = vec![
            ReportLine::new("Annual Savings", money(result.total_saving)),
            ReportLine::new("License Cost", money(result.license_cost)),
            ReportLine::new("ROI", roi.clone()),
            ReportLine::new("Payback", payback.clone()),
        ];

        let comparison = vec![
            ComparisonRow::new(
                "Admin Hours",
                result.before.admin_hours,
                result.after.admin_hours,
                |v| format!("{v:.1} hrs"),
            ),
            ComparisonRow::new(
                "Absence Days",
                result.before.absence_days,
                result.after.absence_days,
                |v| format!("{v:.1} days"),
            ),
            ComparisonRow::new(
                "Assessor Cost",
                result.before.assessor_cost,
                result.after.assessor_cost,
                money,
            ),
        ];

        let savings = [
            ("Admin Time Savings", result.admin_saving),
            ("Absence Reduction", result.absence_saving),
            ("Presenteeism Reduction", result.presenteeism_saving),
            ("Assessor Cost Savings", result.assessor_cost_saving),
        ]
        .into_iter()
        .filter(|(_, amount)| *amount > 0.0)
        .map(|(label, amount)| ReportLine::new(label, money(amount)))
        .chain(std::iter::once(ReportLine::new(
            "Total Annual Savings",
            money(result.total_saving),
        )))
        .collect();

        let summary = format!(
            "With Habitus Health, you can expect to save {} annually while achieving a {} ROI \
             and {} payback period.",
            money(result.total_saving),
            roi,
            payback
        );

        Ok(Self {
            client_name: client_name.to_string(),
            title: REPORT_TITLE.to_string(),
            subtitle: format!("Based on {} DSE users in {} sector", input.users, input.sector),
            mode,
            headline,
            comparison,
            savings,
            assumptions: assumptions(input, config),
            summary,
            disclaimer: DISCLAIMER.to_string(),
        })
    }
}

fn assumptions(input: &RoiInput, config: &CalculatorConfig) -> Vec<Assumption> {
    let source = |key: &str| config.sources.get(key).cloned().unwrap_or_default();
    let software_minutes = input.habitus_minutes_or(config.defaults.software_minutes_per_user);

    let mut list = vec![
        Assumption {
            label: "Discomfort Rate".into(),
            value: format_percentage(input.discomfort_rate * 100.0),
            source: source("discomfort_rate"),
        },
        Assumption {
            label: "Absence Days".into(),
            value: format!("{} days", input.absence_days),
            source: source("absence_days"),
        },
        Assumption {
            label: "Presenteeism Hours".into(),
            value: format!("{} hrs/week", input.presenteeism_hours),
            source: source("presenteeism_hours"),
        },
        Assumption {
            label: "Admin Time (Manual)".into(),
            value: format!("{} mins", input.time_admin_manual_mins),
            source: source("time_admin_manual_mins"),
        },
        Assumption {
            label: "Admin Time (Habitus)".into(),
            value: format!("{software_minutes} mins"),
            source: source("time_admin_habitus_mins"),
        },
        Assumption {
            label: "Working Hours/Year".into(),
            value: format!("{} hours", config.defaults.working_hours),
            source: "Standard working year".into(),
        },
    ];
    if input.use_assessor_costs {
        list.push(Assumption {
            label: "Referral Rate".into(),
            value: format_percentage(input.referral_rate * 100.0),
            source: source("referral_rate"),
        });
        list.push(Assumption {
            label: "Assessor Costs".into(),
            value: format_currency(input.assessor_cost, input.currency.code(), config),
            source: source("assessor_costs"),
        });
    }
    list
}

impl fmt::Display for RoiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.subtitle)?;
        writeln!(f, "Client: {}", self.client_name)?;
        writeln!(f)?;
        for line in &self.headline {
            writeln!(f, "{}: {}", line.label, line.value)?;
        }

        writeln!(f)?;
        writeln!(f, "Before vs After Implementation")?;
        for row in &self.comparison {
            let sign = if row.improvement_pct > 0.0 { "+" } else { "" };
            writeln!(
                f,
                "  {}: {} -> {} ({sign}{:.1}%)",
                row.metric, row.before, row.after, row.improvement_pct
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Savings Breakdown")?;
        for line in &self.savings {
            writeln!(f, "  {}: {}", line.label, line.value)?;
        }

        writeln!(f)?;
        writeln!(f, "Assumptions & Sources")?;
        for a in &self.assumptions {
            writeln!(f, "  {}: {} (Source: {})", a.label, a.value, a.source)?;
        }

        writeln!(f)?;
        writeln!(f, "{}", self.summary)?;
        writeln!(f)?;
        write!(f, "{}", self.disclaimer)
    }
}

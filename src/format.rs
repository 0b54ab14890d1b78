//! Presentation helpers.
//!
//! Pure formatting functions for figures in a
//! [`CalculationResult`](crate::models::CalculationResult).  None of
//! them feed back into the calculation.

use crate::config::CalculatorConfig;
use crate::engine::apply_roi_cap;
use crate::models::Mode;

const FALLBACK_SYMBOL: &str = "€";

/// Symbol for a currency code; unknown codes fall back to the euro.
pub fn currency_symbol<'a>(code: &str, config: &'a CalculatorConfig) -> &'a str {
    config
        .currencies
        .iter()
        .find(|c| c.code.code() == code)
        .map(|c| c.symbol.as_str())
        .unwrap_or(FALLBACK_SYMBOL)
}

/// Formats an amount with two decimals and comma thousands separators,
/// e.g. `€1,234.56`.
pub fn format_currency(amount: f64, code: &str, config: &CalculatorConfig) -> String {
    format!("{}{}", currency_symbol(code, config), group_thousands(amount))
}

fn group_thousands(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{cents}")
}

/// One decimal place and a percent sign, e.g. `187.7%`.
pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}

/// ROI as shown to the user: capped in the quick flow, then formatted.
pub fn display_roi(roi_pct: f64, mode: Mode, config: &CalculatorConfig) -> String {
    format_percentage(apply_roi_cap(roi_pct, mode, config))
}

/// Humanises a payback period.  Under a month is shown in days (30 per
/// month), under a year in months, otherwise in years.
pub fn format_months(months: f64) -> String {
    if months < 1.0 {
        let days = (months * 30.0 + 0.5).floor();
        format!("{days:.0} days")
    } else if months < 12.0 {
        format!("{months:.1} months")
    } else {
        format!("{:.1} years", months / 12.0)
    }
}

//! Actual-basis leg calculation.
//!
//! Under actual recognition a leg earns an hourly-equivalent rate on each
//! approved hour logged inside the reporting window. Yearly and monthly
//! figures are converted with a fixed annual working-day assumption per
//! policy rather than the exact calendar, so a window spanning partial
//! months converts at a stable rate. The two modes therefore disagree for
//! the same assignment; that is expected.

use rust_decimal::Decimal;

use crate::config::AnnualWorkingDays;
use crate::models::{
    Assignment, AuditStep, AuditWarning, Leg, LegResult, RatePeriod, RateTerms, RateUnit,
};

use super::allocation::{LegCalculation, overflow_warning};

const MONTHS_PER_YEAR: u32 = 12;

/// Converts a periodic amount into an hourly-equivalent rate.
///
/// * Yearly: `amount / (annual_days * hours_per_day)`
/// * Monthly: `amount * 12 / (annual_days * hours_per_day)`
/// * Hourly: `amount`
///
/// Returns `None` when the divisor is zero or the rate overflows.
///
/// # Example
///
/// ```
/// use accrual_engine::calculation::hourly_equivalent_rate;
/// use rust_decimal::Decimal;
/// use accrual_engine::models::RatePeriod;
///
/// let rate = hourly_equivalent_rate(Decimal::from(2_080_000), RatePeriod::Yearly, 260, Decimal::from(8));
/// assert_eq!(rate, Some(Decimal::from(1_000)));
/// ```
pub fn hourly_equivalent_rate(
    amount: Decimal,
    period: RatePeriod,
    annual_days: u32,
    hours_per_day: Decimal,
) -> Option<Decimal> {
    if period == RatePeriod::Hourly {
        return Some(amount);
    }
    let annual_hours = Decimal::from(annual_days).checked_mul(hours_per_day)?;
    if annual_hours.is_zero() {
        return None;
    }
    match period {
        RatePeriod::Monthly => amount
            .checked_mul(Decimal::from(MONTHS_PER_YEAR))?
            .checked_div(annual_hours),
        _ => amount.checked_div(annual_hours),
    }
}

/// Calculates one leg of an assignment on an actual basis.
///
/// `logged_hours` is the externally aggregated approved-hour total; the
/// caller decides what a missing total means.
pub fn calculate_actual_leg(
    leg: Leg,
    terms: &RateTerms,
    normalized_amount: Decimal,
    assignment: &Assignment,
    logged_hours: Decimal,
    annual_working_days: &AnnualWorkingDays,
    step_number: u32,
) -> LegCalculation {
    let annual_days = annual_working_days.for_policy(assignment.working_days_policy);
    let mut warnings = Vec::new();

    let rate = match hourly_equivalent_rate(
        normalized_amount,
        terms.period,
        annual_days,
        assignment.hours_per_day,
    ) {
        Some(rate) => rate,
        None if annual_days == 0 || assignment.hours_per_day.is_zero() => {
            warnings.push(AuditWarning::new(
                "ZERO_ANNUAL_HOURS",
                format!(
                    "{} annual hours are zero ({} days x {} hours); rate set to 0",
                    leg.label(),
                    annual_days,
                    assignment.hours_per_day
                ),
                "high",
            ));
            Decimal::ZERO
        }
        None => {
            warnings.push(overflow_warning(leg, "hourly rate"));
            Decimal::ZERO
        }
    };
    let amount = logged_hours.checked_mul(rate).unwrap_or_else(|| {
        warnings.push(overflow_warning(leg, "actual amount"));
        Decimal::ZERO
    });

    let reasoning = match terms.period {
        RatePeriod::Hourly => format!("{} hours x {} per hour = {}", logged_hours, rate, amount),
        RatePeriod::Yearly => format!(
            "{} / ({} days x {} hours) = {} per hour; x {} hours = {}",
            normalized_amount,
            annual_days,
            assignment.hours_per_day,
            rate.round_dp(4),
            logged_hours,
            amount.round_dp(2)
        ),
        RatePeriod::Monthly => format!(
            "{} x 12 / ({} days x {} hours) = {} per hour; x {} hours = {}",
            normalized_amount,
            annual_days,
            assignment.hours_per_day,
            rate.round_dp(4),
            logged_hours,
            amount.round_dp(2)
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: format!("{}_actual", leg.label()),
        rule_name: "Actual Hours Allocation".to_string(),
        input: serde_json::json!({
            "period": terms.period,
            "amount": normalized_amount.to_string(),
            "annual_working_days": annual_days,
            "hours_per_day": assignment.hours_per_day.to_string(),
            "logged_hours": logged_hours.to_string(),
        }),
        output: serde_json::json!({
            "hourly_rate": rate.to_string(),
            "amount": amount.to_string(),
        }),
        reasoning,
    };

    LegCalculation {
        result: LegResult {
            leg,
            period: terms.period,
            normalized_amount,
            rate,
            rate_unit: RateUnit::PerHour,
            units: logged_hours,
            amount,
        },
        audit_steps: vec![audit_step],
        warnings,
    }
}

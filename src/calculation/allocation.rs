//! Revenue, cost and profit aggregation for a single assignment.
//!
//! This is the one entry point that combines currency normalization,
//! working-day counting and the accrual or actual leg calculation. Revenue
//! is the billing leg, cost is the salary leg, and profit is their exact
//! difference.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::EngineSettings;
use crate::models::{
    Assignment, AssignmentResult, AuditStep, AuditTrace, AuditWarning, CalculationMode, Leg,
    LegResult,
};

use super::accrual::calculate_accrual_leg;
use super::actual::calculate_actual_leg;
use super::currency::normalize_currency;
use super::working_days::count_working_days;

/// The outcome of calculating one leg, with its audit steps and warnings.
#[derive(Debug, Clone)]
pub struct LegCalculation {
    /// The leg breakdown.
    pub result: LegResult,
    /// Steps recorded for this leg.
    pub audit_steps: Vec<AuditStep>,
    /// Warnings raised for this leg.
    pub warnings: Vec<AuditWarning>,
}

/// Warning code raised when a figure exceeds the decimal range.
pub const AMOUNT_OVERFLOW: &str = "AMOUNT_OVERFLOW";

/// Builds the warning for a figure that overflowed and was set to 0.
pub(crate) fn overflow_warning(leg: Leg, figure: &str) -> AuditWarning {
    AuditWarning::new(
        AMOUNT_OVERFLOW,
        format!("{} {} exceeds the decimal range; set to 0", leg.label(), figure),
        "high",
    )
}

fn profit_of(revenue: Decimal, cost: Decimal) -> Option<Decimal> {
    revenue.checked_sub(cost)
}

fn calculate_leg(
    assignment: &Assignment,
    leg: Leg,
    mode: CalculationMode,
    working_days: u32,
    settings: &EngineSettings,
    step_number: u32,
) -> LegCalculation {
    let terms = match leg {
        Leg::Billing => &assignment.billing,
        Leg::Salary => &assignment.salary,
    };

    let currency = normalize_currency(terms, leg, &settings.exchange_rates, step_number);

    let mut calculation = match mode {
        CalculationMode::Accrual => calculate_accrual_leg(
            leg,
            terms,
            currency.amount,
            assignment,
            working_days,
            settings,
            step_number + 1,
        ),
        CalculationMode::Actual => calculate_actual_leg(
            leg,
            terms,
            currency.amount,
            assignment,
            assignment.logged_hours.unwrap_or(Decimal::ZERO),
            &settings.annual_working_days,
            step_number + 1,
        ),
    };

    calculation.audit_steps.insert(0, currency.audit_step);
    calculation.warnings.splice(0..0, currency.warnings);
    calculation
}

/// Calculates revenue for an assignment in the reporting currency.
///
/// # Example
///
/// ```
/// use accrual_engine::calculation::calculate_revenue;
/// use accrual_engine::config::EngineSettings;
/// use accrual_engine::models::{
///     Assignment, CalculationMode, Currency, RatePeriod, RateTerms, WorkingDaysPolicy,
/// };
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let assignment = Assignment {
///     id: "asg_001".to_string(),
///     employee_id: None,
///     project_id: None,
///     client_id: None,
///     start_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2024, 4, 12).unwrap(),
///     billing: RateTerms { amount: Decimal::from(500), period: RatePeriod::Hourly, currency: Currency::Inr },
///     salary: RateTerms { amount: Decimal::from(300), period: RatePeriod::Hourly, currency: Currency::Inr },
///     working_days_policy: WorkingDaysPolicy::WeekdaysOnly,
///     hours_per_day: Decimal::from(8),
///     logged_hours: None,
/// };
///
/// // 10 weekdays x 8 hours x 500
/// let revenue = calculate_revenue(&assignment, CalculationMode::Accrual, &EngineSettings::default());
/// assert_eq!(revenue, Decimal::from(40_000));
/// ```
pub fn calculate_revenue(
    assignment: &Assignment,
    mode: CalculationMode,
    settings: &EngineSettings,
) -> Decimal {
    let working_days = assignment_working_days(assignment);
    calculate_leg(assignment, Leg::Billing, mode, working_days, settings, 1)
        .result
        .amount
}

/// Calculates cost for an assignment in the reporting currency.
pub fn calculate_cost(
    assignment: &Assignment,
    mode: CalculationMode,
    settings: &EngineSettings,
) -> Decimal {
    let working_days = assignment_working_days(assignment);
    calculate_leg(assignment, Leg::Salary, mode, working_days, settings, 1)
        .result
        .amount
}

/// Calculates profit: exactly `calculate_revenue - calculate_cost`, or 0
/// when the difference overflows.
pub fn calculate_profit(
    assignment: &Assignment,
    mode: CalculationMode,
    settings: &EngineSettings,
) -> Decimal {
    profit_of(
        calculate_revenue(assignment, mode, settings),
        calculate_cost(assignment, mode, settings),
    )
    .unwrap_or(Decimal::ZERO)
}

fn assignment_working_days(assignment: &Assignment) -> u32 {
    count_working_days(
        assignment.start_date,
        assignment.end_date,
        assignment.working_days_policy,
    )
}

/// Calculates both legs of an assignment with a full audit trace.
///
/// The figures are identical to [`calculate_revenue`], [`calculate_cost`]
/// and [`calculate_profit`]. Warnings passed in `prior_warnings` (typically
/// from normalization) are kept at the front of the trace.
pub fn calculate_assignment(
    assignment: &Assignment,
    mode: CalculationMode,
    settings: &EngineSettings,
    prior_warnings: Vec<AuditWarning>,
) -> AssignmentResult {
    let mut trace = AuditTrace {
        steps: Vec::new(),
        warnings: prior_warnings,
    };

    let working_days = assignment_working_days(assignment);
    trace.steps.push(AuditStep {
        step_number: trace.next_step_number(),
        rule_id: "working_days".to_string(),
        rule_name: "Working Day Count".to_string(),
        input: serde_json::json!({
            "start_date": assignment.start_date.to_string(),
            "end_date": assignment.end_date.to_string(),
            "policy": assignment.working_days_policy,
        }),
        output: serde_json::json!({ "working_days": working_days }),
        reasoning: if assignment.is_inverted() {
            "Start date is after end date; no working days".to_string()
        } else {
            format!(
                "{} {} days from {} to {}",
                working_days,
                assignment.working_days_policy,
                assignment.start_date,
                assignment.end_date
            )
        },
    });

    if mode == CalculationMode::Actual && assignment.logged_hours.is_none() {
        trace.warnings.push(AuditWarning::new(
            "MISSING_LOGGED_HOURS",
            "No logged hours supplied for actual mode; treated as 0",
            "medium",
        ));
    }

    let [billing, salary] = [Leg::Billing, Leg::Salary].map(|leg| {
        let calculation = calculate_leg(
            assignment,
            leg,
            mode,
            working_days,
            settings,
            trace.next_step_number(),
        );
        trace.steps.extend(calculation.audit_steps);
        trace.warnings.extend(calculation.warnings);
        calculation.result
    });

    let revenue = billing.amount;
    let cost = salary.amount;
    let profit = match profit_of(revenue, cost) {
        Some(profit) => profit,
        None => {
            trace.warnings.push(AuditWarning::new(
                AMOUNT_OVERFLOW,
                "Profit exceeds the decimal range; set to 0",
                "high",
            ));
            Decimal::ZERO
        }
    };

    trace.steps.push(AuditStep {
        step_number: trace.next_step_number(),
        rule_id: "profit".to_string(),
        rule_name: "Profit".to_string(),
        input: serde_json::json!({
            "revenue": revenue.to_string(),
            "cost": cost.to_string(),
        }),
        output: serde_json::json!({ "profit": profit.to_string() }),
        reasoning: format!(
            "{} - {} = {}",
            revenue.round_dp(2),
            cost.round_dp(2),
            profit.round_dp(2)
        ),
    });

    debug!(
        assignment_id = %assignment.id,
        mode = %mode,
        working_days,
        revenue = %revenue,
        cost = %cost,
        warnings = trace.warnings.len(),
        "Calculated assignment"
    );

    AssignmentResult {
        assignment_id: assignment.id.clone(),
        client_id: assignment.client_id.clone(),
        mode,
        working_days,
        billing,
        salary,
        revenue,
        cost,
        profit,
        audit_trace: trace,
    }
}

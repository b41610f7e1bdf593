//! Calculation logic for the Accrual Allocation Engine.
//!
//! This module contains every step of the pipeline: input normalization,
//! working-day counting, periodic-rate normalization, currency conversion,
//! accrual and actual leg calculation, per-assignment aggregation, monthly
//! bucketing and portfolio reporting.

mod accrual;
mod actual;
mod allocation;
mod bucketing;
mod currency;
mod input_normalization;
mod portfolio;
mod rate_normalizer;
mod working_days;

pub use accrual::calculate_accrual_leg;
pub use actual::{calculate_actual_leg, hourly_equivalent_rate};
pub use allocation::{
    AMOUNT_OVERFLOW, LegCalculation, calculate_assignment, calculate_cost, calculate_profit,
    calculate_revenue,
};
pub use bucketing::{bucket_assignments, bucket_year_span};
pub use currency::{CurrencyNormalizationResult, MISSING_EXCHANGE_RATE, normalize_currency};
pub use input_normalization::{
    NormalizedAssignment, UNNAMED_ASSIGNMENT_ID, normalize_assignment, normalize_assignments,
};
pub use portfolio::{
    MISSING_EMPLOYEE_ID, UNASSIGNED_CLIENT, build_actuals_report, build_portfolio_report,
    load_assignments,
};
pub use rate_normalizer::{
    NormalizedRate, ReferencePeriod, daily_rate, month_containing, reference_period,
    year_containing,
};
pub use working_days::{count_working_days, is_working_day, working_days_by_month};

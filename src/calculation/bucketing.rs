//! Monthly bucketing for chart display.
//!
//! Spreads each assignment's accrual revenue and cost across the twelve
//! months of a calendar or fiscal year. A month receives the assignment's
//! per-day amount once for every working day that falls inside both the
//! assignment and the month, so for an assignment wholly inside the year the
//! buckets add up to its accrual totals.

use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::EngineSettings;
use crate::models::{
    Assignment, AuditWarning, BucketCalendar, BucketReport, Leg, MonthlyBucket, RateTerms, Totals,
};

use super::allocation::overflow_warning;
use super::rate_normalizer::{NormalizedRate, daily_rate};
use super::working_days::working_days_by_month;

/// First and last day of the bucket year.
///
/// For [`BucketCalendar::Fiscal`] the year starts on the first day of the
/// configured fiscal start month in `year`.
pub fn bucket_year_span(
    calendar: BucketCalendar,
    year: i32,
    settings: &EngineSettings,
) -> Option<(NaiveDate, NaiveDate)> {
    let start_month = match calendar {
        BucketCalendar::Calendar => 1,
        BucketCalendar::Fiscal => settings.fiscal_year_start_month.clamp(1, 12),
    };
    let start = NaiveDate::from_ymd_opt(year, start_month, 1)?;
    let end = start
        .checked_add_months(Months::new(12))?
        .checked_sub_days(Days::new(1))?;
    Some((start, end))
}

struct PerDayAmount {
    amount: Decimal,
    guarded: bool,
    overflowed: bool,
}

/// The amount one working day of `terms` is worth on an accrual basis.
///
/// This is the figure the accrual calculation multiplies by working days:
/// the daily rate from the start date's reference period, or the hourly
/// rate times hours per day.
fn per_day_amount(
    terms: &RateTerms,
    assignment: &Assignment,
    settings: &EngineSettings,
) -> PerDayAmount {
    let Some(amount) = settings
        .exchange_rates
        .to_reporting(terms.amount, terms.currency)
    else {
        return PerDayAmount {
            amount: Decimal::ZERO,
            guarded: false,
            overflowed: true,
        };
    };
    let (amount, guarded) = match daily_rate(
        amount,
        terms.period,
        assignment.start_date,
        assignment.working_days_policy,
        settings,
    ) {
        NormalizedRate::PerDay {
            rate,
            reference_period,
        } => (Some(rate), reference_period.is_guarded()),
        NormalizedRate::PerHour { rate } => (rate.checked_mul(assignment.hours_per_day), false),
    };
    PerDayAmount {
        amount: amount.unwrap_or(Decimal::ZERO),
        guarded,
        overflowed: amount.is_none(),
    }
}

/// Buckets accrual revenue and cost into the twelve months of `year`.
///
/// Always returns twelve buckets in chronological order, empty months
/// included. Assignments entirely outside the year contribute nothing.
/// A leg whose monthly figure overflows contributes 0 for that month and
/// raises `AMOUNT_OVERFLOW`; sums saturate at the decimal range.
pub fn bucket_assignments(
    assignments: &[Assignment],
    calendar: BucketCalendar,
    year: i32,
    settings: &EngineSettings,
) -> BucketReport {
    let mut buckets = Vec::with_capacity(12);
    let mut warnings = Vec::new();
    let mut totals = Totals::default();

    let Some((year_start, year_end)) = bucket_year_span(calendar, year, settings) else {
        return BucketReport {
            calendar,
            year,
            buckets,
            totals,
            warnings,
        };
    };

    let mut month_start = year_start;
    while month_start <= year_end {
        buckets.push(MonthlyBucket {
            year: month_start.year(),
            month: month_start.month(),
            label: month_start.format("%b %Y").to_string(),
            working_days: 0,
            revenue: Decimal::ZERO,
            cost: Decimal::ZERO,
            profit: Decimal::ZERO,
        });
        match month_start.checked_add_months(Months::new(1)) {
            Some(next) => month_start = next,
            None => break,
        }
    }

    for assignment in assignments {
        let clipped_start = assignment.start_date.max(year_start);
        let clipped_end = assignment.end_date.min(year_end);
        if clipped_start > clipped_end {
            continue;
        }

        let billing = per_day_amount(&assignment.billing, assignment, settings);
        let salary = per_day_amount(&assignment.salary, assignment, settings);
        let mut overflowed = [billing.overflowed, salary.overflowed];

        for (leg, per_day) in [(Leg::Billing, &billing), (Leg::Salary, &salary)] {
            if per_day.guarded {
                warnings.push(AuditWarning::new(
                    "ZERO_WORKING_DAYS_IN_REFERENCE_PERIOD",
                    format!(
                        "[{}] {} reference period has no {} days; divided by 1",
                        assignment.id,
                        leg.label(),
                        assignment.working_days_policy
                    ),
                    "high",
                ));
            }
        }

        let days_by_month =
            working_days_by_month(clipped_start, clipped_end, assignment.working_days_policy);
        let mut contributed = false;
        for bucket in buckets.iter_mut() {
            let Some(&days) = days_by_month.get(&(bucket.year, bucket.month)) else {
                continue;
            };
            let count = Decimal::from(days);
            let [revenue, cost] =
                [&billing, &salary].map(|per_day| per_day.amount.checked_mul(count));
            overflowed[0] |= revenue.is_none();
            overflowed[1] |= cost.is_none();
            let revenue = revenue.unwrap_or(Decimal::ZERO);
            let cost = cost.unwrap_or(Decimal::ZERO);
            let profit = revenue.saturating_sub(cost);

            bucket.working_days += days;
            bucket.revenue = bucket.revenue.saturating_add(revenue);
            bucket.cost = bucket.cost.saturating_add(cost);
            bucket.profit = bucket.profit.saturating_add(profit);

            totals.revenue = totals.revenue.saturating_add(revenue);
            totals.cost = totals.cost.saturating_add(cost);
            totals.profit = totals.profit.saturating_add(profit);
            contributed = true;
        }
        if contributed {
            totals.assignment_count += 1;
        }

        for (leg, overflowed) in [Leg::Billing, Leg::Salary].into_iter().zip(overflowed) {
            if overflowed {
                let mut warning = overflow_warning(leg, "bucket amount");
                warning.message = format!("[{}] {}", assignment.id, warning.message);
                warnings.push(warning);
            }
        }
    }

    debug!(
        calendar = ?calendar,
        year,
        assignments = assignments.len(),
        contributing = totals.assignment_count,
        "Bucketed assignments"
    );

    BucketReport {
        calendar,
        year,
        buckets,
        totals,
        warnings,
    }
}

//! Periodic-rate normalization.
//!
//! Billing and salary figures are quoted per year (LPA), per month or per
//! hour. Yearly and monthly figures are prorated over the working days of
//! the reference period containing a reference date, using the same
//! working-day policy that the allocation side uses. Hourly figures are
//! left per hour and applied by multiplying hours directly.

use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{EngineSettings, YearBasis};
use crate::models::{RatePeriod, WorkingDaysPolicy};

use super::working_days::count_working_days;

/// The calendar span a yearly or monthly figure is spread over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePeriod {
    /// First day of the period.
    pub start: NaiveDate,
    /// Last day of the period (inclusive).
    pub end: NaiveDate,
    /// Working days in the period under the assignment's policy.
    pub working_days: u32,
}

impl ReferencePeriod {
    /// The divisor used for the daily rate: the working-day count, or 1
    /// when the period has no working days.
    pub fn divisor(&self) -> u32 {
        self.working_days.max(1)
    }

    /// Returns true if the zero-working-day guard replaced the count.
    pub fn is_guarded(&self) -> bool {
        self.working_days == 0
    }
}

/// A rate normalized to the unit it is applied per.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", rename_all = "snake_case")]
pub enum NormalizedRate {
    /// A yearly or monthly figure divided over its reference period.
    PerDay {
        /// Amount per working day.
        rate: Decimal,
        /// The period the figure was divided over.
        reference_period: ReferencePeriod,
    },
    /// An hourly figure, unchanged.
    PerHour {
        /// Amount per hour.
        rate: Decimal,
    },
}

impl NormalizedRate {
    /// The numeric rate, whatever its unit.
    pub fn rate(&self) -> Decimal {
        match self {
            NormalizedRate::PerDay { rate, .. } | NormalizedRate::PerHour { rate } => *rate,
        }
    }
}

/// Returns the calendar month containing `date`.
pub fn month_containing(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.checked_sub_days(Days::new(1)))
        .unwrap_or(date);
    (first, last)
}

/// Returns the year containing `date` under the given basis.
///
/// For [`YearBasis::Fiscal`] the year starts on the first day of
/// `fiscal_start_month` at or before `date`.
pub fn year_containing(
    date: NaiveDate,
    basis: YearBasis,
    fiscal_start_month: u32,
) -> (NaiveDate, NaiveDate) {
    let start_month = match basis {
        YearBasis::Calendar => 1,
        YearBasis::Fiscal => fiscal_start_month.clamp(1, 12),
    };
    let start_year = if date.month() >= start_month {
        date.year()
    } else {
        date.year() - 1
    };
    let first = NaiveDate::from_ymd_opt(start_year, start_month, 1).unwrap_or(date);
    let last = first
        .checked_add_months(Months::new(12))
        .and_then(|next| next.checked_sub_days(Days::new(1)))
        .unwrap_or(date);
    (first, last)
}

/// Returns the reference period for a figure quoted per `period`.
///
/// Hourly figures have no reference period.
pub fn reference_period(
    period: RatePeriod,
    reference_date: NaiveDate,
    policy: WorkingDaysPolicy,
    settings: &EngineSettings,
) -> Option<ReferencePeriod> {
    let (start, end) = match period {
        RatePeriod::Yearly => year_containing(
            reference_date,
            settings.year_basis,
            settings.fiscal_year_start_month,
        ),
        RatePeriod::Monthly => month_containing(reference_date),
        RatePeriod::Hourly => return None,
    };
    Some(ReferencePeriod {
        start,
        end,
        working_days: count_working_days(start, end, policy),
    })
}

/// Normalizes a periodic amount into a per-day or per-hour rate.
///
/// `amount` must already be in the reporting currency.
///
/// # Example
///
/// ```
/// use accrual_engine::calculation::{daily_rate, NormalizedRate};
/// use accrual_engine::config::EngineSettings;
/// use accrual_engine::models::{RatePeriod, WorkingDaysPolicy};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let settings = EngineSettings::default();
/// let april = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
///
/// let rate = daily_rate(
///     Decimal::from(100_000),
///     RatePeriod::Monthly,
///     april,
///     WorkingDaysPolicy::WeekdaysOnly,
///     &settings,
/// );
/// // April 2024 has 22 weekdays
/// assert_eq!(rate.rate().round_dp(2), Decimal::new(454545, 2));
///
/// let hourly = daily_rate(Decimal::from(500), RatePeriod::Hourly, april, WorkingDaysPolicy::AllDays, &settings);
/// assert_eq!(hourly, NormalizedRate::PerHour { rate: Decimal::from(500) });
/// ```
pub fn daily_rate(
    amount: Decimal,
    period: RatePeriod,
    reference_date: NaiveDate,
    policy: WorkingDaysPolicy,
    settings: &EngineSettings,
) -> NormalizedRate {
    match reference_period(period, reference_date, policy, settings) {
        Some(reference_period) => NormalizedRate::PerDay {
            rate: amount / Decimal::from(reference_period.divisor()),
            reference_period,
        },
        None => NormalizedRate::PerHour { rate: amount },
    }
}

//! Assignment model and related types.
//!
//! This module defines the [`Assignment`] value object consumed by the
//! calculator, the [`RawAssignment`] form it is normalized from, and the
//! categorical types describing rate periods and working-day policies.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Currency;

/// The periodicity a billing or salary figure is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatePeriod {
    /// An annual figure (LPA, lakhs per annum).
    #[serde(alias = "lpa", alias = "LPA")]
    Yearly,
    /// A monthly figure.
    Monthly,
    /// An hourly figure.
    Hourly,
}

impl std::fmt::Display for RatePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatePeriod::Yearly => write!(f, "Yearly"),
            RatePeriod::Monthly => write!(f, "Monthly"),
            RatePeriod::Hourly => write!(f, "Hourly"),
        }
    }
}

impl FromStr for RatePeriod {
    type Err = String;

    /// Parses the labels used by the back office ("LPA", "Monthly", "Hourly", ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lpa" | "yearly" | "annual" | "annually" | "per_annum" => Ok(RatePeriod::Yearly),
            "monthly" | "month" => Ok(RatePeriod::Monthly),
            "hourly" | "hour" => Ok(RatePeriod::Hourly),
            other => Err(format!("unknown rate period '{}'", other)),
        }
    }
}

/// Which calendar days count as billable and worked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkingDaysPolicy {
    /// Every calendar day counts.
    AllDays,
    /// Monday through Friday.
    WeekdaysOnly,
    /// Monday through Saturday.
    SaturdayWorking,
}

impl WorkingDaysPolicy {
    /// Returns true if `date` is a working day under this policy.
    ///
    /// # Example
    ///
    /// ```
    /// use accrual_engine::models::WorkingDaysPolicy;
    /// use chrono::NaiveDate;
    ///
    /// // 2024-04-06 is a Saturday
    /// let saturday = NaiveDate::from_ymd_opt(2024, 4, 6).unwrap();
    /// assert!(WorkingDaysPolicy::AllDays.includes(saturday));
    /// assert!(!WorkingDaysPolicy::WeekdaysOnly.includes(saturday));
    /// assert!(WorkingDaysPolicy::SaturdayWorking.includes(saturday));
    /// ```
    pub fn includes(&self, date: NaiveDate) -> bool {
        match (self, date.weekday()) {
            (WorkingDaysPolicy::AllDays, _) => true,
            (WorkingDaysPolicy::WeekdaysOnly, Weekday::Sat | Weekday::Sun) => false,
            (WorkingDaysPolicy::SaturdayWorking, Weekday::Sun) => false,
            _ => true,
        }
    }
}

impl std::fmt::Display for WorkingDaysPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkingDaysPolicy::AllDays => write!(f, "all_days"),
            WorkingDaysPolicy::WeekdaysOnly => write!(f, "weekdays_only"),
            WorkingDaysPolicy::SaturdayWorking => write!(f, "saturday_working"),
        }
    }
}

impl FromStr for WorkingDaysPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();
        match normalized.as_str() {
            "all_days" | "all" | "alldays" => Ok(WorkingDaysPolicy::AllDays),
            "weekdays_only" | "weekdays" | "mon_fri" | "monday_to_friday" => {
                Ok(WorkingDaysPolicy::WeekdaysOnly)
            }
            "saturday_working" | "mon_sat" | "monday_to_saturday" => {
                Ok(WorkingDaysPolicy::SaturdayWorking)
            }
            other => Err(format!("unknown working days policy '{}'", other)),
        }
    }
}

/// The amount, period and currency of one side of an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTerms {
    /// The quoted amount, in `currency`.
    pub amount: Decimal,
    /// The periodicity of `amount`.
    pub period: RatePeriod,
    /// The currency of `amount`.
    pub currency: Currency,
}

/// A project-employee assignment, as read at calculation time.
///
/// Assignments are immutable snapshots. They are produced by
/// normalizing a [`RawAssignment`] or built directly by callers that
/// already hold validated data.
///
/// # Example
///
/// ```
/// use accrual_engine::models::{Assignment, Currency, RatePeriod, RateTerms, WorkingDaysPolicy};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let assignment = Assignment {
///     id: "asg_001".to_string(),
///     employee_id: Some("emp_001".to_string()),
///     project_id: None,
///     client_id: None,
///     start_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
///     billing: RateTerms { amount: Decimal::from(100_000), period: RatePeriod::Monthly, currency: Currency::Inr },
///     salary: RateTerms { amount: Decimal::from(60_000), period: RatePeriod::Monthly, currency: Currency::Inr },
///     working_days_policy: WorkingDaysPolicy::AllDays,
///     hours_per_day: Decimal::from(8),
///     logged_hours: None,
/// };
/// assert!(!assignment.is_inverted());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Unique identifier for the assignment.
    pub id: String,
    /// The assigned employee.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// The project the employee is assigned to.
    #[serde(default)]
    pub project_id: Option<String>,
    /// The client billed for the project.
    #[serde(default)]
    pub client_id: Option<String>,
    /// First day of the assignment (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the assignment (inclusive).
    pub end_date: NaiveDate,
    /// What the client is billed.
    pub billing: RateTerms,
    /// What the employee costs.
    pub salary: RateTerms,
    /// Which days count as worked.
    pub working_days_policy: WorkingDaysPolicy,
    /// Nominal working hours per day.
    pub hours_per_day: Decimal,
    /// Approved hours logged inside the reporting window (actual mode only).
    #[serde(default)]
    pub logged_hours: Option<Decimal>,
}

impl Assignment {
    /// Returns true if the start date falls after the end date.
    pub fn is_inverted(&self) -> bool {
        self.start_date > self.end_date
    }

    /// Returns true if `date` is inside the assignment span (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// An assignment record as supplied by the data store.
///
/// Every field is optional and the categorical fields are free-form
/// strings. Use [`crate::calculation::normalize_assignment`] to turn it
/// into an [`Assignment`] with explicit defaults and warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAssignment {
    /// Unique identifier for the assignment.
    #[serde(default)]
    pub id: Option<String>,
    /// The assigned employee.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// The project the employee is assigned to.
    #[serde(default)]
    pub project_id: Option<String>,
    /// The client billed for the project.
    #[serde(default)]
    pub client_id: Option<String>,
    /// First day of the assignment.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day of the assignment; open-ended when absent.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Client billing amount.
    #[serde(default)]
    pub billing_amount: Option<Decimal>,
    /// Billing period label ("LPA", "Monthly", "Hourly").
    #[serde(default)]
    pub billing_period: Option<String>,
    /// Billing currency code.
    #[serde(default)]
    pub billing_currency: Option<String>,
    /// Employee salary amount.
    #[serde(default)]
    pub salary_amount: Option<Decimal>,
    /// Salary period label.
    #[serde(default)]
    pub salary_period: Option<String>,
    /// Salary currency code.
    #[serde(default)]
    pub salary_currency: Option<String>,
    /// Working-day policy label.
    #[serde(default)]
    pub working_days_policy: Option<String>,
    /// Nominal working hours per day.
    #[serde(default)]
    pub hours_per_day: Option<Decimal>,
    /// Approved logged hours (actual mode only).
    #[serde(default)]
    pub logged_hours: Option<Decimal>,
}

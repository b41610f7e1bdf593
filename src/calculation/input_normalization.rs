//! Assignment input normalization.
//!
//! Records arrive from the data store with gaps and free-form labels. Every
//! gap is coerced to an explicit default so the calculator always produces a
//! number, and every coercion is reported as an [`AuditWarning`] so a
//! degraded figure can be told apart from a clean one. Warnings never change
//! the numbers.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::EngineSettings;
use crate::models::{
    Assignment, AuditWarning, Currency, Leg, RatePeriod, RateTerms, RawAssignment,
    WorkingDaysPolicy,
};

/// Identifier given to a record that arrives without one.
pub const UNNAMED_ASSIGNMENT_ID: &str = "unnamed";

/// A normalized assignment and the coercions applied to produce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAssignment {
    /// The assignment ready for calculation.
    pub assignment: Assignment,
    /// One warning per coerced field, in field order.
    pub warnings: Vec<AuditWarning>,
}

impl NormalizedAssignment {
    /// Returns true if no field needed a default.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

impl From<Assignment> for NormalizedAssignment {
    fn from(assignment: Assignment) -> Self {
        NormalizedAssignment {
            assignment,
            warnings: Vec::new(),
        }
    }
}

/// Normalizes a raw record into an [`Assignment`].
///
/// `as_of` closes open-ended assignments; the function never reads the
/// clock.
///
/// # Example
///
/// ```
/// use accrual_engine::calculation::normalize_assignment;
/// use accrual_engine::config::EngineSettings;
/// use accrual_engine::models::{RatePeriod, RawAssignment};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let raw = RawAssignment {
///     id: Some("asg_001".to_string()),
///     start_date: NaiveDate::from_ymd_opt(2024, 4, 1),
///     billing_amount: Some(Decimal::from(100_000)),
///     billing_period: Some("Monthly".to_string()),
///     ..Default::default()
/// };
/// let as_of = NaiveDate::from_ymd_opt(2024, 4, 30).unwrap();
///
/// let normalized = normalize_assignment(&raw, &EngineSettings::default(), as_of);
/// assert_eq!(normalized.assignment.end_date, as_of);
/// assert_eq!(normalized.assignment.billing.period, RatePeriod::Monthly);
/// assert!(normalized.warnings.iter().any(|w| w.code == "OPEN_ENDED_ASSIGNMENT"));
/// ```
pub fn normalize_assignment(
    raw: &RawAssignment,
    settings: &EngineSettings,
    as_of: NaiveDate,
) -> NormalizedAssignment {
    let mut warnings = Vec::new();

    let id = match raw.id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            warnings.push(AuditWarning::new(
                "MISSING_ASSIGNMENT_ID",
                format!("Assignment has no id; using '{}'", UNNAMED_ASSIGNMENT_ID),
                "low",
            ));
            UNNAMED_ASSIGNMENT_ID.to_string()
        }
    };

    let end_date = match raw.end_date {
        Some(end) => end,
        None => {
            warnings.push(AuditWarning::new(
                "OPEN_ENDED_ASSIGNMENT",
                format!("No end date; assignment runs to {}", as_of),
                "low",
            ));
            as_of
        }
    };

    let start_date = match raw.start_date {
        Some(start) => start,
        None => {
            warnings.push(AuditWarning::new(
                "MISSING_START_DATE",
                "No start date; assignment treated as zero duration",
                "high",
            ));
            end_date.checked_add_days(Days::new(1)).unwrap_or(end_date)
        }
    };

    if raw.start_date.is_some() && start_date > end_date {
        warnings.push(AuditWarning::new(
            "INVERTED_DATE_RANGE",
            format!(
                "Start date {} is after end date {}; assignment computes to zero",
                start_date, end_date
            ),
            "high",
        ));
    }

    let billing = normalize_terms(
        Leg::Billing,
        raw.billing_amount,
        raw.billing_period.as_deref(),
        raw.billing_currency.as_deref(),
        &mut warnings,
    );
    let salary = normalize_terms(
        Leg::Salary,
        raw.salary_amount,
        raw.salary_period.as_deref(),
        raw.salary_currency.as_deref(),
        &mut warnings,
    );

    let working_days_policy = match raw.working_days_policy.as_deref() {
        None => {
            warnings.push(AuditWarning::new(
                "MISSING_WORKING_DAYS_POLICY",
                "No working days policy; defaulted to all_days",
                "medium",
            ));
            WorkingDaysPolicy::AllDays
        }
        Some(label) => label.parse().unwrap_or_else(|_| {
            warnings.push(AuditWarning::new(
                "UNKNOWN_WORKING_DAYS_POLICY",
                format!("Unrecognized working days policy '{}'; defaulted to all_days", label),
                "medium",
            ));
            WorkingDaysPolicy::AllDays
        }),
    };

    let hours_per_day = match raw.hours_per_day {
        None => settings.default_hours_per_day,
        Some(hours) if hours > Decimal::ZERO => hours,
        Some(hours) => {
            warnings.push(AuditWarning::new(
                "NON_POSITIVE_HOURS_PER_DAY",
                format!(
                    "Hours per day {} is not positive; defaulted to {}",
                    hours, settings.default_hours_per_day
                ),
                "medium",
            ));
            settings.default_hours_per_day
        }
    };

    if !warnings.is_empty() {
        debug!(
            assignment_id = %id,
            warning_count = warnings.len(),
            "Assignment normalized with defaults"
        );
    }

    NormalizedAssignment {
        assignment: Assignment {
            id,
            employee_id: raw.employee_id.clone(),
            project_id: raw.project_id.clone(),
            client_id: raw.client_id.clone(),
            start_date,
            end_date,
            billing,
            salary,
            working_days_policy,
            hours_per_day,
            logged_hours: raw.logged_hours,
        },
        warnings,
    }
}

/// Normalizes a batch of records, numbering unnamed ones by position.
///
/// A record without an id becomes `"unnamed-<n>"`, where `n` is its
/// 1-based position, so ids stay distinct within the batch.
pub fn normalize_assignments(
    raws: &[RawAssignment],
    settings: &EngineSettings,
    as_of: NaiveDate,
) -> Vec<NormalizedAssignment> {
    raws.iter()
        .enumerate()
        .map(|(index, raw)| {
            let mut normalized = normalize_assignment(raw, settings, as_of);
            if normalized
                .warnings
                .iter()
                .any(|w| w.code == "MISSING_ASSIGNMENT_ID")
            {
                normalized.assignment.id = format!("{}-{}", UNNAMED_ASSIGNMENT_ID, index + 1);
            }
            normalized
        })
        .collect()
}

fn normalize_terms(
    leg: Leg,
    amount: Option<Decimal>,
    period: Option<&str>,
    currency: Option<&str>,
    warnings: &mut Vec<AuditWarning>,
) -> RateTerms {
    let prefix = leg.label().to_ascii_uppercase();

    let amount = match amount {
        Some(amount) => {
            if amount < Decimal::ZERO {
                warnings.push(AuditWarning::new(
                    "NEGATIVE_AMOUNT",
                    format!("{} amount {} is negative", leg.label(), amount),
                    "medium",
                ));
            }
            amount
        }
        None => {
            warnings.push(AuditWarning::new(
                format!("MISSING_{}_AMOUNT", prefix),
                format!("No {} amount; defaulted to 0", leg.label()),
                "high",
            ));
            Decimal::ZERO
        }
    };

    let period = match period {
        None => {
            warnings.push(AuditWarning::new(
                format!("MISSING_{}_PERIOD", prefix),
                format!("No {} period; defaulted to LPA", leg.label()),
                "medium",
            ));
            RatePeriod::Yearly
        }
        Some(label) => label.parse().unwrap_or_else(|_| {
            warnings.push(AuditWarning::new(
                format!("UNKNOWN_{}_PERIOD", prefix),
                format!("Unrecognized {} period '{}'; defaulted to LPA", leg.label(), label),
                "medium",
            ));
            RatePeriod::Yearly
        }),
    };

    let currency = match currency {
        None => {
            warnings.push(AuditWarning::new(
                format!("MISSING_{}_CURRENCY", prefix),
                format!("No {} currency; defaulted to INR", leg.label()),
                "medium",
            ));
            Currency::Inr
        }
        Some(code) => code.parse().unwrap_or_else(|_| {
            warnings.push(AuditWarning::new(
                format!("UNKNOWN_{}_CURRENCY", prefix),
                format!("Unrecognized {} currency '{}'; defaulted to INR", leg.label(), code),
                "medium",
            ));
            Currency::Inr
        }),
    };

    RateTerms {
        amount,
        period,
        currency,
    }
}

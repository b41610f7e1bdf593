//! Data source traits.
//!
//! The calculator consumes fully materialized inputs. These traits are the
//! seam between it and whatever holds assignments and time logs:
//! - [`AssignmentSource`]: raw assignment records
//! - [`TimeLogSource`]: approved hours per assignment and window
//!
//! In-memory implementations are provided for the HTTP service and tests.

use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{Assignment, RawAssignment, ReportingWindow, TimeLog};

/// Provides raw assignment records.
pub trait AssignmentSource: Send + Sync {
    /// Returns every assignment record the source holds.
    fn assignments(&self) -> EngineResult<Vec<RawAssignment>>;
}

/// Provides logged hours for assignments.
pub trait TimeLogSource: Send + Sync {
    /// Returns the approved hours logged for `assignment` on days inside
    /// both the assignment span and `window`.
    fn logged_hours(
        &self,
        assignment: &Assignment,
        window: &ReportingWindow,
    ) -> EngineResult<Decimal>;
}

/// An [`AssignmentSource`] backed by a vector.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssignments {
    records: Vec<RawAssignment>,
}

impl InMemoryAssignments {
    /// Creates a source over `records`.
    pub fn new(records: Vec<RawAssignment>) -> Self {
        Self { records }
    }
}

impl AssignmentSource for InMemoryAssignments {
    fn assignments(&self) -> EngineResult<Vec<RawAssignment>> {
        Ok(self.records.clone())
    }
}

/// A [`TimeLogSource`] backed by a vector of logs.
///
/// A log matches an assignment when the employees are equal and, if both
/// the log and the assignment name a project, the projects are equal too.
/// Only approved logs count.
///
/// # Example
///
/// ```
/// use accrual_engine::sources::{InMemoryTimeLogs, TimeLogSource};
/// use accrual_engine::models::{
///     Assignment, Currency, RatePeriod, RateTerms, ReportingWindow, TimeLog, TimeLogStatus,
///     WorkingDaysPolicy,
/// };
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let date = |d| NaiveDate::from_ymd_opt(2024, 4, d).unwrap();
/// let terms = RateTerms { amount: Decimal::from(500), period: RatePeriod::Hourly, currency: Currency::Inr };
/// let assignment = Assignment {
///     id: "asg_001".to_string(),
///     employee_id: Some("emp_001".to_string()),
///     project_id: None,
///     client_id: None,
///     start_date: date(1),
///     end_date: date(30),
///     billing: terms.clone(),
///     salary: terms,
///     working_days_policy: WorkingDaysPolicy::WeekdaysOnly,
///     hours_per_day: Decimal::from(8),
///     logged_hours: None,
/// };
/// let logs = InMemoryTimeLogs::new(vec![TimeLog {
///     employee_id: "emp_001".to_string(),
///     project_id: None,
///     date: date(2),
///     hours: Decimal::from(8),
///     status: TimeLogStatus::Approved,
/// }]);
///
/// let window = ReportingWindow::new(date(1), date(30)).unwrap();
/// assert_eq!(logs.logged_hours(&assignment, &window).unwrap(), Decimal::from(8));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryTimeLogs {
    logs: Vec<TimeLog>,
}

impl InMemoryTimeLogs {
    /// Creates a source over `logs`.
    pub fn new(logs: Vec<TimeLog>) -> Self {
        Self { logs }
    }

    fn matches(log: &TimeLog, assignment: &Assignment) -> bool {
        let Some(employee_id) = assignment.employee_id.as_deref() else {
            return false;
        };
        if log.employee_id != employee_id {
            return false;
        }
        match (log.project_id.as_deref(), assignment.project_id.as_deref()) {
            (Some(log_project), Some(assignment_project)) => log_project == assignment_project,
            _ => true,
        }
    }
}

impl TimeLogSource for InMemoryTimeLogs {
    fn logged_hours(
        &self,
        assignment: &Assignment,
        window: &ReportingWindow,
    ) -> EngineResult<Decimal> {
        let Some((start, end)) = window.intersect(assignment.start_date, assignment.end_date)
        else {
            return Ok(Decimal::ZERO);
        };

        Ok(self
            .logs
            .iter()
            .filter(|log| log.is_approved())
            .filter(|log| log.date >= start && log.date <= end)
            .filter(|log| Self::matches(log, assignment))
            .fold(Decimal::ZERO, |total, log| total.saturating_add(log.hours)))
    }
}

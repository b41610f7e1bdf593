//! Time log and reporting window models.
//!
//! Actual-basis reporting consumes hours logged against an assignment
//! inside a [`ReportingWindow`]. Only [`TimeLogStatus::Approved`] entries
//! contribute.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Approval state of a time log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeLogStatus {
    /// Submitted, awaiting approval.
    Pending,
    /// Approved by a manager.
    Approved,
    /// Rejected by a manager.
    Rejected,
}

/// Hours an employee logged against a project on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLog {
    /// The employee who logged the hours.
    pub employee_id: String,
    /// The project the hours were logged against, if recorded.
    #[serde(default)]
    pub project_id: Option<String>,
    /// The day the hours were worked.
    pub date: NaiveDate,
    /// Hours worked.
    pub hours: Decimal,
    /// Approval state.
    pub status: TimeLogStatus,
}

impl TimeLog {
    /// Returns true if the entry has been approved.
    pub fn is_approved(&self) -> bool {
        self.status == TimeLogStatus::Approved
    }
}

/// An inclusive date range that a report covers.
///
/// # Example
///
/// ```
/// use accrual_engine::models::ReportingWindow;
/// use chrono::NaiveDate;
///
/// let window = ReportingWindow::new(
///     NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
/// )
/// .unwrap();
/// assert!(window.contains_date(NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()));
///
/// let inverted = ReportingWindow::new(
///     NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
/// );
/// assert!(inverted.is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WindowBounds", into = "WindowBounds")]
pub struct ReportingWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl ReportingWindow {
    /// Creates a window, rejecting a start after the end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> EngineResult<Self> {
        if start > end {
            return Err(EngineError::InvalidReportingWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// First day of the window.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the window.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns true if `date` falls inside the window (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Returns the overlap between the window and another inclusive range.
    pub fn intersect(&self, start: NaiveDate, end: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let from = self.start.max(start);
        let to = self.end.min(end);
        (from <= to).then_some((from, to))
    }
}

#[derive(Serialize, Deserialize)]
struct WindowBounds {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<WindowBounds> for ReportingWindow {
    type Error = EngineError;

    fn try_from(bounds: WindowBounds) -> Result<Self, Self::Error> {
        ReportingWindow::new(bounds.start, bounds.end)
    }
}

impl From<ReportingWindow> for WindowBounds {
    fn from(window: ReportingWindow) -> Self {
        WindowBounds {
            start: window.start,
            end: window.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_window_single_day_is_valid() {
        let window = ReportingWindow::new(make_date("2024-04-01"), make_date("2024-04-01"));
        assert!(window.is_ok());
    }

    #[test]
    fn test_window_rejects_inverted_bounds() {
        let result = ReportingWindow::new(make_date("2024-05-01"), make_date("2024-04-01"));
        match result {
            Err(EngineError::InvalidReportingWindow { start, end }) => {
                assert_eq!(start, make_date("2024-05-01"));
                assert_eq!(end, make_date("2024-04-01"));
            }
            _ => panic!("Expected InvalidReportingWindow error"),
        }
    }

    #[test]
    fn test_window_intersect() {
        let window =
            ReportingWindow::new(make_date("2024-04-01"), make_date("2024-04-30")).unwrap();

        assert_eq!(
            window.intersect(make_date("2024-03-15"), make_date("2024-04-10")),
            Some((make_date("2024-04-01"), make_date("2024-04-10")))
        );
        assert_eq!(
            window.intersect(make_date("2024-05-01"), make_date("2024-05-31")),
            None
        );
    }

    #[test]
    fn test_window_deserialization_validates_bounds() {
        let ok: ReportingWindow =
            serde_json::from_str(r#"{"start": "2024-04-01", "end": "2024-04-30"}"#).unwrap();
        assert_eq!(ok.start(), make_date("2024-04-01"));
        assert_eq!(ok.end(), make_date("2024-04-30"));

        let err = serde_json::from_str::<ReportingWindow>(
            r#"{"start": "2024-04-30", "end": "2024-04-01"}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_time_log_status_deserialization() {
        let json = r#"{
            "employee_id": "emp_001",
            "date": "2024-04-02",
            "hours": "7.5",
            "status": "approved"
        }"#;

        let log: TimeLog = serde_json::from_str(json).unwrap();
        assert!(log.is_approved());
        assert_eq!(log.project_id, None);
        assert_eq!(log.hours, Decimal::new(75, 1));
    }
}

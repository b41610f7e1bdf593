//! Request types for the Accrual Allocation Engine API.
//!
//! This module defines the JSON request structures for the `/calculate`,
//! `/actuals` and `/buckets` endpoints. Assignments are accepted in their
//! raw form and normalized by the handler.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    BucketCalendar, CalculationMode, RawAssignment, ReportingWindow, TimeLog, TimeLogStatus,
};

/// Request body for the `/calculate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// Accrual or actual recognition.
    pub mode: CalculationMode,
    /// Date used to close open-ended assignments and pick exchange rates.
    /// Defaults to today.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    /// The assignments to calculate.
    pub assignments: Vec<RawAssignment>,
}

/// Request body for the `/actuals` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActualsRequest {
    /// The window hours are collected over.
    pub window: ReportingWindow,
    /// Date used to close open-ended assignments and pick exchange rates.
    /// Defaults to the window end.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    /// The assignments to calculate.
    pub assignments: Vec<RawAssignment>,
    /// Time logs to draw approved hours from.
    #[serde(default)]
    pub time_logs: Vec<TimeLogRequest>,
}

/// Request body for the `/buckets` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketRequest {
    /// Calendar or fiscal year.
    pub calendar: BucketCalendar,
    /// The year the span starts in.
    pub year: i32,
    /// Date used to close open-ended assignments and pick exchange rates.
    /// Defaults to today.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    /// The assignments to bucket.
    pub assignments: Vec<RawAssignment>,
}

/// A time log entry in an actuals request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeLogRequest {
    /// The employee who logged the hours.
    pub employee_id: String,
    /// The project the hours were logged against.
    #[serde(default)]
    pub project_id: Option<String>,
    /// The day the hours were worked.
    pub date: NaiveDate,
    /// Hours worked.
    pub hours: Decimal,
    /// Approval state; entries without one are taken as approved.
    #[serde(default = "default_status")]
    pub status: TimeLogStatus,
}

fn default_status() -> TimeLogStatus {
    TimeLogStatus::Approved
}

impl From<TimeLogRequest> for TimeLog {
    fn from(req: TimeLogRequest) -> Self {
        TimeLog {
            employee_id: req.employee_id,
            project_id: req.project_id,
            date: req.date,
            hours: req.hours,
            status: req.status,
        }
    }
}

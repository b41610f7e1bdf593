//! Core data models for the Accrual Allocation Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod assignment;
mod calculation_result;
mod currency;
mod report;
mod time_log;

pub use assignment::{Assignment, RatePeriod, RateTerms, RawAssignment, WorkingDaysPolicy};
pub use calculation_result::{
    AssignmentResult, AuditStep, AuditTrace, AuditWarning, CalculationMode, Leg, LegResult,
    RateUnit,
};
pub use currency::{Currency, ExchangeRates};
pub use report::{BucketCalendar, BucketReport, MonthlyBucket, PortfolioReport, Totals};
pub use time_log::{ReportingWindow, TimeLog, TimeLogStatus};

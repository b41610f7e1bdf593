//! Calculation result models for the Accrual Allocation Engine.
//!
//! This module contains the [`AssignmentResult`] type and its associated
//! structures that capture the outputs of a revenue/cost calculation,
//! including the per-leg breakdown and the audit trace.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::RatePeriod;

/// Selects how revenue and cost are recognized.
///
/// # Example
///
/// ```
/// use accrual_engine::models::CalculationMode;
///
/// let mode: CalculationMode = serde_json::from_str("\"actual\"").unwrap();
/// assert_eq!(mode, CalculationMode::Actual);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMode {
    /// Proportional to working days elapsed in the assignment span.
    Accrual,
    /// Proportional to approved hours logged in the reporting window.
    Actual,
}

impl std::fmt::Display for CalculationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalculationMode::Accrual => write!(f, "accrual"),
            CalculationMode::Actual => write!(f, "actual"),
        }
    }
}

/// Which side of an assignment a figure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Leg {
    /// Client billing (revenue).
    Billing,
    /// Employee salary (cost).
    Salary,
}

impl Leg {
    /// Lowercase label used in audit identifiers.
    pub fn label(&self) -> &'static str {
        match self {
            Leg::Billing => "billing",
            Leg::Salary => "salary",
        }
    }
}

/// The unit a leg's rate is applied per.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateUnit {
    /// Rate per working day.
    PerDay,
    /// Rate per hour.
    PerHour,
}

/// The computed amount for one leg (billing or salary) of an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegResult {
    /// Which side this is.
    pub leg: Leg,
    /// The quoted period of the source figure.
    pub period: RatePeriod,
    /// The source figure converted into the reporting currency.
    pub normalized_amount: Decimal,
    /// The rate that was multiplied by `units`.
    pub rate: Decimal,
    /// What `rate` is expressed per.
    pub rate_unit: RateUnit,
    /// Working days or hours the rate was applied to.
    pub units: Decimal,
    /// The resulting amount (`rate * units`).
    pub amount: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during normalization or calculation.
///
/// Warnings flag inputs that were coerced to defaults. They never change
/// the numbers produced; they let a caller highlight figures built on
/// degraded data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium" or "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a warning.
    pub fn new(code: impl Into<String>, message: impl Into<String>, severity: &str) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: severity.to_string(),
        }
    }
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use accrual_engine::models::AuditTrace;
///
/// let trace = AuditTrace::default();
/// assert!(trace.steps.is_empty());
/// assert!(!trace.has_warnings());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during normalization or calculation.
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// Returns true if any warning was recorded.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the number the next pushed step should carry.
    pub fn next_step_number(&self) -> u32 {
        self.steps.len() as u32 + 1
    }
}

/// The result of calculating one assignment.
///
/// `profit` is always exactly `revenue - cost`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentResult {
    /// The assignment this result is for.
    pub assignment_id: String,
    /// The client the assignment bills, if known.
    pub client_id: Option<String>,
    /// The recognition mode used.
    pub mode: CalculationMode,
    /// Working days in the assignment span under its policy.
    pub working_days: u32,
    /// Billing side breakdown.
    pub billing: LegResult,
    /// Salary side breakdown.
    pub salary: LegResult,
    /// Revenue in the reporting currency.
    pub revenue: Decimal,
    /// Cost in the reporting currency.
    pub cost: Decimal,
    /// Revenue minus cost.
    pub profit: Decimal,
    /// Steps and warnings recorded while calculating.
    pub audit_trace: AuditTrace,
}

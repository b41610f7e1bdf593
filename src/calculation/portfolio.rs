//! Portfolio reporting.
//!
//! Runs the allocation over many assignments and rolls the results up into
//! grand totals and per-client totals.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::EngineSettings;
use crate::error::EngineResult;
use crate::models::{
    AssignmentResult, AuditWarning, CalculationMode, PortfolioReport, ReportingWindow, Totals,
};
use crate::sources::{AssignmentSource, TimeLogSource};

use super::allocation::calculate_assignment;
use super::input_normalization::{NormalizedAssignment, normalize_assignments};

/// Client key for assignments that name no client.
pub const UNASSIGNED_CLIENT: &str = "unassigned";

/// Warning code for an actuals assignment with no employee to match logs on.
pub const MISSING_EMPLOYEE_ID: &str = "MISSING_EMPLOYEE_ID";

/// Reads every record from `source` and normalizes it.
pub fn load_assignments(
    source: &dyn AssignmentSource,
    settings: &EngineSettings,
    as_of: NaiveDate,
) -> EngineResult<Vec<NormalizedAssignment>> {
    let records = source.assignments()?;
    Ok(normalize_assignments(&records, settings, as_of))
}

fn summarize(
    mode: CalculationMode,
    window: Option<ReportingWindow>,
    results: Vec<AssignmentResult>,
) -> PortfolioReport {
    let mut totals = Totals::default();
    let mut by_client: BTreeMap<String, Totals> = BTreeMap::new();
    let mut degraded_count = 0;

    for result in &results {
        totals.add(result);
        let client = result
            .client_id
            .clone()
            .unwrap_or_else(|| UNASSIGNED_CLIENT.to_string());
        by_client.entry(client).or_default().add(result);
        if result.audit_trace.has_warnings() {
            degraded_count += 1;
        }
    }

    if degraded_count > 0 {
        warn!(
            mode = %mode,
            degraded_count,
            "Some assignments were calculated from defaulted inputs"
        );
    }

    PortfolioReport {
        mode,
        window,
        results,
        totals,
        by_client,
        degraded_count,
    }
}

/// Calculates every assignment in `mode` and totals the results.
///
/// Results keep the input order. Actual mode uses whatever
/// `logged_hours` each assignment already carries; use
/// [`build_actuals_report`] to collect hours from a time-log source.
pub fn build_portfolio_report(
    assignments: &[NormalizedAssignment],
    mode: CalculationMode,
    settings: &EngineSettings,
) -> PortfolioReport {
    let results = assignments
        .iter()
        .map(|normalized| {
            calculate_assignment(
                &normalized.assignment,
                mode,
                settings,
                normalized.warnings.clone(),
            )
        })
        .collect();

    let report = summarize(mode, None, results);
    info!(
        mode = %mode,
        assignments = report.totals.assignment_count,
        revenue = %report.totals.revenue.round_dp(2),
        profit = %report.totals.profit.round_dp(2),
        "Portfolio report built"
    );
    report
}

/// Calculates every assignment on an actual basis over `window`.
///
/// Each assignment's `logged_hours` is replaced with the approved hours
/// `time_logs` reports for it inside the window. An assignment with no
/// employee id is still calculated but carries `MISSING_EMPLOYEE_ID`.
///
/// # Errors
///
/// Returns the first error raised by `time_logs`.
pub fn build_actuals_report(
    assignments: &[NormalizedAssignment],
    window: ReportingWindow,
    time_logs: &dyn TimeLogSource,
    settings: &EngineSettings,
) -> EngineResult<PortfolioReport> {
    let mut results = Vec::with_capacity(assignments.len());

    for normalized in assignments {
        let mut assignment = normalized.assignment.clone();
        let mut warnings = normalized.warnings.clone();
        if assignment.employee_id.is_none() {
            warnings.push(AuditWarning::new(
                MISSING_EMPLOYEE_ID,
                "No employee id; time logs cannot be matched, so logged hours may be 0",
                "medium",
            ));
        }
        assignment.logged_hours = Some(time_logs.logged_hours(&assignment, &window)?);
        results.push(calculate_assignment(
            &assignment,
            CalculationMode::Actual,
            settings,
            warnings,
        ));
    }

    let report = summarize(CalculationMode::Actual, Some(window), results);
    info!(
        window_start = %window.start(),
        window_end = %window.end(),
        assignments = report.totals.assignment_count,
        revenue = %report.totals.revenue.round_dp(2),
        profit = %report.totals.profit.round_dp(2),
        "Actuals report built"
    );
    Ok(report)
}

//! Report models aggregating many assignment results.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AssignmentResult, AuditWarning, CalculationMode, ReportingWindow};

/// Revenue, cost and profit summed over a set of assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Total revenue.
    pub revenue: Decimal,
    /// Total cost.
    pub cost: Decimal,
    /// Total profit (`revenue - cost`).
    pub profit: Decimal,
    /// Number of assignments summed.
    pub assignment_count: u32,
}

impl Totals {
    /// Adds one assignment result. Sums saturate at the decimal range.
    pub fn add(&mut self, result: &AssignmentResult) {
        self.revenue = self.revenue.saturating_add(result.revenue);
        self.cost = self.cost.saturating_add(result.cost);
        self.profit = self.profit.saturating_add(result.profit);
        self.assignment_count += 1;
    }

    /// Profit as a percentage of revenue, or `None` when revenue is zero
    /// or the ratio overflows.
    pub fn margin_percent(&self) -> Option<Decimal> {
        if self.revenue.is_zero() {
            return None;
        }
        self.profit
            .checked_div(self.revenue)?
            .checked_mul(Decimal::ONE_HUNDRED)
    }
}

/// Results and totals for a set of assignments calculated in one mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioReport {
    /// The recognition mode used for every assignment.
    pub mode: CalculationMode,
    /// The window actual-mode hours were collected over.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<ReportingWindow>,
    /// One result per input assignment, in input order.
    pub results: Vec<AssignmentResult>,
    /// Grand totals.
    pub totals: Totals,
    /// Totals keyed by client id (`"unassigned"` when absent).
    pub by_client: BTreeMap<String, Totals>,
    /// How many results carry at least one warning.
    pub degraded_count: u32,
}

/// Which 12-month span a bucket report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketCalendar {
    /// January to December.
    Calendar,
    /// Twelve months starting at the configured fiscal start month.
    Fiscal,
}

/// Revenue and cost falling inside one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    /// Calendar year of the month.
    pub year: i32,
    /// Month number (1-12).
    pub month: u32,
    /// Display label, e.g. "Apr 2024".
    pub label: String,
    /// Assignment working days summed across assignments.
    pub working_days: u32,
    /// Revenue allocated to the month.
    pub revenue: Decimal,
    /// Cost allocated to the month.
    pub cost: Decimal,
    /// Revenue minus cost.
    pub profit: Decimal,
}

/// Twelve monthly buckets for chart display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketReport {
    /// The calendar kind.
    pub calendar: BucketCalendar,
    /// The year the span starts in.
    pub year: i32,
    /// Exactly twelve buckets in chronological order.
    pub buckets: Vec<MonthlyBucket>,
    /// Sum over all buckets.
    pub totals: Totals,
    /// Warnings raised while building the report, prefixed with the assignment id.
    pub warnings: Vec<AuditWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_margin_percent() {
        let totals = Totals {
            revenue: dec("200"),
            cost: dec("150"),
            profit: dec("50"),
            assignment_count: 1,
        };
        assert_eq!(totals.margin_percent(), Some(dec("25")));
    }

    #[test]
    fn test_margin_percent_zero_revenue() {
        let totals = Totals::default();
        assert_eq!(totals.margin_percent(), None);
    }

    #[test]
    fn test_margin_percent_overflow() {
        let totals = Totals {
            revenue: dec("0.0000000000000000000000000001"),
            cost: Decimal::ZERO,
            profit: dec("1"),
            assignment_count: 1,
        };
        assert_eq!(totals.margin_percent(), None);
    }

    #[test]
    fn test_bucket_calendar_serialization() {
        assert_eq!(
            serde_json::to_string(&BucketCalendar::Fiscal).unwrap(),
            "\"fiscal\""
        );
    }
}

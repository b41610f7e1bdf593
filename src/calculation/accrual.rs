//! Accrual-basis leg calculation.
//!
//! Under accrual recognition a leg earns its per-day rate on every working
//! day of the assignment span, regardless of hours actually logged.
//! Yearly and monthly figures are prorated over the reference period that
//! contains the assignment's start date; hourly figures are multiplied by
//! the nominal hours of each working day.

use rust_decimal::Decimal;

use crate::config::EngineSettings;
use crate::models::{Assignment, AuditStep, AuditWarning, Leg, LegResult, RateTerms, RateUnit};

use super::allocation::{LegCalculation, overflow_warning};
use super::rate_normalizer::{NormalizedRate, daily_rate};

/// Calculates one leg of an assignment on an accrual basis.
///
/// # Arguments
///
/// * `leg` - Which side is being calculated
/// * `terms` - The leg's quoted terms
/// * `normalized_amount` - `terms.amount` in the reporting currency
/// * `assignment` - The assignment the leg belongs to
/// * `working_days` - Working days in the assignment span
/// * `settings` - Engine settings (year basis)
/// * `step_number` - The step number for audit trail sequencing
pub fn calculate_accrual_leg(
    leg: Leg,
    terms: &RateTerms,
    normalized_amount: Decimal,
    assignment: &Assignment,
    working_days: u32,
    settings: &EngineSettings,
    step_number: u32,
) -> LegCalculation {
    let days = Decimal::from(working_days);
    let mut warnings = Vec::new();

    let normalized = daily_rate(
        normalized_amount,
        terms.period,
        assignment.start_date,
        assignment.working_days_policy,
        settings,
    );

    let (result, input, reasoning) = match normalized {
        NormalizedRate::PerHour { rate } => {
            let (units, amount) = match days
                .checked_mul(assignment.hours_per_day)
                .and_then(|units| Some((units, rate.checked_mul(units)?)))
            {
                Some(figures) => figures,
                None => {
                    warnings.push(overflow_warning(leg, "accrual amount"));
                    (Decimal::ZERO, Decimal::ZERO)
                }
            };
            (
                LegResult {
                    leg,
                    period: terms.period,
                    normalized_amount,
                    rate,
                    rate_unit: RateUnit::PerHour,
                    units,
                    amount,
                },
                serde_json::json!({
                    "period": terms.period,
                    "hourly_rate": rate.to_string(),
                    "working_days": working_days,
                    "hours_per_day": assignment.hours_per_day.to_string(),
                }),
                format!(
                    "{} x {} days x {} hours = {}",
                    rate, working_days, assignment.hours_per_day, amount
                ),
            )
        }
        NormalizedRate::PerDay {
            rate,
            reference_period,
        } => {
            if reference_period.is_guarded() {
                warnings.push(AuditWarning::new(
                    "ZERO_WORKING_DAYS_IN_REFERENCE_PERIOD",
                    format!(
                        "{} reference period {} to {} has no {} days; divided by 1",
                        leg.label(),
                        reference_period.start,
                        reference_period.end,
                        assignment.working_days_policy
                    ),
                    "high",
                ));
            }
            let amount = rate.checked_mul(days).unwrap_or_else(|| {
                warnings.push(overflow_warning(leg, "accrual amount"));
                Decimal::ZERO
            });
            (
                LegResult {
                    leg,
                    period: terms.period,
                    normalized_amount,
                    rate,
                    rate_unit: RateUnit::PerDay,
                    units: days,
                    amount,
                },
                serde_json::json!({
                    "period": terms.period,
                    "amount": normalized_amount.to_string(),
                    "reference_start": reference_period.start.to_string(),
                    "reference_end": reference_period.end.to_string(),
                    "reference_working_days": reference_period.working_days,
                    "working_days": working_days,
                }),
                format!(
                    "{} / {} reference days = {} per day; x {} days = {}",
                    normalized_amount,
                    reference_period.divisor(),
                    rate.round_dp(4),
                    working_days,
                    amount.round_dp(2)
                ),
            )
        }
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: format!("{}_accrual", leg.label()),
        rule_name: "Accrual Allocation".to_string(),
        input,
        output: serde_json::json!({
            "rate": result.rate.to_string(),
            "rate_unit": result.rate_unit,
            "units": result.units.to_string(),
            "amount": result.amount.to_string(),
        }),
        reasoning,
    };

    LegCalculation {
        result,
        audit_steps: vec![audit_step],
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::count_working_days;
    use crate::models::{Currency, RatePeriod, WorkingDaysPolicy};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn create_assignment(
        start: &str,
        end: &str,
        billing: RateTerms,
        policy: WorkingDaysPolicy,
    ) -> Assignment {
        Assignment {
            id: "asg_001".to_string(),
            employee_id: None,
            project_id: None,
            client_id: None,
            start_date: make_date(start),
            end_date: make_date(end),
            salary: billing.clone(),
            billing,
            working_days_policy: policy,
            hours_per_day: dec("8"),
            logged_hours: None,
        }
    }

    fn run(assignment: &Assignment) -> LegCalculation {
        let days = count_working_days(
            assignment.start_date,
            assignment.end_date,
            assignment.working_days_policy,
        );
        calculate_accrual_leg(
            Leg::Billing,
            &assignment.billing,
            assignment.billing.amount,
            assignment,
            days,
            &EngineSettings::default(),
            1,
        )
    }

    fn monthly(amount: &str) -> RateTerms {
        RateTerms {
            amount: dec(amount),
            period: RatePeriod::Monthly,
            currency: Currency::Inr,
        }
    }

    #[test]
    fn test_full_month_all_days_recovers_monthly_amount() {
        let assignment = create_assignment(
            "2024-04-01",
            "2024-04-30",
            monthly("100000"),
            WorkingDaysPolicy::AllDays,
        );
        let calc = run(&assignment);

        assert_eq!(calc.result.units, dec("30"));
        assert_eq!(calc.result.rate.round_dp(2), dec("3333.33"));
        assert_eq!(calc.result.amount.round_dp(2), dec("100000.00"));
        assert!(calc.warnings.is_empty());
    }

    #[test]
    fn test_full_month_weekdays_only_recovers_monthly_amount() {
        let assignment = create_assignment(
            "2024-04-01",
            "2024-04-30",
            monthly("100000"),
            WorkingDaysPolicy::WeekdaysOnly,
        );
        let calc = run(&assignment);

        assert_eq!(calc.result.units, dec("22"));
        assert_eq!(calc.result.rate.round_dp(2), dec("4545.45"));
        assert_eq!(calc.result.amount.round_dp(2), dec("100000.00"));
    }

    #[test]
    fn test_partial_month_prorates_by_working_days() {
        // Apr 1 (Mon) to Apr 12 (Fri): 10 weekdays out of 22
        let assignment = create_assignment(
            "2024-04-01",
            "2024-04-12",
            monthly("110000"),
            WorkingDaysPolicy::WeekdaysOnly,
        );
        let calc = run(&assignment);

        assert_eq!(calc.result.units, dec("10"));
        assert_eq!(calc.result.amount, dec("50000"));
    }

    #[test]
    fn test_span_past_month_end_uses_start_month_rate() {
        // April rate (30 days) applied to 31 days
        let assignment = create_assignment(
            "2024-04-01",
            "2024-05-01",
            monthly("30000"),
            WorkingDaysPolicy::AllDays,
        );
        let calc = run(&assignment);

        assert_eq!(calc.result.rate, dec("1000"));
        assert_eq!(calc.result.amount, dec("31000"));
    }

    #[test]
    fn test_hourly_multiplies_days_by_hours_per_day() {
        // Apr 1 to Apr 12: 10 weekdays
        let assignment = create_assignment(
            "2024-04-01",
            "2024-04-12",
            RateTerms {
                amount: dec("500"),
                period: RatePeriod::Hourly,
                currency: Currency::Inr,
            },
            WorkingDaysPolicy::WeekdaysOnly,
        );
        let calc = run(&assignment);

        assert_eq!(calc.result.rate_unit, RateUnit::PerHour);
        assert_eq!(calc.result.units, dec("80"));
        assert_eq!(calc.result.amount, dec("40000"));
        assert!(calc.audit_steps[0].reasoning.contains("500 x 10 days x 8 hours"));
    }

    #[test]
    fn test_yearly_lpa_weekdays() {
        // 2024 has 262 weekdays; April has 22
        let assignment = create_assignment(
            "2024-04-01",
            "2024-04-30",
            RateTerms {
                amount: dec("2620000"),
                period: RatePeriod::Yearly,
                currency: Currency::Inr,
            },
            WorkingDaysPolicy::WeekdaysOnly,
        );
        let calc = run(&assignment);

        assert_eq!(calc.result.rate, dec("10000"));
        assert_eq!(calc.result.amount, dec("220000"));
    }

    #[test]
    fn test_inverted_span_accrues_nothing() {
        let assignment = create_assignment(
            "2024-04-30",
            "2024-04-01",
            monthly("100000"),
            WorkingDaysPolicy::AllDays,
        );
        let calc = run(&assignment);

        assert_eq!(calc.result.units, Decimal::ZERO);
        assert_eq!(calc.result.amount, Decimal::ZERO);
    }

    #[test]
    fn test_audit_step_records_reference_period() {
        let assignment = create_assignment(
            "2024-04-10",
            "2024-04-20",
            monthly("100000"),
            WorkingDaysPolicy::AllDays,
        );
        let calc = run(&assignment);
        let step = &calc.audit_steps[0];

        assert_eq!(step.rule_id, "billing_accrual");
        assert_eq!(step.input["reference_start"].as_str().unwrap(), "2024-04-01");
        assert_eq!(step.input["reference_end"].as_str().unwrap(), "2024-04-30");
        assert_eq!(step.input["reference_working_days"].as_u64().unwrap(), 30);
        assert_eq!(step.input["working_days"].as_u64().unwrap(), 11);
    }

    #[test]
    fn test_overflowing_hourly_amount_becomes_zero_with_warning() {
        let assignment = create_assignment(
            "2024-04-01",
            "2024-04-30",
            RateTerms {
                amount: dec("70000000000000000000000000000"),
                period: RatePeriod::Hourly,
                currency: Currency::Inr,
            },
            WorkingDaysPolicy::AllDays,
        );
        let calc = run(&assignment);

        assert_eq!(calc.result.amount, Decimal::ZERO);
        assert_eq!(calc.warnings.len(), 1);
        assert_eq!(calc.warnings[0].code, "AMOUNT_OVERFLOW");
        assert_eq!(calc.warnings[0].severity, "high");
    }

    #[test]
    fn test_overflowing_daily_amount_becomes_zero_with_warning() {
        // February rate (29 days) applied to 40 days
        let assignment = create_assignment(
            "2024-02-29",
            "2024-04-08",
            monthly("70000000000000000000000000000"),
            WorkingDaysPolicy::AllDays,
        );
        let calc = run(&assignment);

        assert_eq!(calc.result.amount, Decimal::ZERO);
        assert!(calc.warnings.iter().any(|w| w.code == "AMOUNT_OVERFLOW"));
    }
}

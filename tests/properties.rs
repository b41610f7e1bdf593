//! Property tests for the calculation core.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use accrual_engine::calculation::{
    calculate_cost, calculate_profit, calculate_revenue, count_working_days, daily_rate,
};
use accrual_engine::config::EngineSettings;
use accrual_engine::models::{
    Assignment, CalculationMode, Currency, RatePeriod, RateTerms, WorkingDaysPolicy,
};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u64..3650).prop_map(|offset| base_date() + Days::new(offset))
}

fn policy_strategy() -> impl Strategy<Value = WorkingDaysPolicy> {
    prop_oneof![
        Just(WorkingDaysPolicy::AllDays),
        Just(WorkingDaysPolicy::WeekdaysOnly),
        Just(WorkingDaysPolicy::SaturdayWorking),
    ]
}

fn period_strategy() -> impl Strategy<Value = RatePeriod> {
    prop_oneof![
        Just(RatePeriod::Yearly),
        Just(RatePeriod::Monthly),
        Just(RatePeriod::Hourly),
    ]
}

fn mode_strategy() -> impl Strategy<Value = CalculationMode> {
    prop_oneof![Just(CalculationMode::Accrual), Just(CalculationMode::Actual)]
}

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn assignment_strategy() -> impl Strategy<Value = Assignment> {
    (
        date_strategy(),
        0u64..400,
        (amount_strategy(), period_strategy()),
        (amount_strategy(), period_strategy()),
        policy_strategy(),
        1u32..13,
        proptest::option::of(0u32..2000),
    )
        .prop_map(
            |(start, length, billing, salary, policy, hours, logged)| Assignment {
                id: "asg_prop".to_string(),
                employee_id: None,
                project_id: None,
                client_id: None,
                start_date: start,
                end_date: start + Days::new(length),
                billing: RateTerms {
                    amount: billing.0,
                    period: billing.1,
                    currency: Currency::Inr,
                },
                salary: RateTerms {
                    amount: salary.0,
                    period: salary.1,
                    currency: Currency::Inr,
                },
                working_days_policy: policy,
                hours_per_day: Decimal::from(hours),
                logged_hours: logged.map(Decimal::from),
            },
        )
}

proptest! {
    #[test]
    fn single_day_all_days_counts_one(date in date_strategy()) {
        prop_assert_eq!(count_working_days(date, date, WorkingDaysPolicy::AllDays), 1);
    }

    #[test]
    fn inverted_range_counts_zero(
        start in date_strategy(),
        back in 1u64..1000,
        policy in policy_strategy(),
    ) {
        let end = start - Days::new(back);
        prop_assert_eq!(count_working_days(start, end, policy), 0);
    }

    #[test]
    fn any_seven_day_window_has_fixed_counts(start in date_strategy()) {
        let end = start + Days::new(6);
        prop_assert_eq!(count_working_days(start, end, WorkingDaysPolicy::WeekdaysOnly), 5);
        prop_assert_eq!(count_working_days(start, end, WorkingDaysPolicy::SaturdayWorking), 6);
        prop_assert_eq!(count_working_days(start, end, WorkingDaysPolicy::AllDays), 7);
    }

    #[test]
    fn counts_are_ordered_by_policy(start in date_strategy(), length in 0u64..800) {
        let end = start + Days::new(length);
        let weekdays = count_working_days(start, end, WorkingDaysPolicy::WeekdaysOnly);
        let saturday = count_working_days(start, end, WorkingDaysPolicy::SaturdayWorking);
        let all = count_working_days(start, end, WorkingDaysPolicy::AllDays);
        prop_assert!(weekdays <= saturday);
        prop_assert!(saturday <= all);
        prop_assert_eq!(all as u64, length + 1);
    }

    #[test]
    fn daily_rate_shrinks_as_working_days_grow(
        date in date_strategy(),
        amount in (1i64..100_000_000).prop_map(|c| Decimal::new(c, 2)),
        period in prop_oneof![Just(RatePeriod::Yearly), Just(RatePeriod::Monthly)],
    ) {
        let settings = EngineSettings::default();
        let rate = |policy| daily_rate(amount, period, date, policy, &settings).rate();
        let weekdays = rate(WorkingDaysPolicy::WeekdaysOnly);
        let saturday = rate(WorkingDaysPolicy::SaturdayWorking);
        let all = rate(WorkingDaysPolicy::AllDays);
        prop_assert!(weekdays > saturday);
        prop_assert!(saturday > all);
    }

    #[test]
    fn profit_is_revenue_minus_cost(
        assignment in assignment_strategy(),
        mode in mode_strategy(),
    ) {
        let settings = EngineSettings::default();
        let revenue = calculate_revenue(&assignment, mode, &settings);
        let cost = calculate_cost(&assignment, mode, &settings);
        prop_assert_eq!(calculate_profit(&assignment, mode, &settings), revenue - cost);
    }

    #[test]
    fn usd_equals_inr_at_default_rate(
        assignment in assignment_strategy(),
        mode in mode_strategy(),
    ) {
        let settings = EngineSettings::default();
        let factor = Decimal::from(84);

        let mut usd = assignment.clone();
        usd.billing.currency = Currency::Usd;
        usd.salary.currency = Currency::Usd;

        let mut inr = assignment;
        inr.billing.amount *= factor;
        inr.salary.amount *= factor;

        prop_assert_eq!(
            calculate_revenue(&usd, mode, &settings),
            calculate_revenue(&inr, mode, &settings)
        );
        prop_assert_eq!(
            calculate_cost(&usd, mode, &settings),
            calculate_cost(&inr, mode, &settings)
        );
    }

    #[test]
    fn inverted_assignment_is_all_zero(
        assignment in assignment_strategy(),
        back in 1u64..400,
    ) {
        let settings = EngineSettings::default();
        let mut inverted = assignment;
        inverted.end_date = inverted.start_date - Days::new(back);

        let mode = CalculationMode::Accrual;
        prop_assert_eq!(calculate_revenue(&inverted, mode, &settings), Decimal::ZERO);
        prop_assert_eq!(calculate_cost(&inverted, mode, &settings), Decimal::ZERO);
        prop_assert_eq!(calculate_profit(&inverted, mode, &settings), Decimal::ZERO);
    }
}

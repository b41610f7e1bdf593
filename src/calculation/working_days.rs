//! Working-day counting.
//!
//! This module counts the days in an inclusive date range that a
//! [`WorkingDaysPolicy`] treats as worked. All arithmetic is on calendar
//! dates ([`NaiveDate`]), so there is no time-of-day component and no
//! daylight-saving shift can move a day across a boundary.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::WorkingDaysPolicy;

/// Returns true if `date` counts as a working day under `policy`.
///
/// # Example
///
/// ```
/// use accrual_engine::calculation::is_working_day;
/// use accrual_engine::models::WorkingDaysPolicy;
/// use chrono::NaiveDate;
///
/// // 2024-04-07 is a Sunday
/// let sunday = NaiveDate::from_ymd_opt(2024, 4, 7).unwrap();
/// assert!(is_working_day(sunday, WorkingDaysPolicy::AllDays));
/// assert!(!is_working_day(sunday, WorkingDaysPolicy::SaturdayWorking));
/// ```
pub fn is_working_day(date: NaiveDate, policy: WorkingDaysPolicy) -> bool {
    policy.includes(date)
}

/// Counts the working days in `[start, end]` inclusive.
///
/// A range whose start falls after its end has no working days; this is
/// not an error.
///
/// # Example
///
/// ```
/// use accrual_engine::calculation::count_working_days;
/// use accrual_engine::models::WorkingDaysPolicy;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 4, 30).unwrap();
///
/// assert_eq!(count_working_days(start, end, WorkingDaysPolicy::AllDays), 30);
/// assert_eq!(count_working_days(start, end, WorkingDaysPolicy::WeekdaysOnly), 22);
/// assert_eq!(count_working_days(start, end, WorkingDaysPolicy::SaturdayWorking), 26);
/// assert_eq!(count_working_days(end, start, WorkingDaysPolicy::AllDays), 0);
/// ```
pub fn count_working_days(start: NaiveDate, end: NaiveDate, policy: WorkingDaysPolicy) -> u32 {
    if start > end {
        return 0;
    }
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| policy.includes(*day))
        .count() as u32
}

/// Counts working days in `[start, end]` grouped by `(year, month)`.
///
/// Months with no working days are omitted.
pub fn working_days_by_month(
    start: NaiveDate,
    end: NaiveDate,
    policy: WorkingDaysPolicy,
) -> BTreeMap<(i32, u32), u32> {
    let mut months = BTreeMap::new();
    if start > end {
        return months;
    }
    for day in start.iter_days().take_while(|day| *day <= end) {
        if policy.includes(day) {
            *months.entry((day.year(), day.month())).or_insert(0) += 1;
        }
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    const POLICIES: [WorkingDaysPolicy; 3] = [
        WorkingDaysPolicy::AllDays,
        WorkingDaysPolicy::WeekdaysOnly,
        WorkingDaysPolicy::SaturdayWorking,
    ];

    #[test]
    fn test_single_day_all_days_counts_one() {
        let day = make_date("2024-04-07");
        assert_eq!(count_working_days(day, day, WorkingDaysPolicy::AllDays), 1);
    }

    #[test]
    fn test_single_sunday_counts_zero_for_restricted_policies() {
        let sunday = make_date("2024-04-07");
        assert_eq!(
            count_working_days(sunday, sunday, WorkingDaysPolicy::WeekdaysOnly),
            0
        );
        assert_eq!(
            count_working_days(sunday, sunday, WorkingDaysPolicy::SaturdayWorking),
            0
        );
    }

    #[test]
    fn test_inverted_range_counts_zero_for_every_policy() {
        let start = make_date("2024-04-30");
        let end = make_date("2024-04-01");
        for policy in POLICIES {
            assert_eq!(count_working_days(start, end, policy), 0);
        }
    }

    #[test]
    fn test_full_week_counts() {
        // Wednesday to the following Tuesday
        let start = make_date("2024-04-03");
        let end = make_date("2024-04-09");

        assert_eq!(count_working_days(start, end, WorkingDaysPolicy::AllDays), 7);
        assert_eq!(count_working_days(start, end, WorkingDaysPolicy::WeekdaysOnly), 5);
        assert_eq!(
            count_working_days(start, end, WorkingDaysPolicy::SaturdayWorking),
            6
        );
    }

    #[test]
    fn test_april_2024_counts() {
        let start = make_date("2024-04-01");
        let end = make_date("2024-04-30");

        assert_eq!(count_working_days(start, end, WorkingDaysPolicy::AllDays), 30);
        assert_eq!(count_working_days(start, end, WorkingDaysPolicy::WeekdaysOnly), 22);
        assert_eq!(
            count_working_days(start, end, WorkingDaysPolicy::SaturdayWorking),
            26
        );
    }

    #[test]
    fn test_leap_year_counts() {
        let start = make_date("2024-01-01");
        let end = make_date("2024-12-31");

        assert_eq!(count_working_days(start, end, WorkingDaysPolicy::AllDays), 366);
        assert_eq!(count_working_days(start, end, WorkingDaysPolicy::WeekdaysOnly), 262);
        assert_eq!(
            count_working_days(start, end, WorkingDaysPolicy::SaturdayWorking),
            314
        );
    }

    #[test]
    fn test_weekend_only_range_under_weekdays_only() {
        let saturday = make_date("2024-04-06");
        let sunday = make_date("2024-04-07");
        assert_eq!(
            count_working_days(saturday, sunday, WorkingDaysPolicy::WeekdaysOnly),
            0
        );
    }

    #[test]
    fn test_working_days_by_month_splits_at_month_boundary() {
        let months = working_days_by_month(
            make_date("2024-03-28"),
            make_date("2024-04-02"),
            WorkingDaysPolicy::WeekdaysOnly,
        );

        // Mar 28 Thu, Mar 29 Fri, Apr 1 Mon, Apr 2 Tue
        assert_eq!(months.get(&(2024, 3)), Some(&2));
        assert_eq!(months.get(&(2024, 4)), Some(&2));
        assert_eq!(months.len(), 2);
    }

    #[test]
    fn test_working_days_by_month_sums_to_total() {
        let start = make_date("2024-01-15");
        let end = make_date("2024-07-20");
        for policy in POLICIES {
            let months = working_days_by_month(start, end, policy);
            let summed: u32 = months.values().sum();
            assert_eq!(summed, count_working_days(start, end, policy));
        }
    }

    #[test]
    fn test_working_days_by_month_inverted_is_empty() {
        let months = working_days_by_month(
            make_date("2024-04-30"),
            make_date("2024-04-01"),
            WorkingDaysPolicy::AllDays,
        );
        assert!(months.is_empty());
    }
}

//! Renewal-date projection.
//!
//! A subscription renews on a fixed day of the month. The next occurrence is
//! projected within the current month and rolled one month forward when that
//! date is on or before the reference day. Days beyond the target month's
//! length clamp to the month's last day, so a 31st-of-month renewal bills on
//! Feb 29 in leap years and Feb 28 otherwise.

use chrono::{Datelike, Duration, NaiveDate};

/// Renewals at or under this many days away are flagged urgent.
pub const URGENT_WINDOW_DAYS: i64 = 3;

/// Whole days from `today` until the next renewal on `renew_day`.
///
/// Date-only arithmetic: a renewal whose day matches `today` rolls to the
/// next month, so the result is always >= 1.
pub fn days_until_renewal(renew_day: u32, today: NaiveDate) -> i64 {
    let day = renew_day.clamp(1, 31);
    let candidate = clamped_date(today.year(), today.month(), day);
    let next = if candidate <= today {
        let (year, month) = next_month(today.year(), today.month());
        clamped_date(year, month, day)
    } else {
        candidate
    };
    (next - today).num_days()
}

/// The projected renewal date itself, following the same rolling rule.
pub fn next_renewal_date(renew_day: u32, today: NaiveDate) -> NaiveDate {
    today + Duration::days(days_until_renewal(renew_day, today))
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn clamped_date(year: i32, month: u32, day: u32) -> NaiveDate {
    let day = day.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = next_month(year, month);
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1).unwrap();
    (first_next - Duration::days(1)).day()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn past_day_rolls_to_next_month() {
        // Day 1 has passed on Jan 15, so the next renewal is Feb 1.
        assert_eq!(days_until_renewal(1, date(2024, 1, 15)), 17);
        assert_eq!(next_renewal_date(1, date(2024, 1, 15)), date(2024, 2, 1));
    }

    #[test]
    fn same_day_counts_as_passed() {
        assert_eq!(next_renewal_date(15, date(2024, 1, 15)), date(2024, 2, 15));
        assert_eq!(days_until_renewal(15, date(2024, 1, 15)), 31);
    }

    #[test]
    fn future_day_stays_in_current_month() {
        assert_eq!(days_until_renewal(20, date(2024, 1, 15)), 5);
        assert_eq!(next_renewal_date(20, date(2024, 1, 15)), date(2024, 1, 20));
    }

    #[test]
    fn renew_day_clamps_to_short_months() {
        // Day 31 in February clamps to the last valid day.
        assert_eq!(next_renewal_date(31, date(2024, 2, 10)), date(2024, 2, 29));
        assert_eq!(next_renewal_date(31, date(2023, 2, 10)), date(2023, 2, 28));
        // Rolling from a 31-day month into a 30-day month clamps too.
        assert_eq!(next_renewal_date(31, date(2024, 3, 31)), date(2024, 4, 30));
    }

    #[test]
    fn december_rolls_into_january() {
        assert_eq!(next_renewal_date(5, date(2024, 12, 20)), date(2025, 1, 5));
        assert_eq!(days_until_renewal(5, date(2024, 12, 20)), 16);
    }

    #[test]
    fn result_is_always_at_least_one_day() {
        for day in 1..=31 {
            let left = days_until_renewal(day, date(2024, 1, 31));
            assert!(left >= 1, "day {} produced {}", day, left);
        }
    }

    #[test]
    fn out_of_range_stored_days_are_clamped() {
        assert_eq!(
            days_until_renewal(99, date(2024, 1, 15)),
            days_until_renewal(31, date(2024, 1, 15))
        );
        assert_eq!(
            days_until_renewal(0, date(2024, 1, 15)),
            days_until_renewal(1, date(2024, 1, 15))
        );
    }
}

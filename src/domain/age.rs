//! Child age derivation from date of birth. Ages are never stored;
//! both the month count and the display string are computed per read.

use chrono::{Datelike, NaiveDate};

/// Whole calendar months elapsed between `dob` and `today`. A month
/// only counts once its day-of-month has been reached, so a child born
/// on the 20th is zero months old on the 19th of the following month.
/// A date of birth in the future yields zero.
pub fn age_in_months(dob: NaiveDate, today: NaiveDate) -> i32 {
    if today < dob {
        return 0;
    }
    let mut months =
        (today.year() - dob.year()) * 12 + (today.month() as i32 - dob.month() as i32);
    if today.day() < dob.day() {
        months -= 1;
    }
    months.max(0)
}

/// Human-readable age such as "3 months", "1 year", or
/// "2 years 5 months".
pub fn age_string(dob: NaiveDate, today: NaiveDate) -> String {
    let months = age_in_months(dob, today);
    let years = months / 12;
    let rem = months % 12;

    let plural = |n: i32, unit: &str| {
        if n == 1 {
            format!("{n} {unit}")
        } else {
            format!("{n} {unit}s")
        }
    };

    if years == 0 {
        plural(rem, "month")
    } else if rem == 0 {
        plural(years, "year")
    } else {
        format!("{} {}", plural(years, "year"), plural(rem, "month"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_age_in_months_basic() {
        assert_eq!(age_in_months(d(2023, 1, 15), d(2024, 1, 15)), 12);
        assert_eq!(age_in_months(d(2023, 1, 15), d(2023, 4, 15)), 3);
    }

    #[test]
    fn test_month_counts_only_after_day_reached() {
        assert_eq!(age_in_months(d(2024, 1, 20), d(2024, 2, 19)), 0);
        assert_eq!(age_in_months(d(2024, 1, 20), d(2024, 2, 20)), 1);
    }

    #[test]
    fn test_future_dob_clamps_to_zero() {
        assert_eq!(age_in_months(d(2025, 1, 1), d(2024, 6, 1)), 0);
    }

    #[test]
    fn test_age_string_months_only() {
        assert_eq!(age_string(d(2024, 3, 1), d(2024, 6, 1)), "3 months");
        assert_eq!(age_string(d(2024, 5, 1), d(2024, 6, 1)), "1 month");
        assert_eq!(age_string(d(2024, 6, 1), d(2024, 6, 1)), "0 months");
    }

    #[test]
    fn test_age_string_years() {
        assert_eq!(age_string(d(2023, 6, 1), d(2024, 6, 1)), "1 year");
        assert_eq!(age_string(d(2022, 6, 1), d(2024, 6, 1)), "2 years");
    }

    #[test]
    fn test_age_string_years_and_months() {
        assert_eq!(age_string(d(2022, 1, 1), d(2024, 6, 1)), "2 years 5 months");
        assert_eq!(age_string(d(2023, 5, 1), d(2024, 6, 1)), "1 year 1 month");
    }
}

//! Immunization due-date arithmetic. The upcoming/overdue split is
//! computed against a reference date at read time; nothing here is
//! ever persisted.

use chrono::NaiveDate;

/// How an immunization's next due date relates to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    /// Due within the lookahead window, inclusive of today.
    Upcoming { days_until_due: i64 },
    /// Past due.
    Overdue { days_overdue: i64 },
    /// Either no due date is recorded, or the due date is beyond the
    /// lookahead window.
    None,
}

/// Classify a next-due date relative to `today` with an inclusive
/// lookahead window of `window_days`. A dose due today counts as
/// upcoming with zero days until due, never overdue.
pub fn due_status(next_due: Option<NaiveDate>, today: NaiveDate, window_days: i64) -> DueStatus {
    let Some(due) = next_due else {
        return DueStatus::None;
    };
    let delta = (due - today).num_days();
    if delta < 0 {
        DueStatus::Overdue { days_overdue: -delta }
    } else if delta <= window_days {
        DueStatus::Upcoming { days_until_due: delta }
    } else {
        DueStatus::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_due_today_is_upcoming_zero_days() {
        let today = d(2024, 6, 15);
        assert_eq!(
            due_status(Some(today), today, 30),
            DueStatus::Upcoming { days_until_due: 0 }
        );
    }

    #[test]
    fn test_window_boundary_inclusive() {
        let today = d(2024, 6, 1);
        assert_eq!(
            due_status(Some(d(2024, 7, 1)), today, 30),
            DueStatus::Upcoming { days_until_due: 30 }
        );
        assert_eq!(due_status(Some(d(2024, 7, 2)), today, 30), DueStatus::None);
    }

    #[test]
    fn test_overdue_counts_days() {
        let today = d(2024, 6, 15);
        assert_eq!(
            due_status(Some(d(2024, 6, 10)), today, 30),
            DueStatus::Overdue { days_overdue: 5 }
        );
        assert_eq!(
            due_status(Some(d(2024, 6, 14)), today, 30),
            DueStatus::Overdue { days_overdue: 1 }
        );
    }

    #[test]
    fn test_no_due_date_is_inert() {
        assert_eq!(due_status(None, d(2024, 6, 15), 30), DueStatus::None);
    }

    #[test]
    fn test_overdue_ignores_window() {
        // A dose 400 days overdue still reports, regardless of window.
        let today = d(2024, 6, 15);
        assert_eq!(
            due_status(Some(d(2023, 5, 12)), today, 30),
            DueStatus::Overdue { days_overdue: 400 }
        );
    }

    #[test]
    fn test_crosses_month_and_year_boundaries() {
        let today = d(2024, 12, 25);
        assert_eq!(
            due_status(Some(d(2025, 1, 10)), today, 30),
            DueStatus::Upcoming { days_until_due: 16 }
        );
    }
}

//! Calendar arithmetic shared by date-only and date-time series.
//!
//! Month steps clamp to the last day of the target month: Jan 31 plus one
//! month is Feb 28 (or 29), never Mar 2 or 3.

use std::fmt::Debug;

use chrono::{Days, Months, NaiveDate, NaiveDateTime, NaiveTime};

/// A point on the civil calendar that recurrence steps can be applied to.
pub trait CalendarPoint: Copy + Ord + Debug {
    /// `None` when the result leaves chrono's representable range.
    fn plus_days(self, days: u64) -> Option<Self>;

    /// Same day-of-month, clamped to the target month's length.
    fn plus_months(self, months: u32) -> Option<Self>;

    /// Earliest point on `date`. Date-only end dates bound a series here.
    fn day_start(date: NaiveDate) -> Self;

    fn calendar_date(self) -> NaiveDate;
}

impl CalendarPoint for NaiveDate {
    fn plus_days(self, days: u64) -> Option<Self> {
        self.checked_add_days(Days::new(days))
    }

    fn plus_months(self, months: u32) -> Option<Self> {
        self.checked_add_months(Months::new(months))
    }

    fn day_start(date: NaiveDate) -> Self {
        date
    }

    fn calendar_date(self) -> NaiveDate {
        self
    }
}

impl CalendarPoint for NaiveDateTime {
    fn plus_days(self, days: u64) -> Option<Self> {
        self.checked_add_days(Days::new(days))
    }

    fn plus_months(self, months: u32) -> Option<Self> {
        self.checked_add_months(Months::new(months))
    }

    fn day_start(date: NaiveDate) -> Self {
        date.and_time(NaiveTime::MIN)
    }

    fn calendar_date(self) -> NaiveDate {
        self.date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_step_keeps_day_of_month() {
        assert_eq!(date(2024, 1, 15).plus_months(1), Some(date(2024, 2, 15)));
        assert_eq!(date(2024, 11, 30).plus_months(3), Some(date(2025, 2, 28)));
    }

    #[test]
    fn month_step_clamps_to_month_end() {
        assert_eq!(date(2024, 1, 31).plus_months(1), Some(date(2024, 2, 29)));
        assert_eq!(date(2023, 1, 31).plus_months(1), Some(date(2023, 2, 28)));
        assert_eq!(date(2024, 3, 31).plus_months(1), Some(date(2024, 4, 30)));
    }

    #[test]
    fn datetime_month_step_keeps_time_of_day() {
        let start = date(2024, 1, 31).and_hms_opt(9, 30, 0).unwrap();
        assert_eq!(
            start.plus_months(1),
            Some(date(2024, 2, 29).and_hms_opt(9, 30, 0).unwrap())
        );
    }

    #[test]
    fn day_step_crosses_year_boundary() {
        assert_eq!(date(2024, 12, 20).plus_days(30), Some(date(2025, 1, 19)));
    }

    #[test]
    fn overflow_yields_none() {
        assert_eq!(NaiveDate::MAX.plus_days(1), None);
        assert_eq!(NaiveDate::MAX.plus_months(1), None);
    }

    #[test]
    fn day_start_is_midnight() {
        let start = NaiveDateTime::day_start(date(2024, 3, 1));
        assert_eq!(start, date(2024, 3, 1).and_hms_opt(0, 0, 0).unwrap());
        assert!(start < date(2024, 3, 1).and_hms_opt(9, 0, 0).unwrap());
        assert_eq!(NaiveDate::day_start(date(2024, 3, 1)), date(2024, 3, 1));
    }
}

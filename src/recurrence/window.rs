use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::Serialize;

use crate::config::PROJECTION_HORIZON_DAYS;

/// Lower bound and projection horizon for one expansion call.
///
/// Built per request from the caller's clock; nothing here reads the time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectionWindow {
    pub from: NaiveDateTime,
    pub horizon: NaiveDateTime,
}

impl ProjectionWindow {
    pub fn new(from: NaiveDateTime, horizon: NaiveDateTime) -> Self {
        Self { from, horizon }
    }

    /// `now` through `now + PROJECTION_HORIZON_DAYS`.
    pub fn starting_at(now: NaiveDateTime) -> Self {
        Self {
            from: now,
            horizon: offset_days(now, PROJECTION_HORIZON_DAYS),
        }
    }

    /// Instant `days` after the window start, capped at the horizon.
    pub fn cutoff_after_days(&self, days: i64) -> NaiveDateTime {
        offset_days(self.from, days).min(self.horizon)
    }

    /// Date-only bounds for refill projection. The start day is included whole,
    /// so a refill due today still shows even when `from` is mid-day.
    pub fn date_bounds(&self) -> (NaiveDate, NaiveDate) {
        (self.from.date(), self.horizon.date())
    }
}

fn offset_days(start: NaiveDateTime, days: i64) -> NaiveDateTime {
    TimeDelta::try_days(days)
        .and_then(|delta| start.checked_add_signed(delta))
        .unwrap_or(NaiveDateTime::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn default_window_spans_ninety_days() {
        let window = ProjectionWindow::starting_at(at(2024, 1, 1, 10));
        assert_eq!(window.from, at(2024, 1, 1, 10));
        assert_eq!(window.horizon, at(2024, 3, 31, 10));
    }

    #[test]
    fn cutoff_is_capped_by_horizon() {
        let window = ProjectionWindow::new(at(2024, 1, 1, 0), at(2024, 1, 5, 0));
        assert_eq!(window.cutoff_after_days(7), at(2024, 1, 5, 0));
        assert_eq!(window.cutoff_after_days(2), at(2024, 1, 3, 0));
    }

    #[test]
    fn date_bounds_drop_time_of_day() {
        let window = ProjectionWindow::new(at(2024, 1, 1, 15), at(2024, 3, 31, 15));
        let (from, horizon) = window.date_bounds();
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(horizon, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
    }
}

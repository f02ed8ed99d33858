//! Occurrence generation for a single series.

use chrono::{NaiveDate, NaiveDateTime};

use super::calendar::CalendarPoint;
use crate::config::MAX_OCCURRENCES_PER_SERIES;
use crate::models::enums::{AppointmentRepeat, RefillSchedule};

/// Distance between two consecutive occurrences of a repeating series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Days(u32),
    Months(u32),
}

impl Step {
    /// The `n`-th occurrence after `anchor`, measured from the anchor itself so
    /// a clamped month (Jan 31 → Feb 29) does not drag later months with it.
    pub fn nth_after<T: CalendarPoint>(self, anchor: T, n: u32) -> Option<T> {
        match self {
            Step::Days(days) => anchor.plus_days(u64::from(days) * u64::from(n)),
            Step::Months(months) => anchor.plus_months(months.checked_mul(n)?),
        }
    }
}

impl AppointmentRepeat {
    /// `None` for a one-off visit.
    pub fn step(self) -> Option<Step> {
        match self {
            AppointmentRepeat::None => None,
            AppointmentRepeat::Weekly => Some(Step::Days(7)),
            AppointmentRepeat::Monthly => Some(Step::Months(1)),
        }
    }
}

impl RefillSchedule {
    pub fn step(self) -> Step {
        match self {
            RefillSchedule::Every30Days => Step::Days(30),
            RefillSchedule::Weekly => Step::Days(7),
            RefillSchedule::Monthly => Step::Months(1),
            RefillSchedule::Quarterly => Step::Months(3),
        }
    }
}

/// The earlier of a series' own end and the projection horizon.
pub fn effective_end<T: CalendarPoint>(hard_end: Option<T>, horizon: T) -> T {
    match hard_end {
        Some(end) if end < horizon => end,
        _ => horizon,
    }
}

/// Produce every occurrence in `[anchor, min(hard_end, horizon)]`, in order.
///
/// A `None` step yields at most the anchor itself. Generation also stops if
/// the calendar arithmetic overflows or the per-series cap is reached.
pub fn generate<T: CalendarPoint>(
    anchor: T,
    step: Option<Step>,
    hard_end: Option<T>,
    horizon: T,
) -> Vec<T> {
    let end = effective_end(hard_end, horizon);
    if anchor > end {
        return Vec::new();
    }

    let Some(step) = step else {
        return vec![anchor];
    };

    let mut occurrences = vec![anchor];
    let mut n: u32 = 1;
    while let Some(next) = step.nth_after(anchor, n) {
        if next > end {
            break;
        }
        if occurrences.len() >= MAX_OCCURRENCES_PER_SERIES {
            tracing::warn!(
                ?anchor,
                ?end,
                cap = MAX_OCCURRENCES_PER_SERIES,
                "Series truncated at occurrence cap"
            );
            break;
        }
        occurrences.push(next);
        n += 1;
    }

    occurrences
}

/// Appointment occurrences from the stored rule text. The end date bounds the
/// series at midnight, so a 09:00 visit on the end date is not produced.
pub fn generate_appointment_occurrences(
    first: NaiveDateTime,
    repeat: &str,
    end_date: Option<NaiveDate>,
    horizon: NaiveDateTime,
) -> Vec<NaiveDateTime> {
    let step = AppointmentRepeat::from_stored(repeat).step();
    let hard_end = end_date.map(NaiveDateTime::day_start);
    generate(first, step, hard_end, horizon)
}

/// Refill dates from the stored schedule text (unknown schedules refill monthly).
pub fn generate_refill_occurrences(
    first_refill: NaiveDate,
    schedule: &str,
    end_date: Option<NaiveDate>,
    horizon: NaiveDate,
) -> Vec<NaiveDate> {
    let step = RefillSchedule::from_stored(schedule).step();
    generate(first_refill, Some(step), end_date, horizon)
}

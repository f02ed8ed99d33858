//! Expansion of many series into one time-ordered occurrence list.

use chrono::{NaiveDate, NaiveDateTime};

use super::generator::generate;
use super::series::RecurringSeries;
use crate::models::{Appointment, AppointmentOccurrence, Prescription, RefillOccurrence};

/// Expand every series between `from` and `horizon` (both inclusive) and
/// return the occurrences sorted by instant. Ties keep no particular order.
pub fn expand<S: RecurringSeries>(
    series: &[S],
    from: S::Point,
    horizon: S::Point,
) -> Vec<S::Occurrence> {
    let mut tagged: Vec<(S::Point, S::Occurrence)> = Vec::new();

    for item in series {
        let points = generate(item.anchor(), item.step(), item.hard_end(), horizon);
        tagged.extend(
            points
                .into_iter()
                .filter(|point| *point >= from && *point <= horizon)
                .map(|point| (point, item.occurrence_at(point))),
        );
    }

    tagged.sort_by_key(|(point, _)| *point);
    tagged.into_iter().map(|(_, occurrence)| occurrence).collect()
}

/// Upcoming appointment visits across all series.
pub fn expand_appointments(
    appointments: &[Appointment],
    from: NaiveDateTime,
    horizon: NaiveDateTime,
) -> Vec<AppointmentOccurrence> {
    let occurrences = expand(appointments, from, horizon);
    tracing::debug!(
        series = appointments.len(),
        occurrences = occurrences.len(),
        "Expanded appointment series"
    );
    occurrences
}

/// Projected refill dates across all prescriptions.
pub fn expand_refills(
    prescriptions: &[Prescription],
    from: NaiveDate,
    horizon: NaiveDate,
) -> Vec<RefillOccurrence> {
    let occurrences = expand(prescriptions, from, horizon);
    tracing::debug!(
        series = prescriptions.len(),
        occurrences = occurrences.len(),
        "Expanded refill series"
    );
    occurrences
}

//! Binds stored series records to the generator.

use chrono::{NaiveDate, NaiveDateTime};

use super::calendar::CalendarPoint;
use super::generator::Step;
use crate::models::enums::{AppointmentRepeat, RefillSchedule};
use crate::models::{Appointment, AppointmentOccurrence, Prescription, RefillOccurrence};

/// A stored record that describes a repeating series of dated events.
pub trait RecurringSeries {
    type Point: CalendarPoint;
    type Occurrence;

    fn anchor(&self) -> Self::Point;
    fn step(&self) -> Option<Step>;
    fn hard_end(&self) -> Option<Self::Point>;

    /// Tag one generated point with this series' descriptive fields.
    fn occurrence_at(&self, point: Self::Point) -> Self::Occurrence;
}

impl RecurringSeries for Appointment {
    type Point = NaiveDateTime;
    type Occurrence = AppointmentOccurrence;

    fn anchor(&self) -> NaiveDateTime {
        self.datetime
    }

    fn step(&self) -> Option<Step> {
        AppointmentRepeat::from_stored(&self.repeat).step()
    }

    fn hard_end(&self) -> Option<NaiveDateTime> {
        self.end_date.map(NaiveDateTime::day_start)
    }

    fn occurrence_at(&self, point: NaiveDateTime) -> AppointmentOccurrence {
        AppointmentOccurrence {
            datetime: point,
            provider: self.provider.clone(),
            repeat: self.repeat.clone(),
            appointment_id: self.id,
        }
    }
}

impl RecurringSeries for Prescription {
    type Point = NaiveDate;
    type Occurrence = RefillOccurrence;

    fn anchor(&self) -> NaiveDate {
        self.refill_on
    }

    fn step(&self) -> Option<Step> {
        Some(RefillSchedule::from_stored(&self.refill_schedule).step())
    }

    fn hard_end(&self) -> Option<NaiveDate> {
        self.end_date
    }

    fn occurrence_at(&self, point: NaiveDate) -> RefillOccurrence {
        RefillOccurrence {
            refill_date: point,
            medication: self.medication.clone(),
            dosage: self.dosage.clone(),
            quantity: self.quantity,
            refill_schedule: self.refill_schedule.clone(),
            prescription_id: self.id,
        }
    }
}

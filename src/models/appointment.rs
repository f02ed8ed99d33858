use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored appointment series: the first visit plus its repetition rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub provider: String,
    pub datetime: NaiveDateTime,
    /// Stored rule text, interpreted through `AppointmentRepeat::from_stored`.
    pub repeat: String,
    pub end_date: Option<NaiveDate>,
}

/// One concrete visit generated from an `Appointment` series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentOccurrence {
    pub datetime: NaiveDateTime,
    pub provider: String,
    pub repeat: String,
    pub appointment_id: Uuid,
}

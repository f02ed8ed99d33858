use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored prescription with its refill cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub medication: String,
    pub dosage: String,
    pub quantity: u32,
    pub refill_on: NaiveDate,
    /// Stored schedule text, interpreted through `RefillSchedule::from_stored`.
    pub refill_schedule: String,
    pub end_date: Option<NaiveDate>,
}

/// One projected refill date for a `Prescription`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefillOccurrence {
    pub refill_date: NaiveDate,
    pub medication: String,
    pub dosage: String,
    pub quantity: u32,
    pub refill_schedule: String,
    pub prescription_id: Uuid,
}

//! JSON seed import for demo and first-run data.
//!
//! Seeding is keyed by patient email: a patient already present is reused,
//! and their appointments or prescriptions are only inserted when they have
//! none yet, so running the same seed twice changes nothing.

use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::Deserialize;
use uuid::Uuid;

use super::repository::{
    count_appointments_for_patient, count_prescriptions_for_patient, get_patient_by_email,
    insert_appointment, insert_patient, insert_prescription,
};
use super::DatabaseError;
use crate::models::input::{clamp_quantity, lenient_quantity, parse_date_input, parse_datetime_input};
use crate::models::{Appointment, Patient, Prescription};
use crate::reference::ReferenceData;

#[derive(Debug, Clone, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<SeedPatient>,
    #[serde(flatten)]
    pub reference: ReferenceData,
}

/// Seed patient. Any `password` field in the file is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedPatient {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub appointments: Vec<SeedAppointment>,
    #[serde(default)]
    pub prescriptions: Vec<SeedPrescription>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedAppointment {
    pub provider: String,
    pub datetime: String,
    #[serde(default)]
    pub repeat: Option<String>,
    #[serde(default, alias = "endDate")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedPrescription {
    pub medication: String,
    pub dosage: String,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: i64,
    #[serde(alias = "refillOn")]
    pub refill_on: String,
    #[serde(default, alias = "refillSchedule")]
    pub refill_schedule: Option<String>,
    #[serde(default, alias = "endDate")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub patients_created: usize,
    pub appointments_created: usize,
    pub prescriptions_created: usize,
}

pub fn parse_seed(json: &str) -> Result<SeedData, DatabaseError> {
    serde_json::from_str(json).map_err(|e| DatabaseError::Seed(e.to_string()))
}

/// Parse and apply a seed document in one step.
pub fn seed_from_json(
    conn: &Connection,
    json: &str,
    now: NaiveDateTime,
) -> Result<SeedReport, DatabaseError> {
    apply_seed(conn, &parse_seed(json)?, now)
}

/// Insert the seed's patients and series inside one transaction.
pub fn apply_seed(
    conn: &Connection,
    seed: &SeedData,
    now: NaiveDateTime,
) -> Result<SeedReport, DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    let mut report = SeedReport::default();

    for user in &seed.users {
        let patient = match get_patient_by_email(&tx, user.email.trim())? {
            Some(existing) => existing,
            None => {
                let patient = Patient {
                    id: Uuid::new_v4(),
                    name: user.name.trim().to_string(),
                    email: user.email.trim().to_string(),
                    created_at: now,
                };
                insert_patient(&tx, &patient)?;
                report.patients_created += 1;
                patient
            }
        };

        if count_appointments_for_patient(&tx, &patient.id)? == 0 {
            for appt in &user.appointments {
                insert_appointment(&tx, &seed_appointment(patient.id, appt)?)?;
                report.appointments_created += 1;
            }
        }

        if count_prescriptions_for_patient(&tx, &patient.id)? == 0 {
            for rx in &user.prescriptions {
                insert_prescription(&tx, &seed_prescription(patient.id, rx)?)?;
                report.prescriptions_created += 1;
            }
        }
    }

    tx.commit()?;
    tracing::info!(
        patients = report.patients_created,
        appointments = report.appointments_created,
        prescriptions = report.prescriptions_created,
        "Seed applied"
    );
    Ok(report)
}

fn seed_appointment(patient_id: Uuid, appt: &SeedAppointment) -> Result<Appointment, DatabaseError> {
    Ok(Appointment {
        id: Uuid::new_v4(),
        patient_id,
        provider: appt.provider.trim().to_string(),
        datetime: parse_datetime_input("datetime", &appt.datetime)?,
        repeat: appt
            .repeat
            .clone()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| "none".into()),
        end_date: appt
            .end_date
            .as_deref()
            .map(|d| parse_date_input("end_date", d))
            .transpose()?,
    })
}

fn seed_prescription(patient_id: Uuid, rx: &SeedPrescription) -> Result<Prescription, DatabaseError> {
    Ok(Prescription {
        id: Uuid::new_v4(),
        patient_id,
        medication: rx.medication.trim().to_string(),
        dosage: rx.dosage.trim().to_string(),
        quantity: clamp_quantity(rx.quantity),
        refill_on: parse_date_input("refill_on", &rx.refill_on)?,
        refill_schedule: rx
            .refill_schedule
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "monthly".into()),
        end_date: rx
            .end_date
            .as_deref()
            .map(|d| parse_date_input("end_date", d))
            .transpose()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{list_appointments_for_patient, list_patients, list_prescriptions_for_patient};
    use crate::db::sqlite::open_memory_database;
    use chrono::NaiveDate;

    const SEED: &str = r#"{
        "users": [
            {
                "id": 1,
                "name": "Mark Johnson",
                "email": "mark@some-email-provider.net",
                "password": "Password123!",
                "appointments": [
                    { "id": 1, "provider": "Dr Kim West", "datetime": "2025-09-16T16:30:00.000-07:00", "repeat": "weekly" },
                    { "id": 2, "provider": "Dr Lin James", "datetime": "2025-09-19T18:30:00.000-07:00", "repeat": "monthly" }
                ],
                "prescriptions": [
                    { "id": 1, "medication": "Lexapro", "dosage": "5mg", "quantity": 2, "refill_on": "2025-10-05", "refill_schedule": "monthly" },
                    { "id": 2, "medication": "Ozempic", "dosage": "1mg", "quantity": -1, "refill_on": "2025-10-10", "refill_schedule": "" }
                ]
            }
        ],
        "medications": ["Lexapro", "Ozempic"],
        "dosages": ["1mg", "5mg"]
    }"#;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 1).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn seed_creates_patient_and_series() {
        let conn = open_memory_database().unwrap();
        let seed = parse_seed(SEED).unwrap();
        assert_eq!(seed.reference.medications, vec!["Lexapro", "Ozempic"]);

        let report = apply_seed(&conn, &seed, now()).unwrap();
        assert_eq!(
            report,
            SeedReport {
                patients_created: 1,
                appointments_created: 2,
                prescriptions_created: 2,
            }
        );

        let patients = list_patients(&conn).unwrap();
        assert_eq!(patients.len(), 1);
        let appointments = list_appointments_for_patient(&conn, &patients[0].id).unwrap();
        // 16:30 at UTC-7 is 23:30 UTC
        assert_eq!(
            appointments[0].datetime,
            NaiveDate::from_ymd_opt(2025, 9, 16).unwrap().and_hms_opt(23, 30, 0).unwrap()
        );
        let prescriptions = list_prescriptions_for_patient(&conn, &patients[0].id).unwrap();
        assert_eq!(prescriptions[1].quantity, 0);
        assert_eq!(prescriptions[1].refill_schedule, "monthly");
    }

    #[test]
    fn seeding_twice_is_a_no_op() {
        let conn = open_memory_database().unwrap();
        seed_from_json(&conn, SEED, now()).unwrap();
        let second = seed_from_json(&conn, SEED, now()).unwrap();
        assert_eq!(second, SeedReport::default());
        assert_eq!(list_patients(&conn).unwrap().len(), 1);
    }

    #[test]
    fn bad_date_rolls_back_whole_seed() {
        let conn = open_memory_database().unwrap();
        let seed = parse_seed(
            r#"{ "users": [ { "name": "A", "email": "a@example.com",
                "appointments": [ { "provider": "Dr X", "datetime": "tomorrow" } ] } ] }"#,
        )
        .unwrap();
        let err = apply_seed(&conn, &seed, now()).unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidDate { .. }));
        assert!(list_patients(&conn).unwrap().is_empty());
    }

    #[test]
    fn camel_case_series_fields_are_read() {
        let seed = parse_seed(
            r#"{ "users": [ { "name": "A", "email": "a@example.com",
                "appointments": [ { "provider": "Dr X", "datetime": "2025-09-02T09:00", "repeat": "weekly", "endDate": "2025-10-01" } ],
                "prescriptions": [ { "medication": "Lexapro", "dosage": "5mg", "quantity": "30",
                    "refillOn": "2025-09-05", "refillSchedule": "quarterly", "endDate": "2026-01-01" } ] } ] }"#,
        )
        .unwrap();
        let patient = &seed.users[0];
        assert_eq!(patient.appointments[0].end_date.as_deref(), Some("2025-10-01"));
        let rx = &patient.prescriptions[0];
        assert_eq!(rx.quantity, 30);
        assert_eq!(rx.refill_on, "2025-09-05");
        assert_eq!(rx.refill_schedule.as_deref(), Some("quarterly"));
        assert_eq!(rx.end_date.as_deref(), Some("2026-01-01"));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(parse_seed("{ not json"), Err(DatabaseError::Seed(_))));
    }
}

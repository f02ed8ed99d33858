//! Portal dashboard, "view all" lists and the admin roster.
//!
//! Every view is built from stored series plus an explicit `now`; the
//! projection window is recomputed on each call.

use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

use crate::config::DASHBOARD_WINDOW_DAYS;
use crate::db::repository::{
    get_patient, list_appointments_for_patient, list_patients, list_prescriptions_for_patient,
};
use crate::db::DatabaseError;
use crate::models::enums::RefillSchedule;
use crate::models::{AppointmentOccurrence, Patient, RefillOccurrence};
use crate::recurrence::{expand_appointments, expand_refills, ProjectionWindow};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Portal landing view: what is coming up in the next few days.
#[derive(Debug, Clone, Serialize)]
pub struct PatientDashboard {
    pub patient: Patient,
    pub window: ProjectionWindow,
    pub window_end: NaiveDateTime,
    pub upcoming_appointments: Vec<AppointmentOccurrence>,
    pub upcoming_refills: Vec<RefillOccurrence>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentList {
    pub patient_id: Uuid,
    pub window: ProjectionWindow,
    pub appointments: Vec<AppointmentOccurrence>,
}

/// A refill occurrence with its display label.
#[derive(Debug, Clone, Serialize)]
pub struct MedicationListEntry {
    #[serde(flatten)]
    pub refill: RefillOccurrence,
    pub schedule_label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct MedicationList {
    pub patient_id: Uuid,
    pub window: ProjectionWindow,
    pub refills: Vec<MedicationListEntry>,
}

/// Admin console row.
#[derive(Debug, Clone, Serialize)]
pub struct PatientRosterEntry {
    pub patient: Patient,
    pub next_appointment: Option<AppointmentOccurrence>,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

fn require_patient(conn: &Connection, patient_id: &Uuid) -> Result<Patient, DatabaseError> {
    get_patient(conn, patient_id)?.ok_or_else(|| DatabaseError::NotFound {
        entity_type: "patient".into(),
        id: patient_id.to_string(),
    })
}

fn project_appointments(
    conn: &Connection,
    patient_id: &Uuid,
    window: &ProjectionWindow,
) -> Result<Vec<AppointmentOccurrence>, DatabaseError> {
    let series = list_appointments_for_patient(conn, patient_id)?;
    Ok(expand_appointments(&series, window.from, window.horizon))
}

fn project_refills(
    conn: &Connection,
    patient_id: &Uuid,
    window: &ProjectionWindow,
) -> Result<Vec<RefillOccurrence>, DatabaseError> {
    let series = list_prescriptions_for_patient(conn, patient_id)?;
    let (from, horizon) = window.date_bounds();
    Ok(expand_refills(&series, from, horizon))
}

pub fn build_dashboard(
    conn: &Connection,
    patient_id: &Uuid,
    now: NaiveDateTime,
) -> Result<PatientDashboard, DatabaseError> {
    let patient = require_patient(conn, patient_id)?;
    let window = ProjectionWindow::starting_at(now);
    let window_end = window.cutoff_after_days(DASHBOARD_WINDOW_DAYS);

    let mut upcoming_appointments = project_appointments(conn, patient_id, &window)?;
    upcoming_appointments.retain(|o| o.datetime <= window_end);

    let mut upcoming_refills = project_refills(conn, patient_id, &window)?;
    upcoming_refills.retain(|o| o.refill_date <= window_end.date());

    Ok(PatientDashboard {
        patient,
        window,
        window_end,
        upcoming_appointments,
        upcoming_refills,
    })
}

pub fn build_appointment_list(
    conn: &Connection,
    patient_id: &Uuid,
    now: NaiveDateTime,
) -> Result<AppointmentList, DatabaseError> {
    require_patient(conn, patient_id)?;
    let window = ProjectionWindow::starting_at(now);
    Ok(AppointmentList {
        patient_id: *patient_id,
        window,
        appointments: project_appointments(conn, patient_id, &window)?,
    })
}

pub fn build_medication_list(
    conn: &Connection,
    patient_id: &Uuid,
    now: NaiveDateTime,
) -> Result<MedicationList, DatabaseError> {
    require_patient(conn, patient_id)?;
    let window = ProjectionWindow::starting_at(now);
    let refills = project_refills(conn, patient_id, &window)?
        .into_iter()
        .map(|refill| MedicationListEntry {
            schedule_label: RefillSchedule::from_stored(&refill.refill_schedule).label(),
            refill,
        })
        .collect();
    Ok(MedicationList {
        patient_id: *patient_id,
        window,
        refills,
    })
}

/// All patients with their next visit inside the projection window.
pub fn build_roster(
    conn: &Connection,
    now: NaiveDateTime,
) -> Result<Vec<PatientRosterEntry>, DatabaseError> {
    let window = ProjectionWindow::starting_at(now);
    list_patients(conn)?
        .into_iter()
        .map(|patient| {
            let next_appointment = project_appointments(conn, &patient.id, &window)?
                .into_iter()
                .next();
            Ok(PatientRosterEntry {
                patient,
                next_appointment,
            })
        })
        .collect()
}

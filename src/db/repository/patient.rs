use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use uuid::Uuid;

use super::{expect_affected, format_datetime, parse_datetime, parse_uuid};
use crate::db::DatabaseError;
use crate::models::*;

/// Partial update for a patient; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct PatientChanges {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl PatientChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, name, email, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            patient.id.to_string(),
            patient.name,
            patient.email,
            format_datetime(&patient.created_at),
        ],
    )
    .map_err(email_conflict)?;
    Ok(())
}

pub fn get_patient(conn: &Connection, id: &Uuid) -> Result<Option<Patient>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, name, email, created_at FROM patients WHERE id = ?1",
            params![id.to_string()],
            patient_row_from_rusqlite,
        )
        .optional()?;
    row.map(patient_from_row).transpose()
}

pub fn get_patient_by_email(conn: &Connection, email: &str) -> Result<Option<Patient>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, name, email, created_at FROM patients WHERE email = ?1",
            params![email],
            patient_row_from_rusqlite,
        )
        .optional()?;
    row.map(patient_from_row).transpose()
}

/// All patients, oldest registration first.
pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, created_at FROM patients ORDER BY created_at ASC, name ASC",
    )?;
    let rows = stmt.query_map([], patient_row_from_rusqlite)?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(patient_from_row(row?)?);
    }
    Ok(patients)
}

pub fn update_patient(
    conn: &Connection,
    id: &Uuid,
    changes: &PatientChanges,
) -> Result<Patient, DatabaseError> {
    let mut patient = get_patient(conn, id)?.ok_or_else(|| DatabaseError::NotFound {
        entity_type: "patient".into(),
        id: id.to_string(),
    })?;

    if let Some(name) = &changes.name {
        patient.name = name.clone();
    }
    if let Some(email) = &changes.email {
        patient.email = email.clone();
    }

    conn.execute(
        "UPDATE patients SET name = ?2, email = ?3 WHERE id = ?1",
        params![id.to_string(), patient.name, patient.email],
    )
    .map_err(email_conflict)?;
    Ok(patient)
}

/// Deletes the patient and, through the foreign keys, all of their series.
pub fn delete_patient(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected = conn.execute("DELETE FROM patients WHERE id = ?1", params![id.to_string()])?;
    expect_affected(affected, "patient", id)
}

fn email_conflict(err: rusqlite::Error) -> DatabaseError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            DatabaseError::ConstraintViolation("Email already registered".into())
        }
        _ => DatabaseError::Sqlite(err),
    }
}

struct PatientRow {
    id: String,
    name: String,
    email: String,
    created_at: String,
}

fn patient_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<PatientRow, rusqlite::Error> {
    Ok(PatientRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn patient_from_row(row: PatientRow) -> Result<Patient, DatabaseError> {
    Ok(Patient {
        id: parse_uuid(&row.id)?,
        name: row.name,
        email: row.email,
        created_at: parse_datetime("created_at", &row.created_at)?,
    })
}

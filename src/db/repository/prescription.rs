use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{expect_affected, format_date, parse_date, parse_uuid};
use crate::db::DatabaseError;
use crate::models::*;

const PRESCRIPTION_COLUMNS: &str =
    "id, patient_id, medication, dosage, quantity, refill_on, refill_schedule, end_date";

pub fn insert_prescription(conn: &Connection, rx: &Prescription) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO prescriptions (id, patient_id, medication, dosage, quantity, refill_on,
         refill_schedule, end_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            rx.id.to_string(),
            rx.patient_id.to_string(),
            rx.medication,
            rx.dosage,
            rx.quantity,
            format_date(&rx.refill_on),
            rx.refill_schedule,
            rx.end_date.as_ref().map(format_date),
        ],
    )?;
    Ok(())
}

pub fn get_prescription(conn: &Connection, id: &Uuid) -> Result<Option<Prescription>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions WHERE id = ?1"),
            params![id.to_string()],
            prescription_row_from_rusqlite,
        )
        .optional()?;
    row.map(prescription_from_row).transpose()
}

/// A patient's prescriptions, earliest first refill first.
pub fn list_prescriptions_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<Prescription>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions WHERE patient_id = ?1 ORDER BY refill_on ASC"
    ))?;
    let rows = stmt.query_map(params![patient_id.to_string()], prescription_row_from_rusqlite)?;

    let mut prescriptions = Vec::new();
    for row in rows {
        prescriptions.push(prescription_from_row(row?)?);
    }
    Ok(prescriptions)
}

/// Overwrite every mutable field of an existing prescription.
pub fn update_prescription(conn: &Connection, rx: &Prescription) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE prescriptions SET medication = ?2, dosage = ?3, quantity = ?4, refill_on = ?5,
         refill_schedule = ?6, end_date = ?7
         WHERE id = ?1",
        params![
            rx.id.to_string(),
            rx.medication,
            rx.dosage,
            rx.quantity,
            format_date(&rx.refill_on),
            rx.refill_schedule,
            rx.end_date.as_ref().map(format_date),
        ],
    )?;
    expect_affected(affected, "prescription", &rx.id)
}

pub fn delete_prescription(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected = conn.execute("DELETE FROM prescriptions WHERE id = ?1", params![id.to_string()])?;
    expect_affected(affected, "prescription", id)
}

pub fn count_prescriptions_for_patient(conn: &Connection, patient_id: &Uuid) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM prescriptions WHERE patient_id = ?1",
        params![patient_id.to_string()],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}

struct PrescriptionRow {
    id: String,
    patient_id: String,
    medication: String,
    dosage: String,
    quantity: i64,
    refill_on: String,
    refill_schedule: String,
    end_date: Option<String>,
}

fn prescription_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<PrescriptionRow, rusqlite::Error> {
    Ok(PrescriptionRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        medication: row.get(2)?,
        dosage: row.get(3)?,
        quantity: row.get(4)?,
        refill_on: row.get(5)?,
        refill_schedule: row.get(6)?,
        end_date: row.get(7)?,
    })
}

fn prescription_from_row(row: PrescriptionRow) -> Result<Prescription, DatabaseError> {
    Ok(Prescription {
        id: parse_uuid(&row.id)?,
        patient_id: parse_uuid(&row.patient_id)?,
        medication: row.medication,
        dosage: row.dosage,
        quantity: u32::try_from(row.quantity).map_err(|_| {
            DatabaseError::ConstraintViolation(format!("quantity out of range: {}", row.quantity))
        })?,
        refill_on: parse_date("refill_on", &row.refill_on)?,
        refill_schedule: row.refill_schedule,
        end_date: row
            .end_date
            .as_deref()
            .map(|d| parse_date("end_date", d))
            .transpose()?,
    })
}

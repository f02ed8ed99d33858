use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{
    expect_affected, format_date, format_datetime, parse_date, parse_datetime, parse_uuid,
};
use crate::db::DatabaseError;
use crate::models::*;

const APPOINTMENT_COLUMNS: &str = "id, patient_id, provider, starts_at, repeat_rule, end_date";

pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (id, patient_id, provider, starts_at, repeat_rule, end_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            appt.id.to_string(),
            appt.patient_id.to_string(),
            appt.provider,
            format_datetime(&appt.datetime),
            appt.repeat,
            appt.end_date.as_ref().map(format_date),
        ],
    )?;
    Ok(())
}

pub fn get_appointment(conn: &Connection, id: &Uuid) -> Result<Option<Appointment>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1"),
            params![id.to_string()],
            appointment_row_from_rusqlite,
        )
        .optional()?;
    row.map(appointment_from_row).transpose()
}

/// A patient's appointment series, earliest first visit first.
pub fn list_appointments_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE patient_id = ?1 ORDER BY starts_at ASC"
    ))?;
    let rows = stmt.query_map(params![patient_id.to_string()], appointment_row_from_rusqlite)?;

    let mut appointments = Vec::new();
    for row in rows {
        appointments.push(appointment_from_row(row?)?);
    }
    Ok(appointments)
}

/// Overwrite every mutable field of an existing series.
pub fn update_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "UPDATE appointments SET provider = ?2, starts_at = ?3, repeat_rule = ?4, end_date = ?5
         WHERE id = ?1",
        params![
            appt.id.to_string(),
            appt.provider,
            format_datetime(&appt.datetime),
            appt.repeat,
            appt.end_date.as_ref().map(format_date),
        ],
    )?;
    expect_affected(affected, "appointment", &appt.id)
}

pub fn delete_appointment(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected = conn.execute("DELETE FROM appointments WHERE id = ?1", params![id.to_string()])?;
    expect_affected(affected, "appointment", id)
}

pub fn count_appointments_for_patient(conn: &Connection, patient_id: &Uuid) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM appointments WHERE patient_id = ?1",
        params![patient_id.to_string()],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}

struct AppointmentRow {
    id: String,
    patient_id: String,
    provider: String,
    starts_at: String,
    repeat_rule: String,
    end_date: Option<String>,
}

fn appointment_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<AppointmentRow, rusqlite::Error> {
    Ok(AppointmentRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        provider: row.get(2)?,
        starts_at: row.get(3)?,
        repeat_rule: row.get(4)?,
        end_date: row.get(5)?,
    })
}

fn appointment_from_row(row: AppointmentRow) -> Result<Appointment, DatabaseError> {
    Ok(Appointment {
        id: parse_uuid(&row.id)?,
        patient_id: parse_uuid(&row.patient_id)?,
        provider: row.provider,
        datetime: parse_datetime("starts_at", &row.starts_at)?,
        repeat: row.repeat_rule,
        end_date: row
            .end_date
            .as_deref()
            .map(|d| parse_date("end_date", d))
            .transpose()?,
    })
}

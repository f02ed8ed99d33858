//! Admin console appointment series endpoints.
//!
//! - `GET /api/patients/:id/appointments`: stored series for a patient
//! - `POST /api/patients/:id/appointments`: schedule a series
//! - `PATCH /api/appointments/:id`: edit a series
//! - `DELETE /api/appointments/:id`: remove a series

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::patients::ensure_patient;
use super::{non_blank, parse_id, required};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository::{
    delete_appointment, get_appointment, insert_appointment, list_appointments_for_patient,
    update_appointment,
};
use crate::models::enums::AppointmentRepeat;
use crate::models::input::{parse_date_input, parse_datetime_input};
use crate::models::Appointment;

#[derive(Deserialize)]
pub struct NewAppointmentRequest {
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub datetime: String,
    pub repeat: Option<String>,
    #[serde(alias = "endDate")]
    pub end_date: Option<String>,
}

/// Omitted fields are unchanged; an empty `end_date` clears it.
#[derive(Deserialize)]
pub struct AppointmentUpdateRequest {
    pub provider: Option<String>,
    pub datetime: Option<String>,
    pub repeat: Option<String>,
    #[serde(alias = "endDate")]
    pub end_date: Option<String>,
}

fn parse_repeat(raw: Option<&str>) -> Result<String, ApiError> {
    Ok(AppointmentRepeat::parse_input(raw.unwrap_or(""))?
        .as_str()
        .to_string())
}

/// `GET /api/patients/:id/appointments`
pub async fn list(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let patient_id = parse_id("patient", &patient_id)?;
    let conn = ctx.open_db()?;
    ensure_patient(&conn, &patient_id)?;
    Ok(Json(list_appointments_for_patient(&conn, &patient_id)?))
}

/// `POST /api/patients/:id/appointments`
pub async fn create(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
    Json(body): Json<NewAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    let patient_id = parse_id("patient", &patient_id)?;
    let datetime = required("datetime", &body.datetime)?;

    let appointment = Appointment {
        id: Uuid::new_v4(),
        patient_id,
        provider: required("provider", &body.provider)?,
        datetime: parse_datetime_input("datetime", &datetime)?,
        repeat: parse_repeat(body.repeat.as_deref())?,
        end_date: non_blank(body.end_date.as_deref())
            .map(|d| parse_date_input("end_date", d))
            .transpose()?,
    };

    let conn = ctx.open_db()?;
    ensure_patient(&conn, &patient_id)?;
    insert_appointment(&conn, &appointment)?;
    tracing::info!(appointment_id = %appointment.id, %patient_id, "Appointment scheduled");

    Ok((StatusCode::CREATED, Json(appointment)))
}

/// `PATCH /api/appointments/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(appointment_id): Path<String>,
    Json(body): Json<AppointmentUpdateRequest>,
) -> Result<Json<Appointment>, ApiError> {
    let id = parse_id("appointment", &appointment_id)?;
    let conn = ctx.open_db()?;
    let mut appointment = get_appointment(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound("appointment not found".into()))?;

    if let Some(provider) = body.provider.as_deref() {
        appointment.provider = required("provider", provider)?;
    }
    if let Some(datetime) = body.datetime.as_deref() {
        appointment.datetime = parse_datetime_input("datetime", &required("datetime", datetime)?)?;
    }
    if body.repeat.is_some() {
        appointment.repeat = parse_repeat(body.repeat.as_deref())?;
    }
    if body.end_date.is_some() {
        appointment.end_date = non_blank(body.end_date.as_deref())
            .map(|d| parse_date_input("end_date", d))
            .transpose()?;
    }

    update_appointment(&conn, &appointment)?;
    Ok(Json(appointment))
}

/// `DELETE /api/appointments/:id`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(appointment_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id("appointment", &appointment_id)?;
    let conn = ctx.open_db()?;
    delete_appointment(&conn, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

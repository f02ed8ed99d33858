//! Admin console patient endpoints.
//!
//! - `GET /api/patients`: roster with each patient's next visit
//! - `POST /api/patients`: register a patient
//! - `GET /api/patients/:id`: patient with stored series
//! - `PATCH /api/patients/:id`: rename or change email
//! - `DELETE /api/patients/:id`: remove patient and their series

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{parse_id, required};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::dashboard::{build_roster, PatientRosterEntry};
use crate::db::repository::{
    delete_patient, get_patient, insert_patient, list_appointments_for_patient,
    list_prescriptions_for_patient, update_patient, PatientChanges,
};
use crate::models::{Appointment, Patient, Prescription};

#[derive(Deserialize)]
pub struct NewPatientRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize)]
pub struct PatientUpdateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Serialize)]
pub struct PatientDetailResponse {
    pub patient: Patient,
    pub appointments: Vec<Appointment>,
    pub prescriptions: Vec<Prescription>,
}

/// `GET /api/patients`
pub async fn list(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<PatientRosterEntry>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(build_roster(&conn, ctx.now())?))
}

/// `POST /api/patients`
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(body): Json<NewPatientRequest>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let patient = Patient {
        id: Uuid::new_v4(),
        name: required("name", &body.name)?,
        email: required("email", &body.email)?,
        created_at: ctx.now(),
    };

    let conn = ctx.open_db()?;
    insert_patient(&conn, &patient)?;
    tracing::info!(patient_id = %patient.id, "Patient registered");

    Ok((StatusCode::CREATED, Json(patient)))
}

/// `GET /api/patients/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<PatientDetailResponse>, ApiError> {
    let id = parse_id("patient", &patient_id)?;
    let conn = ctx.open_db()?;

    let patient = get_patient(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound("patient not found".into()))?;
    let appointments = list_appointments_for_patient(&conn, &id)?;
    let prescriptions = list_prescriptions_for_patient(&conn, &id)?;

    Ok(Json(PatientDetailResponse {
        patient,
        appointments,
        prescriptions,
    }))
}

/// `PATCH /api/patients/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
    Json(body): Json<PatientUpdateRequest>,
) -> Result<Json<Patient>, ApiError> {
    let id = parse_id("patient", &patient_id)?;
    let changes = PatientChanges {
        name: body.name.as_deref().map(|v| required("name", v)).transpose()?,
        email: body.email.as_deref().map(|v| required("email", v)).transpose()?,
    };
    if changes.is_empty() {
        return Err(ApiError::BadRequest("No changes supplied".into()));
    }

    let conn = ctx.open_db()?;
    Ok(Json(update_patient(&conn, &id, &changes)?))
}

/// `DELETE /api/patients/:id`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id("patient", &patient_id)?;
    let conn = ctx.open_db()?;
    delete_patient(&conn, &id)?;
    tracing::info!(patient_id = %id, "Patient deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Used by nested resources to 404 before touching their own tables.
pub(crate) fn ensure_patient(conn: &rusqlite::Connection, id: &Uuid) -> Result<(), ApiError> {
    match get_patient(conn, id)? {
        Some(_) => Ok(()),
        None => Err(ApiError::NotFound("patient not found".into())),
    }
}

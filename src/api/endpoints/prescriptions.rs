//! Admin console prescription endpoints.
//!
//! - `GET /api/patients/:id/prescriptions`
//! - `POST /api/patients/:id/prescriptions`
//! - `PATCH /api/prescriptions/:id`
//! - `DELETE /api/prescriptions/:id`

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
    delete_prescription, get_prescription, insert_prescription, list_prescriptions_for_patient,
    update_prescription,
};
use crate::models::enums::RefillSchedule;
use crate::models::input::{
    clamp_quantity, lenient_optional_quantity, lenient_quantity, parse_date_input,
};
use crate::models::Prescription;

#[derive(Deserialize)]
pub struct NewPrescriptionRequest {
    #[serde(default)]
    pub medication: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: i64,
    #[serde(default, alias = "refillOn")]
    pub refill_on: String,
    #[serde(alias = "refillSchedule")]
    pub refill_schedule: Option<String>,
    #[serde(alias = "endDate")]
    pub end_date: Option<String>,
}

/// Omitted fields are unchanged; an empty `end_date` clears it.
#[derive(Deserialize)]
pub struct PrescriptionUpdateRequest {
    pub medication: Option<String>,
    pub dosage: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_quantity")]
    pub quantity: Option<i64>,
    #[serde(alias = "refillOn")]
    pub refill_on: Option<String>,
    #[serde(alias = "refillSchedule")]
    pub refill_schedule: Option<String>,
    #[serde(alias = "endDate")]
    pub end_date: Option<String>,
}

fn parse_schedule(raw: Option<&str>) -> Result<String, ApiError> {
    Ok(RefillSchedule::parse_input(raw.unwrap_or(""))?
        .as_str()
        .to_string())
}

/// `GET /api/patients/:id/prescriptions`
pub async fn list(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<Prescription>>, ApiError> {
    let patient_id = parse_id("patient", &patient_id)?;
    let conn = ctx.open_db()?;
    ensure_patient(&conn, &patient_id)?;
    Ok(Json(list_prescriptions_for_patient(&conn, &patient_id)?))
}

/// `POST /api/patients/:id/prescriptions`
pub async fn create(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
    Json(body): Json<NewPrescriptionRequest>,
) -> Result<(StatusCode, Json<Prescription>), ApiError> {
    let patient_id = parse_id("patient", &patient_id)?;
    let refill_on = required("refill_on", &body.refill_on)?;

    let prescription = Prescription {
        id: Uuid::new_v4(),
        patient_id,
        medication: required("medication", &body.medication)?,
        dosage: required("dosage", &body.dosage)?,
        quantity: clamp_quantity(body.quantity),
        refill_on: parse_date_input("refill_on", &refill_on)?,
        refill_schedule: parse_schedule(body.refill_schedule.as_deref())?,
        end_date: non_blank(body.end_date.as_deref())
            .map(|d| parse_date_input("end_date", d))
            .transpose()?,
    };

    let conn = ctx.open_db()?;
    ensure_patient(&conn, &patient_id)?;
    insert_prescription(&conn, &prescription)?;
    tracing::info!(prescription_id = %prescription.id, %patient_id, "Prescription added");

    Ok((StatusCode::CREATED, Json(prescription)))
}

/// `PATCH /api/prescriptions/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(prescription_id): Path<String>,
    Json(body): Json<PrescriptionUpdateRequest>,
) -> Result<Json<Prescription>, ApiError> {
    let id = parse_id("prescription", &prescription_id)?;
    let conn = ctx.open_db()?;
    let mut prescription = get_prescription(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound("prescription not found".into()))?;

    if let Some(medication) = body.medication.as_deref() {
        prescription.medication = required("medication", medication)?;
    }
    if let Some(dosage) = body.dosage.as_deref() {
        prescription.dosage = required("dosage", dosage)?;
    }
    if let Some(quantity) = body.quantity {
        prescription.quantity = clamp_quantity(quantity);
    }
    if let Some(refill_on) = body.refill_on.as_deref() {
        prescription.refill_on = parse_date_input("refill_on", &required("refill_on", refill_on)?)?;
    }
    if body.refill_schedule.is_some() {
        prescription.refill_schedule = parse_schedule(body.refill_schedule.as_deref())?;
    }
    if body.end_date.is_some() {
        prescription.end_date = non_blank(body.end_date.as_deref())
            .map(|d| parse_date_input("end_date", d))
            .transpose()?;
    }

    update_prescription(&conn, &prescription)?;
    Ok(Json(prescription))
}

/// `DELETE /api/prescriptions/:id`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(prescription_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id("prescription", &prescription_id)?;
    let conn = ctx.open_db()?;
    delete_prescription(&conn, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

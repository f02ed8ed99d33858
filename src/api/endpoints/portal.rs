//! Patient portal endpoints. Views are projected from `ctx.now()` on every call.

use axum::extract::{Path, State};
use axum::Json;

use super::parse_id;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::dashboard::{
    build_appointment_list, build_dashboard, build_medication_list, AppointmentList,
    MedicationList, PatientDashboard,
};

/// `GET /api/portal/:patient_id`: next seven days.
pub async fn dashboard(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<PatientDashboard>, ApiError> {
    let id = parse_id("patient", &patient_id)?;
    let conn = ctx.open_db()?;
    Ok(Json(build_dashboard(&conn, &id, ctx.now())?))
}

/// `GET /api/portal/:patient_id/appointments`: full projection.
pub async fn appointments(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<AppointmentList>, ApiError> {
    let id = parse_id("patient", &patient_id)?;
    let conn = ctx.open_db()?;
    Ok(Json(build_appointment_list(&conn, &id, ctx.now())?))
}

/// `GET /api/portal/:patient_id/medications`: full refill projection.
pub async fn medications(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<MedicationList>, ApiError> {
    let id = parse_id("patient", &patient_id)?;
    let conn = ctx.open_db()?;
    Ok(Json(build_medication_list(&conn, &id, ctx.now())?))
}

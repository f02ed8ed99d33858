//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub patients: i64,
    pub version: &'static str,
}

/// `GET /api/health`: liveness plus a database round trip.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let patients: i64 = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;

    Ok(Json(HealthResponse {
        status: "ok",
        patients,
        version: crate::config::APP_VERSION,
    }))
}

//! `GET /api/reference`: medication and dosage pick lists.

use axum::extract::State;
use axum::Json;

use crate::api::types::ApiContext;
use crate::reference::ReferenceData;

pub async fn lists(State(ctx): State<ApiContext>) -> Json<ReferenceData> {
    Json(ctx.reference.as_ref().clone())
}

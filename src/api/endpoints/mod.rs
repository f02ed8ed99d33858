//! API endpoint handlers, one module per resource.

pub mod appointments;
pub mod health;
pub mod patients;
pub mod portal;
pub mod prescriptions;
pub mod reference;

use uuid::Uuid;

use crate::api::error::ApiError;

/// Parse a path id, naming the resource in the error.
pub(crate) fn parse_id(kind: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid {kind} ID: {raw}")))
}

/// Trimmed value of a field that must not be blank.
pub(crate) fn required(field: &str, value: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::BadRequest(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Blank strings in optional fields count as absent.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

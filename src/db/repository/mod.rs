//! Repository layer: entity-scoped database operations.
//!
//! Dates are stored as ISO-8601 text and parsed back on read; rows that no
//! longer parse surface as `DatabaseError::InvalidDate` rather than being
//! silently skipped.

mod appointment;
mod patient;
mod prescription;

pub use appointment::*;
pub use patient::*;
pub use prescription::*;

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use super::DatabaseError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub(crate) fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn format_datetime(datetime: &NaiveDateTime) -> String {
    datetime.format(DATETIME_FORMAT).to_string()
}

pub(crate) fn parse_date(field: &str, value: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| DatabaseError::InvalidDate {
        field: field.into(),
        value: value.into(),
    })
}

pub(crate) fn parse_datetime(field: &str, value: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).map_err(|_| DatabaseError::InvalidDate {
        field: field.into(),
        value: value.into(),
    })
}

pub(crate) fn parse_uuid(value: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(value).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))
}

/// Turn a zero-row UPDATE/DELETE into `NotFound`.
pub(crate) fn expect_affected(
    affected: usize,
    entity_type: &str,
    id: &Uuid,
) -> Result<(), DatabaseError> {
    if affected == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

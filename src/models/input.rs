//! Parsing of user- and seed-supplied date strings.
//!
//! Accepts what HTML date/datetime-local inputs and ISO-8601 timestamps
//! produce. Zoned timestamps are converted to UTC and stored as wall time.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer};

use crate::db::DatabaseError;

const DATETIME_INPUT_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

pub fn parse_datetime_input(field: &str, raw: &str) -> Result<NaiveDateTime, DatabaseError> {
    let value = raw.trim();
    if let Ok(zoned) = DateTime::parse_from_rfc3339(value) {
        return Ok(zoned.naive_utc());
    }
    for format in DATETIME_INPUT_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    Err(invalid(field, raw))
}

/// Date-only input; a full timestamp is accepted and truncated to its date.
pub fn parse_date_input(field: &str, raw: &str) -> Result<NaiveDate, DatabaseError> {
    let value = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    parse_datetime_input(field, value)
        .map(|dt| dt.date())
        .map_err(|_| invalid(field, raw))
}

/// Negative quantities are stored as zero.
pub fn clamp_quantity(raw: i64) -> u32 {
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}

/// A quantity as form posts and seed files send it: a number or numeric text.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuantityField {
    Whole(i64),
    Fractional(f64),
    Text(String),
}

impl QuantityField {
    /// Anything that is not a finite number counts as zero.
    fn value(self) -> i64 {
        match self {
            QuantityField::Whole(n) => n,
            QuantityField::Fractional(x) => truncate(x),
            QuantityField::Text(text) => {
                let text = text.trim();
                text.parse::<i64>()
                    .ok()
                    .or_else(|| text.parse::<f64>().ok().map(truncate))
                    .unwrap_or(0)
            }
        }
    }
}

fn truncate(x: f64) -> i64 {
    if x.is_finite() {
        x as i64
    } else {
        0
    }
}

/// `#[serde(deserialize_with)]` for a quantity that defaults to zero.
pub fn lenient_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Option::<QuantityField>::deserialize(deserializer).map(|q| q.map_or(0, QuantityField::value))
}

/// Same as [`lenient_quantity`] for partial updates, where `null` leaves the value alone.
pub fn lenient_optional_quantity<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<i64>, D::Error> {
    Option::<QuantityField>::deserialize(deserializer).map(|q| q.map(QuantityField::value))
}

fn invalid(field: &str, raw: &str) -> DatabaseError {
    DatabaseError::InvalidDate {
        field: field.into(),
        value: raw.into(),
    }
}

//! Lenient timestamp parsing for request bodies.
//!
//! Forms send either a full RFC 3339 timestamp or a bare `YYYY-MM-DD` date;
//! bare dates are taken as midnight UTC.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date.
pub fn parse_timestamp(value: &str) -> Result<Timestamp, CoreError> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid date '{value}'. Expected RFC 3339 or YYYY-MM-DD"
            ))
        })
}

/// Serde adapter for optional timestamp fields.
///
/// Use with `#[serde(default, deserialize_with = "lenient_timestamp::optional")]`.
/// `null` and empty strings both deserialize to `None`.
pub mod lenient_timestamp {
    use super::*;

    pub fn optional<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse_timestamp(&raw)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

//! Outbound request history models.
//!
//! Entries are append-only and have no `updated_at` column.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use syncbridge_core::request_log::LoggedRequest;
use syncbridge_core::types::{DbId, Timestamp};

/// A single row of `history_log_requests`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HistoryLogRequest {
    pub id: DbId,
    pub request_method: String,
    pub request_url: String,
    pub request_timestamp: Timestamp,
}

/// DTO for inserting a history entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHistoryLog {
    pub request_method: String,
    pub request_url: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub request_timestamp: Timestamp,
}

impl From<LoggedRequest> for CreateHistoryLog {
    fn from(request: LoggedRequest) -> Self {
        Self {
            request_method: request.method.as_str().to_string(),
            request_url: request.url,
            request_timestamp: request.timestamp,
        }
    }
}

/// Offset formats tried after RFC 3339, with a space separator.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Formats without an offset; the value is read as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Accept RFC 3339 timestamps, and timestamps without an offset as UTC.
/// Date and time may be separated by `T` or a space.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Some(ts) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(&raw, fmt).ok())
    {
        return Ok(ts.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

//! Decoding of "document created" events for the `feedback` collection.
//!
//! Field values arrive either as plain JSON or as document-store typed values
//! (`{"stringValue": "..."}`, `{"timestampValue": "..."}`). Both are accepted.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{ANONYMOUS_NAME, FeedbackSubmission, NO_EMAIL_PLACEHOLDER};

pub const FEEDBACK_COLLECTION: &str = "feedback";

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackCreatedEvent {
    /// Full document path, e.g. `feedback/abc123`.
    pub document: String,
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordError {
    MissingMessage,
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordError::MissingMessage => write!(f, "record has no message"),
        }
    }
}

impl FeedbackCreatedEvent {
    /// Id of the record when the document sits directly under `feedback/`.
    /// Full resource names (`projects/p/databases/d/documents/feedback/x`) are accepted.
    pub fn record_id(&self) -> Option<&str> {
        let path = self.document.trim_matches('/');
        let path = path.split_once("/documents/").map_or(path, |(_, rest)| rest);
        let (collection, id) = path.split_once('/')?;
        (collection == FEEDBACK_COLLECTION && !id.is_empty() && !id.contains('/')).then_some(id)
    }

    pub fn to_submission(&self) -> Result<FeedbackSubmission, RecordError> {
        let message = string_field(&self.fields, "message").ok_or(RecordError::MissingMessage)?;
        let name = string_field(&self.fields, "name").unwrap_or_else(|| ANONYMOUS_NAME.to_string());
        let email =
            string_field(&self.fields, "email").unwrap_or_else(|| NO_EMAIL_PLACEHOLDER.to_string());
        let timestamp = self
            .fields
            .get("timestamp")
            .and_then(timestamp_value)
            .unwrap_or_else(Utc::now);

        Ok(FeedbackSubmission {
            name,
            email,
            message,
            timestamp,
            submitter: None,
        })
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    let value = match fields.get(key)? {
        Value::Object(obj) => obj.get("stringValue")?,
        other => other,
    };
    value
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.to_string())
}

fn timestamp_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Object(obj) => {
            if let Some(inner) = obj.get("timestampValue") {
                return timestamp_value(inner);
            }
            let seconds = obj
                .get("seconds")
                .or_else(|| obj.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = obj
                .get("nanoseconds")
                .or_else(|| obj.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            Utc.timestamp_opt(seconds, u32::try_from(nanos).ok()?).single()
        }
        _ => None,
    }
}

//! Service error-body classification
//!
//! The reporting service reports business errors through several
//! incompatible JSON envelopes. Classification runs an ordered list of
//! shape matchers over the decoded body and formats the first match as
//! `"{type}: {name} ({message})"`. A body that is not JSON, or matches no
//! shape, classifies to `None`; absence is a normal outcome, never an error.

use serde_json::Value;

use crate::api::transport::ApiResponse;

/// Message of last resort when no other source yields one.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Unsuccessful request";

type ShapeMatcher = fn(&Value) -> Option<String>;

/// Matchers in priority order; the first successful extraction wins.
const SHAPE_MATCHERS: &[ShapeMatcher] = &[typed_envelope, exception_envelope, event_envelope];

/// Extract a human-readable service error message from a response body.
pub fn classify_error_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    SHAPE_MATCHERS.iter().find_map(|matcher| matcher(&value))
}

/// Resolve the message for a failed exchange through the priority chain:
/// explicit message, classified body message, cause message, generic
/// default. Empty strings do not count as present.
pub fn resolve_failure_message(
    explicit: Option<&str>,
    response: Option<&ApiResponse>,
    cause: Option<&str>,
) -> String {
    if let Some(message) = explicit {
        if !message.is_empty() {
            return message.to_string();
        }
    }
    if let Some(response) = response {
        if let Some(message) = classify_error_body(&response.body_text()) {
            return message;
        }
    }
    if let Some(message) = cause {
        if !message.is_empty() {
            return message.to_string();
        }
    }
    DEFAULT_FAILURE_MESSAGE.to_string()
}

/// Top-level `type` + `name` + `message`; all three keys must be present.
fn typed_envelope(value: &Value) -> Option<String> {
    Some(format_service_message(
        &field(value, "type")?,
        &field(value, "name")?,
        &field(value, "message")?,
    ))
}

/// Second envelope convention from the same service: top-level `error` +
/// `exception` + `message`.
fn exception_envelope(value: &Value) -> Option<String> {
    Some(format_service_message(
        &field(value, "error")?,
        &field(value, "exception")?,
        &field(value, "message")?,
    ))
}

/// `event` sub-object; missing sub-fields render as empty strings.
fn event_envelope(value: &Value) -> Option<String> {
    let event = value.get("event")?;
    Some(format_service_message(
        &field(event, "type").unwrap_or_default(),
        &field(event, "name").unwrap_or_default(),
        &field(event, "message").unwrap_or_default(),
    ))
}

fn field(value: &Value, key: &str) -> Option<String> {
    value.get(key).map(|v| v.as_str().unwrap_or_default().to_string())
}

fn format_service_message(error_type: &str, name: &str, message: &str) -> String {
    format!("{error_type}: {name} ({message})")
}

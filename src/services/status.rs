// src/services/status.rs
//! Interpretation of the timestamp status endpoint.
//!
//! Backend versions disagree on the shape of `/api/timestamp/status`:
//! - `{"configured": true, "message": "..."}` as a JSON object
//! - the same object serialised into a JSON string
//! - a free-text sentence such as `"Timestamp servisi aktif"`
//!
//! All three are reduced to a [`TimestampStatus`] on a best-effort basis.

use log::debug;
use serde_json::{Map, Value};

use crate::models::timestamp::TimestampStatus;

/// Words that mark a free-text status as available.
const AVAILABLE_MARKERS: [&str; 3] = ["aktif", "available", "OK"];

/// Reduces any status body to `{available, status}`.
pub fn interpret_status(body: &str) -> TimestampStatus {
    match serde_json::from_str::<Value>(body.trim()) {
        Ok(Value::Object(map)) => from_object(&map),
        Ok(Value::String(text)) => interpret_text(&text),
        _ => interpret_text(body.trim()),
    }
}

fn interpret_text(text: &str) -> TimestampStatus {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text.trim()) {
        debug!("status string contained a JSON object");
        return from_object(&map);
    }

    TimestampStatus {
        available: AVAILABLE_MARKERS.iter().any(|m| text.contains(m)),
        status: text.to_string(),
    }
}

fn from_object(map: &Map<String, Value>) -> TimestampStatus {
    let available = map
        .get("configured")
        .and_then(Value::as_bool)
        .or_else(|| map.get("available").and_then(Value::as_bool))
        .unwrap_or(false);
    let status = match map.get("message") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    TimestampStatus { available, status }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_maps_configured_and_message() {
        let status = interpret_status(r#"{"configured":true,"message":"m"}"#);
        assert_eq!(status, TimestampStatus { available: true, status: "m".into() });
    }

    #[test]
    fn object_with_configured_false_is_unavailable() {
        let status = interpret_status(r#"{"configured":false,"message":"not configured"}"#);
        assert!(!status.available);
        assert_eq!(status.status, "not configured");
    }

    #[test]
    fn json_string_wrapping_an_object_is_unwrapped() {
        let body = serde_json::to_string(r#"{"configured":false,"message":"not configured"}"#).unwrap();
        let status = interpret_status(&body);
        assert!(!status.available);
        assert_eq!(status.badge(), "Kapalı");
    }

    #[test]
    fn plain_strings_use_markers() {
        for text in ["Timestamp servisi aktif", "service available", "OK"] {
            assert!(interpret_status(text).available, "{text}");
        }
        for text in ["down", "ok", "Kapalı", ""] {
            assert!(!interpret_status(text).available, "{text}");
        }
    }

    #[test]
    fn quoted_plain_string_is_unquoted() {
        let status = interpret_status(r#""Timestamp servisi aktif""#);
        assert!(status.available);
        assert_eq!(status.status, "Timestamp servisi aktif");
    }

    #[test]
    fn object_without_flags_is_unavailable() {
        let status = interpret_status(r#"{"message":"?"}"#);
        assert!(!status.available);
        let legacy = interpret_status(r#"{"available":true}"#);
        assert!(legacy.available);
        assert_eq!(legacy.status, "");
    }
}

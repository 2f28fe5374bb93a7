// src/api/error.rs
//! Error type shared by the signing and verification clients.
//!
//! Every failure a remote call can produce is folded into [`ApiError`] so the
//! service layer can decide how to surface it (always as a notification,
//! never as a process abort).

use thiserror::Error;

/// Failures raised while talking to the signing or verification backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout, or a broken body stream.
    #[error("request to backend failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    ///
    /// `message` holds the body text (or its JSON `message` field) and is
    /// `None` when the backend sent nothing useful.
    #[error("{}", http_display(.status, .message))]
    Http { status: u16, message: Option<String> },

    /// A 2xx response whose JSON body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reading an input document or writing an output file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Input rejected before any request was sent.
    #[error("{0}")]
    Validation(String),
}

fn http_display(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(text) => text.clone(),
        None => format!("HTTP {}", status),
    }
}

impl ApiError {
    /// Text shown to the user for this failure.
    ///
    /// HTTP failures show the backend's body text when there is one; every
    /// other case with no usable text falls back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Http { message: Some(text), .. } => text.clone(),
            ApiError::Http { message: None, .. } => fallback.to_string(),
            ApiError::Validation(text) => text.clone(),
            other => {
                let text = other.to_string();
                if text.trim().is_empty() {
                    fallback.to_string()
                } else {
                    text
                }
            }
        }
    }

    /// HTTP status of the failed call, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Pulls a human-readable message out of an error body.
///
/// Spring-style backends wrap failures as `{"message": "..."}`; anything else
/// is passed through verbatim after trimming.
pub fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ["message", "error", "detail"] {
            if let Some(serde_json::Value::String(text)) = map.get(key) {
                if !text.trim().is_empty() {
                    return Some(text.trim().to_string());
                }
            }
        }
    }

    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_prefers_body_text() {
        let err = ApiError::Http { status: 500, message: Some("keystore locked".into()) };
        assert_eq!(err.user_message("PDF signing failed"), "keystore locked");
        assert_eq!(err.to_string(), "keystore locked");
    }

    #[test]
    fn http_error_without_body_uses_fallback() {
        let err = ApiError::Http { status: 502, message: None };
        assert_eq!(err.user_message("PDF signing failed"), "PDF signing failed");
        assert_eq!(err.to_string(), "HTTP 502");
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn extracts_json_message_field() {
        let body = r#"{"timestamp":"2025-01-01","status":400,"message":"Invalid PDF"}"#;
        assert_eq!(extract_error_message(body).as_deref(), Some("Invalid PDF"));
    }

    #[test]
    fn passes_plain_text_through() {
        assert_eq!(extract_error_message("  chain broken \n").as_deref(), Some("chain broken"));
        assert_eq!(extract_error_message("   "), None);
    }

    #[test]
    fn json_without_message_is_kept_raw() {
        let body = r#"{"code":17}"#;
        assert_eq!(extract_error_message(body).as_deref(), Some(body));
    }
}

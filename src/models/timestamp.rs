// src/models/timestamp.rs
//! RFC 3161 timestamp records exchanged with the signing service.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Header prefix under which `/api/timestamp/get` reports token metadata.
pub const TIMESTAMP_HEADER_PREFIX: &str = "x-timestamp-";

/// Report returned by `/api/timestamp/validate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TimestampValidationReport {
    pub valid: Option<bool>,
    pub timestamp: Option<String>,
    pub tsa_name: Option<String>,
    pub hash_algorithm: Option<String>,
    pub hash_algorithm_oid: Option<String>,
    pub serial_number: Option<String>,
    pub nonce: Option<String>,
    pub signature_algorithm: Option<String>,
    pub signature_algorithm_oid: Option<String>,
    pub tsa_certificate: Option<String>,
    pub certificate_valid: Option<bool>,
    pub certificate_not_before: Option<String>,
    pub certificate_not_after: Option<String>,
    /// Only present when the original document was supplied
    pub hash_verified: Option<bool>,
    pub errors: Vec<String>,
    pub message: Option<String>,
}

impl TimestampValidationReport {
    pub fn is_valid(&self) -> bool {
        self.valid.unwrap_or(false)
    }
}

/// A freshly issued `.tst` token plus the metadata the backend put in headers.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedTimestamp {
    pub token: Bytes,
    /// Header name without the `X-Timestamp-` prefix (lowercase) → value
    pub metadata: BTreeMap<String, String>,
}

impl IssuedTimestamp {
    /// Collects every `X-Timestamp-*` header.
    pub fn from_parts(token: Bytes, headers: &reqwest::header::HeaderMap) -> Self {
        let metadata = headers
            .iter()
            .filter_map(|(name, value)| {
                let key = name.as_str().strip_prefix(TIMESTAMP_HEADER_PREFIX)?;
                let value = value.to_str().ok()?;
                Some((key.to_string(), value.to_string()))
            })
            .collect();
        IssuedTimestamp { token, metadata }
    }

    pub fn time(&self) -> Option<&str> {
        self.metadata.get("time").map(String::as_str)
    }

    pub fn serial_number(&self) -> Option<&str> {
        self.metadata
            .get("serial")
            .or_else(|| self.metadata.get("serial-number"))
            .map(String::as_str)
    }

    pub fn tsa(&self) -> Option<&str> {
        self.metadata.get("tsa").map(String::as_str)
    }

    pub fn hash_algorithm(&self) -> Option<&str> {
        self.metadata.get("hash-algorithm").map(String::as_str)
    }
}

/// Interpreted state of `/api/timestamp/status`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TimestampStatus {
    pub available: bool,
    pub status: String,
}

impl TimestampStatus {
    /// Badge text shown next to the status line.
    pub fn badge(&self) -> &'static str {
        if self.available {
            "Aktif"
        } else {
            "Kapalı"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};

    #[test]
    fn collects_timestamp_headers_only() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Timestamp-Time", HeaderValue::from_static("2025-06-01T12:00:00Z"));
        headers.insert("X-Timestamp-Serial", HeaderValue::from_static("0x1f"));
        headers.insert("X-Timestamp-TSA", HeaderValue::from_static("CN=Kamu SM TSA"));
        headers.insert("Content-Type", HeaderValue::from_static("application/timestamp-reply"));

        let issued = IssuedTimestamp::from_parts(Bytes::from_static(b"\x30\x82"), &headers);
        assert_eq!(issued.metadata.len(), 3);
        assert_eq!(issued.time(), Some("2025-06-01T12:00:00Z"));
        assert_eq!(issued.serial_number(), Some("0x1f"));
        assert_eq!(issued.tsa(), Some("CN=Kamu SM TSA"));
        assert_eq!(issued.hash_algorithm(), None);
    }

    #[test]
    fn validation_report_tolerates_partial_bodies() {
        let report: TimestampValidationReport =
            serde_json::from_str(r#"{"valid":true,"tsaName":"TSA","errors":[]}"#).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.tsa_name.as_deref(), Some("TSA"));
        assert_eq!(report.hash_verified, None);

        let empty: TimestampValidationReport = serde_json::from_str("{}").unwrap();
        assert!(!empty.is_valid());
    }

    #[test]
    fn badge_reflects_availability() {
        let on = TimestampStatus { available: true, status: "ok".into() };
        let off = TimestampStatus { available: false, status: String::new() };
        assert_eq!(on.badge(), "Aktif");
        assert_eq!(off.badge(), "Kapalı");
    }
}

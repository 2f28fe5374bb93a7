// src/models/certificate.rs
//! Certificate records exposed by the signing service's keystore endpoints.
//!
//! Records are passed through as the backend sends them; the only local
//! logic is expiry classification and distinguished-name splitting, both of
//! which exist purely for display.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of days before `validTo` at which a certificate counts as expiring soon.
pub const EXPIRY_WARNING_DAYS: i64 = 30;

/// One keystore entry as returned by `/api/certificates/list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CertificateInfo {
    pub alias: Option<String>,
    pub serial_number_hex: Option<String>,
    pub serial_number_dec: Option<String>,
    pub subject: Option<String>,
    pub issuer: Option<String>,
    pub valid_from: Option<String>,
    pub valid_to: Option<String>,
    pub has_private_key: Option<bool>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub signature_algorithm: Option<String>,
    pub key_usage: Option<String>,
    pub extended_key_usage: Option<String>,
    pub certificate_policies: Option<String>,
}

impl CertificateInfo {
    /// Expiry class of this certificate relative to `now`.
    pub fn expiry(&self, now: DateTime<Utc>) -> ExpiryStatus {
        ExpiryStatus::classify(self.valid_to.as_deref(), now)
    }

    /// Whether this certificate carries the given serial number, in hex
    /// (case-insensitive) or decimal form.
    pub fn has_serial(&self, serial: &str) -> bool {
        let serial = serial.trim();
        if serial.is_empty() {
            return false;
        }
        self.serial_number_hex
            .as_deref()
            .map_or(false, |hex| hex.eq_ignore_ascii_case(serial))
            || self.serial_number_dec.as_deref() == Some(serial)
    }

    /// `CN` of the subject, falling back to the alias.
    pub fn display_name(&self) -> Option<String> {
        self.subject
            .as_deref()
            .and_then(|dn| parse_dn(dn).get("CN").cloned())
            .or_else(|| self.alias.clone())
    }
}

/// Envelope of `/api/certificates/list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificateListResponse {
    pub certificates: Vec<CertificateInfo>,
    pub success: bool,
    pub keystore_type: Option<String>,
    pub certificate_count: u64,
}

impl CertificateListResponse {
    /// The keystore is usable for signing.
    pub fn is_ready(&self) -> bool {
        self.success && self.certificate_count > 0
    }
}

/// Free-form keystore description from `/api/certificates/info`.
pub type KeystoreInfo = BTreeMap<String, serde_json::Value>;

/// Info key naming the certificate the keystore signs with.
pub const ACTIVE_SERIAL_KEY: &str = "certificateSerialNumber";

/// Serial number of the certificate currently used for signing, if reported.
pub fn active_serial(info: &KeystoreInfo) -> Option<String> {
    match info.get(ACTIVE_SERIAL_KEY)? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Renders one keystore info value the way the certificates page shows it.
pub fn describe_info_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Bool(true) => "yes".to_string(),
        serde_json::Value::Bool(false) => "no".to_string(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

/// Mutually exclusive validity classes of a certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpiryStatus {
    Expired,
    ExpiringSoon,
    Active,
}

impl ExpiryStatus {
    /// Classifies a `validTo` value.
    ///
    /// Missing or unparseable dates are treated as active, matching how the
    /// certificate list has always been rendered.
    pub fn classify(valid_to: Option<&str>, now: DateTime<Utc>) -> Self {
        let Some(expiry) = valid_to.and_then(parse_timestamp) else {
            return ExpiryStatus::Active;
        };

        if expiry < now {
            ExpiryStatus::Expired
        } else if expiry > now && expiry < now + Duration::days(EXPIRY_WARNING_DAYS) {
            ExpiryStatus::ExpiringSoon
        } else {
            ExpiryStatus::Active
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExpiryStatus::Expired => "expired",
            ExpiryStatus::ExpiringSoon => "expiring soon",
            ExpiryStatus::Active => "active",
        }
    }
}

/// Parses the date formats the backends are known to emit.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Splits an RFC 4514-ish distinguished name into its attributes.
///
/// Values may themselves contain `=`; only the first one separates key from
/// value. Later duplicates of a key overwrite earlier ones.
pub fn parse_dn(dn: &str) -> BTreeMap<String, String> {
    let mut parts = BTreeMap::new();
    for part in dn.split(',') {
        let mut kv = part.trim().splitn(2, '=');
        let key = kv.next().unwrap_or_default().trim();
        let value = kv.next().unwrap_or_default();
        if !key.is_empty() && !value.is_empty() {
            parts.insert(key.to_string(), value.to_string());
        }
    }
    parts
}

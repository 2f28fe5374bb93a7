// src/models/verification.rs
//! Reports produced by the verification service (`/api/v1/verify/*`).
//!
//! The verification backend runs a DSS-based validation and returns these
//! structures; nothing here is evaluated locally beyond presence checks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::signing::LiteralError;

/// Depth of validation requested from the verification backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerificationLevel {
    /// Fast structural and cryptographic check
    #[default]
    Simple,
    /// Full chain, revocation and timestamp validation
    Comprehensive,
}

impl VerificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationLevel::Simple => "SIMPLE",
            VerificationLevel::Comprehensive => "COMPREHENSIVE",
        }
    }
}

impl fmt::Display for VerificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationLevel {
    type Err = LiteralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SIMPLE" => Ok(VerificationLevel::Simple),
            "COMPREHENSIVE" => Ok(VerificationLevel::Comprehensive),
            other => Err(LiteralError {
                kind: "verification level",
                value: other.to_string(),
                expected: "SIMPLE, COMPREHENSIVE".to_string(),
            }),
        }
    }
}

/// Signature container family handled by the document verification endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureKind {
    Pades,
    Xades,
    Cades,
}

impl SignatureKind {
    /// Path segment under `/api/v1/verify/`.
    pub fn path_segment(&self) -> &'static str {
        match self {
            SignatureKind::Pades => "pades",
            SignatureKind::Xades => "xades",
            SignatureKind::Cades => "cades",
        }
    }

    /// Short name used in notifications.
    pub fn label(&self) -> &'static str {
        match self {
            SignatureKind::Pades => "PDF",
            SignatureKind::Xades => "XML",
            SignatureKind::Cades => "CAdES",
        }
    }
}

/// Overall result of a PAdES/XAdES/CAdES verification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct VerificationReport {
    pub valid: bool,
    pub status: Option<String>,
    pub signature_type: Option<String>,
    pub signature_count: Option<u32>,
    pub signatures: Vec<SignatureReport>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub verification_time: Option<String>,
}

/// Per-signature section of a [`VerificationReport`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SignatureReport {
    pub signature_level: Option<String>,
    pub signature_format: Option<String>,
    pub signing_time: Option<String>,
    pub signature_algorithm: Option<String>,
    pub signer_name: Option<String>,
    pub valid: Option<bool>,
    pub certificate_valid: Option<bool>,
    pub timestamp_valid: Option<bool>,
    pub signer_certificate: Option<SignerCertificate>,
    pub timestamps: Vec<EmbeddedTimestamp>,
    pub validation_errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SignerCertificate {
    pub common_name: Option<String>,
    pub subject: Option<String>,
    pub issuer: Option<String>,
    pub serial_number: Option<String>,
    pub not_before: Option<String>,
    pub not_after: Option<String>,
}

/// A timestamp found inside a signature (signature, archive, content...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbeddedTimestamp {
    pub timestamp_type: Option<String>,
    pub timestamp_time: Option<String>,
    pub tsa_name: Option<String>,
    pub digest_algorithm: Option<String>,
    pub valid: Option<bool>,
}

/// Result of `/api/v1/verify/timestamp`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TimestampVerificationReport {
    pub valid: bool,
    pub status: Option<String>,
    pub timestamp_time: Option<String>,
    pub tsa_name: Option<String>,
    pub digest_algorithm: Option<String>,
    pub message_imprint: Option<String>,
    pub tsa_certificate: Option<TsaCertificate>,
    pub verification_time: Option<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TsaCertificate {
    pub common_name: Option<String>,
    pub subject: Option<String>,
    pub serial_number: Option<String>,
    pub not_before: Option<String>,
    pub not_after: Option<String>,
}

// src/models/signing.rs
//! Request options and responses of the signing service.
//!
//! The enumerations here are closed literal sets: the backend only accepts
//! the exact strings listed, so parsing anything else is rejected before a
//! request is ever built.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A string that is not part of a fixed literal set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} '{value}', expected one of: {expected}")]
pub struct LiteralError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

impl LiteralError {
    fn new(kind: &'static str, value: &str, allowed: &[&str]) -> Self {
        LiteralError {
            kind,
            value: value.to_string(),
            expected: allowed.join(", "),
        }
    }
}

/// XML profile used by the XAdES endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    /// e-Invoice / UBL document
    #[default]
    UblDocument,
    /// e-Archive report
    EarchiveReport,
    HrXml,
    OtherXmlDocument,
    None,
}

impl DocumentType {
    pub const ALL: [DocumentType; 5] = [
        DocumentType::UblDocument,
        DocumentType::EarchiveReport,
        DocumentType::HrXml,
        DocumentType::OtherXmlDocument,
        DocumentType::None,
    ];

    /// Wire literal sent in the `documentType` form field.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::UblDocument => "UBL_DOCUMENT",
            DocumentType::EarchiveReport => "EARCHIVE_REPORT",
            DocumentType::HrXml => "HR_XML",
            DocumentType::OtherXmlDocument => "OTHER_XML_DOCUMENT",
            DocumentType::None => "NONE",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = LiteralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = DocumentType::ALL.iter().map(|t| t.as_str()).collect();
                LiteralError::new("document type", s, &allowed)
            })
    }
}

/// Which timestamps the CAdES endpoint embeds into the signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CadesTimestampType {
    /// CAdES-B, no timestamp
    None,
    /// CAdES-T, signature timestamp
    #[default]
    Signature,
    Content,
    /// CAdES-A, archive timestamp
    Archive,
    Esc,
    /// Signature and archive timestamps
    All,
}

impl CadesTimestampType {
    pub const ALL: [CadesTimestampType; 6] = [
        CadesTimestampType::None,
        CadesTimestampType::Signature,
        CadesTimestampType::Content,
        CadesTimestampType::Archive,
        CadesTimestampType::Esc,
        CadesTimestampType::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CadesTimestampType::None => "none",
            CadesTimestampType::Signature => "signature",
            CadesTimestampType::Content => "content",
            CadesTimestampType::Archive => "archive",
            CadesTimestampType::Esc => "esc",
            CadesTimestampType::All => "all",
        }
    }
}

impl fmt::Display for CadesTimestampType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CadesTimestampType {
    type Err = LiteralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CadesTimestampType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> =
                    CadesTimestampType::ALL.iter().map(|t| t.as_str()).collect();
                LiteralError::new("timestamp type", s, &allowed)
            })
    }
}

/// Digest algorithm of a client-computed hash or a timestamp request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HashAlgorithm {
    #[default]
    #[serde(rename = "SHA-256")]
    Sha256,
    #[serde(rename = "SHA-384")]
    Sha384,
    #[serde(rename = "SHA-512")]
    Sha512,
    /// Legacy; accepted by the backend but not recommended
    #[serde(rename = "SHA-1")]
    Sha1,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 4] = [
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
        HashAlgorithm::Sha1,
    ];

    /// Spelling used by `/v1/signhash` (`SHA-256`).
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha384 => "SHA-384",
            HashAlgorithm::Sha512 => "SHA-512",
            HashAlgorithm::Sha1 => "SHA-1",
        }
    }

    /// Spelling used by the `hashAlgorithm` query of `/api/timestamp/get` (`SHA256`).
    pub fn compact(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "SHA256",
            HashAlgorithm::Sha384 => "SHA384",
            HashAlgorithm::Sha512 => "SHA512",
            HashAlgorithm::Sha1 => "SHA1",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = LiteralError;

    /// Accepts both the dashed and the compact spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HashAlgorithm::ALL
            .into_iter()
            .find(|a| a.as_str() == s || a.compact() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = HashAlgorithm::ALL.iter().map(|a| a.as_str()).collect();
                LiteralError::new("hash algorithm", s, &allowed)
            })
    }
}

/// Body of `POST /v1/signhash`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignHashRequest {
    /// Base64 encoded digest
    pub hash: String,
    pub hash_algorithm: HashAlgorithm,
}

/// Raw signature returned by `/v1/signhash`, all values base64/PEM text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SignHashResponse {
    pub signature_value: String,
    pub certificate: String,
    pub certificate_chain: String,
    pub signature_algorithm: String,
}

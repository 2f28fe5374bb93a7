// src/api/verify_client.rs
//! Client for the verification service (`/api/v1/verify/*`).

use reqwest::multipart::Form;
use std::time::Duration;

use crate::api::error::ApiError;
use crate::api::http::{bool_field, HttpClient};
use crate::api::upload::Document;
use crate::models::verification::{
    SignatureKind, TimestampVerificationReport, VerificationLevel, VerificationReport,
};

/// Verification request for a signed PDF, XML or CMS document.
#[derive(Debug, Clone)]
pub struct VerifyDocumentRequest {
    pub signed_document: Document,
    /// Detached content, for XAdES/CAdES signatures that do not embed it
    pub original_document: Option<Document>,
    pub level: VerificationLevel,
    pub check_revocation: Option<bool>,
    pub validate_timestamp: Option<bool>,
}

impl VerifyDocumentRequest {
    pub fn new(signed_document: Document) -> Self {
        VerifyDocumentRequest {
            signed_document,
            original_document: None,
            level: VerificationLevel::default(),
            check_revocation: None,
            validate_timestamp: None,
        }
    }

    fn into_form(self) -> Result<Form, ApiError> {
        let mut form = Form::new().part("signedDocument", self.signed_document.to_part()?);
        if let Some(original) = &self.original_document {
            form = form.part("originalDocument", original.to_part()?);
        }
        form = form.text("level", self.level.as_str());
        if let Some(check) = self.check_revocation {
            form = form.text("checkRevocation", bool_field(check));
        }
        if let Some(validate) = self.validate_timestamp {
            form = form.text("validateTimestamp", bool_field(validate));
        }
        Ok(form)
    }
}

/// Verification request for a standalone RFC 3161 token.
#[derive(Debug, Clone)]
pub struct VerifyTimestampRequest {
    pub timestamp_file: Document,
    pub original_document: Option<Document>,
    pub validate_certificate: Option<bool>,
}

impl VerifyTimestampRequest {
    fn into_form(self) -> Result<Form, ApiError> {
        let mut form = Form::new().part("timestampFile", self.timestamp_file.to_part()?);
        if let Some(original) = &self.original_document {
            form = form.part("originalDocument", original.to_part()?);
        }
        if let Some(validate) = self.validate_certificate {
            form = form.text("validateCertificate", bool_field(validate));
        }
        Ok(form)
    }
}

/// Typed access to the verification service.
#[derive(Clone, Debug)]
pub struct VerifyApiClient {
    http: HttpClient,
}

impl VerifyApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        Ok(VerifyApiClient {
            http: HttpClient::new(base_url, timeout)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Verifies a PAdES, XAdES or CAdES signature.
    pub async fn verify(
        &self,
        kind: SignatureKind,
        request: VerifyDocumentRequest,
    ) -> Result<VerificationReport, ApiError> {
        let path = format!("/api/v1/verify/{}", kind.path_segment());
        self.http.post_multipart_json(&path, request.into_form()?).await
    }

    pub async fn verify_timestamp(
        &self,
        request: VerifyTimestampRequest,
    ) -> Result<TimestampVerificationReport, ApiError> {
        self.http
            .post_multipart_json("/api/v1/verify/timestamp", request.into_form()?)
            .await
    }
}

// src/api/sign_client.rs
//! Client for the signing service.
//!
//! Covers PAdES/XAdES/WS-Security/CAdES signing, raw hash signing, keystore
//! inspection, TÜBİTAK credit, and RFC 3161 timestamp issuance/validation.
//! Every call is a single request; nothing is cached or retried.

use bytes::Bytes;
use log::debug;
use reqwest::multipart::Form;
use std::time::Duration;

use crate::api::error::ApiError;
use crate::api::http::{bool_field, HttpClient};
use crate::api::upload::Document;
use crate::models::certificate::{CertificateListResponse, KeystoreInfo};
use crate::models::credit::TubitakCredit;
use crate::models::signing::{
    CadesTimestampType, DocumentType, HashAlgorithm, SignHashRequest, SignHashResponse,
};
use crate::models::timestamp::{IssuedTimestamp, TimestampStatus, TimestampValidationReport};
use crate::services::status::interpret_status;

/// Typed access to the signing service endpoints.
#[derive(Clone, Debug)]
pub struct SignApiClient {
    http: HttpClient,
}

impl SignApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        Ok(SignApiClient {
            http: HttpClient::new(base_url, timeout)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    // =====================
    // Document signing
    // =====================

    /// Signs a PDF (PAdES).
    ///
    /// # Arguments
    /// * `document` - PDF to sign
    /// * `append_mode` - Add the signature as an incremental update, keeping
    ///   existing signatures intact
    ///
    /// # Returns
    /// The signed PDF bytes.
    pub async fn sign_pades(&self, document: &Document, append_mode: bool) -> Result<Bytes, ApiError> {
        let form = Form::new()
            .part("document", document.to_part()?)
            .text("appendMode", bool_field(append_mode));
        let (body, _) = self.http.post_multipart_bytes("/v1/padessign", &[], form).await?;
        Ok(body)
    }

    /// Signs an XML document (XAdES).
    ///
    /// With `zip_file` set the backend returns the signed XML inside a zip archive.
    pub async fn sign_xades(
        &self,
        document: &Document,
        document_type: DocumentType,
        zip_file: bool,
    ) -> Result<Bytes, ApiError> {
        let form = Form::new()
            .part("document", document.to_part()?)
            .text("documentType", document_type.as_str())
            .text("zipFile", bool_field(zip_file));
        let (body, _) = self.http.post_multipart_bytes("/v1/xadessign", &[], form).await?;
        Ok(body)
    }

    /// Signs a SOAP envelope with WS-Security. SOAP 1.1 unless `soap12`.
    pub async fn sign_ws_security(&self, document: &Document, soap12: bool) -> Result<Bytes, ApiError> {
        let form = Form::new()
            .part("document", document.to_part()?)
            .text("soap1Dot2", bool_field(soap12));
        let (body, _) = self.http.post_multipart_bytes("/v1/wssecuritysign", &[], form).await?;
        Ok(body)
    }

    /// Signs raw text content, returning a detached PKCS#7/CMS (`.p7s`) blob.
    pub async fn sign_cades(
        &self,
        content: &str,
        timestamp_type: CadesTimestampType,
        signature_id: Option<&str>,
    ) -> Result<Bytes, ApiError> {
        let mut query = vec![("timestampType", timestamp_type.as_str())];
        if let Some(id) = signature_id.filter(|id| !id.is_empty()) {
            query.push(("signatureId", id));
        }
        self.http
            .post_text_bytes("/v1/cadessign", &query, content.to_string())
            .await
    }

    /// Signs a client-computed digest.
    pub async fn sign_hash(&self, request: &SignHashRequest) -> Result<SignHashResponse, ApiError> {
        self.http.post_json("/v1/signhash", request).await
    }

    // =====================
    // Keystore & credit
    // =====================

    pub async fn list_certificates(&self) -> Result<CertificateListResponse, ApiError> {
        self.http.get_json("/api/certificates/list").await
    }

    pub async fn keystore_info(&self) -> Result<KeystoreInfo, ApiError> {
        self.http.get_json("/api/certificates/info").await
    }

    pub async fn tubitak_credit(&self) -> Result<TubitakCredit, ApiError> {
        self.http.get_json("/api/tubitak/credit").await
    }

    // =====================
    // Timestamps
    // =====================

    /// Requests an RFC 3161 token over `document`.
    ///
    /// The token comes back as the body; TSA details arrive in
    /// `X-Timestamp-*` headers.
    pub async fn get_timestamp(
        &self,
        document: &Document,
        hash_algorithm: HashAlgorithm,
    ) -> Result<IssuedTimestamp, ApiError> {
        let form = Form::new().part("document", document.to_part()?);
        let query = [("hashAlgorithm", hash_algorithm.compact())];
        let (body, headers) = self
            .http
            .post_multipart_bytes("/api/timestamp/get", &query, form)
            .await?;
        Ok(IssuedTimestamp::from_parts(body, &headers))
    }

    /// Validates a `.tst` token, optionally against the document it covers.
    pub async fn validate_timestamp(
        &self,
        token: &Document,
        original: Option<&Document>,
    ) -> Result<TimestampValidationReport, ApiError> {
        let mut form = Form::new().part("timestampToken", token.to_part()?);
        if let Some(original) = original {
            form = form.part("originalDocument", original.to_part()?);
        }
        self.http.post_multipart_json("/api/timestamp/validate", form).await
    }

    /// Timestamp service status.
    ///
    /// Older backends answer with a bare string, newer ones with
    /// `{configured, message}`; both are accepted.
    pub async fn timestamp_status(&self) -> Result<TimestampStatus, ApiError> {
        let body = self.http.get_text("/api/timestamp/status").await?;
        debug!("timestamp status body: {}", body);
        Ok(interpret_status(&body))
    }
}

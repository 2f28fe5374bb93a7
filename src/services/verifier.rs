// src/services/verifier.rs
//! Signature verification workflows.
//!
//! This module submits signed documents and timestamp tokens to the
//! verification service and reports the verdict:
//! - `valid: true` → success notification
//! - `valid: false` → warning notification (the verification itself completed)
//! - transport or HTTP failure → error notification
//!
//! The full report is returned either way so the caller can render it.

use std::path::Path;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::upload::Document;
use crate::api::verify_client::{VerifyApiClient, VerifyDocumentRequest, VerifyTimestampRequest};
use crate::models::verification::{
    SignatureKind, TimestampVerificationReport, VerificationLevel, VerificationReport,
};
use crate::notify::Notifier;

/// User choices for a document verification, before the files are read.
#[derive(Debug, Clone, Default)]
pub struct DocumentOptions<'a> {
    pub original: Option<&'a Path>,
    pub level: VerificationLevel,
    pub check_revocation: Option<bool>,
    pub validate_timestamp: Option<bool>,
}

/// Verifier bound to the verification service.
///
/// Holds the client behind an `Arc` so the same instance can be shared
/// between commands.
pub struct Verifier {
    /// Verification service client
    client: Arc<VerifyApiClient>,
    notifier: Arc<dyn Notifier>,
}

impl Verifier {
    pub fn new(client: Arc<VerifyApiClient>, notifier: Arc<dyn Notifier>) -> Self {
        Verifier { client, notifier }
    }

    /// Verifies a PAdES, XAdES or CAdES signature.
    ///
    /// # Arguments
    /// * `kind` - Signature family, selects the endpoint
    /// * `signed` - Path of the signed document
    /// * `options` - Detached original, validation level and optional checks
    ///
    /// # Returns
    /// The verification report, whether the signature was valid or not.
    ///
    /// # Errors
    /// Returns `Err` if an input file cannot be read or the service call fails.
    /// The failure has already been reported through the notifier.
    pub async fn verify_document(
        &self,
        kind: SignatureKind,
        signed: &Path,
        options: DocumentOptions<'_>,
    ) -> Result<VerificationReport, ApiError> {
        let failed = format!("{} verification failed", kind.label());

        let result = async {
            let mut request = VerifyDocumentRequest::new(Document::read(signed).await?);
            if let Some(original) = options.original {
                request.original_document = Some(Document::read(original).await?);
            }
            request.level = options.level;
            request.check_revocation = options.check_revocation;
            request.validate_timestamp = options.validate_timestamp;
            self.client.verify(kind, request).await
        }
        .await;

        match result {
            Ok(report) => {
                if report.valid {
                    self.notifier.success(
                        &format!("{} verification succeeded", kind.label()),
                        Some(verdict(report.status.as_deref(), "Signature is valid.")),
                    );
                } else {
                    self.notifier.warning(
                        &format!("{} verification completed", kind.label()),
                        Some(verdict(
                            report.status.as_deref(),
                            "Signature is invalid or problems were detected.",
                        )),
                    );
                }
                Ok(report)
            }
            Err(e) => {
                self.notifier.error(&failed, Some(e.user_message(&failed)));
                Err(e)
            }
        }
    }

    /// Verifies a standalone RFC 3161 token.
    pub async fn verify_timestamp(
        &self,
        token: &Path,
        original: Option<&Path>,
        validate_certificate: Option<bool>,
    ) -> Result<TimestampVerificationReport, ApiError> {
        const FAILED: &str = "Timestamp verification failed";

        let result = async {
            let request = VerifyTimestampRequest {
                timestamp_file: Document::read(token).await?,
                original_document: match original {
                    Some(path) => Some(Document::read(path).await?),
                    None => None,
                },
                validate_certificate,
            };
            self.client.verify_timestamp(request).await
        }
        .await;

        match result {
            Ok(report) => {
                if report.valid {
                    self.notifier.success(
                        "Timestamp verification succeeded",
                        Some(verdict(report.status.as_deref(), "Timestamp is valid.")),
                    );
                } else {
                    self.notifier.warning(
                        "Timestamp verification completed",
                        Some(verdict(
                            report.status.as_deref(),
                            "Timestamp is invalid or problems were detected.",
                        )),
                    );
                }
                Ok(report)
            }
            Err(e) => {
                self.notifier.error(FAILED, Some(e.user_message(FAILED)));
                Err(e)
            }
        }
    }
}

fn verdict(status: Option<&str>, text: &str) -> String {
    match status.filter(|s| !s.is_empty()) {
        Some(status) => format!("{} ({})", text, status),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{Level, RecordingNotifier};
    use mockito::Matcher;
    use std::time::Duration;

    fn verifier(server: &mockito::ServerGuard) -> (Verifier, Arc<RecordingNotifier>) {
        let client = Arc::new(VerifyApiClient::new(&server.url(), Duration::from_secs(5)).unwrap());
        let notes = Arc::new(RecordingNotifier::default());
        (Verifier::new(client, notes.clone()), notes)
    }

    fn write(dir: &tempfile::TempDir, name: &str, body: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn valid_report_is_a_success() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/v1/verify/pades")
            .with_status(200)
            .with_body(r#"{"valid":true,"status":"TOTAL_PASSED","signatures":[{"valid":true}]}"#)
            .create_async()
            .await;
        let (v, notes) = verifier(&server);
        let dir = tempfile::tempdir().unwrap();
        let signed = write(&dir, "signed.pdf", b"%PDF");

        let report = v
            .verify_document(SignatureKind::Pades, &signed, DocumentOptions::default())
            .await
            .unwrap();

        assert!(report.valid);
        let all = notes.all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].level, Level::Success);
        assert_eq!(all[0].title, "PDF verification succeeded");
    }

    #[tokio::test]
    async fn invalid_report_is_a_warning_with_errors_kept() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/v1/verify/xades")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="originalDocument"; filename="data.xml""#.into()),
                Matcher::Regex(r#"name="level"\r\n\r\nCOMPREHENSIVE"#.into()),
                Matcher::Regex(r#"name="checkRevocation"\r\n\r\ntrue"#.into()),
            ]))
            .with_status(200)
            .with_body(r#"{"valid":false,"errors":["Reference digest mismatch"]}"#)
            .create_async()
            .await;
        let (v, notes) = verifier(&server);
        let dir = tempfile::tempdir().unwrap();
        let signed = write(&dir, "signed.xml", b"<Signature/>");
        let original = write(&dir, "data.xml", b"<Data/>");

        let options = DocumentOptions {
            original: Some(&original),
            level: VerificationLevel::Comprehensive,
            check_revocation: Some(true),
            validate_timestamp: None,
        };
        let report = v
            .verify_document(SignatureKind::Xades, &signed, options)
            .await
            .unwrap();

        assert!(!report.valid);
        assert_eq!(report.errors, vec!["Reference digest mismatch".to_string()]);
        assert_eq!(notes.count(Level::Warning), 1);
        assert_eq!(notes.all().len(), 1);
    }

    #[tokio::test]
    async fn http_failure_uses_kind_fallback() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/v1/verify/cades")
            .with_status(500)
            .create_async()
            .await;
        let (v, notes) = verifier(&server);
        let dir = tempfile::tempdir().unwrap();
        let signed = write(&dir, "sig.p7s", &[0x30]);

        let err = v
            .verify_document(SignatureKind::Cades, &signed, DocumentOptions::default())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        let all = notes.all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].description.as_deref(), Some("CAdES verification failed"));
    }

    #[tokio::test]
    async fn timestamp_report_is_rendered_either_way() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/v1/verify/timestamp")
            .match_body(Matcher::Regex(r#"name="timestampFile"; filename="a.tst""#.into()))
            .with_status(200)
            .with_body(r#"{"valid":true,"tsaName":"Kamu SM","timestampTime":"2025-12-18T15:05:26Z"}"#)
            .create_async()
            .await;
        let (v, notes) = verifier(&server);
        let dir = tempfile::tempdir().unwrap();
        let token = write(&dir, "a.tst", &[0x30]);

        let report = v.verify_timestamp(&token, None, Some(true)).await.unwrap();

        assert_eq!(report.tsa_name.as_deref(), Some("Kamu SM"));
        assert_eq!(notes.count(Level::Success), 1);
    }
}

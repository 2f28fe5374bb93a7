// src/services/signer.rs
//! Signing workflows.
//!
//! Each workflow follows the same shape: load and check the input, call the
//! signing service, then either save the returned file and report success,
//! or report the failure. Exactly one outcome notification is emitted per
//! call (built-in examples add an info notice first) and at most one file is
//! written.

use bytes::Bytes;
use log::warn;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::sign_client::SignApiClient;
use crate::api::upload::Document;
use crate::models::signing::{CadesTimestampType, DocumentType, HashAlgorithm, SignHashRequest, SignHashResponse};
use crate::notify::Notifier;
use crate::services::samples::{example_invoice, example_soap, EXAMPLE_CADES_CONTENT};
use crate::storage::downloads::{cades_file_name, signed_file_name, DownloadSink};
use crate::utils::crypto::{check_base64_digest, hash_data_base64};
use crate::utils::format::format_bytes;

/// A signed file that was written locally.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SignedFile {
    pub file_name: String,
    pub path: PathBuf,
    pub size: usize,
}

/// Where the digest for hash signing comes from.
#[derive(Debug, Clone)]
pub enum HashInput {
    /// Base64 digest computed elsewhere
    Digest(String),
    /// File to digest locally
    File(PathBuf),
}

/// Signing workflows bound to one signing service.
pub struct Signer {
    client: Arc<SignApiClient>,
    notifier: Arc<dyn Notifier>,
    downloads: Arc<dyn DownloadSink>,
}

impl Signer {
    pub fn new(
        client: Arc<SignApiClient>,
        notifier: Arc<dyn Notifier>,
        downloads: Arc<dyn DownloadSink>,
    ) -> Self {
        Signer { client, notifier, downloads }
    }

    /// Signs a PDF and saves it as `signed-<name>`.
    pub async fn sign_pdf(&self, path: &Path, append_mode: bool) -> Result<SignedFile, ApiError> {
        let op = Operation::PDF;
        let document = self.load(path, op).await?;
        let result = self.client.sign_pades(&document, append_mode).await;
        self.deliver(op, signed_file_name(&document.file_name), result)
    }

    /// Signs an XML document (XAdES) and saves it as `signed-<name>`.
    pub async fn sign_xml(
        &self,
        path: &Path,
        document_type: DocumentType,
        zip_file: bool,
    ) -> Result<SignedFile, ApiError> {
        let document = self.load(path, Operation::XML).await?;
        self.send_xml(document, document_type, zip_file).await
    }

    /// Signs the built-in sample invoice as `signed-example-invoice.xml`.
    pub async fn sign_example_xml(
        &self,
        document_type: DocumentType,
        zip_file: bool,
    ) -> Result<SignedFile, ApiError> {
        let document = self.example(example_invoice());
        self.send_xml(document, document_type, zip_file).await
    }

    async fn send_xml(
        &self,
        document: Document,
        document_type: DocumentType,
        zip_file: bool,
    ) -> Result<SignedFile, ApiError> {
        let result = self.client.sign_xades(&document, document_type, zip_file).await;
        self.deliver(Operation::XML, signed_file_name(&document.file_name), result)
    }

    /// Signs a SOAP envelope (WS-Security) and saves it as `signed-<name>`.
    pub async fn sign_soap(&self, path: &Path, soap12: bool) -> Result<SignedFile, ApiError> {
        let document = self.load(path, Operation::SOAP).await?;
        self.send_soap(document, soap12).await
    }

    /// Signs the built-in sample envelope of the requested SOAP version.
    pub async fn sign_example_soap(&self, soap12: bool) -> Result<SignedFile, ApiError> {
        let document = self.example(example_soap(soap12));
        self.send_soap(document, soap12).await
    }

    async fn send_soap(&self, document: Document, soap12: bool) -> Result<SignedFile, ApiError> {
        let result = self.client.sign_ws_security(&document, soap12).await;
        self.deliver(Operation::SOAP, signed_file_name(&document.file_name), result)
    }

    /// Signs text content (CAdES) and saves it as `signed-cades-<millis>.p7s`.
    ///
    /// Blank content is rejected without contacting the backend.
    pub async fn sign_cades(
        &self,
        content: &str,
        timestamp_type: CadesTimestampType,
        signature_id: Option<&str>,
    ) -> Result<SignedFile, ApiError> {
        let op = Operation::CADES;
        if content.trim().is_empty() {
            return Err(self.reject("Content cannot be empty"));
        }

        let result = self.client.sign_cades(content, timestamp_type, signature_id).await;
        let file_name = cades_file_name(chrono::Utc::now().timestamp_millis());
        let signed = self.deliver_quietly(op, file_name, result)?;
        self.notifier.success(
            op.success_title,
            Some(format!(
                "Content signed with timestamp type '{}', saved {} ({})",
                timestamp_type,
                signed.path.display(),
                format_bytes(signed.size)
            )),
        );
        Ok(signed)
    }

    /// Signs the built-in sample e-Archive notification.
    pub async fn sign_example_cades(
        &self,
        timestamp_type: CadesTimestampType,
        signature_id: Option<&str>,
    ) -> Result<SignedFile, ApiError> {
        self.notifier.info("Example content loaded", Some("e-Archive notification".to_string()));
        self.sign_cades(EXAMPLE_CADES_CONTENT, timestamp_type, signature_id).await
    }

    /// Signs a digest and returns the raw signature for display.
    ///
    /// An empty digest is rejected without contacting the backend.
    pub async fn sign_hash(
        &self,
        input: HashInput,
        algorithm: HashAlgorithm,
    ) -> Result<SignHashResponse, ApiError> {
        let op = Operation::HASH;
        let hash = match input {
            HashInput::Digest(hash) => {
                let hash = hash.trim().to_string();
                if hash.is_empty() {
                    return Err(self.reject("Hash value cannot be empty"));
                }
                if let Err(problem) = check_base64_digest(algorithm, &hash) {
                    warn!("sending hash anyway: {}", problem);
                }
                hash
            }
            HashInput::File(path) => {
                let document = self.load(&path, op).await?;
                hash_data_base64(algorithm, &document.content)
            }
        };

        let request = SignHashRequest { hash, hash_algorithm: algorithm };
        match self.client.sign_hash(&request).await {
            Ok(response) => {
                self.notifier.success(
                    op.success_title,
                    Some(format!("Algorithm: {}", response.signature_algorithm)),
                );
                Ok(response)
            }
            Err(e) => {
                self.notifier.error(op.error_title, Some(e.user_message(op.error_title)));
                Err(e)
            }
        }
    }

    async fn load(&self, path: &Path, op: Operation) -> Result<Document, ApiError> {
        Document::read(path).await.map_err(|e| {
            self.notifier.error(op.error_title, Some(format!("{}: {}", path.display(), e)));
            e
        })
    }

    fn example(&self, document: Document) -> Document {
        self.notifier.info("Example content loaded", Some(document.file_name.clone()));
        document
    }

    fn reject(&self, message: &str) -> ApiError {
        self.notifier.error(message, None);
        ApiError::Validation(message.to_string())
    }

    /// Saves a successful result and reports the outcome either way.
    fn deliver(
        &self,
        op: Operation,
        file_name: String,
        result: Result<Bytes, ApiError>,
    ) -> Result<SignedFile, ApiError> {
        let signed = self.deliver_quietly(op, file_name, result)?;
        self.notifier.success(
            op.success_title,
            Some(format!("Saved {} ({})", signed.path.display(), format_bytes(signed.size))),
        );
        Ok(signed)
    }

    /// Like [`Self::deliver`] but leaves the success notification to the caller.
    fn deliver_quietly(
        &self,
        op: Operation,
        file_name: String,
        result: Result<Bytes, ApiError>,
    ) -> Result<SignedFile, ApiError> {
        let saved = result.and_then(|content| {
            let path = self.downloads.save(&file_name, &content)?;
            Ok(SignedFile { file_name, path, size: content.len() })
        });
        saved.map_err(|e| {
            self.notifier.error(op.error_title, Some(e.user_message(op.error_title)));
            e
        })
    }
}

/// Notification texts of one signing flavour.
#[derive(Clone, Copy)]
struct Operation {
    success_title: &'static str,
    error_title: &'static str,
}

impl Operation {
    const PDF: Operation = Operation {
        success_title: "PDF signed",
        error_title: "PDF signing failed",
    };
    const XML: Operation = Operation {
        success_title: "XML signed",
        error_title: "XML signing failed",
    };
    const SOAP: Operation = Operation {
        success_title: "SOAP message signed",
        error_title: "SOAP signing failed",
    };
    const CADES: Operation = Operation {
        success_title: "CAdES signature created",
        error_title: "CAdES signing failed",
    };
    const HASH: Operation = Operation {
        success_title: "Hash signed",
        error_title: "Hash signing failed",
    };
}

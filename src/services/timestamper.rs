// src/services/timestamper.rs
//! RFC 3161 timestamp workflows: issue a token, validate one, check the TSA.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::sign_client::SignApiClient;
use crate::api::upload::Document;
use crate::models::signing::HashAlgorithm;
use crate::models::timestamp::{TimestampStatus, TimestampValidationReport};
use crate::notify::Notifier;
use crate::storage::downloads::{timestamp_file_name, DownloadSink};

/// A `.tst` token written locally, with the TSA details from the response headers.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IssuedToken {
    pub file_name: String,
    pub path: PathBuf,
    pub size: usize,
    pub metadata: BTreeMap<String, String>,
}

pub struct Timestamper {
    client: Arc<SignApiClient>,
    notifier: Arc<dyn Notifier>,
    downloads: Arc<dyn DownloadSink>,
}

impl Timestamper {
    pub fn new(
        client: Arc<SignApiClient>,
        notifier: Arc<dyn Notifier>,
        downloads: Arc<dyn DownloadSink>,
    ) -> Self {
        Timestamper { client, notifier, downloads }
    }

    /// Obtains a timestamp token over a file and saves it as `<name>.tst`.
    ///
    /// # Errors
    /// Returns the read, transport or HTTP error after reporting it.
    pub async fn issue(&self, path: &Path, hash_algorithm: HashAlgorithm) -> Result<IssuedToken, ApiError> {
        const TITLE: &str = "Timestamp request failed";

        let result = async {
            let document = Document::read(path).await?;
            let issued = self.client.get_timestamp(&document, hash_algorithm).await?;
            let file_name = timestamp_file_name(&document.file_name);
            let path = self.downloads.save(&file_name, &issued.token)?;

            let mut details = vec![format!("Saved {}", path.display())];
            if let Some(tsa) = issued.tsa() {
                details.push(format!("TSA: {}", tsa));
            }
            if let Some(time) = issued.time() {
                details.push(format!("Time: {}", time));
            }
            if let Some(serial) = issued.serial_number() {
                details.push(format!("Serial: {}", serial));
            }
            if let Some(algorithm) = issued.hash_algorithm() {
                details.push(format!("Hash: {}", algorithm));
            }

            let token = IssuedToken {
                file_name,
                path,
                size: issued.token.len(),
                metadata: issued.metadata,
            };
            Ok::<_, ApiError>((token, details.join(", ")))
        }
        .await;

        match result {
            Ok((token, details)) => {
                self.notifier.success("Timestamp issued", Some(details));
                Ok(token)
            }
            Err(e) => {
                self.notifier.error(TITLE, Some(e.user_message(TITLE)));
                Err(e)
            }
        }
    }

    /// Validates a token, optionally against the document it was issued for.
    ///
    /// An invalid token is a completed validation, reported as a warning.
    pub async fn validate(
        &self,
        token: &Path,
        original: Option<&Path>,
    ) -> Result<TimestampValidationReport, ApiError> {
        const TITLE: &str = "Timestamp validation failed";

        let result = async {
            let token = Document::read(token).await?;
            let original = match original {
                Some(path) => Some(Document::read(path).await?),
                None => None,
            };
            self.client.validate_timestamp(&token, original.as_ref()).await
        }
        .await;

        match result {
            Ok(report) => {
                if report.is_valid() {
                    self.notifier.success("Timestamp is valid", report.message.clone());
                } else {
                    let description = if report.errors.is_empty() {
                        report.message.clone()
                    } else {
                        Some(report.errors.join("; "))
                    };
                    self.notifier.warning("Timestamp is not valid", description);
                }
                Ok(report)
            }
            Err(e) => {
                self.notifier.error(TITLE, Some(e.user_message(TITLE)));
                Err(e)
            }
        }
    }

    /// Current timestamp service status.
    ///
    /// A reachable but unconfigured service is not an error; only transport
    /// or HTTP failures are reported.
    pub async fn status(&self) -> Result<TimestampStatus, ApiError> {
        const TITLE: &str = "Timestamp status unavailable";
        self.client.timestamp_status().await.map_err(|e| {
            self.notifier.error(TITLE, Some(e.user_message(TITLE)));
            e
        })
    }
}

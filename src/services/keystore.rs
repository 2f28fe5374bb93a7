// src/services/keystore.rs
//! Keystore, credit and dashboard workflows.
//!
//! Read-only views over the signing service. The dashboard fans out to four
//! endpoints at once and renders whatever came back; one failing panel never
//! hides the others.

use chrono::{DateTime, Utc};
use log::warn;
use serde::Serialize;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::sign_client::SignApiClient;
use crate::models::certificate::{active_serial, CertificateInfo, CertificateListResponse, ExpiryStatus, KeystoreInfo};
use crate::models::credit::TubitakCredit;
use crate::models::timestamp::TimestampStatus;
use crate::notify::Notifier;

/// A certificate together with its expiry class at fetch time.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedCertificate {
    #[serde(flatten)]
    pub certificate: CertificateInfo,
    pub expiry: ExpiryStatus,
    /// The keystore reports this certificate as the one it signs with.
    pub in_use: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CertificateOverview {
    pub success: bool,
    pub keystore_type: Option<String>,
    pub certificate_count: u64,
    pub ready: bool,
    pub certificates: Vec<ClassifiedCertificate>,
}

impl CertificateOverview {
    /// Classifies every certificate of a list response against `now`.
    ///
    /// When `info` names the active serial number, the matching certificate is
    /// marked as in use.
    pub fn from_response(
        response: CertificateListResponse,
        info: Option<&KeystoreInfo>,
        now: DateTime<Utc>,
    ) -> Self {
        let ready = response.is_ready();
        let active = info.and_then(active_serial);
        let certificates = response
            .certificates
            .into_iter()
            .map(|certificate| ClassifiedCertificate {
                expiry: certificate.expiry(now),
                in_use: active.as_deref().map_or(false, |s| certificate.has_serial(s)),
                certificate,
            })
            .collect();
        CertificateOverview {
            success: response.success,
            keystore_type: response.keystore_type,
            certificate_count: response.certificate_count,
            ready,
            certificates,
        }
    }

    pub fn count(&self, status: ExpiryStatus) -> usize {
        self.certificates.iter().filter(|c| c.expiry == status).count()
    }
}

/// One dashboard card: either the data or the reason it is missing.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "lowercase", tag = "state", content = "value")]
pub enum Panel<T> {
    Loaded(T),
    Unavailable(String),
}

impl<T> Panel<T> {
    fn from_result(name: &str, result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Panel::Loaded(value),
            Err(e) => {
                warn!("dashboard panel '{}' unavailable: {}", name, e);
                Panel::Unavailable(e.user_message(&format!("{} unavailable", name)))
            }
        }
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Panel::Loaded(value) => Some(value),
            Panel::Unavailable(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub certificates: Panel<CertificateOverview>,
    pub keystore_info: Panel<KeystoreInfo>,
    pub credit: Panel<TubitakCredit>,
    pub timestamp: Panel<TimestampStatus>,
}

impl Dashboard {
    /// Signing is possible: the keystore loaded and holds at least one certificate.
    pub fn ready(&self) -> bool {
        self.certificates.loaded().map(|c| c.ready).unwrap_or(false)
    }
}

pub struct Keystore {
    client: Arc<SignApiClient>,
    notifier: Arc<dyn Notifier>,
}

impl Keystore {
    pub fn new(client: Arc<SignApiClient>, notifier: Arc<dyn Notifier>) -> Self {
        Keystore { client, notifier }
    }

    /// Lists keystore certificates with their expiry class.
    ///
    /// Keystore info is fetched alongside to mark the certificate in use; when
    /// it cannot be loaded no certificate is marked.
    pub async fn certificates(&self) -> Result<CertificateOverview, ApiError> {
        let (response, info) = tokio::join!(self.client.list_certificates(), self.client.keystore_info());
        let response = response.map_err(|e| self.report("Certificates could not be loaded", e))?;
        let info = info
            .map_err(|e| warn!("keystore info unavailable, in-use certificate not marked: {}", e))
            .ok();
        let overview = CertificateOverview::from_response(response, info.as_ref(), Utc::now());

        let expiring = overview.count(ExpiryStatus::ExpiringSoon);
        let expired = overview.count(ExpiryStatus::Expired);
        if expired > 0 || expiring > 0 {
            self.notifier.warning(
                "Certificate validity",
                Some(format!("{} expired, {} expiring within 30 days", expired, expiring)),
            );
        }
        Ok(overview)
    }

    pub async fn info(&self) -> Result<KeystoreInfo, ApiError> {
        self.client
            .keystore_info()
            .await
            .map_err(|e| self.report("Keystore info could not be loaded", e))
    }

    pub async fn credit(&self) -> Result<TubitakCredit, ApiError> {
        self.client
            .tubitak_credit()
            .await
            .map_err(|e| self.report("Credit could not be loaded", e))
    }

    /// Fetches every dashboard panel concurrently.
    ///
    /// Never fails as a whole; panel errors are logged and carried in the
    /// result rather than notified.
    pub async fn dashboard(&self) -> Dashboard {
        let (certificates, keystore_info, credit, timestamp) = tokio::join!(
            self.client.list_certificates(),
            self.client.keystore_info(),
            self.client.tubitak_credit(),
            self.client.timestamp_status(),
        );
        let now = Utc::now();

        Dashboard {
            certificates: Panel::from_result(
                "Certificates",
                certificates.map(|r| CertificateOverview::from_response(r, keystore_info.as_ref().ok(), now)),
            ),
            keystore_info: Panel::from_result("Keystore info", keystore_info),
            credit: Panel::from_result("Credit", credit),
            timestamp: Panel::from_result("Timestamp service", timestamp),
        }
    }

    fn report(&self, title: &str, e: ApiError) -> ApiError {
        self.notifier.error(title, Some(e.user_message(title)));
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{Level, RecordingNotifier};
    use chrono::Duration as ChronoDuration;
    use std::time::Duration;

    fn keystore(server: &mockito::ServerGuard) -> (Keystore, Arc<RecordingNotifier>) {
        let client = Arc::new(SignApiClient::new(&server.url(), Duration::from_secs(5)).unwrap());
        let notes = Arc::new(RecordingNotifier::default());
        (Keystore::new(client, notes.clone()), notes)
    }

    fn cert(alias: &str, valid_to: String) -> CertificateInfo {
        CertificateInfo {
            alias: Some(alias.to_string()),
            valid_to: Some(valid_to),
            ..Default::default()
        }
    }

    #[test]
    fn overview_classifies_each_certificate() {
        let now = Utc::now();
        let response = CertificateListResponse {
            certificates: vec![
                cert("old", (now - ChronoDuration::days(1)).to_rfc3339()),
                cert("soon", (now + ChronoDuration::days(10)).to_rfc3339()),
                cert("fine", (now + ChronoDuration::days(400)).to_rfc3339()),
            ],
            success: true,
            keystore_type: Some("PKCS11".into()),
            certificate_count: 3,
        };

        let overview = CertificateOverview::from_response(response, None, now);
        assert!(overview.ready);
        assert_eq!(overview.count(ExpiryStatus::Expired), 1);
        assert_eq!(overview.count(ExpiryStatus::ExpiringSoon), 1);
        assert_eq!(overview.count(ExpiryStatus::Active), 1);
    }

    #[test]
    fn active_serial_marks_the_certificate_in_use() {
        let now = Utc::now();
        let valid_to = (now + ChronoDuration::days(400)).to_rfc3339();
        let mut signing = cert("signing", valid_to.clone());
        signing.serial_number_hex = Some("0A1B".into());
        let mut spare = cert("spare", valid_to);
        spare.serial_number_hex = Some("0C1D".into());
        let response = CertificateListResponse {
            certificates: vec![signing, spare],
            success: true,
            keystore_type: None,
            certificate_count: 2,
        };
        let mut info = KeystoreInfo::new();
        info.insert("certificateSerialNumber".into(), serde_json::json!("0a1b"));

        let overview = CertificateOverview::from_response(response.clone(), Some(&info), now);
        let marked: Vec<bool> = overview.certificates.iter().map(|c| c.in_use).collect();
        assert_eq!(marked, vec![true, false]);

        let unmarked = CertificateOverview::from_response(response, None, now);
        assert!(unmarked.certificates.iter().all(|c| !c.in_use));
    }

    #[tokio::test]
    async fn listing_marks_in_use_from_keystore_info() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/certificates/list")
            .with_status(200)
            .with_body(
                r#"{"success":true,"certificateCount":2,"certificates":[
                    {"alias":"a","serialNumberHex":"FF","serialNumberDec":"255"},
                    {"alias":"b","serialNumberHex":"10","serialNumberDec":"16"}]}"#,
            )
            .create_async()
            .await;
        server
            .mock("GET", "/api/certificates/info")
            .with_status(200)
            .with_body(r#"{"certificateSerialNumber":"16"}"#)
            .create_async()
            .await;
        let (ks, _notes) = keystore(&server);

        let overview = ks.certificates().await.unwrap();
        let marked: Vec<bool> = overview.certificates.iter().map(|c| c.in_use).collect();
        assert_eq!(marked, vec![false, true]);
    }

    #[tokio::test]
    async fn listing_survives_missing_keystore_info() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/certificates/list")
            .with_status(200)
            .with_body(r#"{"success":true,"certificateCount":1,"certificates":[{"alias":"a","serialNumberHex":"FF"}]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/certificates/info")
            .with_status(503)
            .create_async()
            .await;
        let (ks, notes) = keystore(&server);

        let overview = ks.certificates().await.unwrap();
        assert!(!overview.certificates[0].in_use);
        assert!(notes.all().is_empty());
    }

    #[tokio::test]
    async fn dashboard_panels_fail_independently() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/certificates/list")
            .with_status(200)
            .with_body(r#"{"success":true,"certificateCount":1,"certificates":[{"alias":"a"}]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/certificates/info")
            .with_status(500)
            .with_body("keystore locked")
            .create_async()
            .await;
        server
            .mock("GET", "/api/tubitak/credit")
            .with_status(200)
            .with_body(r#"{"remainingCredit":42,"customerId":"7"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/timestamp/status")
            .with_status(200)
            .with_body("Timestamp service aktif")
            .create_async()
            .await;
        let (ks, notes) = keystore(&server);

        let dashboard = ks.dashboard().await;

        assert!(dashboard.ready());
        assert_eq!(dashboard.keystore_info, Panel::Unavailable("keystore locked".into()));
        assert_eq!(dashboard.credit.loaded().map(|c| c.remaining()), Some(42));
        assert_eq!(dashboard.timestamp.loaded().map(|s| s.available), Some(true));
        assert!(notes.all().is_empty());
    }

    #[tokio::test]
    async fn empty_keystore_is_not_ready() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/certificates/list")
            .with_status(200)
            .with_body(r#"{"success":true,"certificateCount":0,"certificates":[]}"#)
            .create_async()
            .await;
        let (ks, notes) = keystore(&server);

        let overview = ks.certificates().await.unwrap();
        assert!(!overview.ready);
        assert!(notes.all().is_empty());
    }

    #[tokio::test]
    async fn credit_failure_notifies_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/tubitak/credit")
            .with_status(502)
            .create_async()
            .await;
        let (ks, notes) = keystore(&server);

        assert!(ks.credit().await.is_err());
        let all = notes.all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].level, Level::Error);
        assert_eq!(all[0].description.as_deref(), Some("Credit could not be loaded"));
    }
}

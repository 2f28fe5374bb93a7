// src/app.rs
//! Command dispatch.
//!
//! Builds the clients from [`Settings`], runs the selected workflow, and
//! prints its result as text or JSON. Workflow failures have already been
//! notified by the time they reach here and are only turned into an exit
//! status; setup failures (config, bad input) are printed with their cause
//! chain.

use anyhow::{Context, Result};
use console::style;
use log::debug;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::api::error::ApiError;
use crate::api::sign_client::SignApiClient;
use crate::api::verify_client::VerifyApiClient;
use crate::cli::{CertificateCommands, Cli, Commands, SignCommands, TimestampCommands, VerifyCommands, VerifyDocumentArgs};
use crate::models::verification::SignatureKind;
use crate::notify::{ConsoleNotifier, Notifier};
use crate::report;
use crate::services::keystore::Keystore;
use crate::services::signer::{HashInput, Signer};
use crate::services::timestamper::Timestamper;
use crate::services::verifier::{DocumentOptions, Verifier};
use crate::services::watch::watch;
use crate::settings::Settings;
use crate::storage::downloads::{DirectorySink, DownloadSink};
use crate::utils::serialization::{print_json, ErrorJson};

/// A failure the user has already seen as a notification.
#[derive(Debug, Error)]
#[error("{0}")]
struct Notified(ApiError);

/// Everything a command needs, built once per invocation.
struct Session {
    settings: Settings,
    sign: Arc<SignApiClient>,
    verify: Arc<VerifyApiClient>,
    notifier: Arc<dyn Notifier>,
    downloads: Arc<dyn DownloadSink>,
    json: bool,
}

impl Session {
    fn build(cli: &Cli) -> Result<Self> {
        let settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
        let timeout = Duration::from_secs(settings.request_timeout_secs);

        let sign = SignApiClient::new(&settings.sign_api_url, timeout)
            .context("failed to create signing service client")?;
        let verify = VerifyApiClient::new(&settings.verify_api_url, timeout)
            .context("failed to create verification service client")?;
        let downloads = DirectorySink::new(cli.output_dir.clone());
        debug!(
            "sign api: {}, verify api: {}, output dir: {}",
            sign.base_url(),
            verify.base_url(),
            downloads.dir().display()
        );

        Ok(Session {
            sign: Arc::new(sign),
            verify: Arc::new(verify),
            notifier: Arc::new(ConsoleNotifier::new(cli.json)),
            downloads: Arc::new(downloads),
            settings,
            json: cli.json,
        })
    }

    fn signer(&self) -> Signer {
        Signer::new(self.sign.clone(), self.notifier.clone(), self.downloads.clone())
    }

    fn timestamper(&self) -> Timestamper {
        Timestamper::new(self.sign.clone(), self.notifier.clone(), self.downloads.clone())
    }

    fn keystore(&self) -> Keystore {
        Keystore::new(self.sign.clone(), self.notifier.clone())
    }

    fn verifier(&self) -> Verifier {
        Verifier::new(self.verify.clone(), self.notifier.clone())
    }

    fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.settings.refresh_interval_secs)
    }

    /// Prints a successful result as JSON or as rendered text.
    fn emit<T: Serialize>(&self, command: &str, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
        if self.json {
            print_json(command, "ok", value)?;
        } else {
            print!("{}", text(value));
        }
        Ok(())
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let json = cli.json;
    let result = dispatch(cli).await;

    if let Err(e) = &result {
        if json {
            println!("{}", error_json(e)?);
        } else if let Some(text) = error_text(e) {
            eprint!("{}", text);
        }
    }

    result
}

/// JSON envelope for a failed command.
fn error_json(e: &anyhow::Error) -> Result<String, serde_json::Error> {
    let http_status = e
        .chain()
        .find_map(|c| c.downcast_ref::<Notified>().map(|n| &n.0).or_else(|| c.downcast_ref::<ApiError>()))
        .and_then(ApiError::status);
    let payload = ErrorJson {
        status: "error",
        error: e.to_string(),
        causes: e.chain().skip(1).map(|c| c.to_string()).collect(),
        http_status,
    };
    serde_json::to_string(&payload)
}

/// Error text for the terminal, or `None` when a notification already said it.
fn error_text(e: &anyhow::Error) -> Option<String> {
    if e.downcast_ref::<Notified>().is_some() {
        return None;
    }

    let mut out = format!("\n{} {}\n", style("[ERROR]").red().bold(), style(e).red());
    for (i, cause) in e.chain().skip(1).enumerate() {
        if i == 0 {
            out.push_str("\n    Caused by:\n");
        }
        out.push_str(&format!("      - {}\n", style(cause).red()));
    }
    out.push('\n');
    Some(out)
}

fn notified(e: ApiError) -> anyhow::Error {
    Notified(e).into()
}

async fn dispatch(cli: Cli) -> Result<()> {
    let ctx = Session::build(&cli)?;

    match cli.command {
        Commands::Dashboard => {
            let dashboard = ctx.keystore().dashboard().await;
            ctx.emit("dashboard", &dashboard, report::dashboard)
        }

        Commands::Certificates(CertificateCommands::List) => {
            let overview = ctx.keystore().certificates().await.map_err(notified)?;
            ctx.emit("certificates list", &overview, report::certificates)
        }

        Commands::Certificates(CertificateCommands::Info) => {
            let info = ctx.keystore().info().await.map_err(notified)?;
            ctx.emit("certificates info", &info, report::keystore_info)
        }

        Commands::Credit { watch: false } => {
            let credit = ctx.keystore().credit().await.map_err(notified)?;
            ctx.emit("credit", &credit, report::credit)
        }

        Commands::Credit { watch: true } => {
            let keystore = ctx.keystore();
            let (keystore, ctx) = (&keystore, &ctx);
            watch(ctx.refresh_period(), move || async move {
                // failures were notified; keep polling
                if let Ok(credit) = keystore.credit().await {
                    let _ = ctx.emit("credit", &credit, report::credit);
                }
            })
            .await;
            Ok(())
        }

        Commands::Sign(command) => sign(&ctx, command).await,
        Commands::Timestamp(command) => timestamp(&ctx, command).await,
        Commands::Verify(command) => verify(&ctx, command).await,
    }
}

async fn sign(ctx: &Session, command: SignCommands) -> Result<()> {
    let signer = ctx.signer();

    match command {
        SignCommands::Pdf { input, append } => {
            let signed = signer.sign_pdf(&input, append).await.map_err(notified)?;
            ctx.emit("sign pdf", &signed, report::signed_file)
        }

        SignCommands::Xml { input, example, document_type, zip } => {
            let signed = match input {
                Some(input) => signer.sign_xml(&input, document_type, zip).await,
                None if example => signer.sign_example_xml(document_type, zip).await,
                None => anyhow::bail!("one of <INPUT> or --example is required"),
            };
            ctx.emit("sign xml", &signed.map_err(notified)?, report::signed_file)
        }

        SignCommands::Soap { input, example, soap12 } => {
            let signed = match input {
                Some(input) => signer.sign_soap(&input, soap12).await,
                None if example => signer.sign_example_soap(soap12).await,
                None => anyhow::bail!("one of <INPUT> or --example is required"),
            };
            ctx.emit("sign soap", &signed.map_err(notified)?, report::signed_file)
        }

        SignCommands::Cades { content, file, example, timestamp_type, signature_id } => {
            let signature_id = signature_id.as_deref();
            let signed = match (content, file) {
                (Some(content), _) => signer.sign_cades(&content, timestamp_type, signature_id).await,
                (None, Some(path)) => {
                    let content = tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    signer.sign_cades(&content, timestamp_type, signature_id).await
                }
                (None, None) if example => signer.sign_example_cades(timestamp_type, signature_id).await,
                (None, None) => anyhow::bail!("one of --content, --file or --example is required"),
            };
            ctx.emit("sign cades", &signed.map_err(notified)?, report::signed_file)
        }

        SignCommands::Hash { hash, file, algorithm } => {
            let input = match (hash, file) {
                (Some(hash), _) => HashInput::Digest(hash),
                (None, Some(path)) => HashInput::File(path),
                (None, None) => anyhow::bail!("one of --hash or --file is required"),
            };
            let response = signer.sign_hash(input, algorithm).await.map_err(notified)?;
            ctx.emit("sign hash", &response, report::hash_signature)
        }
    }
}

async fn timestamp(ctx: &Session, command: TimestampCommands) -> Result<()> {
    let timestamper = ctx.timestamper();

    match command {
        TimestampCommands::Get { input, hash_algorithm } => {
            let token = timestamper.issue(&input, hash_algorithm).await.map_err(notified)?;
            ctx.emit("timestamp get", &token, report::issued_token)
        }

        TimestampCommands::Validate { token, original } => {
            let validation = timestamper
                .validate(&token, original.as_deref())
                .await
                .map_err(notified)?;
            ctx.emit("timestamp validate", &validation, report::timestamp_validation)
        }

        TimestampCommands::Status { watch: false } => {
            let status = timestamper.status().await.map_err(notified)?;
            ctx.emit("timestamp status", &status, report::timestamp_status)
        }

        TimestampCommands::Status { watch: true } => {
            let timestamper = &timestamper;
            watch(ctx.refresh_period(), move || async move {
                if let Ok(status) = timestamper.status().await {
                    let _ = ctx.emit("timestamp status", &status, report::timestamp_status);
                }
            })
            .await;
            Ok(())
        }
    }
}

async fn verify(ctx: &Session, command: VerifyCommands) -> Result<()> {
    let verifier = ctx.verifier();

    let (kind, args) = match command {
        VerifyCommands::Pades(args) => (SignatureKind::Pades, args),
        VerifyCommands::Xades(args) => (SignatureKind::Xades, args),
        VerifyCommands::Cades(args) => (SignatureKind::Cades, args),
        VerifyCommands::Timestamp { token, original, validate_certificate } => {
            let verification = verifier
                .verify_timestamp(&token, original.as_deref(), validate_certificate)
                .await
                .map_err(notified)?;
            return ctx.emit("verify timestamp", &verification, report::timestamp_verification);
        }
    };

    let VerifyDocumentArgs { signed, original, level, check_revocation, validate_timestamp } = args;
    let options = DocumentOptions {
        original: original.as_deref(),
        level,
        check_revocation,
        validate_timestamp,
    };
    let verification = verifier
        .verify_document(kind, &signed, options)
        .await
        .map_err(notified)?;
    ctx.emit(&format!("verify {}", kind.path_segment()), &verification, report::verification)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend_failure() -> anyhow::Error {
        notified(ApiError::Http {
            status: 502,
            message: Some("Keystore could not be opened".into()),
        })
    }

    #[test]
    fn json_failure_carries_envelope_and_status() {
        let value: serde_json::Value = serde_json::from_str(&error_json(&backend_failure()).unwrap()).unwrap();

        assert_eq!(value["status"], "error");
        assert_eq!(value["error"], "Keystore could not be opened");
        assert_eq!(value["httpStatus"], 502);
        assert_eq!(value["causes"], serde_json::json!([]));
    }

    #[test]
    fn json_setup_failure_lists_causes_without_status() {
        let e = anyhow::Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"))
            .context("failed to load settings");
        let value: serde_json::Value = serde_json::from_str(&error_json(&e).unwrap()).unwrap();

        assert_eq!(value["error"], "failed to load settings");
        assert_eq!(value["causes"], serde_json::json!(["no such file"]));
        assert!(value.get("httpStatus").is_none());
    }

    #[test]
    fn notified_failure_is_not_printed_again() {
        assert_eq!(error_text(&backend_failure()), None);
    }

    #[test]
    fn setup_failure_is_printed_with_causes() {
        let e = anyhow::Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"))
            .context("failed to load settings");
        let text = error_text(&e).unwrap();

        assert!(text.contains("failed to load settings"));
        assert!(text.contains("Caused by:"));
        assert!(text.contains("no such file"));
    }
}

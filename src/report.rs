// src/report.rs
//! Terminal rendering of backend results.
//!
//! Every renderer returns the finished text so commands decide where it goes
//! (stdout for results; notifications already went to stderr). Values are
//! shown as the backend sent them, with dates normalised to UTC when they
//! parse.

use console::style;
use std::fmt::Write;

use crate::models::certificate::{describe_info_value, parse_dn, ExpiryStatus, KeystoreInfo};
use crate::models::credit::TubitakCredit;
use crate::models::signing::SignHashResponse;
use crate::models::timestamp::{TimestampStatus, TimestampValidationReport};
use crate::models::verification::{SignatureReport, TimestampVerificationReport, VerificationReport};
use crate::services::keystore::{CertificateOverview, Dashboard, Panel};
use crate::services::signer::SignedFile;
use crate::services::timestamper::IssuedToken;
use crate::utils::format::{format_bytes, format_date, yes_no};

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", style(format!("==> {}", title)).cyan().bold());
}

fn field(out: &mut String, indent: usize, label: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        let _ = writeln!(out, "{:indent$}{}: {}", "", label, style(value).cyan(), indent = indent);
    }
}

fn date_field(out: &mut String, indent: usize, label: &str, value: Option<&str>) {
    field(out, indent, label, value.map(format_date).as_deref());
}

fn flag_field(out: &mut String, indent: usize, label: &str, value: Option<bool>) {
    field(out, indent, label, value.map(yes_no));
}

fn list(out: &mut String, indent: usize, label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "{:indent$}{}:", "", label, indent = indent);
    for item in items {
        let _ = writeln!(out, "{:indent$}  - {}", "", item, indent = indent);
    }
}

fn expiry_tag(status: ExpiryStatus) -> String {
    let tag = style(format!("[{}]", status.label().to_uppercase())).bold();
    match status {
        ExpiryStatus::Expired => tag.red().to_string(),
        ExpiryStatus::ExpiringSoon => tag.yellow().to_string(),
        ExpiryStatus::Active => tag.green().to_string(),
    }
}

fn validity_tag(valid: bool) -> String {
    if valid {
        style("[VALID]").green().bold().to_string()
    } else {
        style("[INVALID]").red().bold().to_string()
    }
}

// =====================
// Keystore
// =====================

pub fn certificates(overview: &CertificateOverview) -> String {
    let mut out = String::new();
    heading(&mut out, "Keystore certificates");
    field(&mut out, 4, "Keystore type", overview.keystore_type.as_deref());
    let _ = writeln!(
        out,
        "    Certificates: {}  (ready for signing: {})",
        style(overview.certificate_count).cyan(),
        yes_no(overview.ready)
    );

    if overview.certificates.is_empty() {
        let _ = writeln!(out, "\n    No certificates found in the keystore.");
        return out;
    }

    for (i, entry) in overview.certificates.iter().enumerate() {
        let cert = &entry.certificate;
        let name = cert.display_name().unwrap_or_else(|| "(unnamed)".to_string());
        let in_use = if entry.in_use {
            format!(" {}", style("[IN USE]").magenta().bold())
        } else {
            String::new()
        };
        let _ = writeln!(
            out,
            "\n  {}. {}{} {}",
            i + 1,
            expiry_tag(entry.expiry),
            in_use,
            style(name).bold()
        );
        field(&mut out, 5, "Alias", cert.alias.as_deref());
        field(&mut out, 5, "Type", cert.kind.as_deref());
        if let Some(subject) = cert.subject.as_deref() {
            let dn = parse_dn(subject);
            field(&mut out, 5, "Organization", dn.get("O").map(String::as_str));
            field(&mut out, 5, "Serial (subject)", dn.get("SERIALNUMBER").map(String::as_str));
            field(&mut out, 5, "Subject", Some(subject));
        }
        field(&mut out, 5, "Issuer", cert.issuer.as_deref());
        field(&mut out, 5, "Serial (hex)", cert.serial_number_hex.as_deref());
        field(&mut out, 5, "Serial (dec)", cert.serial_number_dec.as_deref());
        date_field(&mut out, 5, "Valid from", cert.valid_from.as_deref());
        date_field(&mut out, 5, "Valid to", cert.valid_to.as_deref());
        flag_field(&mut out, 5, "Private key", cert.has_private_key);
        field(&mut out, 5, "Signature algorithm", cert.signature_algorithm.as_deref());
        field(&mut out, 5, "Key usage", cert.key_usage.as_deref());
        field(&mut out, 5, "Extended key usage", cert.extended_key_usage.as_deref());
        field(&mut out, 5, "Policies", cert.certificate_policies.as_deref());
    }
    out
}

pub fn keystore_info(info: &KeystoreInfo) -> String {
    let mut out = String::new();
    heading(&mut out, "Keystore information");
    if info.is_empty() {
        let _ = writeln!(out, "    (no details reported)");
    }
    for (key, value) in info {
        let _ = writeln!(out, "    {}: {}", key, style(describe_info_value(value)).cyan());
    }
    out
}

pub fn credit(credit: &TubitakCredit) -> String {
    let mut out = String::new();
    heading(&mut out, "TÜBİTAK timestamp credit");
    let _ = writeln!(out, "    Remaining credit: {}", style(credit.remaining()).cyan().bold());
    field(&mut out, 4, "Customer ID", credit.customer_id.as_deref());
    field(&mut out, 4, "Message", credit.message.as_deref());
    out
}

pub fn timestamp_status(status: &TimestampStatus) -> String {
    let badge = if status.available {
        style(status.badge()).green().bold()
    } else {
        style(status.badge()).red().bold()
    };
    let mut out = String::new();
    heading(&mut out, "Timestamp service");
    let _ = writeln!(out, "    Status: {}", badge);
    field(&mut out, 4, "Message", Some(status.status.as_str()));
    out
}

fn panel<T>(out: &mut String, panel: &Panel<T>, render: impl Fn(&T) -> String) {
    match panel {
        Panel::Loaded(value) => out.push_str(&render(value)),
        Panel::Unavailable(reason) => {
            let _ = writeln!(out, "    {} {}", style("[UNAVAILABLE]").yellow().bold(), reason);
        }
    }
}

pub fn dashboard(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    let ready = if dashboard.ready() {
        style("[READY]").green().bold()
    } else {
        style("[NOT READY]").red().bold()
    };
    let _ = writeln!(out, "{} Signing system\n", ready);

    panel(&mut out, &dashboard.certificates, |c| {
        let mut s = String::new();
        heading(&mut s, "Certificates");
        field(&mut s, 4, "Keystore type", c.keystore_type.as_deref());
        let _ = writeln!(
            s,
            "    {} total, {} active, {} expiring soon, {} expired",
            c.certificate_count,
            c.count(ExpiryStatus::Active),
            c.count(ExpiryStatus::ExpiringSoon),
            c.count(ExpiryStatus::Expired)
        );
        s
    });
    out.push('\n');
    panel(&mut out, &dashboard.keystore_info, keystore_info);
    out.push('\n');
    panel(&mut out, &dashboard.credit, credit);
    out.push('\n');
    panel(&mut out, &dashboard.timestamp, timestamp_status);
    out
}

// =====================
// Signing and timestamps
// =====================

pub fn signed_file(file: &SignedFile) -> String {
    format!(
        "{} {} ({})\n",
        style("[SAVED]").green().bold(),
        style(file.path.display()).cyan(),
        format_bytes(file.size)
    )
}

pub fn hash_signature(response: &SignHashResponse) -> String {
    let mut out = String::new();
    heading(&mut out, "Hash signature");
    field(&mut out, 4, "Signature algorithm", Some(response.signature_algorithm.as_str()));
    let _ = writeln!(out, "    Signature value:\n      {}", response.signature_value);
    if !response.certificate.is_empty() {
        let _ = writeln!(out, "    Certificate:\n      {}", response.certificate);
    }
    if !response.certificate_chain.is_empty() {
        let _ = writeln!(out, "    Certificate chain:\n      {}", response.certificate_chain);
    }
    out
}

pub fn issued_token(token: &IssuedToken) -> String {
    let mut out = String::new();
    heading(&mut out, "Timestamp token");
    let _ = writeln!(
        out,
        "    Saved: {} ({})",
        style(token.path.display()).cyan(),
        format_bytes(token.size)
    );
    for (key, value) in &token.metadata {
        let _ = writeln!(out, "    {}: {}", key, style(value).cyan());
    }
    out
}

pub fn timestamp_validation(report: &TimestampValidationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} Timestamp validation", validity_tag(report.is_valid()));
    date_field(&mut out, 4, "Time", report.timestamp.as_deref());
    field(&mut out, 4, "TSA", report.tsa_name.as_deref());
    field(&mut out, 4, "Serial", report.serial_number.as_deref());
    field(&mut out, 4, "Nonce", report.nonce.as_deref());
    field(&mut out, 4, "Hash algorithm", report.hash_algorithm.as_deref());
    field(&mut out, 4, "Hash algorithm OID", report.hash_algorithm_oid.as_deref());
    field(&mut out, 4, "Signature algorithm", report.signature_algorithm.as_deref());
    field(&mut out, 4, "Signature algorithm OID", report.signature_algorithm_oid.as_deref());
    flag_field(&mut out, 4, "Document hash matches", report.hash_verified);
    flag_field(&mut out, 4, "TSA certificate valid", report.certificate_valid);
    date_field(&mut out, 4, "TSA certificate not before", report.certificate_not_before.as_deref());
    date_field(&mut out, 4, "TSA certificate not after", report.certificate_not_after.as_deref());
    field(&mut out, 4, "TSA certificate", report.tsa_certificate.as_deref());
    field(&mut out, 4, "Message", report.message.as_deref());
    list(&mut out, 4, "Errors", &report.errors);
    out
}

// =====================
// Verification
// =====================

fn signature(out: &mut String, index: usize, sig: &SignatureReport) {
    let tag = match sig.valid {
        Some(valid) => validity_tag(valid),
        None => style("[UNKNOWN]").dim().to_string(),
    };
    let name = sig
        .signer_name
        .as_deref()
        .or_else(|| sig.signer_certificate.as_ref().and_then(|c| c.common_name.as_deref()))
        .unwrap_or("(unknown signer)");
    let _ = writeln!(out, "\n  {}. {} {}", index + 1, tag, style(name).bold());
    field(out, 5, "Level", sig.signature_level.as_deref());
    field(out, 5, "Format", sig.signature_format.as_deref());
    date_field(out, 5, "Signing time", sig.signing_time.as_deref());
    field(out, 5, "Algorithm", sig.signature_algorithm.as_deref());
    flag_field(out, 5, "Certificate valid", sig.certificate_valid);
    flag_field(out, 5, "Timestamp valid", sig.timestamp_valid);

    if let Some(cert) = &sig.signer_certificate {
        let _ = writeln!(out, "     Signer certificate:");
        field(out, 7, "Subject", cert.subject.as_deref());
        field(out, 7, "Issuer", cert.issuer.as_deref());
        field(out, 7, "Serial", cert.serial_number.as_deref());
        date_field(out, 7, "Not before", cert.not_before.as_deref());
        date_field(out, 7, "Not after", cert.not_after.as_deref());
    }

    for ts in &sig.timestamps {
        let _ = writeln!(
            out,
            "     Timestamp {}: {}",
            ts.timestamp_type.as_deref().unwrap_or("?"),
            ts.timestamp_time.as_deref().map(format_date).unwrap_or_default()
        );
        field(out, 7, "TSA", ts.tsa_name.as_deref());
        field(out, 7, "Digest", ts.digest_algorithm.as_deref());
        flag_field(out, 7, "Valid", ts.valid);
    }

    list(out, 5, "Validation errors", &sig.validation_errors);
}

pub fn verification(report: &VerificationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} Signature verification", validity_tag(report.valid));
    field(&mut out, 4, "Status", report.status.as_deref());
    field(&mut out, 4, "Signature type", report.signature_type.as_deref());
    let count = report.signature_count.unwrap_or(report.signatures.len() as u32);
    let _ = writeln!(out, "    Signatures: {}", style(count).cyan());
    date_field(&mut out, 4, "Verified at", report.verification_time.as_deref());

    for (i, sig) in report.signatures.iter().enumerate() {
        signature(&mut out, i, sig);
    }

    if !report.errors.is_empty() || !report.warnings.is_empty() {
        out.push('\n');
    }
    list(&mut out, 4, "Errors", &report.errors);
    list(&mut out, 4, "Warnings", &report.warnings);
    out
}

pub fn timestamp_verification(report: &TimestampVerificationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} Timestamp verification", validity_tag(report.valid));
    field(&mut out, 4, "Status", report.status.as_deref());
    date_field(&mut out, 4, "Time", report.timestamp_time.as_deref());
    field(&mut out, 4, "TSA", report.tsa_name.as_deref());
    field(&mut out, 4, "Digest algorithm", report.digest_algorithm.as_deref());
    field(&mut out, 4, "Message imprint", report.message_imprint.as_deref());
    if let Some(cert) = &report.tsa_certificate {
        let _ = writeln!(out, "    TSA certificate:");
        field(&mut out, 6, "Common name", cert.common_name.as_deref());
        field(&mut out, 6, "Subject", cert.subject.as_deref());
        field(&mut out, 6, "Serial", cert.serial_number.as_deref());
        date_field(&mut out, 6, "Not before", cert.not_before.as_deref());
        date_field(&mut out, 6, "Not after", cert.not_after.as_deref());
    }
    date_field(&mut out, 4, "Verified at", report.verification_time.as_deref());
    list(&mut out, 4, "Errors", &report.errors);
    list(&mut out, 4, "Warnings", &report.warnings);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::certificate::{CertificateInfo, CertificateListResponse};
    use crate::models::verification::SignerCertificate;

    #[test]
    fn certificate_list_shows_common_name_and_expiry() {
        let response = CertificateListResponse {
            certificates: vec![CertificateInfo {
                alias: Some("sign-key".into()),
                subject: Some("CN=Ali Veli, O=Example A.S., C=TR".into()),
                valid_to: Some("2000-01-01T00:00:00Z".into()),
                has_private_key: Some(true),
                ..Default::default()
            }],
            success: true,
            keystore_type: Some("PKCS12".into()),
            certificate_count: 1,
        };
        let overview = CertificateOverview::from_response(response, None, chrono::Utc::now());

        let text = certificates(&overview);
        assert!(text.contains("Ali Veli"));
        assert!(text.contains("EXPIRED"));
        assert!(text.contains("Example A.S."));
        assert!(text.contains("2000-01-01 00:00 UTC"));
    }

    #[test]
    fn certificate_in_use_is_tagged() {
        let response = CertificateListResponse {
            certificates: vec![
                CertificateInfo {
                    alias: Some("signing".into()),
                    serial_number_dec: Some("4096".into()),
                    ..Default::default()
                },
                CertificateInfo {
                    alias: Some("spare".into()),
                    serial_number_dec: Some("8192".into()),
                    ..Default::default()
                },
            ],
            success: true,
            keystore_type: None,
            certificate_count: 2,
        };
        let mut info = KeystoreInfo::new();
        info.insert("certificateSerialNumber".into(), serde_json::json!(4096));
        let overview = CertificateOverview::from_response(response, Some(&info), chrono::Utc::now());

        let text = certificates(&overview);
        assert_eq!(text.matches("[IN USE]").count(), 1);
        let tagged = text.lines().find(|l| l.contains("[IN USE]")).unwrap();
        assert!(tagged.contains("1."));
        assert!(text.contains("[ACTIVE]"));
    }

    #[test]
    fn empty_keystore_says_so() {
        let overview =
            CertificateOverview::from_response(CertificateListResponse::default(), None, chrono::Utc::now());
        assert!(certificates(&overview).contains("No certificates found"));
    }

    #[test]
    fn verification_report_lists_signatures_and_errors() {
        let report = VerificationReport {
            valid: false,
            status: Some("INDETERMINATE".into()),
            signatures: vec![SignatureReport {
                valid: Some(false),
                signer_certificate: Some(SignerCertificate {
                    common_name: Some("Ayse Yilmaz".into()),
                    ..Default::default()
                }),
                validation_errors: vec!["Revocation data missing".into()],
                ..Default::default()
            }],
            errors: vec!["Chain incomplete".into()],
            ..Default::default()
        };

        let text = verification(&report);
        assert!(text.contains("INVALID"));
        assert!(text.contains("Ayse Yilmaz"));
        assert!(text.contains("Revocation data missing"));
        assert!(text.contains("Chain incomplete"));
        assert!(text.contains("Signatures:"));
    }

    #[test]
    fn unavailable_panel_does_not_hide_others() {
        let dashboard = Dashboard {
            certificates: Panel::Unavailable("connection refused".into()),
            keystore_info: Panel::Loaded(KeystoreInfo::new()),
            credit: Panel::Loaded(TubitakCredit { remaining_credit: Some(12), ..Default::default() }),
            timestamp: Panel::Loaded(TimestampStatus { available: true, status: "ok".into() }),
        };

        let text = super::dashboard(&dashboard);
        assert!(text.contains("NOT READY"));
        assert!(text.contains("connection refused"));
        assert!(text.contains("12"));
        assert!(text.contains("Aktif"));
    }
}

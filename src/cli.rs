// src/cli.rs
//! Command line definition.

use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::models::signing::{CadesTimestampType, DocumentType, HashAlgorithm};
use crate::models::verification::VerificationLevel;

#[derive(Parser, Debug)]
#[command(
    name = "esign",
    version,
    about = "Console for the e-signature and verification services",
    long_about = "Sign documents (PAdES, XAdES, WS-Security, CAdES, raw hashes), obtain and \
                  validate RFC 3161 timestamps, inspect the keystore, and verify signatures \
                  through the signing and verification backends."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Runtime config file (JSON, TOML or YAML) with SIGN_API_URL / VERIFY_API_URL
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output machine-readable JSON to stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging (sets RUST_LOG=debug if not already set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory that receives signed files and timestamp tokens
    #[arg(short, long, global = true, env = "ESIGN_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Overview of keystore, credit and timestamp service
    Dashboard,

    /// Inspect the signing keystore
    #[command(subcommand)]
    Certificates(CertificateCommands),

    /// Remaining TÜBİTAK timestamp credit
    Credit {
        /// Refresh periodically until Ctrl-C
        #[arg(long)]
        watch: bool,
    },

    /// Sign documents, content or hashes
    #[command(subcommand)]
    Sign(SignCommands),

    /// Obtain, validate or check RFC 3161 timestamps
    #[command(subcommand)]
    Timestamp(TimestampCommands),

    /// Verify signatures with the verification service
    #[command(subcommand)]
    Verify(VerifyCommands),
}

#[derive(Subcommand, Debug)]
pub enum CertificateCommands {
    /// List certificates with their expiry status
    List,
    /// Keystore details
    Info,
}

#[derive(Subcommand, Debug)]
pub enum SignCommands {
    /// PAdES signature on a PDF
    Pdf {
        input: PathBuf,

        /// Keep existing signatures by appending an incremental update
        #[arg(long)]
        append: bool,
    },

    /// XAdES signature on an XML document
    #[command(group(ArgGroup::new("source").required(true).args(["input", "example"])))]
    Xml {
        input: Option<PathBuf>,

        /// Sign a built-in sample UBL invoice
        #[arg(long)]
        example: bool,

        /// UBL_DOCUMENT, EARCHIVE_REPORT, HR_XML, OTHER_XML_DOCUMENT or NONE
        #[arg(long, default_value_t = DocumentType::default())]
        document_type: DocumentType,

        /// Ask the backend for a zipped result
        #[arg(long)]
        zip: bool,
    },

    /// WS-Security signature on a SOAP envelope
    #[command(group(ArgGroup::new("source").required(true).args(["input", "example"])))]
    Soap {
        input: Option<PathBuf>,

        /// Sign a built-in sample envelope of the selected SOAP version
        #[arg(long)]
        example: bool,

        /// Treat the envelope as SOAP 1.2 (default: 1.1)
        #[arg(long)]
        soap12: bool,
    },

    /// CAdES (PKCS#7) signature over text content
    #[command(group(ArgGroup::new("source").required(true).args(["content", "file", "example"])))]
    Cades {
        /// Content to sign
        #[arg(long)]
        content: Option<String>,

        /// Read the content from a file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Sign a built-in sample e-Archive notification
        #[arg(long)]
        example: bool,

        /// none, signature, content, archive, esc or all
        #[arg(long, default_value_t = CadesTimestampType::default())]
        timestamp_type: CadesTimestampType,

        #[arg(long)]
        signature_id: Option<String>,
    },

    /// Sign a precomputed digest
    #[command(group(ArgGroup::new("digest").required(true).args(["hash", "file"])))]
    Hash {
        /// Base64 digest
        #[arg(long)]
        hash: Option<String>,

        /// Digest this file locally and sign the result
        #[arg(long)]
        file: Option<PathBuf>,

        /// SHA-256, SHA-384, SHA-512 or SHA-1
        #[arg(long, default_value_t = HashAlgorithm::default())]
        algorithm: HashAlgorithm,
    },
}

#[derive(Subcommand, Debug)]
pub enum TimestampCommands {
    /// Obtain a token for a file and save it as <file>.tst
    Get {
        input: PathBuf,

        #[arg(long, default_value_t = HashAlgorithm::default())]
        hash_algorithm: HashAlgorithm,
    },

    /// Validate a .tst token
    Validate {
        token: PathBuf,

        /// Document the token was issued for
        #[arg(long)]
        original: Option<PathBuf>,
    },

    /// Timestamp service status
    Status {
        /// Refresh periodically until Ctrl-C
        #[arg(long)]
        watch: bool,
    },
}

#[derive(Args, Debug)]
pub struct VerifyDocumentArgs {
    /// Signed document
    pub signed: PathBuf,

    /// Detached original content
    #[arg(long)]
    pub original: Option<PathBuf>,

    /// SIMPLE or COMPREHENSIVE
    #[arg(long, default_value_t = VerificationLevel::default())]
    pub level: VerificationLevel,

    #[arg(long)]
    pub check_revocation: Option<bool>,

    #[arg(long)]
    pub validate_timestamp: Option<bool>,
}

#[derive(Subcommand, Debug)]
pub enum VerifyCommands {
    /// Verify a signed PDF
    Pades(VerifyDocumentArgs),
    /// Verify a signed XML document
    Xades(VerifyDocumentArgs),
    /// Verify a CAdES signature
    Cades(VerifyDocumentArgs),
    /// Verify a standalone timestamp token
    Timestamp {
        token: PathBuf,

        #[arg(long)]
        original: Option<PathBuf>,

        #[arg(long)]
        validate_certificate: Option<bool>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_nested_sign_command() {
        let cli = Cli::try_parse_from([
            "esign", "--json", "sign", "xml", "invoice.xml", "--document-type", "EARCHIVE_REPORT", "--zip",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Sign(SignCommands::Xml { document_type, zip, .. }) => {
                assert_eq!(document_type, DocumentType::EarchiveReport);
                assert!(zip);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_literal() {
        assert!(Cli::try_parse_from(["esign", "sign", "hash", "--hash", "abc", "--algorithm", "MD5"]).is_err());
    }

    #[test]
    fn xml_and_soap_take_a_file_or_the_example() {
        assert!(Cli::try_parse_from(["esign", "sign", "xml"]).is_err());
        assert!(Cli::try_parse_from(["esign", "sign", "xml", "a.xml", "--example"]).is_err());

        let cli = Cli::try_parse_from(["esign", "sign", "soap", "--example", "--soap12"]).unwrap();
        match cli.command {
            Commands::Sign(SignCommands::Soap { input, example, soap12 }) => {
                assert_eq!(input, None);
                assert!(example);
                assert!(soap12);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn cades_needs_a_source() {
        assert!(Cli::try_parse_from(["esign", "sign", "cades"]).is_err());
        assert!(Cli::try_parse_from(["esign", "sign", "cades", "--example"]).is_ok());
    }
}

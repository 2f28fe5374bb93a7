// src/main.rs

//! # e-Signature Console - Main Entry Point
//!
//! Command line front end for two HTTP backends:
//!
//! ## Architecture Overview
//! 1. **API Layer**: `SignApiClient` (signing, keystore, credit, timestamps) and
//!    `VerifyApiClient` (DSS-based signature verification)
//! 2. **Services Layer**: one workflow per user action, reporting through a `Notifier`
//! 3. **Storage Layer**: returned files land in the output directory via a `DownloadSink`
//! 4. **Report Layer**: terminal or JSON rendering of backend results
//!
//! ## Configuration
//! Resolved per run, highest priority first:
//! - runtime config file (`--config` or `ESIGN_APP_CONFIG`)
//! - `SIGN_API_URL` / `VERIFY_API_URL` (legacy `VITE_*` names accepted)
//! - `http://localhost:8085` / `http://localhost:8086`
//!
//! A `.env` file in the working directory is loaded first.

use clap::Parser;
use dotenv::dotenv;
use std::process::ExitCode;

// Module declarations (organized by functional domain)
mod api;           // HTTP clients and wire errors
mod app;           // Command dispatch
mod cli;           // Argument definitions
mod models;        // Backend DTOs and enum literals
mod notify;        // User-visible notifications
mod report;        // Terminal rendering
mod services;      // Workflows
mod settings;      // Endpoint configuration
mod storage;       // Downloaded files
mod utils;         // Hashing, formatting, JSON output

/// Main application entry point
///
/// # Initialization Sequence
/// 1. Load `.env`
/// 2. Parse arguments
/// 3. Set up logging (`warn` by default, debug for this crate with `--verbose`)
/// 4. Dispatch the command
#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenv().ok();

    let cli = cli::Cli::parse();

    let default_filter = if cli.verbose { "warn,esign=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    match app::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

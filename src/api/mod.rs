// src/api/mod.rs
//! HTTP clients for the two remote collaborators.
//!
//! - [`sign_client::SignApiClient`]: signing, keystore, credit and timestamp endpoints
//! - [`verify_client::VerifyApiClient`]: DSS-backed signature verification

pub mod error;
pub mod http;
pub mod sign_client;
pub mod upload;
pub mod verify_client;

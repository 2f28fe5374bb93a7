// src/services/mod.rs
//! User workflows on top of the API clients.
//!
//! Each workflow validates its input, makes the call, and reports the outcome
//! exactly once through a [`crate::notify::Notifier`]. Files returned by the
//! backend go through a [`crate::storage::downloads::DownloadSink`].

pub mod keystore;
pub mod samples;
pub mod signer;
pub mod status;
pub mod timestamper;
pub mod verifier;
pub mod watch;

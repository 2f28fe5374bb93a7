// src/models/mod.rs
//! Data transfer objects exchanged with the signing and verification services.

pub mod certificate;
pub mod credit;
pub mod signing;
pub mod timestamp;
pub mod verification;

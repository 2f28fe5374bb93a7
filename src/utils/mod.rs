// src/utils/mod.rs
//! Helpers shared across commands.

pub mod crypto;
pub mod format;
pub mod serialization;

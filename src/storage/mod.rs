// src/storage/mod.rs
//! Local file output.

pub mod downloads;

// src/utils/serialization.rs
//! JSON helpers for `--json` output.

use serde::Serialize;

/// Serializes a value to a pretty-printed JSON string.
///
/// # Returns
/// - `Ok(String)` with the JSON representation
/// - `Err(serde_json::Error)` if serialization fails
pub fn to_pretty_json<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(data)
}

/// Envelope printed for every command in JSON mode.
#[derive(Serialize)]
pub struct JsonOutput<'a, T: Serialize> {
    pub status: &'a str,
    pub command: &'a str,
    pub result: T,
}

/// Envelope printed when a command fails in JSON mode.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorJson<'a> {
    pub status: &'a str,
    pub error: String,
    pub causes: Vec<String>,
    /// Status code when the backend answered with an error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
}

/// Prints a command result as JSON on stdout.
pub fn print_json<T: Serialize>(command: &str, status: &str, result: T) -> Result<(), serde_json::Error> {
    let out = JsonOutput { status, command, result };
    println!("{}", to_pretty_json(&out)?);
    Ok(())
}

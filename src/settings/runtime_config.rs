// src/settings/runtime_config.rs
//! Runtime configuration object injected at deploy time.
//!
//! In container deployments a ConfigMap is mounted as a small JSON document:
//!
//! ```json
//! { "SIGN_API_URL": "http://esign-api:8085", "VERIFY_API_URL": "http://verify-api:8086" }
//! ```
//!
//! Either key may be missing or empty, in which case the next layer of
//! [`Settings`](crate::settings::Settings) resolution applies.

use config::{Config, ConfigError, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

/// Partial settings read from the runtime config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct RuntimeConfig {
    #[serde(default, alias = "SIGN_API_URL")]
    pub sign_api_url: Option<String>,
    #[serde(default, alias = "VERIFY_API_URL")]
    pub verify_api_url: Option<String>,
}

impl RuntimeConfig {
    /// Reads a runtime config file. JSON unless the extension says otherwise.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => FileFormat::Toml,
            Some("yaml") | Some("yml") => FileFormat::Yaml,
            _ => FileFormat::Json,
        };
        let source = File::from(path).format(format).required(true);
        Config::builder().add_source(source).build()?.try_deserialize()
    }

    /// Parses an inline JSON runtime config.
    #[cfg(test)]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(json, FileFormat::Json))
            .build()?
            .try_deserialize()
    }
}

// src/settings/mod.rs
//! Runtime settings: where the signing and verification services live.
//!
//! # Resolution order
//! 1. Runtime config file (`--config` or `ESIGN_APP_CONFIG`), the
//!    orchestration-injected ConfigMap equivalent
//! 2. Environment (`SIGN_API_URL`, `VERIFY_API_URL`, then the legacy
//!    `VITE_API_URL`, `VITE_VERIFY_API_URL`), optionally from `.env`
//! 3. Built-in localhost defaults
//!
//! Empty values are ignored at every layer.

pub mod runtime_config;

use config::{Config, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::settings::runtime_config::RuntimeConfig;

pub const DEFAULT_SIGN_API_URL: &str = "http://localhost:8085";
pub const DEFAULT_VERIFY_API_URL: &str = "http://localhost:8086";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;

/// Environment variable naming the runtime config file.
pub const APP_CONFIG_ENV: &str = "ESIGN_APP_CONFIG";

/// Fully resolved settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub sign_api_url: String,
    pub verify_api_url: String,
    pub request_timeout_secs: u64,
    /// Interval of the status/credit watch loops
    pub refresh_interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            sign_api_url: DEFAULT_SIGN_API_URL.to_string(),
            verify_api_url: DEFAULT_VERIFY_API_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }
}

impl Settings {
    /// Resolves settings from the process environment.
    ///
    /// # Arguments
    /// * `config_path` - Explicit runtime config file; when `None`,
    ///   `ESIGN_APP_CONFIG` is consulted
    ///
    /// # Errors
    /// Returns `ConfigError` if the runtime config file is unreadable or a
    /// numeric setting does not parse.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let env = |key: &str| std::env::var(key).ok();

        let runtime = match config_path {
            Some(path) => Some(RuntimeConfig::from_file(path)?),
            None => match env(APP_CONFIG_ENV).filter(|p| !p.trim().is_empty()) {
                Some(path) => Some(RuntimeConfig::from_file(Path::new(&path))?),
                None => None,
            },
        };

        Self::resolve(runtime.as_ref(), env)
    }

    /// Layers the runtime config over the environment over the defaults.
    pub fn resolve<F>(runtime: Option<&RuntimeConfig>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_value = |keys: &[&str]| keys.iter().find_map(|k| non_empty(env(k)));
        let runtime_sign = runtime.and_then(|r| non_empty(r.sign_api_url.clone()));
        let runtime_verify = runtime.and_then(|r| non_empty(r.verify_api_url.clone()));

        let timeout = parse_secs("REQUEST_TIMEOUT_SECS", env_value(&["REQUEST_TIMEOUT_SECS"]))?;
        let refresh = parse_secs("REFRESH_INTERVAL_SECS", env_value(&["REFRESH_INTERVAL_SECS"]))?;

        let settings: Settings = Config::builder()
            .set_default("sign_api_url", DEFAULT_SIGN_API_URL)?
            .set_default("verify_api_url", DEFAULT_VERIFY_API_URL)?
            .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS as i64)?
            .set_default("refresh_interval_secs", DEFAULT_REFRESH_INTERVAL_SECS as i64)?
            .set_override_option("sign_api_url", env_value(&["SIGN_API_URL", "VITE_API_URL"]))?
            .set_override_option(
                "verify_api_url",
                env_value(&["VERIFY_API_URL", "VITE_VERIFY_API_URL"]),
            )?
            .set_override_option("request_timeout_secs", timeout)?
            .set_override_option("refresh_interval_secs", refresh)?
            // Runtime config is applied last so it wins over the environment.
            .set_override_option("sign_api_url", runtime_sign)?
            .set_override_option("verify_api_url", runtime_verify)?
            .build()?
            .try_deserialize()?;

        Ok(settings.normalized())
    }

    fn normalized(mut self) -> Self {
        self.sign_api_url = self.sign_api_url.trim().trim_end_matches('/').to_string();
        self.verify_api_url = self.verify_api_url.trim().trim_end_matches('/').to_string();
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_secs(key: &str, value: Option<String>) -> Result<Option<i64>, ConfigError> {
    value
        .map(|v| match v.trim().parse::<u32>() {
            Ok(0) => Err(ConfigError::Message(format!("{} must be at least 1 second", key))),
            Ok(secs) => Ok(i64::from(secs)),
            Err(_) => Err(ConfigError::Message(format!(
                "{} must be a whole number of seconds, got '{}'",
                key, v
            ))),
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn falls_back_to_localhost_ports() {
        let settings = Settings::resolve(None, env_from(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.sign_api_url, "http://localhost:8085");
        assert_eq!(settings.verify_api_url, "http://localhost:8086");
    }

    #[test]
    fn environment_overrides_defaults() {
        let env = env_from(&[
            ("SIGN_API_URL", "https://sign.internal/"),
            ("VITE_VERIFY_API_URL", "https://verify.internal"),
            ("REQUEST_TIMEOUT_SECS", "15"),
        ]);
        let settings = Settings::resolve(None, env).unwrap();
        assert_eq!(settings.sign_api_url, "https://sign.internal");
        assert_eq!(settings.verify_api_url, "https://verify.internal");
        assert_eq!(settings.request_timeout_secs, 15);
        assert_eq!(settings.refresh_interval_secs, DEFAULT_REFRESH_INTERVAL_SECS);
    }

    #[test]
    fn runtime_config_wins_over_environment() {
        let runtime = RuntimeConfig {
            sign_api_url: Some("http://esign-api:8085".into()),
            verify_api_url: Some(String::new()),
        };
        let env = env_from(&[
            ("SIGN_API_URL", "https://sign.internal"),
            ("VERIFY_API_URL", "https://verify.internal"),
        ]);
        let settings = Settings::resolve(Some(&runtime), env).unwrap();
        assert_eq!(settings.sign_api_url, "http://esign-api:8085");
        // empty runtime value does not mask the environment
        assert_eq!(settings.verify_api_url, "https://verify.internal");
    }

    #[test]
    fn empty_environment_values_are_ignored() {
        let env = env_from(&[("SIGN_API_URL", "  "), ("VITE_API_URL", "http://legacy:9000")]);
        let settings = Settings::resolve(None, env).unwrap();
        assert_eq!(settings.sign_api_url, "http://legacy:9000");
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        let env = env_from(&[("REQUEST_TIMEOUT_SECS", "soon")]);
        let err = Settings::resolve(None, env).unwrap_err();
        assert!(err.to_string().contains("REQUEST_TIMEOUT_SECS"));
    }

    #[test]
    fn rejects_zero_timeout() {
        let env = env_from(&[("REQUEST_TIMEOUT_SECS", "0")]);
        let err = Settings::resolve(None, env).unwrap_err();
        assert!(err.to_string().contains("at least 1 second"));
    }
}

//! Configuration management for the hearth event forwarder.

use std::time::Duration;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

const CONFIG_FILE: &str = "config.toml";

/// Process-lifetime configuration, loaded once at startup.
///
/// Configuration is loaded in priority order:
/// 1. Environment variables (highest priority)
/// 2. Configuration file (`config.toml`)
///
/// The downstream host and API path are required; the process refuses to
/// start without them. Tokens are optional here — a missing token list is a
/// per-invocation failure, not a startup failure.
///
/// # Example
///
/// ```no_run
/// use hearth_core::Config;
///
/// let config = Config::load().expect("failed to load configuration");
/// println!("forwarding to {}", config.endpoint_url());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Downstream API host, with or without a scheme.
    ///
    /// Environment variable: `HA_URL`
    #[serde(alias = "HA_URL")]
    pub ha_url: String,

    /// Downstream API path, appended to the host.
    ///
    /// Environment variable: `HA_API_PATH`
    #[serde(alias = "HA_API_PATH")]
    pub ha_api_path: String,

    /// First bearer token, tried before any other.
    ///
    /// Environment variable: `HA_TOKEN_1`
    #[serde(default, alias = "HA_TOKEN_1")]
    pub ha_token_1: Option<String>,

    /// Second bearer token, tried only after the first fails.
    ///
    /// Environment variable: `HA_TOKEN_2`
    #[serde(default, alias = "HA_TOKEN_2")]
    pub ha_token_2: Option<String>,

    /// Enables debug-level tracing. Accepts `1` or `true`.
    ///
    /// Environment variable: `DEBUG`
    #[serde(default, alias = "DEBUG", deserialize_with = "de_flag")]
    pub debug: bool,

    /// Connection timeout for downstream requests in milliseconds.
    ///
    /// Environment variable: `CONNECT_TIMEOUT_MS`
    #[serde(default = "default_connect_timeout_ms", alias = "CONNECT_TIMEOUT_MS")]
    pub connect_timeout_ms: u64,

    /// Read timeout for downstream requests in milliseconds.
    ///
    /// Environment variable: `READ_TIMEOUT_MS`
    #[serde(default = "default_read_timeout_ms", alias = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,
}

impl Config {
    /// Loads configuration from the config file and environment variable
    /// overrides, then validates it.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Config` when a required value is missing or a
    /// value cannot be parsed, and `CoreError::InvalidConfig` when loaded
    /// values fail validation.
    pub fn load() -> Result<Self> {
        let figment = Figment::new().merge(Toml::file(CONFIG_FILE)).merge(Env::prefixed(""));

        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// The fully composed downstream URL.
    ///
    /// A host that already names a scheme is used verbatim; a bare host gets
    /// `https://` prefixed.
    pub fn endpoint_url(&self) -> String {
        let host = self.ha_url.trim_end_matches('/');
        if host.contains("://") {
            format!("{}{}", host, self.ha_api_path)
        } else {
            format!("https://{}{}", host, self.ha_api_path)
        }
    }

    /// The ordered list of usable tokens.
    ///
    /// Declaration order is precedence order. Unset and empty entries are
    /// dropped; duplicates are kept as-is.
    pub fn tokens(&self) -> Vec<&str> {
        [self.ha_token_1.as_deref(), self.ha_token_2.as_deref()]
            .into_iter()
            .flatten()
            .filter(|token| !token.is_empty())
            .collect()
    }

    /// Connection timeout as a `Duration`.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Read timeout as a `Duration`.
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Validates configuration values.
    fn validate(&self) -> Result<()> {
        if self.ha_url.trim().is_empty() {
            return Err(CoreError::invalid_config("HA_URL must not be empty"));
        }

        if self.ha_api_path.trim().is_empty() {
            return Err(CoreError::invalid_config("HA_API_PATH must not be empty"));
        }

        if !self.ha_api_path.starts_with('/') {
            return Err(CoreError::invalid_config("HA_API_PATH must start with '/'"));
        }

        if self.connect_timeout_ms == 0 {
            return Err(CoreError::invalid_config("CONNECT_TIMEOUT_MS must be greater than 0"));
        }

        if self.read_timeout_ms == 0 {
            return Err(CoreError::invalid_config("READ_TIMEOUT_MS must be greater than 0"));
        }

        Ok(())
    }
}

/// Accepts `true`/`false`, numbers, and the strings `"1"`/`"true"` so that
/// `DEBUG=1` behaves the same from the environment and the config file.
fn de_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Num(u64),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Num(value) => value != 0,
        Flag::Text(value) => matches!(value.trim(), "1" | "true" | "True" | "TRUE"),
    })
}

fn default_connect_timeout_ms() -> u64 {
    2_000
}

fn default_read_timeout_ms() -> u64 {
    10_000
}

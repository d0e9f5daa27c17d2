//! services/client/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development. Command-line flags on the binary are
//! passed in as overrides and win over the environment.

use std::time::Duration;

use learning_path_core::AdvancePolicy;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    /// Serve canned demo data instead of calling the backend. Read once at
    /// startup and never consulted again.
    pub use_mock_data: bool,
    pub advance: AdvancePolicy,
    pub demo_user_id: String,
    pub request_timeout: Duration,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables, letting `overrides`
    /// replace any of them.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env(overrides: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| overrides(key).or_else(|| std::env::var(key).ok()))
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let use_mock_data = match lookup("USE_MOCK_DATA") {
            Some(value) => parse_bool(&value).ok_or_else(|| {
                ConfigError::InvalidValue(
                    "USE_MOCK_DATA".to_string(),
                    format!("'{}' is not a boolean", value),
                )
            })?,
            None => false,
        };

        // Mock mode never talks to a backend, so the URL is only needed without it.
        let api_base_url = match lookup("API_BASE_URL") {
            Some(url) => url.trim().trim_end_matches('/').to_string(),
            None if use_mock_data => String::new(),
            None => return Err(ConfigError::MissingVar("API_BASE_URL".to_string())),
        };
        if !(use_mock_data && api_base_url.is_empty())
            && !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidValue(
                "API_BASE_URL".to_string(),
                format!("'{}' is not an http(s) URL", api_base_url),
            ));
        }

        let advance = lookup("CHAT_ADVANCE")
            .map(|value| value.parse::<AdvancePolicy>())
            .transpose()
            .map_err(|e| ConfigError::InvalidValue("CHAT_ADVANCE".to_string(), e.to_string()))?
            .unwrap_or(AdvancePolicy::Confirm);

        let demo_user_id = lookup("DEMO_USER_ID").unwrap_or_else(|| "1".to_string());
        if demo_user_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "DEMO_USER_ID".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let timeout_str = lookup("REQUEST_TIMEOUT_SECS").unwrap_or_else(|| "60".to_string());
        let request_timeout = timeout_str
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "REQUEST_TIMEOUT_SECS".to_string(),
                    format!("'{}' is not a positive number of seconds", timeout_str),
                )
            })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            api_base_url,
            use_mock_data,
            advance,
            demo_user_id,
            request_timeout,
            log_level,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

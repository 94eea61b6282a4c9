//! Runtime configuration. Values come from `DECRYPTOR_*` environment
//! variables with in-cluster defaults; the CLI may override any of them.

use std::env;
use std::path::PathBuf;

use crate::resolver::credentials::DEFAULT_TOKEN_PATH;
use crate::resolver::http::DEFAULT_ENDPOINT;

pub const ENV_ENDPOINT: &str = "DECRYPTOR_ENDPOINT";
pub const ENV_TOKEN_PATH: &str = "DECRYPTOR_TOKEN_PATH";
pub const ENV_LOG_LEVEL: &str = "DECRYPTOR_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "DECRYPTOR_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// Unknown values fall back to plain text.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptorConfig {
    pub endpoint: String,
    pub token_path: PathBuf,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl DecryptorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            endpoint: lookup(ENV_ENDPOINT).unwrap_or(defaults.endpoint),
            token_path: lookup(ENV_TOKEN_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.token_path),
            log_level: lookup(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_format: lookup(ENV_LOG_FORMAT)
                .map(|v| LogFormat::parse_lenient(&v))
                .unwrap_or(defaults.log_format),
        }
    }
}

impl Default for DecryptorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

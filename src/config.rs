//! Configuration management for CodeMaster
//!
//! Configuration is loaded from environment variables. The server and the
//! chat front end read different subsets, so each has its own struct.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

/// Relay server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Gemini API base URL (without the `/models/...` suffix)
    pub gemini_api_url: String,
    /// Gemini model used for every conversation
    pub gemini_model: String,

    /// Upper bound on a single provider call
    pub provider_timeout: Duration,
    /// Upper bound on a whole inbound request
    pub request_timeout: Duration,

    /// Log output format
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider_timeout_secs: u64 = lookup("PROVIDER_TIMEOUT_SECONDS")
            .unwrap_or_else(|| "60".to_string())
            .parse()
            .context("Invalid PROVIDER_TIMEOUT_SECONDS")?;
        let request_timeout_secs: u64 = lookup("REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|| "90".to_string())
            .parse()
            .context("Invalid REQUEST_TIMEOUT_SECONDS")?;

        if request_timeout_secs <= provider_timeout_secs {
            anyhow::bail!(
                "REQUEST_TIMEOUT_SECONDS ({}) must exceed PROVIDER_TIMEOUT_SECONDS ({})",
                request_timeout_secs,
                provider_timeout_secs
            );
        }

        Ok(Self {
            host: lookup("CODEMASTER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("CODEMASTER_PORT")
                .unwrap_or_else(|| "8000".to_string())
                .parse()
                .context("Invalid CODEMASTER_PORT")?,

            gemini_api_url: lookup("GEMINI_API_URL")
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".to_string())
                .trim_end_matches('/')
                .to_string(),
            gemini_model: lookup("GEMINI_MODEL").unwrap_or_else(|| "gemini-1.5-flash".to_string()),

            provider_timeout: Duration::from_secs(provider_timeout_secs),
            request_timeout: Duration::from_secs(request_timeout_secs),

            log_format: parse_log_format(lookup("LOG_FORMAT"))?,
        })
    }
}

/// Chat front end configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Full URL of the relay's generate endpoint
    pub relay_url: String,
    /// Credential supplied through the environment, if any
    pub api_key: Option<String>,
    /// Upper bound on one round trip to the relay
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            relay_url: lookup("CODEMASTER_RELAY_URL")
                .unwrap_or_else(|| "http://127.0.0.1:8000/generate".to_string()),
            api_key: lookup("GEMINI_API_KEY").filter(|key| !key.trim().is_empty()),
            request_timeout: Duration::from_secs(
                lookup("CODEMASTER_CLIENT_TIMEOUT_SECONDS")
                    .unwrap_or_else(|| "120".to_string())
                    .parse()
                    .context("Invalid CODEMASTER_CLIENT_TIMEOUT_SECONDS")?,
            ),
        })
    }
}

fn parse_log_format(value: Option<String>) -> Result<LogFormat> {
    match value.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None | Some("text") | Some("") => Ok(LogFormat::Text),
        Some("json") => Ok(LogFormat::Json),
        Some(other) => anyhow::bail!("Invalid LOG_FORMAT: {}", other),
    }
}

//! Process configuration.
//!
//! Server settings come from an optional `configuration` file and `APP__*`
//! environment variables. The Gemini credential is read from `GEMINI_API_KEY`
//! and is required.

use crate::providers::gemini::{GeminiConfig, GEMINI_API_BASE};
use axum::http::HeaderValue;
use config::{Config as Cfg, Environment, File};
use serde::Deserialize;
use std::env;
use std::time::Duration;
use thiserror::Error;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Replaces axum's 2 MiB default body limit.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is required but not set")]
    MissingApiKey,

    #[error("Invalid CORS origin: {0}")]
    InvalidOrigin(String),

    #[error("Configuration error: {0}")]
    Source(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json_logs: bool,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default)]
    pub gemini: GeminiSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_base_url() -> String {
    GEMINI_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// Validated settings the server starts from.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub api_key: String,
}

impl Settings {
    /// Load `.env`, the configuration file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let server: ServerSettings = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("allowed_origins")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Self::resolve(server, env::var(API_KEY_VAR).ok())
    }

    /// Validate already-loaded settings against the credential.
    pub fn resolve(server: ServerSettings, api_key: Option<String>) -> Result<Self, ConfigError> {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        for origin in server.allowed_origins.iter().filter(|o| o.as_str() != "*") {
            HeaderValue::from_str(origin)
                .map_err(|_| ConfigError::InvalidOrigin(origin.clone()))?;
        }

        Ok(Self { server, api_key })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.api_key.clone(),
            model: self.server.gemini.model.clone(),
            base_url: self.server.gemini.base_url.clone(),
            timeout: Duration::from_secs(self.server.gemini.timeout_secs),
        }
    }
}

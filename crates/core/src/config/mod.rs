//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (TC_SOURCES_*)
//! 2. TOML config file (if TC_SOURCES_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (TC_SOURCES_*)
/// 2. TOML config file (if TC_SOURCES_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the admin REST API, e.g. `https://tc.example.org/api/admin`.
    ///
    /// Set via TC_SOURCES_API_BASE_URL environment variable.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Bearer token for the admin REST API.
    ///
    /// Set via TC_SOURCES_API_TOKEN environment variable.
    /// Required only when a remote call is made.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Path to the SQLite key-value store.
    ///
    /// Set via TC_SOURCES_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Keep cached pages on disk. When false an in-memory store is used and
    /// everything is forgotten on exit.
    ///
    /// Set via TC_SOURCES_PERSIST_CACHE environment variable.
    #[serde(default = "default_true")]
    pub persist_cache: bool,

    /// Page size used when neither the caller nor the cache supplies one.
    ///
    /// Set via TC_SOURCES_DEFAULT_PAGE_SIZE environment variable.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via TC_SOURCES_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via TC_SOURCES_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_api_base_url() -> String {
    "http://localhost:8080/api/admin".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./tc-sources-cache.sqlite")
}

fn default_page_size() -> u32 {
    20
}

fn default_user_agent() -> String {
    "tc-sources/0.1".into()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_token: None,
            db_path: default_db_path(),
            persist_cache: true,
            default_page_size: default_page_size(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or environment cannot be read or
    /// validation fails after loading.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("TC_SOURCES_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("TC_SOURCES_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        Self::from_figment(figment)
    }

    /// Extract and validate from an already assembled figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

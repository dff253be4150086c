//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::figma::DEFAULT_API_BASE_URL;

/// Environment variable holding the Figma personal access token.
pub const API_KEY_ENV: &str = "FIGMA_API_KEY";

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Figma personal access token. `FIGMA_API_KEY` takes precedence.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Figma REST API base URL.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Path to the list of locally cached Figma files.
    #[serde(default)]
    pub files_cache_path: Option<PathBuf>,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            _schema: None,
            _comment: None,
            api_key: None,
            api_base_url: default_api_base_url(),
            files_cache_path: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_base_url.starts_with("https://") || self.api_base_url.starts_with("http://"))
        {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Invalid api_base_url '{}'. Must start with http:// or https://",
                    self.api_base_url
                ),
            });
        }

        if self
            .api_key
            .as_deref()
            .is_some_and(|key| key.trim().is_empty())
        {
            return Err(ConfigError::ValidationError {
                message: "api_key must not be empty (omit it to use FIGMA_API_KEY)".to_string(),
            });
        }

        Ok(())
    }

    /// Returns the API token from the environment, falling back to the config file.
    #[must_use]
    pub fn resolve_api_key(&self) -> Option<String> {
        select_api_key(std::env::var(API_KEY_ENV).ok(), self.api_key.as_deref())
    }
}

/// Picks the API token: a non-blank environment value wins over the file value.
fn select_api_key(from_env: Option<String>, from_file: Option<&str>) -> Option<String> {
    from_env
        .filter(|key| !key.trim().is_empty())
        .or_else(|| from_file.map(str::to_string))
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

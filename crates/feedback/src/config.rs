//! Configuration management for the feedback service.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use axum::http::HeaderValue;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "feedback";

/// Default record file name.
const DATA_FILE_NAME: &str = "feedback.json";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "FEEDBACK_";

/// Plain environment variable holding a comma-separated origin list.
const ORIGINS_ENV: &str = "ALLOWED_ORIGINS";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. The plain `PORT` and `ALLOWED_ORIGINS` environment variables, the
///    latter a comma-separated list
/// 2. Environment variables prefixed with `FEEDBACK_` (nested with `__`,
///    e.g. `FEEDBACK_SERVER__PORT`)
/// 3. TOML config file at `~/.config/feedback/config.toml`
/// 4. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Pagination configuration.
    pub pagination: PaginationConfig,
    /// Submission validation configuration.
    pub validation: ValidationConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the JSON record file.
    /// Defaults to `~/.local/share/feedback/feedback.json`
    pub data_path: Option<PathBuf>,
}

/// Pagination configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Page size used when the request doesn't give a usable one.
    pub default_limit: usize,
    /// Largest page size a request may ask for.
    pub max_limit: usize,
}

/// Submission validation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Minimum message length in characters, after trimming.
    /// Set to 0 to only require a non-blank message.
    pub min_message_length: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_message_length: 10,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        let origins = std::env::var(ORIGINS_ENV).ok();

        let config: Config = Self::figment(&config_file, origins.as_deref()).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Stack the configuration sources, lowest precedence first.
    fn figment(config_file: &Path, allowed_origins: Option<&str>) -> Figment {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file).nested())
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()));

        match allowed_origins.map(split_origins) {
            Some(origins) if !origins.is_empty() => {
                figment.merge(Serialized::default("server.allowed_origins", origins))
            }
            _ => figment,
        }
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::ConfigValidation {
                message: "port must be greater than 0".to_string(),
            });
        }

        if self.pagination.default_limit == 0 {
            return Err(Error::ConfigValidation {
                message: "default_limit must be greater than 0".to_string(),
            });
        }

        if self.pagination.max_limit < self.pagination.default_limit {
            return Err(Error::ConfigValidation {
                message: format!(
                    "max_limit ({}) cannot be less than default_limit ({})",
                    self.pagination.max_limit, self.pagination.default_limit
                ),
            });
        }

        for origin in &self.server.allowed_origins {
            if HeaderValue::from_str(origin).is_err() {
                return Err(Error::ConfigValidation {
                    message: format!("invalid allowed origin: {origin}"),
                });
            }
        }

        self.bind_address()?;
        Ok(())
    }

    /// Get the record file path, resolving defaults if not set.
    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        self.storage
            .data_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATA_FILE_NAME))
    }

    /// Get the socket address the server binds to.
    ///
    /// # Errors
    ///
    /// Returns an error if `host` is not an IP address.
    pub fn bind_address(&self) -> Result<SocketAddr> {
        self.server
            .host
            .parse::<IpAddr>()
            .map(|ip| SocketAddr::new(ip, self.server.port))
            .map_err(|_| Error::ConfigValidation {
                message: format!("invalid host: {}", self.server.host),
            })
    }

    /// Parsed CORS origins.
    #[must_use]
    pub fn allowed_origins(&self) -> Vec<HeaderValue> {
        self.server
            .allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect()
    }
}

/// Split a comma-separated origin list, dropping blank entries.
fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

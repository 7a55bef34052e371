//! Client configuration.
//!
//! Values are layered: built-in defaults, then an optional JSON file,
//! then environment variables. The CLI applies its flags on top.
//!
//! # Example
//!
//! ```ignore
//! use nexttrack::config::ClientConfig;
//!
//! let config = ClientConfig::load()?
//!     .with_endpoint("http://localhost:3000/mb/recommend/stream");
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/mb/recommend/stream";

pub const ENDPOINT_ENV: &str = "NEXTTRACK_ENDPOINT";
pub const CONNECT_TIMEOUT_ENV: &str = "NEXTTRACK_CONNECT_TIMEOUT_SECS";

const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Connection settings for the recommendation service.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Streaming recommendation endpoint
    pub endpoint: String,
    /// Bound on connection setup. The stream itself never times out.
    pub connect_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Some(Duration::from_secs(10)),
            user_agent: format!("nexttrack/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// On-disk shape; every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    endpoint: Option<String>,
    connect_timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// `None` disables the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// `<config dir>/nexttrack/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("nexttrack").join(CONFIG_FILE_NAME))
    }

    /// Defaults overlaid with the environment only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env()
    }

    /// Defaults, then the default config file if present, then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = Self::default_path() {
            if path.exists() {
                config = config.merge_file(&path)?;
            }
        }
        config.apply_env()
    }

    /// Defaults overlaid with the given file.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        Self::default().merge_file(path)
    }

    /// Overlay values from a JSON config file.
    pub fn merge_file(mut self, path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(endpoint) = file.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(secs) = file.connect_timeout_secs {
            self.connect_timeout = timeout_from_secs(secs);
        }
        Ok(self)
    }

    /// Overlay `NEXTTRACK_ENDPOINT` and `NEXTTRACK_CONNECT_TIMEOUT_SECS`.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary variable lookup.
    pub fn apply_vars<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|v| !v.trim().is_empty()) {
            self.endpoint = endpoint;
        }
        if let Some(raw) = lookup(CONNECT_TIMEOUT_ENV) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: CONNECT_TIMEOUT_ENV.to_string(),
                    value: raw.clone(),
                })?;
            self.connect_timeout = timeout_from_secs(secs);
        }
        Ok(self)
    }
}

/// 0 means "no timeout".
fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::client::ClientConfig;
use crate::schedule::DEFAULT_HORIZON_DAYS;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Credential store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_dir")]
    pub dir: String,
}

fn default_session_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("cyclefit").to_string_lossy().to_string())
        .unwrap_or_else(|| "./cyclefit_data".to_string())
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dir: default_session_dir(),
        }
    }
}

impl SessionConfig {
    /// Session directory with a leading `~/` expanded
    pub fn resolved_dir(&self) -> PathBuf {
        match (self.dir.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(&self.dir),
        }
    }
}

/// Schedule preview configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
}

fn default_horizon_days() -> u32 {
    DEFAULT_HORIZON_DAYS
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            horizon_days: default_horizon_days(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("cyclefit").join("config.toml")),
            Some(PathBuf::from("./cyclefit.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Client overrides
        if let Some(url) = var("CYCLEFIT_API_URL") {
            self.client.base_url = url;
        }
        if let Some(timeout) = var("CYCLEFIT_TIMEOUT_MS") {
            match timeout.parse() {
                Ok(ms) => self.client.request_timeout_ms = ms,
                Err(_) => tracing::warn!("Ignoring invalid CYCLEFIT_TIMEOUT_MS: {}", timeout),
            }
        }

        // Session overrides
        if let Some(dir) = var("CYCLEFIT_SESSION_DIR") {
            self.session.dir = dir;
        }

        // Schedule overrides
        if let Some(horizon) = var("CYCLEFIT_HORIZON_DAYS") {
            match horizon.parse() {
                Ok(days) => self.schedule.horizon_days = days,
                Err(_) => tracing::warn!("Ignoring invalid CYCLEFIT_HORIZON_DAYS: {}", horizon),
            }
        }

        // Logging overrides
        if let Some(level) = var("CYCLEFIT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("CYCLEFIT_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Cyclefit Configuration
#
# Environment variables override these settings:
# - CYCLEFIT_API_URL
# - CYCLEFIT_TIMEOUT_MS
# - CYCLEFIT_SESSION_DIR
# - CYCLEFIT_HORIZON_DAYS
# - CYCLEFIT_LOG_LEVEL
# - CYCLEFIT_LOG_FORMAT

[client]
# API base, prefixed to every request path
base_url = "http://localhost:8000/api"

# Per-request deadline in milliseconds (0 disables it)
request_timeout_ms = 30000

[session]
# Directory holding the stored login (auth.json)
dir = "~/.local/share/cyclefit"

[schedule]
# Days shown by `cyclefit preview`
horizon_days = 21

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

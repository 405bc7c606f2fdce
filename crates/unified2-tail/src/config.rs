//! Configuration for u2tail
//!
//! Provides:
//! - Config file discovery (CLI flag, env var, standard paths)
//! - TOML parsing with serde
//! - Environment variable overrides
//! - Validation

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Complete u2tail configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TailConfig {
    /// Logging settings
    pub logging: LoggingSettings,

    /// Spool reader settings
    pub reader: ReaderSettings,

    /// Output settings
    pub output: OutputSettings,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub log_level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// What to do with a record whose body fails to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorPolicy {
    /// Log and continue with the next record
    Skip,
    /// Stop reading and report the error
    Abort,
}

/// Spool reader settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderSettings {
    /// How long to wait before polling a growing file again
    pub poll_interval_ms: u64,

    /// Decode error handling: skip, abort
    pub on_decode_error: String,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            on_decode_error: "skip".to_string(),
        }
    }
}

impl ReaderSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Parsed decode error policy; anything other than "abort" skips
    pub fn decode_error_policy(&self) -> DecodeErrorPolicy {
        if self.on_decode_error.eq_ignore_ascii_case("abort") {
            DecodeErrorPolicy::Abort
        } else {
            DecodeErrorPolicy::Skip
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Pretty print JSON
    pub pretty: bool,

    /// Include packet and extra data bytes as hex
    pub include_payload: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            pretty: false,
            include_payload: true,
        }
    }
}

/// Configuration loader
pub struct ConfigLoader {
    /// Path to config file (if specified via CLI)
    cli_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self { cli_path: None }
    }

    /// Set the config path from CLI argument
    pub fn with_cli_path(mut self, path: Option<PathBuf>) -> Self {
        self.cli_path = path;
        self
    }

    /// Load configuration with the following precedence:
    /// 1. CLI --config flag
    /// 2. U2TAIL_CONFIG environment variable
    /// 3. ~/.config/u2tail/config.toml
    /// 4. /etc/u2tail/config.toml
    /// 5. Default values
    pub fn load(&self) -> ConfigResult<TailConfig> {
        let config_path = self.find_config_file();

        let mut config = if let Some(path) = config_path {
            info!("Loading configuration from: {}", path.display());
            self.load_from_file(&path)?
        } else {
            debug!("No config file found, using defaults");
            TailConfig::default()
        };

        self.apply_env_overrides(&mut config);
        self.validate(&config)?;

        Ok(config)
    }

    /// Find the config file to use
    fn find_config_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.cli_path {
            if path.exists() {
                return Some(path.clone());
            }
            warn!("CLI config path does not exist: {}", path.display());
        }

        if let Ok(env_path) = std::env::var("U2TAIL_CONFIG") {
            let path = PathBuf::from(&env_path);
            if path.exists() {
                return Some(path);
            }
            warn!("U2TAIL_CONFIG path does not exist: {}", env_path);
        }

        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                return Some(path);
            }
        }

        #[cfg(unix)]
        {
            let path = PathBuf::from("/etc/u2tail/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Load configuration from a TOML file
    fn load_from_file(&self, path: &Path) -> ConfigResult<TailConfig> {
        let content = std::fs::read_to_string(path)?;
        let config: TailConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&self, config: &mut TailConfig) {
        if let Ok(val) = std::env::var("U2TAIL_LOG_LEVEL") {
            config.logging.log_level = val;
        }

        if let Ok(val) = std::env::var("U2TAIL_POLL_INTERVAL_MS") {
            match val.parse() {
                Ok(ms) => config.reader.poll_interval_ms = ms,
                Err(_) => warn!("Ignoring invalid U2TAIL_POLL_INTERVAL_MS: {}", val),
            }
        }
        if let Ok(val) = std::env::var("U2TAIL_ON_DECODE_ERROR") {
            config.reader.on_decode_error = val;
        }

        if let Ok(val) = std::env::var("U2TAIL_PRETTY") {
            config.output.pretty = val.parse().unwrap_or(config.output.pretty);
        }
    }

    /// Validate configuration
    fn validate(&self, config: &TailConfig) -> ConfigResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&config.logging.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                config.logging.log_level, valid_levels
            )));
        }

        let valid_policies = ["skip", "abort"];
        if !valid_policies.contains(&config.reader.on_decode_error.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid decode error policy: {}. Must be one of: {:?}",
                config.reader.on_decode_error, valid_policies
            )));
        }

        if config.reader.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "Poll interval cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Render a configuration as TOML
    pub fn to_toml(config: &TailConfig) -> ConfigResult<String> {
        toml::to_string_pretty(config).map_err(|e| {
            ConfigError::ValidationError(format!("Failed to serialize config: {}", e))
        })
    }

    /// Get the default config file path for the current platform
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("u2tail").join("config.toml"))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper module for platform-specific directories
mod dirs {
    use std::path::PathBuf;

    /// Get the user's config directory
    pub fn config_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("APPDATA").ok().map(PathBuf::from)
        }

        #[cfg(not(target_os = "windows"))]
        {
            std::env::var("XDG_CONFIG_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".config"))
                })
        }
    }
}

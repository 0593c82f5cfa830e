//! Configuration file support.
//!
//! Configuration precedence (lowest to highest):
//! 1. Defaults
//! 2. Global config file (~/.netsec/config.toml)
//! 3. Local config file (./.netsecrc)
//! 4. Explicit config file (`--config`)
//! 5. Environment variables (`NETSEC_PROBE`, `NETSEC_SKIP_FRAMES`, `NETSEC_LABEL`, `NETSEC_LOG_LEVEL`, `NETSEC_LOG_FORMAT`)

use crate::error::DEFAULT_LABEL;
use crate::probe::ProbeKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// How the origin of an untraced failure is resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    #[serde(default)]
    pub probe: ProbeKind,

    /// Extra frames the backtrace probe moves outward past the first caller.
    #[serde(default)]
    pub skip_frames: usize,
}

/// Diagnostic wording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_label")]
    pub label: String,
}

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { label: default_label() }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), format: LogFormat::Human }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetsecConfig {
    #[serde(default)]
    pub capture: CaptureConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}")]
    ReadError(String),

    /// Failed to parse configuration file.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// One configuration source: only the keys it actually sets.
///
/// Layers are merged over [`NetsecConfig`] in precedence order, so a later
/// source can set a key back to its default value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
    pub capture: CaptureLayer,
    pub render: RenderLayer,
    pub logging: LoggingLayer,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureLayer {
    pub probe: Option<ProbeKind>,
    pub skip_frames: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderLayer {
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingLayer {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
}

impl ConfigLayer {
    /// Load a layer from a TOML file.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        Self::from_toml(&content).map_err(|e| match e {
            ConfigError::ParseError(msg) => ConfigError::ParseError(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Parse a layer, rejecting values that would be invalid on their own.
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        let layer: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        let mut check = NetsecConfig::default();
        check.merge(&layer);
        check.validate()?;
        Ok(layer)
    }
}

impl NetsecConfig {
    /// Load configuration from a TOML file.
    ///
    /// Keys the file leaves out keep their defaults.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let mut config = Self::default();
        config.merge(&ConfigLayer::load_from_file(path)?);
        Ok(config)
    }

    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        let mut config = Self::default();
        config.merge(&ConfigLayer::from_toml(content)?);
        Ok(config)
    }

    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(format!("Failed to serialize: {}", e)))
    }

    /// Get default global configuration file path.
    pub fn default_global_path() -> PathBuf {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".netsec")
            .join("config.toml")
    }

    /// Get default local configuration file path.
    pub fn default_local_path() -> PathBuf {
        PathBuf::from(".netsecrc")
    }

    /// Discover and load configuration.
    ///
    /// Global and local files are optional; an unreadable one is logged and
    /// skipped. An explicit file must exist and parse.
    pub fn discover_and_load(explicit: Option<&Path>) -> ConfigResult<Self> {
        let mut config = Self::default();

        for path in [Self::default_global_path(), Self::default_local_path()] {
            match ConfigLayer::load_from_file(&path) {
                Ok(layer) => config.merge(&layer),
                Err(ConfigError::NotFound(_)) => {}
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Ignoring configuration file"),
            }
        }

        if let Some(path) = explicit {
            config.merge(&ConfigLayer::load_from_file(path)?);
        }

        config.apply_env_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Merge a layer into this configuration.
    ///
    /// Every key the layer sets overrides the value in `self`.
    pub fn merge(&mut self, layer: &ConfigLayer) {
        if let Some(probe) = layer.capture.probe {
            self.capture.probe = probe;
        }
        if let Some(skip_frames) = layer.capture.skip_frames {
            self.capture.skip_frames = skip_frames;
        }
        if let Some(label) = &layer.render.label {
            self.render.label.clone_from(label);
        }
        if let Some(level) = &layer.logging.level {
            self.logging.level.clone_from(level);
        }
        if let Some(format) = layer.logging.format {
            self.logging.format = format;
        }
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<()> {
        if let Some(probe) = lookup("NETSEC_PROBE") {
            self.capture.probe = probe.parse().map_err(ConfigError::InvalidValue)?;
        }
        if let Some(skip) = lookup("NETSEC_SKIP_FRAMES") {
            self.capture.skip_frames = skip
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("NETSEC_SKIP_FRAMES={skip}")))?;
        }
        if let Some(label) = lookup("NETSEC_LABEL") {
            self.render.label = label;
        }
        if let Some(level) = lookup("NETSEC_LOG_LEVEL") {
            self.logging.level = level.to_ascii_lowercase();
        }
        if let Some(format) = lookup("NETSEC_LOG_FORMAT") {
            self.logging.format = match format.trim().to_ascii_lowercase().as_str() {
                "human" => LogFormat::Human,
                "json" => LogFormat::Json,
                other => return Err(ConfigError::InvalidValue(format!("NETSEC_LOG_FORMAT={other}"))),
            };
        }
        self.validate()
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue(format!(
                "logging.level '{}' (expected one of {})",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }
        if self.render.label.contains(['[', ']']) {
            return Err(ConfigError::InvalidValue(format!(
                "render.label '{}' must not contain brackets",
                self.render.label
            )));
        }
        Ok(())
    }
}

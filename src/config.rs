//! Configuration module for fleetinv
//!
//! Handles loading and merging configuration from multiple sources:
//! - Default values
//! - System configuration (/etc/fleetinv/fleetinv.toml)
//! - User configuration (~/.fleetinv.toml)
//! - Project configuration (./fleetinv.toml)
//! - Environment variables
//! - Command-line arguments (applied by the binary)

use crate::inventory::AliasStrategy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where node records come from
    pub source: SourceConfig,

    /// How nodes are projected into hosts
    pub projection: ProjectionConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Node source settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL of the inventory catalog API
    pub base_url: Option<String>,

    /// Profile name, sent to the catalog as the `X-Fleet-Profile` header.
    /// No credentials are loaded from it.
    pub profile: String,

    /// Region name, sent to the catalog as the `X-Fleet-Region` header
    pub region: String,

    /// Bearer token for the catalog API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Read node records from this file instead of the catalog
    pub file: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            profile: "default".to_string(),
            region: "us-east-2".to_string(),
            token: None,
            timeout_secs: 30,
            file: None,
        }
    }
}

/// Projection settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Alias and connection strategy
    pub alias_strategy: AliasStrategy,

    /// Value for `ansible_python_interpreter`, omitted when unset
    pub python_interpreter: Option<String>,

    /// Also group hosts by tag
    pub tag_groups: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when neither `-v` nor `RUST_LOG` is given
    pub level: String,

    /// Log format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// One configuration file. Keys a file leaves out do not touch earlier layers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigLayer {
    source: SourceLayer,
    projection: ProjectionLayer,
    logging: LoggingLayer,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SourceLayer {
    base_url: Option<String>,
    profile: Option<String>,
    region: Option<String>,
    token: Option<String>,
    timeout_secs: Option<u64>,
    file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ProjectionLayer {
    alias_strategy: Option<AliasStrategy>,
    python_interpreter: Option<String>,
    tag_groups: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LoggingLayer {
    level: Option<String>,
    format: Option<LogFormat>,
}

const CONFIG_EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

impl Config {
    /// Load configuration from all sources
    pub fn load(config_path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = Config::default();

        for path in Self::get_config_paths(config_path) {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config file");
                config = config.merge(Self::read_layer(&path)?);
            } else if config_path.is_some() {
                return Err(ConfigError::Io {
                    path: path.clone(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "config file not found",
                    ),
                });
            }
        }

        config.apply_env_overrides()?;

        Ok(config)
    }

    /// Get the list of configuration file paths to check
    fn get_config_paths(explicit_path: Option<&Path>) -> Vec<PathBuf> {
        // Explicit path takes priority
        if let Some(path) = explicit_path {
            return vec![path.to_path_buf()];
        }

        let mut paths = Vec::new();

        // System-wide config
        for ext in CONFIG_EXTENSIONS {
            paths.push(PathBuf::from(format!("/etc/fleetinv/fleetinv.{}", ext)));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".fleetinv.toml"));
        }

        // Project config (current directory)
        for ext in CONFIG_EXTENSIONS {
            paths.push(PathBuf::from(format!("fleetinv.{}", ext)));
        }

        paths
    }

    /// Parse a single configuration file on top of the defaults
    pub fn read_file(path: &Path) -> ConfigResult<Self> {
        Ok(Config::default().merge(Self::read_layer(path)?))
    }

    fn read_layer(path: &Path) -> ConfigResult<ConfigLayer> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> ConfigResult<ConfigLayer> {
        let parse_err = |message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        };

        // Determine format based on extension
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(content).map_err(|e| parse_err(e.to_string())),
            "json" => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
            "toml" => toml::from_str(content).map_err(|e| parse_err(e.to_string())),
            _ => toml::from_str(content)
                .or_else(|_| serde_yaml::from_str(content))
                .map_err(|e| parse_err(e.to_string())),
        }
    }

    /// Apply a file layer; every key the layer sets wins, even when it equals the default
    fn merge(mut self, layer: ConfigLayer) -> Config {
        let ConfigLayer {
            source,
            projection,
            logging,
        } = layer;

        if let Some(url) = source.base_url {
            self.source.base_url = Some(url);
        }
        if let Some(profile) = source.profile {
            self.source.profile = profile;
        }
        if let Some(region) = source.region {
            self.source.region = region;
        }
        if let Some(token) = source.token {
            self.source.token = Some(token);
        }
        if let Some(timeout) = source.timeout_secs {
            self.source.timeout_secs = timeout;
        }
        if let Some(file) = source.file {
            self.source.file = Some(file);
        }

        if let Some(strategy) = projection.alias_strategy {
            self.projection.alias_strategy = strategy;
        }
        if let Some(interpreter) = projection.python_interpreter {
            self.projection.python_interpreter = Some(interpreter);
        }
        if let Some(tag_groups) = projection.tag_groups {
            self.projection.tag_groups = tag_groups;
        }

        if let Some(level) = logging.level {
            self.logging.level = level;
        }
        if let Some(format) = logging.format {
            self.logging.format = format;
        }

        self
    }

    /// Apply environment variable overrides.
    ///
    /// An unrecognised `FLEETINV_ALIAS_STRATEGY` is an error.
    pub fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        if let Ok(url) = std::env::var("FLEETINV_BASE_URL") {
            self.source.base_url = Some(url);
        }

        if let Ok(profile) = std::env::var("FLEETINV_PROFILE") {
            self.source.profile = profile;
        }

        if let Ok(region) = std::env::var("FLEETINV_REGION") {
            self.source.region = region;
        }

        if let Ok(token) = std::env::var("FLEETINV_API_TOKEN") {
            self.source.token = Some(token);
        }

        if let Ok(strategy) = std::env::var("FLEETINV_ALIAS_STRATEGY") {
            self.projection.alias_strategy = strategy
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("FLEETINV_ALIAS_STRATEGY: {}", e)))?;
        }

        if let Ok(path) = std::env::var("FLEETINV_PYTHON_INTERPRETER") {
            self.projection.python_interpreter = Some(path);
        }

        if let Ok(level) = std::env::var("FLEETINV_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Check that the selected source is usable
    pub fn validate(&self) -> ConfigResult<()> {
        if self.source.file.is_none() && self.source.base_url.is_none() {
            return Err(ConfigError::Invalid(
                "source.base_url is required unless source.file is set".to_string(),
            ));
        }
        if self.source.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "source.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

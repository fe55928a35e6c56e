//! Configuration system for the explorer
//! Endpoint, initial selections, theme, tooltip captions and controller policy

use explorer_renderer::{Theme, TooltipLabels};
use explorer_shared::{ExplorerError, QueryDefaults};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub mod manager;
pub mod parser;
pub mod validation;

pub use manager::ConfigManager;
pub use parser::{ConfigFormat, ConfigParser};
pub use validation::ConfigValidator;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(String),

    #[error("Config validation failed: {0}")]
    Validation(String),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

impl From<ConfigError> for ExplorerError {
    fn from(err: ConfigError) -> Self {
        ExplorerError::InvalidConfig {
            message: err.to_string(),
            field: None,
        }
    }
}

/// Complete explorer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub version: String,
    pub log_level: String,
    pub endpoint: EndpointConfig,
    pub defaults: QueryDefaults,
    pub theme: Theme,
    pub tooltip: TooltipLabels,
    pub controller: ControllerConfig,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            log_level: "info".to_string(),
            endpoint: EndpointConfig::default(),
            defaults: QueryDefaults::default(),
            theme: Theme::default(),
            tooltip: TooltipLabels::default(),
            controller: ControllerConfig::default(),
        }
    }
}

impl ExplorerConfig {
    /// Parsed log level, falling back to `Info` for anything unknown
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}

/// Query endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Absolute URL, or a path relative to the page origin
    pub url: String,
    pub timeout_ms: u32,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: "/api/get_data".to_string(),
            timeout_ms: 30_000,
        }
    }
}

impl EndpointConfig {
    /// Resolve the endpoint against a base URL. Absolute endpoint URLs are
    /// returned unchanged.
    pub fn resolve(&self, base_url: &str) -> Result<String> {
        if let Ok(absolute) = Url::parse(&self.url) {
            return Ok(absolute.to_string());
        }

        let base = Url::parse(base_url)
            .map_err(|e| ConfigError::Validation(format!("Invalid base URL {base_url}: {e}")))?;
        let joined = base
            .join(&self.url)
            .map_err(|e| ConfigError::Validation(format!("Invalid endpoint {}: {e}", self.url)))?;
        Ok(joined.to_string())
    }
}

/// What to do with triggers that arrive while a cycle is in flight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Issue every trigger immediately; only the latest response renders
    #[default]
    Concurrent,
    /// Remember one follow-up cycle and issue it when the current one ends
    Coalesce,
}

/// Controller scheduling policy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub overlap: OverlapPolicy,
    /// Trailing debounce for triggers; 0 disables it
    pub debounce_ms: u32,
}

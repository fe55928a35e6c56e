//! Configuration file parser for multiple formats

use crate::{ConfigError, ExplorerConfig, Result};
use std::fs;
use std::path::Path;

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Configuration parser
pub struct ConfigParser;

impl ConfigParser {
    /// Parse configuration from a file
    pub fn parse_file(path: impl AsRef<Path>) -> Result<ExplorerConfig> {
        let path = path.as_ref();
        let format = Self::detect_format(path)?;
        let content = fs::read_to_string(path)?;

        log::debug!("Loading {format:?} config from {}", path.display());
        Self::parse_string(&content, format)
    }

    /// Parse configuration from a string
    pub fn parse_string(content: &str, format: ConfigFormat) -> Result<ExplorerConfig> {
        match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| ConfigError::Parse(format!("YAML parse error: {e}"))),
            ConfigFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::Parse(format!("JSON parse error: {e}"))),
            ConfigFormat::Toml => toml::from_str(content)
                .map_err(|e| ConfigError::Parse(format!("TOML parse error: {e}"))),
        }
    }

    /// Parse configuration text whose format is not known up front, such as
    /// an inline config handed over by the page
    pub fn parse_text(content: &str) -> Result<ExplorerConfig> {
        Self::parse_string(content, Self::detect_content_format(content))
    }

    /// Guess the format from the text: a leading `{` is JSON, table headers
    /// or `key = value` lines are TOML, anything else is YAML
    pub fn detect_content_format(content: &str) -> ConfigFormat {
        if content.trim_start().starts_with('{') {
            return ConfigFormat::Json;
        }

        let is_toml_line = |line: &str| {
            (line.starts_with('[') && line.ends_with(']') && !line.contains(','))
                || line.split_once('=').is_some_and(|(key, _)| {
                    let key = key.trim();
                    !key.is_empty()
                        && key
                            .chars()
                            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '"'))
                })
        };

        let toml = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .any(is_toml_line);

        if toml {
            ConfigFormat::Toml
        } else {
            ConfigFormat::Yaml
        }
    }

    /// Detect configuration format from file extension
    pub fn detect_format(path: &Path) -> Result<ConfigFormat> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ConfigError::Parse("Cannot determine config format from file extension".to_string())
        })?;

        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "json" => Ok(ConfigFormat::Json),
            "toml" => Ok(ConfigFormat::Toml),
            _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
        }
    }
}

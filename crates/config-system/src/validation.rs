//! Configuration validation utilities

use crate::{ConfigError, ExplorerConfig, Result};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration
    pub fn validate(config: &ExplorerConfig) -> Result<()> {
        Self::validate_endpoint(config)?;
        Self::validate_defaults(config)?;
        Self::validate_theme(config)?;

        if config.log_level.parse::<log::Level>().is_err() {
            return Err(ConfigError::Validation(format!(
                "Invalid log_level: {}. Must be one of error, warn, info, debug, trace",
                config.log_level
            )));
        }

        Ok(())
    }

    fn validate_endpoint(config: &ExplorerConfig) -> Result<()> {
        if config.endpoint.url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Endpoint URL cannot be empty".to_string(),
            ));
        }

        if config.endpoint.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Invalid timeout_ms: 0. Must be positive".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_defaults(config: &ExplorerConfig) -> Result<()> {
        let defaults = &config.defaults;
        if defaults.degree > defaults.max_degree {
            return Err(ConfigError::Validation(format!(
                "Invalid default degree: {}. Must not exceed max_degree {}",
                defaults.degree, defaults.max_degree
            )));
        }

        Ok(())
    }

    fn validate_theme(config: &ExplorerConfig) -> Result<()> {
        for (field, color) in config.theme.colors() {
            if !is_hex_color(color) {
                return Err(ConfigError::Validation(format!(
                    "Invalid theme color {field}: {color:?}. Expected #RRGGBB"
                )));
            }
        }

        Ok(())
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

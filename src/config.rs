//! Configuration management
//!
//! Handles loading and parsing of JSON configuration files with environment
//! variable support for the display locale. Every section is optional; a
//! missing file section falls back to its defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::types::{Locale, RiskTolerance};

/// Environment variable overriding the configured locale
pub const LOCALE_ENV: &str = "OPTION_SELECTOR_LOCALE";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Locale used when the caller does not pass one
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub selector: SelectorConfig,
    #[serde(default)]
    pub data: DataConfig,
}

impl Config {
    /// Load configuration from JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config =
            serde_json::from_str(&contents).context("Failed to parse config JSON")?;

        config.apply_env();
        Ok(config)
    }

    /// Defaults plus environment overrides, used when no file is given
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Override the locale from the environment if set
    pub fn apply_env(&mut self) {
        if let Ok(value) = std::env::var(LOCALE_ENV) {
            match value.parse::<Locale>() {
                Ok(locale) => self.locale = locale,
                Err(e) => warn!("Ignoring {}: {}", LOCALE_ENV, e),
            }
        }
    }
}

/// Selection policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Risk tolerance assumed when the given answer is not a known value.
    /// The fallback rule then picks this tolerance's default strategy.
    #[serde(default = "default_risk_tolerance")]
    pub default_risk_tolerance: RiskTolerance,

    /// Reject out-of-domain answers instead of falling through to the next
    /// rule level
    #[serde(default)]
    pub strict_answers: bool,
}

fn default_risk_tolerance() -> RiskTolerance {
    RiskTolerance::High
}

impl Default for SelectorConfig {
    fn default() -> Self {
        SelectorConfig {
            default_risk_tolerance: default_risk_tolerance(),
            strict_answers: false,
        }
    }
}

/// External data files replacing the built-in tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.locale, Locale::Cn);
        assert_eq!(config.selector.default_risk_tolerance, RiskTolerance::High);
        assert!(!config.selector.strict_answers);
        assert!(config.data.catalog_path.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "locale": "en", "selector": { "strict_answers": true } }"#)
                .unwrap();
        assert_eq!(config.locale, Locale::En);
        assert!(config.selector.strict_answers);
        assert_eq!(config.selector.default_risk_tolerance, RiskTolerance::High);
    }

    #[test]
    fn test_empty_object_is_default() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_risk_tolerance_rejected() {
        let result: Result<Config, _> =
            serde_json::from_str(r#"{ "selector": { "default_risk_tolerance": "extreme" } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("no/such/config.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}

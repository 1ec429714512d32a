//! Configuration for chains and logging
//!
//! Loaded from TOML. Every section and field has a default, so an empty file
//! is a valid configuration:
//!
//! ```toml
//! [chain]
//! event = false
//! debug = true
//!
//! [logging]
//! level = "INFO"
//! format = "compact"
//! spans = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::observability::logging::parse_level;

/// Environment variable overriding `chain.debug`
pub const CHAIN_DEBUG_ENV: &str = "CHAIN_DEBUG";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChainConfig {
    #[serde(default)]
    pub chain: ChainSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Chain construction settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChainSection {
    /// Event chain: at most one node, linking replaces it
    #[serde(default)]
    pub event: bool,
    /// Emit debug messages to the hooked logger
    #[serde(default)]
    pub debug: bool,
}

/// Logging settings consumed by `observability::logging::init_from_config`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSection {
    /// ERROR, WARN, INFO, DEBUG or TRACE
    #[serde(default = "default_log_level")]
    pub level: String,
    /// json, pretty or compact
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Include span open/close events
    #[serde(default)]
    pub spans: bool,
}

fn default_log_level() -> String {
    "INFO".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            spans: false,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ChainConfig {
    /// Load configuration from a TOML file and apply environment overrides
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ChainConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if parse_level(&self.logging.level).is_none() {
            return Err(ConfigError::InvalidConfig(format!(
                "Unknown log level '{}', expected one of ERROR, WARN, INFO, DEBUG, TRACE",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Apply `CHAIN_DEBUG` from the environment, if set
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(value) = std::env::var(CHAIN_DEBUG_ENV) {
            self.apply_debug_override(&value)?;
        }

        Ok(())
    }

    /// Set `chain.debug` from a boolish string (true/false, 1/0, yes/no, on/off)
    pub fn apply_debug_override(&mut self, value: &str) -> Result<(), ConfigError> {
        self.chain.debug = parse_bool(value).ok_or_else(|| {
            ConfigError::InvalidConfig(format!(
                "{CHAIN_DEBUG_ENV} must be true or false, got '{value}'"
            ))
        })?;

        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let toml_content = r#"
[chain]
event = true
debug = true

[logging]
level = "DEBUG"
format = "json"
spans = true
"#;

        let config = ChainConfig::from_toml_str(toml_content).unwrap();
        assert!(config.chain.event);
        assert!(config.chain.debug);
        assert_eq!(config.logging.level, "DEBUG");
        assert_eq!(config.logging.format, "json");
        assert!(config.logging.spans);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ChainConfig::from_toml_str("").unwrap();

        assert_eq!(config, ChainConfig::default());
        assert!(!config.chain.event);
        assert!(!config.chain.debug);
        assert_eq!(config.logging.level, "INFO");
        assert_eq!(config.logging.format, "compact");
    }

    #[test]
    fn test_partial_section() {
        let config = ChainConfig::from_toml_str("[chain]\ndebug = true\n").unwrap();
        assert!(!config.chain.event);
        assert!(config.chain.debug);
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let result = ChainConfig::from_toml_str("[logging]\nlevel = \"LOUD\"\n");
        assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let result = ChainConfig::from_toml_str("[chain\nevent = ");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let result = ChainConfig::from_toml_str("[chain]\nevent = \"yes\"\n");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" ON "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("No"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_debug_override_accepts_boolish_values() {
        let mut config = ChainConfig::default();

        config.apply_debug_override("1").unwrap();
        assert!(config.chain.debug);

        config.apply_debug_override("off").unwrap();
        assert!(!config.chain.debug);

        config.apply_debug_override("YES").unwrap();
        assert!(config.chain.debug);
    }

    #[test]
    fn test_debug_override_rejects_garbage_and_keeps_value() {
        let mut config = ChainConfig::default();
        config.chain.debug = true;

        let error = config.apply_debug_override("sometimes").unwrap_err();
        assert!(matches!(error, ConfigError::InvalidConfig(_)));
        assert!(error.to_string().contains("CHAIN_DEBUG"));
        assert!(config.chain.debug);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = ChainConfig::default();
        config.chain.event = true;

        let rendered = toml::to_string(&config).unwrap();
        let parsed = ChainConfig::from_toml_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}

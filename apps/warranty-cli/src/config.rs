//! # CLI Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --format json, --currency EUR                                      │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     WARRANTY_CURRENCY_SAMPLE="0 Ft"                                    │
//! │     WARRANTY_CONVERT_ALL=true                                          │
//! │     WARRANTY_OUTPUT_FORMAT=json                                        │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/warranty-pages/config.toml (Linux)                       │
//! │     ~/Library/Application Support/warranty-pages/config.toml (macOS)   │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [money]
//! currency_sample = "0 Ft"
//! convert_all = false
//! [money.convert_only]
//! HUF = true
//!
//! [statutory]
//! currency = "HUF"
//! tiers = [
//!     { min_price = 250000, days = 1095 },
//!     { min_price = 10000, days = 730 },
//! ]
//!
//! [output]
//! format = "text"   # text | json
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use warranty_core::EngineConfig;

use crate::error::ConfigError;

pub const ENV_CURRENCY_SAMPLE: &str = "WARRANTY_CURRENCY_SAMPLE";
pub const ENV_CONVERT_ALL: &str = "WARRANTY_CONVERT_ALL";
pub const ENV_OUTPUT_FORMAT: &str = "WARRANTY_OUTPUT_FORMAT";

// =============================================================================
// Output Settings
// =============================================================================

/// How generated pages are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One plain-text page per record.
    #[default]
    Text,
    /// A single JSON document with all records.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(ConfigError::InvalidValue {
                field: "output.format".to_string(),
                reason: format!("unknown format '{}', expected text or json", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,
}

// =============================================================================
// App Configuration
// =============================================================================

/// Complete CLI configuration: the engine's settings plus output settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(flatten)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub output: OutputSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (an explicit path must exist, the default one may not)
    /// 3. Environment variables
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Reads and parses one TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates the engine part of the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine
            .validate()
            .map_err(|e| ConfigError::InvalidValue {
                field: "engine".to_string(),
                reason: e.to_string(),
            })
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// Unparsable values are logged and ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(sample) = lookup(ENV_CURRENCY_SAMPLE) {
            debug!(sample = %sample, "Overriding currency sample from environment");
            self.engine.money.currency_sample = sample;
        }

        if let Some(value) = lookup(ENV_CONVERT_ALL) {
            match parse_flag(&value) {
                Some(flag) => self.engine.money.rules.convert_all = flag,
                None => warn!(value = %value, "Invalid {} in environment", ENV_CONVERT_ALL),
            }
        }

        if let Some(value) = lookup(ENV_OUTPUT_FORMAT) {
            match value.parse() {
                Ok(format) => self.output.format = format,
                Err(e) => warn!(error = %e, "Ignoring {} from environment", ENV_OUTPUT_FORMAT),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "warranty-pages")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(" TEXT ".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("pdf".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_toml_layout() {
        let config = AppConfig::from_toml(
            r#"
            [money]
            currency_sample = "0 €"
            convert_all = true

            [statutory]
            currency = "HUF"
            tiers = [{ min_price = 100000, days = 1095 }]

            [output]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.engine.money.currency_sample, "0 €");
        assert!(config.engine.money.rules.convert_all);
        assert_eq!(config.engine.statutory.tiers.len(), 1);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_toml_output_reparses() {
        let config = AppConfig::default();
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("currency_sample"));
        assert_eq!(AppConfig::from_toml(&rendered).unwrap(), config);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(env(&[
            (ENV_CURRENCY_SAMPLE, "0 €"),
            (ENV_CONVERT_ALL, "yes"),
            (ENV_OUTPUT_FORMAT, "json"),
        ]));

        assert_eq!(config.engine.money.currency_sample, "0 €");
        assert!(config.engine.money.rules.convert_all);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(env(&[
            (ENV_CONVERT_ALL, "maybe"),
            (ENV_OUTPUT_FORMAT, "pdf"),
        ]));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/warranty-pages.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_validation_error_is_reported() {
        let mut config = AppConfig::default();
        config.engine.statutory.currency = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}

//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. `.sql-user-provisioner.toml` in current directory
//! 4. `~/.config/sql-user-provisioner/config.toml`
//! 5. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! case_sensitivity = "formatters={PROFILE={quotes='}},normalizers={ALL={upper=true}}"
//! drop_cascade = false
//!
//! [logging]
//! level = "warn"          # tracing filter directive
//! format = "compact"      # compact, pretty, json
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `PROVISIONER_CASE_SENSITIVITY` | Case-sensitivity notation |
//! | `PROVISIONER_DROP_CASCADE` | `true`/`1` to drop users with `cascade` |
//! | `PROVISIONER_LOG` | Log filter directive |

use std::{env, fs, path::Path, path::PathBuf};

use serde::Deserialize;

use crate::{
    case_sensitivity::CaseSensitivitySetup,
    error::{AppResult, ProvisionResult, config_error}
};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Case-sensitivity notation, see [`crate::case_sensitivity`]
    #[serde(default)]
    pub case_sensitivity: Option<String>,
    /// Append `cascade` to generated `drop user` statements
    #[serde(default)]
    pub drop_cascade:     bool,
    #[serde(default)]
    pub logging:          LoggingConfig
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive
    #[serde(default = "default_level")]
    pub level:  String,
    #[serde(default)]
    pub format: LogFormat
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level:  default_level(),
            format: LogFormat::default()
        }
    }
}

fn default_level() -> String {
    String::from("warn")
}

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file in current directory (.sql-user-provisioner.toml)
    /// 3. Config file in home directory (~/.config/sql-user-provisioner/config.toml)
    /// 4. Default values
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        // Try to load from home directory config
        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sql-user-provisioner")
                .join("config.toml");

            if home_config.exists() {
                config = Self::from_file(&home_config)?;
            }
        }

        // Try to load from current directory config (overrides home config)
        let local_config = PathBuf::from(".sql-user-provisioner.toml");
        if local_config.exists() {
            config = Self::from_file(&local_config)?;
        }

        // Override with environment variables
        if let Ok(notation) = env::var("PROVISIONER_CASE_SENSITIVITY") {
            config.case_sensitivity = Some(notation);
        }

        if let Ok(cascade) = env::var("PROVISIONER_DROP_CASCADE") {
            config.drop_cascade = parse_flag(&cascade)?;
        }

        if let Ok(level) = env::var("PROVISIONER_LOG") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Load configuration from one TOML file
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }

    /// Build the case-sensitivity setup described by this configuration
    pub fn case_sensitivity_setup(&self) -> ProvisionResult<CaseSensitivitySetup> {
        match self.case_sensitivity.as_deref() {
            Some(notation) => CaseSensitivitySetup::from_notation(notation),
            None => Ok(CaseSensitivitySetup::default())
        }
    }
}

fn parse_flag(value: &str) -> AppResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        other => Err(config_error(format!(
            "Invalid boolean '{}' for PROVISIONER_DROP_CASCADE",
            other
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE").unwrap());
        assert!(parse_flag("1").unwrap());
        assert!(!parse_flag("no").unwrap());
        assert!(parse_flag("maybe").is_err());
    }
}

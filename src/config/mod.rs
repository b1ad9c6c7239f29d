//! Configuration management for tabtree
//!
//! Configuration comes from a TOML file and is overridden by command-line
//! arguments. Precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment (`TABTREE_LOG` for the log filter)
//! 3. Configuration file
//! 4. Default values

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::completion::{DEFAULT_LINE_VAR, Shell};
use crate::error::{ConfigError, Result};
use crate::script::DEFAULT_COMPLETER;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Completion configuration
    #[serde(default)]
    pub completion: CompletionConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Completion behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Environment variable holding the line being completed
    #[serde(default = "default_line_var")]
    pub line_var: String,

    /// Shell used when none is given and `SHELL` cannot be used
    #[serde(default)]
    pub default_shell: Option<String>,

    /// Subcommand generated scripts invoke
    #[serde(default = "default_completer")]
    pub completer: String,
}

// Default value functions
fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    false
}

fn default_line_var() -> String {
    DEFAULT_LINE_VAR.to_string()
}

fn default_completer() -> String {
    DEFAULT_COMPLETER.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            line_var: default_line_var(),
            default_shell: None,
            completer: default_completer(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Load configuration from a file
    ///
    /// # Arguments
    /// * `path` - Explicit config file, or `None` for the default location
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration. A missing default file
    ///   yields defaults; a missing explicit file is an error.
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_config_path(), false),
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigError::FileNotFound(path.display().to_string()).into());
            }
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path)?;
        Self::from_toml_str(&text)
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - `<config dir>/tabtree/config.toml`
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tabtree")
            .join("config.toml")
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        let line_var = &self.completion.line_var;
        if line_var.is_empty() || line_var.contains(['=', '\0']) {
            return Err(ConfigError::InvalidValue {
                field: "completion.line_var".to_string(),
                value: line_var.clone(),
            }
            .into());
        }

        if self.completion.completer.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "completion.completer".to_string(),
                value: self.completion.completer.clone(),
            }
            .into());
        }

        if let Some(name) = &self.completion.default_shell {
            if name.parse::<Shell>().is_err() {
                return Err(ConfigError::InvalidValue {
                    field: "completion.default_shell".to_string(),
                    value: name.clone(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Configured fallback shell, if valid
    pub fn default_shell(&self) -> Option<Shell> {
        self.completion
            .default_shell
            .as_deref()
            .and_then(|name| name.parse().ok())
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }
}

impl LogLevel {
    /// Lowercase name, usable as a filter directive
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TabtreeError;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.completion.line_var, "COMP_LINE");
        assert_eq!(config.completion.completer, "completion");
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            [completion]
            default_shell = "fish"
            "#,
        )
        .unwrap();
        assert_eq!(config.default_shell(), Some(Shell::Fish));
        assert_eq!(config.completion.line_var, "COMP_LINE");
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_invalid_format() {
        let err = Config::from_toml_str("[logging]\nlevel = \"loud\"").unwrap_err();
        assert!(matches!(err, TabtreeError::Config(ConfigError::InvalidFormat(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.completion.line_var = String::new();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.completion.default_shell = Some("tcsh".to_string());
        assert!(config.validate().is_err());
        assert_eq!(config.default_shell(), None);

        let mut config = Config::default();
        config.completion.completer = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[logging]\nlevel = \"debug\"\ntimestamps = true\n").unwrap();

        let config = Config::load_from_file(Some(&path)).unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(config.logging.timestamps);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from_file(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, TabtreeError::Config(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.completion.default_shell = Some("zsh".to_string());
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("[completion]"));
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
        assert_eq!(LogLevel::Error.to_tracing_level(), tracing::Level::ERROR);
        assert_eq!(LogLevel::Info.as_str(), "info");
    }
}

//! CLI configuration
//!
//! Settings come from, in increasing priority: built-in defaults, a JSON
//! config file, `RPN_*` environment variables, and command-line flags.

use crate::logging::LogFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "rpn.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid log level '{0}' (expected off, error, warn, info, debug or trace)")]
    InvalidLevel(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global log level.
    pub log_level: String,
    /// Override for the per-token machine log (`rpn::machine`).
    pub machine_log_level: Option<String>,
    pub log_format: LogFormat,
    /// JSON-lines file that calculation history is appended to.
    pub history_file: PathBuf,
    /// Entries shown by `rpn history` when `--limit` is not given.
    pub history_limit: usize,
    /// Whether completed calculations are written to the history file.
    pub persist: bool,
    /// Name stamped on saved entries; `rpn history` then shows only this user's.
    pub user: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            machine_log_level: None,
            log_format: LogFormat::Compact,
            history_file: PathBuf::from("rpn_history.jsonl"),
            history_limit: 50,
            persist: true,
            user: None,
        }
    }
}

impl Config {
    /// Load `path`, or `rpn.json` if present, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `RPN_LOG_LEVEL`, `RPN_HISTORY_FILE` and `RPN_USER` as read through `var`.
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = var("RPN_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(file) = var("RPN_HISTORY_FILE") {
            self.history_file = PathBuf::from(file);
        }
        if let Some(user) = var("RPN_USER") {
            self.user = Some(user);
        }
    }

    pub fn log_config(&self) -> Result<LogConfig, ConfigError> {
        Ok(LogConfig {
            global: parse_level(&self.log_level)?,
            machine: self
                .machine_log_level
                .as_deref()
                .map(parse_level)
                .transpose()?,
        })
    }
}

fn parse_level(text: &str) -> Result<LevelFilter, ConfigError> {
    LevelFilter::from_str(text.trim()).map_err(|_| ConfigError::InvalidLevel(text.to_string()))
}

/// Log levels resolved per target.
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub global: LevelFilter,
    pub machine: Option<LevelFilter>,
}

impl LogConfig {
    pub fn level_for(&self, target: &str) -> LevelFilter {
        match target {
            "rpn::machine" => self.machine.unwrap_or(self.global),
            _ => self.global,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.history_limit, 50);
        assert!(config.persist);
        assert_eq!(config.log_config().unwrap().global, LevelFilter::WARN);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"log_level": "debug", "log_format": "json"}"#).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.history_file, PathBuf::from("rpn_history.jsonl"));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(serde_json::from_str::<Config>(r#"{"colour": true}"#).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(|name| match name {
            "RPN_LOG_LEVEL" => Some("trace".to_string()),
            "RPN_HISTORY_FILE" => Some("/tmp/h.jsonl".to_string()),
            "RPN_USER" => Some("alice".to_string()),
            _ => None,
        });
        assert_eq!(config.log_level, "trace");
        assert_eq!(config.history_file, PathBuf::from("/tmp/h.jsonl"));
        assert_eq!(config.user.as_deref(), Some("alice"));
    }

    #[test]
    fn test_machine_level_override() {
        let config = Config {
            log_level: "info".to_string(),
            machine_log_level: Some("trace".to_string()),
            ..Config::default()
        };
        let log = config.log_config().unwrap();
        assert_eq!(log.level_for("rpn::machine"), LevelFilter::TRACE);
        assert_eq!(log.level_for("rpn::batch"), LevelFilter::INFO);
    }

    #[test]
    fn test_invalid_level() {
        let config = Config {
            log_level: "loud".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.log_config(), Err(ConfigError::InvalidLevel(_))));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("rpn-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"history_limit": 5, "persist": false}"#).unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.history_limit, 5);
        assert!(!config.persist);

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::Io { .. })
        ));
    }
}

//! Runtime configuration from environment variables.

use record_ledger::LedgerConfig;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Default ledger file, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "record-ledger.db";

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Configuration for one runtime invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Ledger file opened by the file-backed store
    pub data_file: PathBuf,

    /// Log filter directive (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Conditional write retries per record
    pub max_write_retries: u32,

    /// Key draws before giving up on a fresh key
    pub max_key_attempts: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let ledger = LedgerConfig::default();
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            log_level: "info".to_string(),
            json_logs: false,
            max_write_retries: ledger.max_write_retries,
            max_key_attempts: ledger.max_key_attempts,
        }
    }
}

impl RuntimeConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RECORD_DATA_FILE`: Ledger file (default: record-ledger.db)
    /// - `RECORD_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `RECORD_JSON_LOGS`: Enable JSON logs (default: false)
    /// - `RECORD_MAX_WRITE_RETRIES`: Conditional write retries (default: 3)
    /// - `RECORD_MAX_KEY_ATTEMPTS`: Key draws per new record (default: 8)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`RuntimeConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            data_file: lookup("RECORD_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_file),

            log_level: lookup("RECORD_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            json_logs: lookup("RECORD_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(defaults.json_logs),

            max_write_retries: parse_positive(
                "RECORD_MAX_WRITE_RETRIES",
                lookup("RECORD_MAX_WRITE_RETRIES"),
                defaults.max_write_retries,
            )?,

            max_key_attempts: parse_positive(
                "RECORD_MAX_KEY_ATTEMPTS",
                lookup("RECORD_MAX_KEY_ATTEMPTS"),
                defaults.max_key_attempts,
            )?,
        })
    }

    /// Ledger settings derived from this configuration.
    pub fn ledger_config(&self) -> LedgerConfig {
        LedgerConfig::default()
            .with_max_write_retries(self.max_write_retries)
            .with_max_key_attempts(self.max_key_attempts)
    }
}

fn parse_positive(
    var: &'static str,
    value: Option<String>,
    default: u32,
) -> Result<u32, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::InvalidNumber { var, value: raw }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = RuntimeConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.data_file, PathBuf::from("record-ledger.db"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.max_write_retries, 3);
        assert_eq!(config.max_key_attempts, 8);
    }

    #[test]
    fn test_env_overrides() {
        let config = RuntimeConfig::from_lookup(lookup_from(&[
            ("RECORD_DATA_FILE", "/tmp/ledger.db"),
            ("RECORD_JSON_LOGS", "TRUE"),
            ("RECORD_MAX_WRITE_RETRIES", "5"),
            ("RECORD_MAX_KEY_ATTEMPTS", " 2 "),
        ]))
        .unwrap();

        assert_eq!(config.data_file, PathBuf::from("/tmp/ledger.db"));
        assert!(config.json_logs);
        assert_eq!(config.max_write_retries, 5);
        assert_eq!(config.max_key_attempts, 2);
    }

    #[test]
    fn test_log_level_prefers_record_variable() {
        let config = RuntimeConfig::from_lookup(lookup_from(&[
            ("RUST_LOG", "debug"),
            ("RECORD_LOG_LEVEL", "warn"),
        ]))
        .unwrap();
        assert_eq!(config.log_level, "warn");

        let config = RuntimeConfig::from_lookup(lookup_from(&[("RUST_LOG", "debug")])).unwrap();
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let err = RuntimeConfig::from_lookup(lookup_from(&[("RECORD_MAX_WRITE_RETRIES", "0")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                var: "RECORD_MAX_WRITE_RETRIES",
                value: "0".to_string(),
            }
        );

        assert!(
            RuntimeConfig::from_lookup(lookup_from(&[("RECORD_MAX_KEY_ATTEMPTS", "many")]))
                .is_err()
        );
    }

    #[test]
    fn test_ledger_config_carries_limits() {
        let config = RuntimeConfig {
            max_write_retries: 7,
            max_key_attempts: 4,
            ..RuntimeConfig::default()
        };
        let ledger = config.ledger_config();
        assert_eq!(ledger.max_write_retries, 7);
        assert_eq!(ledger.max_key_attempts, 4);
    }
}

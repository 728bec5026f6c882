//! # Value Objects
//!
//! Ledger configuration, record keys and timestamp formats.

use chrono::{DateTime, Utc};
use std::fmt;

/// Configuration for the record ledger service.
///
/// Scan bounds are not configurable; see [`SCAN_START`](super::keys::SCAN_START).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Conditional-write retries for read-modify-write (default: 3).
    pub max_write_retries: u32,
    /// Fresh keys drawn before giving up on a create (default: 8).
    pub max_key_attempts: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_write_retries: 3,
            max_key_attempts: 8,
        }
    }
}

impl LedgerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retries are clamped to at least one attempt.
    pub fn with_max_write_retries(mut self, retries: u32) -> Self {
        self.max_write_retries = retries.max(1);
        self
    }

    pub fn with_max_key_attempts(mut self, attempts: u32) -> Self {
        self.max_key_attempts = attempts.max(1);
        self
    }
}

/// Ledger key of a group or student record.
///
/// Generated keys are 16-digit zero-padded decimals; keys handed in by
/// callers are taken verbatim.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordKey(String);

impl RecordKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `registerTS` format (RFC 3339).
pub fn register_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(chrono::SecondsFormat::Secs, false)
}

/// `assignedTS` / `executeTS` format (RFC 1123 with numeric zone).
pub fn item_timestamp(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S %z").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_config() {
        let config = LedgerConfig::default();
        assert_eq!(config.max_write_retries, 3);
        assert_eq!(config.max_key_attempts, 8);
    }

    #[test]
    fn test_retries_clamped() {
        let config = LedgerConfig::new().with_max_write_retries(0).with_max_key_attempts(0);
        assert_eq!(config.max_write_retries, 1);
        assert_eq!(config.max_key_attempts, 1);
    }

    #[test]
    fn test_timestamp_formats() {
        let at = Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap();
        assert_eq!(register_timestamp(at), "2006-01-02T15:04:05+00:00");
        assert_eq!(item_timestamp(at), "Mon, 02 Jan 2006 15:04:05 +0000");
    }
}

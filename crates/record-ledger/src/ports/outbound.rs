//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the record ledger requires from its host.
//!
//! Production: `FileBackedLedgerStore`, `SystemTimeSource`, `OsRandomSource`
//! Testing: `InMemoryLedgerStore`, `FixedTimeSource`, `SequenceRandomSource`

use crate::domain::errors::KVStoreError;
use chrono::{DateTime, Utc};

/// A key/value pair yielded by a range scan.
pub type ScanEntry = (String, Vec<u8>);

/// Lazy, finite, ascending-by-key iteration over a key range.
///
/// The scan is not restartable. Dropping it releases it on the host, so
/// every exit path closes it.
pub type RangeScan<'a> = Box<dyn Iterator<Item = Result<ScanEntry, KVStoreError>> + Send + 'a>;

/// A stored value together with its write version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedValue {
    pub value: Vec<u8>,
    /// Bumped on every successful write to the key; starts at 1.
    pub version: u64,
}

/// Abstract interface over the host ledger's key-value state.
pub trait LedgerStore: Send + Sync {
    /// Get a value with its current version.
    fn get_versioned(&self, key: &str) -> Result<Option<VersionedValue>, KVStoreError>;

    /// Unconditionally write a value.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), KVStoreError>;

    /// Write only if the key's current version equals `expected_version`.
    ///
    /// `None` requires the key to be absent. Returns `Ok(false)` without
    /// writing when the version does not match.
    fn compare_and_put(
        &self,
        key: &str,
        expected_version: Option<u64>,
        value: &[u8],
    ) -> Result<bool, KVStoreError>;

    /// Iterate `[start_key, end_key)` in ascending key order.
    fn range_scan(&self, start_key: &str, end_key: &str) -> Result<RangeScan<'_>, KVStoreError>;

    /// Get a value by key.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.get_versioned(key)?.map(|v| v.value))
    }

    /// Check if a key exists.
    fn exists(&self, key: &str) -> Result<bool, KVStoreError> {
        Ok(self.get_versioned(key)?.is_some())
    }
}

/// Abstract interface for the current time (for testability).
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Abstract interface for randomness used by key generation.
pub trait RandomSource: Send + Sync {
    /// Uniform non-negative 63-bit integer.
    fn next_u63(&self) -> u64;
}

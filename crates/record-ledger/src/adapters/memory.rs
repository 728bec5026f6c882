use super::scan::{snapshot_range, ScanTracker, SnapshotScan};
use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{LedgerStore, RangeScan, VersionedValue};
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;

/// Failures armed on the next matching store call.
#[derive(Debug, Default)]
struct FaultPlan {
    fail_get: bool,
    fail_put: bool,
    fail_scan: bool,
    scan_fail_after: Option<usize>,
    lost_races: u32,
}

/// In-memory ledger store for unit tests and embedding.
///
/// Keys are kept ordered so range scans iterate in ascending key order.
/// Fault injection lets tests drive every store error path.
#[derive(Default)]
pub struct InMemoryLedgerStore {
    data: RwLock<BTreeMap<String, VersionedValue>>,
    scans: ScanTracker,
    faults: Mutex<FaultPlan>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of range scans opened and not yet dropped.
    pub fn open_scans(&self) -> usize {
        self.scans.open_scans()
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Stores raw bytes, bypassing any encoding (for corrupt-data tests).
    pub fn insert_raw(&self, key: &str, value: &[u8]) {
        let mut data = self.data.write();
        let version = data.get(key).map_or(1, |v| v.version + 1);
        data.insert(
            key.to_string(),
            VersionedValue {
                value: value.to_vec(),
                version,
            },
        );
    }

    pub fn fail_next_get(&self) {
        self.faults.lock().fail_get = true;
    }

    pub fn fail_next_put(&self) {
        self.faults.lock().fail_put = true;
    }

    pub fn fail_next_scan(&self) {
        self.faults.lock().fail_scan = true;
    }

    /// The next scan yields `count` entries, then an I/O error.
    pub fn fail_next_scan_after(&self, count: usize) {
        self.faults.lock().scan_fail_after = Some(count);
    }

    /// The next `count` conditional writes report a version mismatch.
    pub fn lose_next_races(&self, count: u32) {
        self.faults.lock().lost_races = count;
    }

    fn injected(message: &str) -> KVStoreError {
        KVStoreError::IOError {
            message: format!("injected {} failure", message),
        }
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn get_versioned(&self, key: &str) -> Result<Option<VersionedValue>, KVStoreError> {
        if std::mem::take(&mut self.faults.lock().fail_get) {
            return Err(Self::injected("get"));
        }
        Ok(self.data.read().get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), KVStoreError> {
        if std::mem::take(&mut self.faults.lock().fail_put) {
            return Err(Self::injected("put"));
        }
        self.insert_raw(key, value);
        Ok(())
    }

    fn compare_and_put(
        &self,
        key: &str,
        expected_version: Option<u64>,
        value: &[u8],
    ) -> Result<bool, KVStoreError> {
        {
            let mut faults = self.faults.lock();
            if std::mem::take(&mut faults.fail_put) {
                return Err(Self::injected("put"));
            }
            if faults.lost_races > 0 {
                faults.lost_races -= 1;
                return Ok(false);
            }
        }

        let mut data = self.data.write();
        let current = data.get(key).map(|v| v.version);
        if current != expected_version {
            return Ok(false);
        }
        data.insert(
            key.to_string(),
            VersionedValue {
                value: value.to_vec(),
                version: current.map_or(1, |v| v + 1),
            },
        );
        Ok(true)
    }

    fn range_scan(&self, start_key: &str, end_key: &str) -> Result<RangeScan<'_>, KVStoreError> {
        let (fail_scan, fail_after) = {
            let mut faults = self.faults.lock();
            (
                std::mem::take(&mut faults.fail_scan),
                faults.scan_fail_after.take(),
            )
        };
        if fail_scan {
            return Err(Self::injected("scan"));
        }

        let entries = snapshot_range(&self.data.read(), start_key, end_key);
        let scan = SnapshotScan::new(entries, &self.scans);
        Ok(match fail_after {
            Some(count) => Box::new(scan.failing_after(count)),
            None => Box::new(scan),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_ledger_store() {
        let store = InMemoryLedgerStore::new();

        store.put("key1", b"value1").unwrap();
        store.put("key2", b"value2").unwrap();

        assert_eq!(store.get("key1").unwrap(), Some(b"value1".to_vec()));
        assert_eq!(store.get("key2").unwrap(), Some(b"value2".to_vec()));
        assert_eq!(store.get("key3").unwrap(), None);

        assert!(store.exists("key1").unwrap());
        assert!(!store.exists("key3").unwrap());
    }

    #[test]
    fn test_versions_bump_on_write() {
        let store = InMemoryLedgerStore::new();

        store.put("k", b"a").unwrap();
        assert_eq!(store.get_versioned("k").unwrap().unwrap().version, 1);

        store.put("k", b"b").unwrap();
        assert_eq!(store.get_versioned("k").unwrap().unwrap().version, 2);
    }

    #[test]
    fn test_compare_and_put() {
        let store = InMemoryLedgerStore::new();

        assert!(store.compare_and_put("k", None, b"first").unwrap());
        assert!(!store.compare_and_put("k", None, b"clobber").unwrap());
        assert!(!store.compare_and_put("k", Some(7), b"stale").unwrap());
        assert!(store.compare_and_put("k", Some(1), b"second").unwrap());

        let current = store.get_versioned("k").unwrap().unwrap();
        assert_eq!(current.value, b"second".to_vec());
        assert_eq!(current.version, 2);
    }

    #[test]
    fn test_range_scan_is_ordered_and_end_exclusive() {
        let store = InMemoryLedgerStore::new();

        for key in ["0000000000000300", "0000000000000100", "9999", "0000000000000200", "99990000"] {
            store.put(key, key.as_bytes()).unwrap();
        }

        let keys: Vec<String> = store
            .range_scan("0", "9999")
            .unwrap()
            .map(|entry| entry.unwrap().0)
            .collect();

        assert_eq!(
            keys,
            vec!["0000000000000100", "0000000000000200", "0000000000000300"]
        );
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let store = InMemoryLedgerStore::new();
        store.put("5", b"x").unwrap();
        assert_eq!(store.range_scan("9", "1").unwrap().count(), 0);
    }

    #[test]
    fn test_scan_released_on_drop() {
        let store = InMemoryLedgerStore::new();
        store.put("1", b"x").unwrap();

        let scan = store.range_scan("0", "9999").unwrap();
        assert_eq!(store.open_scans(), 1);
        drop(scan);
        assert_eq!(store.open_scans(), 0);
    }

    #[test]
    fn test_scan_fault_after_entries() {
        let store = InMemoryLedgerStore::new();
        store.put("1", b"x").unwrap();
        store.put("2", b"y").unwrap();
        store.fail_next_scan_after(1);

        let results: Vec<_> = store.range_scan("0", "9999").unwrap().collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_injected_faults_fire_once() {
        let store = InMemoryLedgerStore::new();

        store.fail_next_put();
        assert!(store.put("k", b"v").is_err());
        assert!(store.put("k", b"v").is_ok());

        store.fail_next_get();
        assert!(store.get("k").is_err());
        assert!(store.get("k").is_ok());

        store.lose_next_races(1);
        assert!(!store.compare_and_put("k", Some(1), b"w").unwrap());
        assert!(store.compare_and_put("k", Some(1), b"w").unwrap());
    }
}

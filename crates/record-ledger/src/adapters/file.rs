//! # File-Backed Ledger Store
//!
//! Persists the whole keyspace to a single file, rewritten atomically
//! through a temp file on every mutation. Suitable for a single-process host.
//!
//! File layout: `CRL1` magic, then repeated
//! `[key_len:u32][key][version:u64][value_len:u32][value]` (little endian).
//!
//! An exclusive `fs2` lock on `<path>.lock` is held for the lifetime of the
//! store.

use super::scan::{snapshot_range, ScanTracker, SnapshotScan};
use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{LedgerStore, RangeScan, VersionedValue};
use fs2::FileExt;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const MAGIC: &[u8; 4] = b"CRL1";

pub struct FileBackedLedgerStore {
    data: RwLock<BTreeMap<String, VersionedValue>>,
    path: PathBuf,
    scans: ScanTracker,
    _lock: File,
}

impl FileBackedLedgerStore {
    /// Open the store at `path`, creating it if missing.
    ///
    /// # Errors
    ///
    /// Fails if another process holds the ledger lock or the file is not a
    /// valid ledger file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KVStoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(sibling_path(&path, ".lock"))
            .map_err(io_error)?;
        lock.try_lock_exclusive().map_err(|_| KVStoreError::IOError {
            message: format!("ledger already in use ({})", path.display()),
        })?;

        let data = Self::load_from_file(&path)?;
        if data.is_empty() {
            tracing::info!(path = %path.display(), "Opened empty ledger");
        } else {
            tracing::info!(path = %path.display(), keys = data.len(), "Loaded ledger");
        }

        Ok(Self {
            data: RwLock::new(data),
            path,
            scans: ScanTracker::default(),
            _lock: lock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    fn load_from_file(path: &Path) -> Result<BTreeMap<String, VersionedValue>, KVStoreError> {
        let mut bytes = Vec::new();
        match File::open(path) {
            Ok(mut file) => {
                file.read_to_end(&mut bytes).map_err(io_error)?;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(io_error(e)),
        }
        if bytes.is_empty() {
            return Ok(BTreeMap::new());
        }
        if !bytes.starts_with(MAGIC) {
            return Err(corruption("missing ledger file header"));
        }

        let mut data = BTreeMap::new();
        let mut cursor = Cursor {
            bytes: &bytes,
            pos: MAGIC.len(),
        };
        while !cursor.is_done() {
            let key_len = cursor.read_u32()? as usize;
            let key = String::from_utf8(cursor.read_bytes(key_len)?.to_vec())
                .map_err(|_| corruption("key is not valid UTF-8"))?;
            let version = cursor.read_u64()?;
            let value_len = cursor.read_u32()? as usize;
            let value = cursor.read_bytes(value_len)?.to_vec();
            data.insert(key, VersionedValue { value, version });
        }

        Ok(data)
    }

    fn save_to_file(&self, data: &BTreeMap<String, VersionedValue>) -> Result<(), KVStoreError> {
        let mut bytes = Vec::with_capacity(MAGIC.len() + data.len() * 256);
        bytes.extend_from_slice(MAGIC);
        for (key, entry) in data {
            bytes.extend_from_slice(&(key.len() as u32).to_le_bytes());
            bytes.extend_from_slice(key.as_bytes());
            bytes.extend_from_slice(&entry.version.to_le_bytes());
            bytes.extend_from_slice(&(entry.value.len() as u32).to_le_bytes());
            bytes.extend_from_slice(&entry.value);
        }

        let temp_path = sibling_path(&self.path, ".tmp");
        let mut file = File::create(&temp_path).map_err(io_error)?;
        file.write_all(&bytes).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;
        std::fs::rename(&temp_path, &self.path).map_err(io_error)?;

        Ok(())
    }

    /// Applies `value` at `key` and persists; the in-memory map is restored
    /// if persisting fails.
    fn write_entry(
        &self,
        data: &mut BTreeMap<String, VersionedValue>,
        key: &str,
        value: &[u8],
    ) -> Result<(), KVStoreError> {
        let version = data.get(key).map_or(1, |v| v.version + 1);
        let previous = data.insert(
            key.to_string(),
            VersionedValue {
                value: value.to_vec(),
                version,
            },
        );
        if let Err(e) = self.save_to_file(data) {
            match previous {
                Some(entry) => data.insert(key.to_string(), entry),
                None => data.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}

impl LedgerStore for FileBackedLedgerStore {
    fn get_versioned(&self, key: &str) -> Result<Option<VersionedValue>, KVStoreError> {
        Ok(self.data.read().get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), KVStoreError> {
        let mut data = self.data.write();
        self.write_entry(&mut data, key, value)
    }

    fn compare_and_put(
        &self,
        key: &str,
        expected_version: Option<u64>,
        value: &[u8],
    ) -> Result<bool, KVStoreError> {
        let mut data = self.data.write();
        if data.get(key).map(|v| v.version) != expected_version {
            return Ok(false);
        }
        self.write_entry(&mut data, key, value)?;
        Ok(true)
    }

    fn range_scan(&self, start_key: &str, end_key: &str) -> Result<RangeScan<'_>, KVStoreError> {
        let entries = snapshot_range(&self.data.read(), start_key, end_key);
        Ok(Box::new(SnapshotScan::new(entries, &self.scans)))
    }
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn is_done(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], KVStoreError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| corruption("truncated ledger file"))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32, KVStoreError> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(self.read_bytes(4)?);
        Ok(u32::from_le_bytes(buf))
    }

    fn read_u64(&mut self) -> Result<u64, KVStoreError> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.read_bytes(8)?);
        Ok(u64::from_le_bytes(buf))
    }
}

/// `<path><suffix>`, keeping any extension `path` already has.
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

fn io_error(e: std::io::Error) -> KVStoreError {
    KVStoreError::IOError {
        message: e.to_string(),
    }
}

fn corruption(message: &str) -> KVStoreError {
    KVStoreError::CorruptionError {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reopen_preserves_values_and_versions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.bin");

        {
            let store = FileBackedLedgerStore::open(&path).unwrap();
            store.put("0000000000000002", b"two").unwrap();
            store.put("0000000000000001", b"one").unwrap();
            store.put("0000000000000001", b"uno").unwrap();
        }

        let store = FileBackedLedgerStore::open(&path).unwrap();
        assert_eq!(store.len(), 2);
        let entry = store.get_versioned("0000000000000001").unwrap().unwrap();
        assert_eq!(entry.value, b"uno".to_vec());
        assert_eq!(entry.version, 2);

        let keys: Vec<String> = store
            .range_scan("0", "9999")
            .unwrap()
            .map(|e| e.unwrap().0)
            .collect();
        assert_eq!(keys, vec!["0000000000000001", "0000000000000002"]);
    }

    #[test]
    fn test_ledgers_sharing_a_stem_keep_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("a.db");
        let json = dir.path().join("a.json");
        assert_eq!(sibling_path(&db, ".tmp"), dir.path().join("a.db.tmp"));
        assert_ne!(sibling_path(&db, ".tmp"), sibling_path(&json, ".tmp"));

        {
            let first = FileBackedLedgerStore::open(&db).unwrap();
            let second = FileBackedLedgerStore::open(&json).unwrap();
            first.put("k", b"from-db").unwrap();
            second.put("k", b"from-json").unwrap();
            first.put("only-db", b"x").unwrap();
        }

        let first = FileBackedLedgerStore::open(&db).unwrap();
        let second = FileBackedLedgerStore::open(&json).unwrap();
        assert_eq!(first.get("k").unwrap(), Some(b"from-db".to_vec()));
        assert_eq!(second.get("k").unwrap(), Some(b"from-json".to_vec()));
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
        assert!(!dir.path().join("a.tmp").exists());
    }

    #[test]
    fn test_absent_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBackedLedgerStore::open(dir.path().join("ledger.bin")).unwrap();
        store.put("0000000000000001", b"one").unwrap();

        assert_eq!(store.get_versioned("0000000000000002").unwrap(), None);
        assert_eq!(store.get("0000000000000002").unwrap(), None);
        assert!(!store.exists("0000000000000002").unwrap());
    }

    #[test]
    fn test_second_open_is_rejected_while_locked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.bin");

        let _first = FileBackedLedgerStore::open(&path).unwrap();
        let second = FileBackedLedgerStore::open(&path);
        assert!(matches!(second, Err(KVStoreError::IOError { .. })));
    }

    #[test]
    fn test_compare_and_put_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.bin");

        {
            let store = FileBackedLedgerStore::open(&path).unwrap();
            assert!(store.compare_and_put("k", None, b"v1").unwrap());
            assert!(!store.compare_and_put("k", None, b"v2").unwrap());
        }

        let store = FileBackedLedgerStore::open(&path).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"v1".to_vec()));
    }

    #[test]
    fn test_garbage_file_is_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.bin");
        std::fs::write(&path, b"garbage").unwrap();

        let result = FileBackedLedgerStore::open(&path);
        assert!(matches!(result, Err(KVStoreError::CorruptionError { .. })));
    }

    #[test]
    fn test_truncated_file_is_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.bin");
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&10u32.to_le_bytes());
        bytes.extend_from_slice(b"abc");
        std::fs::write(&path, bytes).unwrap();

        let result = FileBackedLedgerStore::open(&path);
        assert!(matches!(result, Err(KVStoreError::CorruptionError { .. })));
    }
}

//! Snapshot range scans shared by the bundled stores.
//!
//! A scan copies its key range at open time, so writes made while it is
//! being consumed are not observed (the same view a host transaction gives).

use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{ScanEntry, VersionedValue};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts scans that have been opened and not yet dropped.
#[derive(Debug, Default, Clone)]
pub(crate) struct ScanTracker {
    open: Arc<AtomicUsize>,
}

impl ScanTracker {
    pub(crate) fn open_scans(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    fn acquire(&self) -> ScanGuard {
        self.open.fetch_add(1, Ordering::SeqCst);
        ScanGuard {
            open: Arc::clone(&self.open),
        }
    }
}

struct ScanGuard {
    open: Arc<AtomicUsize>,
}

impl Drop for ScanGuard {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Copies `[start, end)` out of `data`. An inverted range is empty.
pub(crate) fn snapshot_range(
    data: &BTreeMap<String, VersionedValue>,
    start: &str,
    end: &str,
) -> Vec<ScanEntry> {
    if start >= end {
        return Vec::new();
    }
    data.range::<str, _>((Bound::Included(start), Bound::Excluded(end)))
        .map(|(k, v)| (k.clone(), v.value.clone()))
        .collect()
}

pub(crate) struct SnapshotScan {
    entries: std::vec::IntoIter<ScanEntry>,
    fail_after: Option<usize>,
    yielded: usize,
    exhausted: bool,
    _guard: ScanGuard,
}

impl SnapshotScan {
    pub(crate) fn new(entries: Vec<ScanEntry>, tracker: &ScanTracker) -> Self {
        Self {
            entries: entries.into_iter(),
            fail_after: None,
            yielded: 0,
            exhausted: false,
            _guard: tracker.acquire(),
        }
    }

    /// Yield an I/O error after `count` entries (fault injection).
    pub(crate) fn failing_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }
}

impl Iterator for SnapshotScan {
    type Item = Result<ScanEntry, KVStoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        if self.fail_after == Some(self.yielded) {
            self.exhausted = true;
            return Some(Err(KVStoreError::IOError {
                message: format!("scan interrupted after {} entries", self.yielded),
            }));
        }
        match self.entries.next() {
            Some(entry) => {
                self.yielded += 1;
                Some(Ok(entry))
            }
            None => {
                self.exhausted = true;
                None
            }
        }
    }
}

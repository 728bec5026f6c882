//! # Record Ledger Service
//!
//! The main service implementing `RecordLedgerApi`.
//!
//! ## Architecture
//!
//! This service:
//! 1. Runs the query engine (full-range scan, decode, filter)
//! 2. Runs the lifecycle engine (create, assign, deliver)
//! 3. Claims fresh keys with conditional writes
//! 4. Uses dependency injection for the store, clock and randomness
//!
//! Every operation runs to completion on the calling thread. Ordering of
//! conflicting invocations is the host ledger's job; read-modify-write here
//! only guards against lost updates through versioned writes.

mod api;
mod lifecycle;
mod query;
mod seed;

use crate::adapters::{InMemoryLedgerStore, OsRandomSource, SystemTimeSource};
use crate::domain::codec::{decode_record, encode_record};
use crate::domain::entities::UserRecord;
use crate::domain::errors::RecordError;
use crate::domain::keys::{SCAN_END, SCAN_START};
use crate::domain::value_objects::LedgerConfig;
use crate::ports::outbound::{LedgerStore, RandomSource, TimeSource};
use tracing::{debug, warn};

pub use seed::{seed_records, SEED_GROUPS, SEED_STUDENTS};

/// The Record Ledger Service.
pub struct RecordLedgerService<S, T, R>
where
    S: LedgerStore,
    T: TimeSource,
    R: RandomSource,
{
    /// Host ledger state.
    pub(crate) store: S,
    /// Clock for registration, assignment and delivery timestamps.
    pub(crate) time_source: T,
    /// Randomness for record keys and test ids.
    pub(crate) random: R,
    pub(crate) config: LedgerConfig,
}

/// Dependencies for RecordLedgerService
pub struct RecordLedgerDependencies<S, T, R> {
    pub store: S,
    pub time_source: T,
    pub random: R,
}

impl<S, T, R> RecordLedgerService<S, T, R>
where
    S: LedgerStore,
    T: TimeSource,
    R: RandomSource,
{
    pub fn new(deps: RecordLedgerDependencies<S, T, R>, config: LedgerConfig) -> Self {
        Self {
            store: deps.store,
            time_source: deps.time_source,
            random: deps.random,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Scans the whole generated keyspace and hands every decodable record to
    /// `visit` in key order.
    ///
    /// Undecodable values are skipped and counted, never surfaced. The scan
    /// is released on every exit path, including errors from `visit`.
    pub(crate) fn for_each_record<F>(&self, mut visit: F) -> Result<(), RecordError>
    where
        F: FnMut(String, UserRecord) -> Result<(), RecordError>,
    {
        let scan = self.store.range_scan(SCAN_START, SCAN_END)?;

        let mut visited = 0usize;
        let mut skipped = 0usize;
        for entry in scan {
            let (key, bytes) = entry?;
            match decode_record(&bytes) {
                Ok(record) => {
                    visited += 1;
                    visit(key, record)?;
                }
                Err(e) => {
                    skipped += 1;
                    debug!(key = %key, error = %e, "Skipping undecodable record");
                }
            }
        }

        if skipped > 0 {
            warn!(skipped, visited, "Range scan skipped undecodable records");
        } else {
            debug!(visited, "Range scan complete");
        }
        Ok(())
    }

    /// Versioned read-modify-write of one record.
    ///
    /// `mutate` sees the freshly decoded record on every attempt. Returns its
    /// output together with the record bytes as read, before any change.
    pub(crate) fn read_modify_write<F, O>(
        &self,
        key: &str,
        mut mutate: F,
    ) -> Result<(O, Vec<u8>), RecordError>
    where
        F: FnMut(&mut UserRecord) -> Result<Mutation<O>, RecordError>,
    {
        let attempts = self.config.max_write_retries.max(1);
        for attempt in 1..=attempts {
            let current = self
                .store
                .get_versioned(key)?
                .ok_or_else(|| RecordError::NotFound {
                    key: key.to_string(),
                })?;

            let mut record =
                decode_record(&current.value).map_err(|e| RecordError::CorruptRecord {
                    key: key.to_string(),
                    reason: e.message,
                })?;

            let output = match mutate(&mut record)? {
                Mutation::Skip(output) => return Ok((output, current.value)),
                Mutation::Write(output) => output,
            };

            let bytes = encode_record(&record).map_err(|e| RecordError::Serialization(e.message))?;
            if self
                .store
                .compare_and_put(key, Some(current.version), &bytes)?
            {
                return Ok((output, current.value));
            }
            warn!(key = %key, attempt, "Record changed underneath update, retrying");
        }

        Err(RecordError::WriteConflict {
            key: key.to_string(),
            attempts,
        })
    }
}

impl RecordLedgerService<InMemoryLedgerStore, SystemTimeSource, OsRandomSource> {
    /// Service over a fresh in-memory store with system time and OS entropy.
    pub fn new_in_memory() -> Self {
        Self::new(
            RecordLedgerDependencies {
                store: InMemoryLedgerStore::new(),
                time_source: SystemTimeSource,
                random: OsRandomSource::new(),
            },
            LedgerConfig::default(),
        )
    }
}

/// Decision returned by a read-modify-write closure.
pub(crate) enum Mutation<O> {
    /// Write the modified record back.
    Write(O),
    /// Leave the stored record untouched.
    Skip(O),
}

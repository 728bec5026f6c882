//! # Record Runtime
//!
//! Host harness for the record ledger.
//!
//! Each run opens the file-backed ledger, dispatches exactly one invocation
//! and releases the ledger again. The exclusive file lock serializes
//! concurrent runs against the same file.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (env, then CLI overrides)
//! 2. Initialize logging
//! 3. Open the ledger file
//! 4. Dispatch the invocation and print the payload

pub mod config;
pub mod logging;

use anyhow::{Context, Result};
use record_ledger::{
    FileBackedLedgerStore, InvocationResponse, OsRandomSource, RecordLedgerDependencies,
    RecordLedgerHandler, RecordLedgerService, SystemTimeSource,
};
use tracing::debug;

pub use config::{ConfigError, RuntimeConfig};
pub use logging::{init_logging, LoggingError};

/// Handler over the file-backed ledger with system time and OS entropy.
pub type FileLedgerHandler =
    RecordLedgerHandler<FileBackedLedgerStore, SystemTimeSource, OsRandomSource>;

/// Open the ledger file named by `config` and wire a handler over it.
pub fn open_handler(config: &RuntimeConfig) -> Result<FileLedgerHandler> {
    let store = FileBackedLedgerStore::open(&config.data_file).with_context(|| {
        format!("Failed to open ledger file {}", config.data_file.display())
    })?;

    debug!(
        max_write_retries = config.max_write_retries,
        max_key_attempts = config.max_key_attempts,
        "Wiring ledger handler"
    );

    let deps = RecordLedgerDependencies {
        store,
        time_source: SystemTimeSource,
        random: OsRandomSource::new(),
    };
    Ok(RecordLedgerHandler::new(RecordLedgerService::new(
        deps,
        config.ledger_config(),
    )))
}

/// Run one invocation against the ledger file.
///
/// Ledger-level failures come back as an error response; only failing to
/// open the ledger is an `Err`.
pub fn run(config: &RuntimeConfig, function: &str, args: &[String]) -> Result<InvocationResponse> {
    let handler = open_handler(config)?;
    Ok(handler.invoke(function, args))
}

//! # Adapters Module
//!
//! Adapter implementations of the outbound ports.
//!
//! ## Modules
//!
//! - `memory`: In-memory ledger store with fault injection
//! - `file`: File-backed ledger store for single-process hosts
//! - `infra`: System/fixed time sources and random sources

mod file;
mod infra;
mod memory;
mod scan;

pub use file::FileBackedLedgerStore;
pub use infra::{FixedTimeSource, OsRandomSource, SequenceRandomSource, SystemTimeSource};
pub use memory::InMemoryLedgerStore;

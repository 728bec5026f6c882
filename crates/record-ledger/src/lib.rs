//! # Record Ledger
//!
//! Test assignment and grading records kept on a host key-value ledger.
//!
//! Groups, students and per-student test items move through an
//! assignment → execution → delivery lifecycle. The host ledger supplies
//! durable storage, range iteration and transaction ordering; this crate owns
//! the record model and the rules enforced on top of it.
//!
//! ## Invocation Flow
//!
//! ```text
//! (function, args) ──→ [Dispatch Router] ──arity──→ [RecordLedgerService]
//!                                                     │            │
//!                                              Query Engine  Lifecycle Engine
//!                                                     │            │
//!                                                     └──→ [LedgerStore] ←──┘
//! ```
//!
//! ## Domain Invariants
//!
//! | Invariant | Description |
//! |-----------|-------------|
//! | Immutable type | A record's `recordType` never changes after creation |
//! | Single delivery | A test item's `rate` goes from empty to non-empty once |
//! | Insertion order | `recordList` keeps insertion order across rewrites |
//! | Fresh keys | New records never overwrite an existing key |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Record model, codec, key generation, errors
//! - `ports/` - Inbound API and outbound store/time/random ports
//! - `adapters/` - In-memory and file-backed stores, system sources
//! - `service/` - Query and lifecycle engines
//! - `ipc/` - Operation dispatch and response envelope
//!
//! ## Usage
//!
//! ```ignore
//! use record_ledger::{RecordLedgerHandler, RecordLedgerService};
//!
//! let handler = RecordLedgerHandler::new(RecordLedgerService::new_in_memory());
//! let response = handler.invoke("initLedger", &[]);
//! assert!(response.is_ok());
//! ```

pub mod adapters;
pub mod domain;
pub mod ipc;
pub mod ports;
pub mod service;

pub use adapters::{
    FileBackedLedgerStore, FixedTimeSource, InMemoryLedgerStore, OsRandomSource,
    SequenceRandomSource, SystemTimeSource,
};
pub use domain::entities::{DeliveryEntry, DeliveryView, KeyedRecord, RecordType, TestItem, UserRecord};
pub use domain::errors::{KVStoreError, RecordError};
pub use domain::value_objects::{LedgerConfig, RecordKey};
pub use ipc::{InvocationResponse, Operation, RecordLedgerHandler};
pub use ports::inbound::{DeliveryOutcome, RecordLedgerApi};
pub use ports::outbound::{LedgerStore, RandomSource, TimeSource, VersionedValue};
pub use service::{RecordLedgerDependencies, RecordLedgerService};

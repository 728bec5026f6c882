//! # Domain Layer
//!
//! Pure domain logic for the record ledger.
//!
//! ## Modules
//!
//! - `entities` - Records, test items and query projections
//! - `codec` - Canonical JSON encoding of records
//! - `keys` - Record key and test id generation
//! - `value_objects` - Configuration and record keys
//! - `errors` - Domain and store error types

pub mod codec;
pub mod entities;
pub mod errors;
pub mod keys;
pub mod value_objects;

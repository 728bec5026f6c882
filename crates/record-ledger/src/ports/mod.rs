//! # Ports Layer
//!
//! ## Hexagonal Architecture
//!
//! - `inbound.rs` - Driving ports (API exposed to the dispatch router)
//! - `outbound.rs` - Driven ports (ledger store, time, randomness)

pub mod inbound;
pub mod outbound;

//! # Domain Errors
//!
//! Error types for the record ledger.
//!
//! Every error is terminal for the current invocation. Writes already
//! committed within the invocation are left to the host transaction to roll
//! back.

use std::fmt;
use thiserror::Error;

/// Errors that end a ledger invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Wrong number of arguments for the named operation.
    #[error("Incorrect number of arguments for {operation}. Expecting {expected}, got {actual}")]
    ArgumentCount {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Point lookup found nothing under the key.
    #[error("Could not locate record {key}")]
    NotFound { key: String },

    /// The test item for this course already carries a rate.
    #[error("Selected item already delivered: record {key}, course {course}")]
    AlreadyDelivered { key: String, course: String },

    /// Prepare-for-delivery matched no test item anywhere in the ledger.
    #[error("No group/item found for group {group}, course {course}")]
    NoMatch { group: String, course: String },

    /// The underlying ledger store failed.
    #[error("Ledger store failure: {0}")]
    Store(#[from] KVStoreError),

    /// Dispatch received an operation name it does not know.
    #[error("Invalid Smart Contract function name: {0}")]
    UnknownOperation(String),

    /// An argument has the right arity but an unusable value.
    #[error("Invalid argument {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// A record that must be interpreted could not be decoded.
    #[error("Record {key} is corrupted: {reason}")]
    CorruptRecord { key: String, reason: String },

    /// A record could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Conditional write kept losing to concurrent writers.
    #[error("Write conflict on record {key} after {attempts} attempts")]
    WriteConflict { key: String, attempts: u32 },

    /// Every generated key was already taken.
    #[error("Could not allocate a free record key after {attempts} attempts")]
    KeyspaceExhausted { attempts: u32 },
}

/// Key-value store errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KVStoreError {
    /// I/O error during read/write.
    IOError { message: String },
    /// Data corruption in the store.
    CorruptionError { message: String },
}

impl fmt::Display for KVStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KVStoreError::IOError { message } => write!(f, "KV store I/O error: {}", message),
            KVStoreError::CorruptionError { message } => {
                write!(f, "KV store corruption: {}", message)
            }
        }
    }
}

impl std::error::Error for KVStoreError {}

/// Record encoding/decoding failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Record codec error: {message}")]
pub struct CodecError {
    pub message: String,
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        CodecError {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_count_names_expected() {
        let err = RecordError::ArgumentCount {
            operation: "addGroup",
            expected: 2,
            actual: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("Expecting 2"));
        assert!(msg.contains("addGroup"));
    }

    #[test]
    fn test_kv_error_conversion() {
        let kv_err = KVStoreError::IOError {
            message: "disk failure".to_string(),
        };
        let err: RecordError = kv_err.into();

        match err {
            RecordError::Store(inner) => {
                assert!(inner.to_string().contains("disk failure"));
            }
            _ => panic!("Expected Store error"),
        }
    }
}

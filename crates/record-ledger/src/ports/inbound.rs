//! # Inbound Ports (Driving Ports)
//!
//! The typed API exposed to the dispatch router and to embedding hosts.

use crate::domain::entities::{DeliveryEntry, KeyedRecord};
use crate::domain::errors::RecordError;
use crate::domain::value_objects::RecordKey;

/// Result of a successful `delivery_item` call.
///
/// Both variants carry the record bytes as they were BEFORE the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The first item for the course was graded and written back.
    Delivered { previous: Vec<u8> },
    /// The student has no item for the course; nothing was written.
    CourseNotAssigned { record: Vec<u8> },
}

impl DeliveryOutcome {
    /// Bytes returned to the caller.
    pub fn response_bytes(&self) -> &[u8] {
        match self {
            DeliveryOutcome::Delivered { previous } => previous,
            DeliveryOutcome::CourseNotAssigned { record } => record,
        }
    }

    pub fn into_response_bytes(self) -> Vec<u8> {
        match self {
            DeliveryOutcome::Delivered { previous } => previous,
            DeliveryOutcome::CourseNotAssigned { record } => record,
        }
    }

    pub fn was_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }
}

/// Primary API for record operations.
pub trait RecordLedgerApi {
    // === Seeding ===

    /// Seed the fixed set of groups and students; returns the new keys.
    fn init_ledger(&self) -> Result<Vec<RecordKey>, RecordError>;

    // === Groups ===

    fn query_all_groups(&self) -> Result<Vec<KeyedRecord>, RecordError>;

    fn add_group(&self, group_name: &str, description: &str) -> Result<RecordKey, RecordError>;

    // === Students ===

    fn query_all_users(&self) -> Result<Vec<KeyedRecord>, RecordError>;

    fn add_user(
        &self,
        user_id: &str,
        user_name: &str,
        group_name: &str,
        description: &str,
    ) -> Result<RecordKey, RecordError>;

    /// Raw stored bytes of one record.
    fn get_user_record(&self, key: &str) -> Result<Vec<u8>, RecordError>;

    // === Test Items ===

    /// Append one fresh item to every student of the group; returns how many
    /// students were updated.
    fn generate_set_for_group(
        &self,
        group_name: &str,
        course: &str,
        teacher: &str,
    ) -> Result<usize, RecordError>;

    /// Flattened items of a group/course. Fails with `NoMatch` when empty.
    fn prepare_for_delivery(
        &self,
        group_name: &str,
        course: &str,
    ) -> Result<Vec<DeliveryEntry>, RecordError>;

    /// Grade the first item for `course` on the student record at `key`.
    fn delivery_item(&self, key: &str, course: &str, rate: &str)
        -> Result<DeliveryOutcome, RecordError>;
}

//! # Record Ledger API Implementation

use super::*;
use crate::domain::entities::{DeliveryEntry, KeyedRecord, RecordType};
use crate::domain::value_objects::{register_timestamp, RecordKey};
use crate::ports::inbound::{DeliveryOutcome, RecordLedgerApi};

impl<S, T, R> RecordLedgerApi for RecordLedgerService<S, T, R>
where
    S: LedgerStore,
    T: TimeSource,
    R: RandomSource,
{
    fn init_ledger(&self) -> Result<Vec<RecordKey>, RecordError> {
        let registered = register_timestamp(self.time_source.now());
        let mut keys = Vec::new();
        for record in seed_records(&registered) {
            keys.push(self.insert_new_record(&record)?);
        }
        tracing::info!(records = keys.len(), "Seeded ledger");
        Ok(keys)
    }

    fn query_all_groups(&self) -> Result<Vec<KeyedRecord>, RecordError> {
        self.list_records(RecordType::Group)
    }

    fn add_group(&self, group_name: &str, description: &str) -> Result<RecordKey, RecordError> {
        self.create_group(group_name, description)
    }

    fn query_all_users(&self) -> Result<Vec<KeyedRecord>, RecordError> {
        self.list_records(RecordType::Student)
    }

    fn add_user(
        &self,
        user_id: &str,
        user_name: &str,
        group_name: &str,
        description: &str,
    ) -> Result<RecordKey, RecordError> {
        self.create_student(user_id, user_name, group_name, description)
    }

    fn get_user_record(&self, key: &str) -> Result<Vec<u8>, RecordError> {
        self.fetch_record_bytes(key)
    }

    fn generate_set_for_group(
        &self,
        group_name: &str,
        course: &str,
        teacher: &str,
    ) -> Result<usize, RecordError> {
        self.assign_for_group(group_name, course, teacher)
    }

    fn prepare_for_delivery(
        &self,
        group_name: &str,
        course: &str,
    ) -> Result<Vec<DeliveryEntry>, RecordError> {
        self.collect_for_delivery(group_name, course)
    }

    fn delivery_item(
        &self,
        key: &str,
        course: &str,
        rate: &str,
    ) -> Result<DeliveryOutcome, RecordError> {
        self.deliver(key, course, rate)
    }
}

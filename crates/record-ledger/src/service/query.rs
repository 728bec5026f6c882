//! # Query Engine
//!
//! Full-range scans filtered by record type, group and course. Results come
//! out in store key order; no secondary sort is applied.

use super::*;
use crate::domain::entities::{DeliveryEntry, DeliveryView, KeyedRecord, RecordType};

impl<S, T, R> RecordLedgerService<S, T, R>
where
    S: LedgerStore,
    T: TimeSource,
    R: RandomSource,
{
    /// Every record of `record_type`. An empty ledger yields an empty list.
    pub(super) fn list_records(&self, record_type: RecordType) -> Result<Vec<KeyedRecord>, RecordError> {
        let mut rows = Vec::new();
        self.for_each_record(|key, record| {
            if record.record_type == record_type {
                rows.push(KeyedRecord { key, record });
            }
            Ok(())
        })?;

        debug!(?record_type, count = rows.len(), "Listed records");
        Ok(rows)
    }

    pub(super) fn collect_for_delivery(
        &self,
        group_name: &str,
        course: &str,
    ) -> Result<Vec<DeliveryEntry>, RecordError> {
        let mut rows = Vec::new();
        self.for_each_record(|key, record| {
            if record.is_student_of(group_name) {
                for item in record.items_for_course(course) {
                    rows.push(DeliveryEntry {
                        key: key.clone(),
                        record: DeliveryView::project(&key, &record, item),
                    });
                }
            }
            Ok(())
        })?;

        // Unlike the list queries, an empty result is a failure here.
        if rows.is_empty() {
            return Err(RecordError::NoMatch {
                group: group_name.to_string(),
                course: course.to_string(),
            });
        }

        debug!(group = group_name, course, count = rows.len(), "Prepared items for delivery");
        Ok(rows)
    }

    pub(super) fn fetch_record_bytes(&self, key: &str) -> Result<Vec<u8>, RecordError> {
        self.store
            .get(key)?
            .ok_or_else(|| RecordError::NotFound {
                key: key.to_string(),
            })
    }
}

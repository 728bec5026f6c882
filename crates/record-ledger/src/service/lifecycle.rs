//! # Lifecycle Engine
//!
//! Record creation, test item assignment and delivery.
//!
//! A test item moves `Assigned` (empty rate) → `Delivered` (rate set) and
//! never back.

use super::*;
use crate::domain::entities::TestItem;
use crate::domain::keys::{record_key_from, test_id_from};
use crate::domain::value_objects::{item_timestamp, register_timestamp, RecordKey};
use crate::ports::inbound::DeliveryOutcome;
use tracing::info;

impl<S, T, R> RecordLedgerService<S, T, R>
where
    S: LedgerStore,
    T: TimeSource,
    R: RandomSource,
{
    /// Writes `record` under a freshly drawn key that is not yet in use.
    pub(super) fn insert_new_record(&self, record: &UserRecord) -> Result<RecordKey, RecordError> {
        let bytes = encode_record(record).map_err(|e| RecordError::Serialization(e.message))?;

        let attempts = self.config.max_key_attempts.max(1);
        for attempt in 1..=attempts {
            let key = record_key_from(self.random.next_u63());
            if self.store.compare_and_put(key.as_str(), None, &bytes)? {
                return Ok(key);
            }
            warn!(key = %key, attempt, "Generated record key already in use, drawing another");
        }

        Err(RecordError::KeyspaceExhausted { attempts })
    }

    pub(super) fn create_group(&self, group_name: &str, description: &str) -> Result<RecordKey, RecordError> {
        let record = UserRecord::group(group_name, description);
        let key = self.insert_new_record(&record)?;
        info!(key = %key, group = group_name, "Added group");
        Ok(key)
    }

    pub(super) fn create_student(
        &self,
        user_id: &str,
        user_name: &str,
        group_name: &str,
        description: &str,
    ) -> Result<RecordKey, RecordError> {
        let registered = register_timestamp(self.time_source.now());
        let record = UserRecord::student(user_id, user_name, group_name, description, registered);
        let key = self.insert_new_record(&record)?;
        info!(key = %key, user_id, group = group_name, "Added user");
        Ok(key)
    }

    /// Appends one fresh item to every student of `group_name`.
    ///
    /// Students are written independently; a failure part-way leaves the
    /// students already updated as they are.
    pub(super) fn assign_for_group(
        &self,
        group_name: &str,
        course: &str,
        teacher: &str,
    ) -> Result<usize, RecordError> {
        let mut student_keys = Vec::new();
        self.for_each_record(|key, record| {
            if record.is_student_of(group_name) {
                student_keys.push(key);
            }
            Ok(())
        })?;

        let assigned_ts = item_timestamp(self.time_source.now());
        let mut updated = 0usize;
        for key in &student_keys {
            let item = TestItem::assigned(
                test_id_from(self.random.next_u63()),
                group_name,
                course,
                teacher,
                assigned_ts.as_str(),
            );
            let test_id = item.test_id.clone();

            let (written, _) = self.read_modify_write(key, |record| {
                if !record.is_student_of(group_name) {
                    return Ok(Mutation::Skip(false));
                }
                record.record_list.push(item.clone());
                Ok(Mutation::Write(true))
            })?;

            if written {
                updated += 1;
                info!(key = %key, test_id = %test_id, course, teacher, "Assigned test item");
            }
        }

        info!(group = group_name, course, students = updated, "Generated test set for group");
        Ok(updated)
    }

    /// Grades the first item for `course` on the student at `key`.
    pub(super) fn deliver(&self, key: &str, course: &str, rate: &str) -> Result<DeliveryOutcome, RecordError> {
        if rate.is_empty() {
            return Err(RecordError::InvalidArgument {
                name: "rate",
                reason: "rate must not be empty".to_string(),
            });
        }

        let executed_ts = item_timestamp(self.time_source.now());
        let (delivered, previous) = self.read_modify_write(key, |record| {
            let Some(item) = record.first_item_for_course_mut(course) else {
                return Ok(Mutation::Skip(false));
            };
            if item.is_delivered() {
                return Err(RecordError::AlreadyDelivered {
                    key: key.to_string(),
                    course: course.to_string(),
                });
            }
            item.deliver(rate, executed_ts.as_str());
            Ok(Mutation::Write(true))
        })?;

        if delivered {
            info!(key = %key, course, rate, "Delivered test item");
            Ok(DeliveryOutcome::Delivered { previous })
        } else {
            debug!(key = %key, course, "No item for course, delivery is a no-op");
            Ok(DeliveryOutcome::CourseNotAssigned { record: previous })
        }
    }
}

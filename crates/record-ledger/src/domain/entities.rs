//! # Record Entities
//!
//! Group and student records, the test items nested inside student records,
//! and the projections emitted by the query engine.
//!
//! JSON field names are the persisted wire format and must not change.

use serde::{Deserialize, Deserializer, Serialize};

/// Kind of entity stored under a ledger key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    #[serde(rename = "G")]
    Group,
    #[serde(rename = "S")]
    Student,
    /// Reserved; nothing creates teacher records yet.
    #[serde(rename = "T")]
    Teacher,
}

/// A Group or Student record stored under one ledger key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "recordType")]
    pub record_type: RecordType,
    /// Own name for groups, membership for students.
    #[serde(rename = "groupName", default)]
    pub group_name: String,
    #[serde(rename = "userId", default)]
    pub user_id: String,
    #[serde(rename = "userName", default)]
    pub user_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "registerTS", default)]
    pub register_ts: String,
    /// Test items in insertion order. Only meaningful for students.
    #[serde(rename = "recordList", default, deserialize_with = "null_as_empty")]
    pub record_list: Vec<TestItem>,
}

impl UserRecord {
    pub fn group(group_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            record_type: RecordType::Group,
            group_name: group_name.into(),
            user_id: String::new(),
            user_name: String::new(),
            description: description.into(),
            register_ts: String::new(),
            record_list: Vec::new(),
        }
    }

    pub fn student(
        user_id: impl Into<String>,
        user_name: impl Into<String>,
        group_name: impl Into<String>,
        description: impl Into<String>,
        register_ts: impl Into<String>,
    ) -> Self {
        Self {
            record_type: RecordType::Student,
            group_name: group_name.into(),
            user_id: user_id.into(),
            user_name: user_name.into(),
            description: description.into(),
            register_ts: register_ts.into(),
            record_list: Vec::new(),
        }
    }

    pub fn is_group(&self) -> bool {
        self.record_type == RecordType::Group
    }

    pub fn is_student(&self) -> bool {
        self.record_type == RecordType::Student
    }

    /// True for a student record belonging to `group_name`.
    pub fn is_student_of(&self, group_name: &str) -> bool {
        self.is_student() && self.group_name == group_name
    }

    /// First test item assigned for `course`, if any.
    ///
    /// Later items for the same course are never reached through this lookup.
    pub fn first_item_for_course_mut(&mut self, course: &str) -> Option<&mut TestItem> {
        self.record_list.iter_mut().find(|item| item.course == course)
    }

    /// All test items assigned for `course`, in insertion order.
    pub fn items_for_course<'a>(&'a self, course: &'a str) -> impl Iterator<Item = &'a TestItem> + 'a {
        self.record_list.iter().filter(move |item| item.course == course)
    }
}

/// Delivery state of a single test item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestItemStatus {
    /// Rate is empty; the item can be delivered once.
    Assigned,
    /// Rate is set. Terminal.
    Delivered,
}

/// An assignment/delivery unit nested inside a student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestItem {
    #[serde(rename = "testId", default)]
    pub test_id: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub teacher: String,
    #[serde(rename = "assignedTS", default)]
    pub assigned_ts: String,
    #[serde(default)]
    pub rate: String,
    #[serde(rename = "executeTS", default)]
    pub execute_ts: String,
    #[serde(rename = "executeDesc", default)]
    pub execute_desc: String,
}

impl TestItem {
    /// A freshly assigned item: empty rate, no execution data.
    pub fn assigned(
        test_id: impl Into<String>,
        group: impl Into<String>,
        course: impl Into<String>,
        teacher: impl Into<String>,
        assigned_ts: impl Into<String>,
    ) -> Self {
        Self {
            test_id: test_id.into(),
            group: group.into(),
            course: course.into(),
            teacher: teacher.into(),
            assigned_ts: assigned_ts.into(),
            rate: String::new(),
            execute_ts: String::new(),
            execute_desc: String::new(),
        }
    }

    pub fn status(&self) -> TestItemStatus {
        if self.rate.is_empty() {
            TestItemStatus::Assigned
        } else {
            TestItemStatus::Delivered
        }
    }

    pub fn is_delivered(&self) -> bool {
        self.status() == TestItemStatus::Delivered
    }

    /// Records the grade. Callers check `is_delivered` first.
    pub fn deliver(&mut self, rate: impl Into<String>, execute_ts: impl Into<String>) {
        self.rate = rate.into();
        self.execute_ts = execute_ts.into();
    }
}

/// A decoded record paired with its ledger key, as emitted by list queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedRecord {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Record")]
    pub record: UserRecord,
}

/// Flattened view of one test item prepared for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryView {
    /// The student's ledger key, not the student's own `userId`.
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "testId")]
    pub test_id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub group: String,
    pub course: String,
    #[serde(rename = "assignedTS")]
    pub assigned_ts: String,
    pub teacher: String,
    #[serde(rename = "executeTS")]
    pub execute_ts: String,
    pub rate: String,
}

impl DeliveryView {
    pub fn project(key: &str, student: &UserRecord, item: &TestItem) -> Self {
        Self {
            user_id: key.to_string(),
            test_id: item.test_id.clone(),
            user_name: student.user_name.clone(),
            group: student.group_name.clone(),
            course: item.course.clone(),
            assigned_ts: item.assigned_ts.clone(),
            teacher: item.teacher.clone(),
            execute_ts: item.execute_ts.clone(),
            rate: item.rate.clone(),
        }
    }
}

/// One row of the prepare-for-delivery result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryEntry {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Record")]
    pub record: DeliveryView,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<TestItem>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<TestItem>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student_with_items() -> UserRecord {
        let mut student = UserRecord::student("AB1701", "Fighter 1701", "AB17", "Desc 1701", "ts");
        student
            .record_list
            .push(TestItem::assigned("A1", "AB17", "Math", "Dr.Lee", "t1"));
        student
            .record_list
            .push(TestItem::assigned("B2", "AB17", "Physics", "Dr.Kim", "t2"));
        student
            .record_list
            .push(TestItem::assigned("C3", "AB17", "Math", "Dr.Lee", "t3"));
        student
    }

    #[test]
    fn test_student_membership() {
        let student = student_with_items();
        assert!(student.is_student_of("AB17"));
        assert!(!student.is_student_of("AB18"));

        let group = UserRecord::group("AB17", "Desc AB17");
        assert!(!group.is_student_of("AB17"));
        assert!(group.is_group());
    }

    #[test]
    fn test_first_item_for_course_is_oldest() {
        let mut student = student_with_items();
        let item = student.first_item_for_course_mut("Math").unwrap();
        assert_eq!(item.test_id, "A1");

        assert!(student.first_item_for_course_mut("Chemistry").is_none());
        assert_eq!(student.items_for_course("Math").count(), 2);
    }

    #[test]
    fn test_item_status_transition() {
        let mut item = TestItem::assigned("A1", "AB17", "Math", "Dr.Lee", "t1");
        assert_eq!(item.status(), TestItemStatus::Assigned);

        item.deliver("A", "t9");
        assert_eq!(item.status(), TestItemStatus::Delivered);
        assert_eq!(item.execute_ts, "t9");
    }

    #[test]
    fn test_delivery_view_uses_store_key() {
        let student = student_with_items();
        let view = DeliveryView::project("0000000000000042", &student, &student.record_list[1]);

        assert_eq!(view.user_id, "0000000000000042");
        assert_eq!(view.user_name, "Fighter 1701");
        assert_eq!(view.course, "Physics");
        assert_eq!(view.teacher, "Dr.Kim");
        assert!(view.rate.is_empty());
    }
}

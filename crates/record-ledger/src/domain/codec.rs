//! # Record Codec
//!
//! Canonical JSON encoding of ledger records.
//!
//! Field order is the struct declaration order, so encoding is
//! deterministic. Decoding reports failure explicitly; scans decide whether
//! to skip.

use super::entities::UserRecord;
use super::errors::CodecError;
use serde::Serialize;

pub fn encode_record(record: &UserRecord) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(record)?)
}

pub fn decode_record(bytes: &[u8]) -> Result<UserRecord, CodecError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Encodes a query result array.
pub fn encode_results<T: Serialize>(rows: &[T]) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{RecordType, TestItem};

    #[test]
    fn test_group_round_trip() {
        let group = UserRecord::group("AB17", "Desc AB17");
        let decoded = decode_record(&encode_record(&group).unwrap()).unwrap();
        assert_eq!(decoded, group);
    }

    #[test]
    fn test_student_without_items_round_trip() {
        let student = UserRecord::student("AB1701", "Fighter 1701", "AB17", "Desc", "ts");
        assert!(student.record_list.is_empty());
        assert_eq!(decode_record(&encode_record(&student).unwrap()).unwrap(), student);
    }

    #[test]
    fn test_student_with_one_item_round_trip() {
        let mut student = UserRecord::student("AB1702", "Fighter 1702", "AB17", "", "ts");
        student
            .record_list
            .push(TestItem::assigned("7A", "AB17", "Math", "Dr.Lee", "t"));
        assert_eq!(decode_record(&encode_record(&student).unwrap()).unwrap(), student);
    }

    #[test]
    fn test_student_round_trip_keeps_item_order() {
        let mut student = UserRecord::student("AB1701", "Fighter 1701", "AB17", "Desc", "ts");
        for (id, course) in [("1F", "Math"), ("2E", "Art"), ("3D", "Math")] {
            student
                .record_list
                .push(TestItem::assigned(id, "AB17", course, "Dr.Lee", "t"));
        }
        student.record_list[1].deliver("B", "t2");

        let decoded = decode_record(&encode_record(&student).unwrap()).unwrap();
        assert_eq!(decoded, student);
        let ids: Vec<_> = decoded.record_list.iter().map(|i| i.test_id.as_str()).collect();
        assert_eq!(ids, vec!["1F", "2E", "3D"]);
    }

    #[test]
    fn test_wire_field_names() {
        let group = UserRecord::group("AB18", "Desc AB18");
        let text = String::from_utf8(encode_record(&group).unwrap()).unwrap();
        assert!(text.starts_with(r#"{"recordType":"G","groupName":"AB18""#));
        assert!(text.contains(r#""recordList":[]"#));
    }

    #[test]
    fn test_decode_tolerates_null_record_list() {
        let raw = br#"{"recordType":"S","groupName":"AB17","userId":"AB1701","userName":"F","description":"","registerTS":"","recordList":null}"#;
        let decoded = decode_record(raw).unwrap();
        assert_eq!(decoded.record_type, RecordType::Student);
        assert!(decoded.record_list.is_empty());
    }

    #[test]
    fn test_decode_rejects_malformed_bytes() {
        assert!(decode_record(b"not json").is_err());
        assert!(decode_record(br#"{"groupName":"AB17"}"#).is_err());
        assert!(decode_record(br#"{"recordType":"X"}"#).is_err());
    }
}

//! # Key Generation
//!
//! Record keys are 16-digit zero-padded decimals drawn from a 63-bit random
//! value. Test ids are unpadded uppercase hexadecimal and are only ever
//! displayed, never looked up.

use super::value_objects::RecordKey;

/// Width of a generated record key.
pub const RECORD_KEY_WIDTH: usize = 16;

/// Inclusive start of every range scan.
pub const SCAN_START: &str = "0";

/// Exclusive end of every range scan.
pub const SCAN_END: &str = "9999";

/// Generated keys stay below `"9999" + 12 digits` so every one of them sorts
/// inside `[SCAN_START, SCAN_END)`.
pub const RECORD_KEY_SPACE: u64 = 9_999 * 1_000_000_000_000;

/// Maps a random 63-bit value onto the record keyspace.
pub fn record_key_from(random: u64) -> RecordKey {
    RecordKey::new(format!(
        "{:0width$}",
        random % RECORD_KEY_SPACE,
        width = RECORD_KEY_WIDTH
    ))
}

/// Renders a random 63-bit value as a test id.
pub fn test_id_from(random: u64) -> String {
    format!("{:X}", random & (u64::MAX >> 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_key_is_zero_padded() {
        assert_eq!(record_key_from(42).as_str(), "0000000000000042");
        assert_eq!(record_key_from(0).as_str().len(), RECORD_KEY_WIDTH);
    }

    #[test]
    fn test_record_key_stays_inside_scan_range() {
        let key = record_key_from(u64::MAX >> 1);
        assert_eq!(key.as_str().len(), RECORD_KEY_WIDTH);
        assert!(key.as_str() >= SCAN_START);
        assert!(key.as_str() < SCAN_END);

        let top = record_key_from(RECORD_KEY_SPACE - 1);
        assert_eq!(top.as_str(), "9998999999999999");
        assert!(top.as_str() < SCAN_END);
        assert!(record_key_from(0).as_str() >= SCAN_START);
    }

    #[test]
    fn test_test_id_is_uppercase_hex() {
        assert_eq!(test_id_from(255), "FF");
        assert_eq!(test_id_from(0x1A2B), "1A2B");
        assert_eq!(test_id_from(u64::MAX), "7FFFFFFFFFFFFFFF");
    }
}

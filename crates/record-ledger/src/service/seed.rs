//! Fixed seed set written by `initLedger`.

use crate::domain::entities::UserRecord;

/// (group name, description)
pub const SEED_GROUPS: [(&str, &str); 4] = [
    ("AB17", "Desc AB17"),
    ("AB18", "Desc AB18"),
    ("AB19", "Desc AB19"),
    ("AB20", "Desc AB20"),
];

/// (user id, user name, group name, description)
pub const SEED_STUDENTS: [(&str, &str, &str, &str); 4] = [
    ("AB1701", "Fighter 1701", "AB17", "Desc 1701"),
    ("AB1702", "Fighter 1702", "AB17", "Desc 1702"),
    ("AB1703", "Fighter 1703", "AB17", "Desc 1703"),
    ("AB1704", "Fighter 1704", "AB17", "Desc 1704"),
];

/// Seed records in write order: groups first, then students.
pub fn seed_records(register_ts: &str) -> Vec<UserRecord> {
    let groups = SEED_GROUPS
        .iter()
        .map(|(name, description)| UserRecord::group(*name, *description));
    let students = SEED_STUDENTS
        .iter()
        .map(|(user_id, user_name, group, description)| {
            UserRecord::student(*user_id, *user_name, *group, *description, register_ts)
        });
    groups.chain(students).collect()
}

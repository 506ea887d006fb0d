//! Duplicate detection on the identifying field.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use import_model::{DuplicateSet, ProjectedRecord};

/// Flags rows whose identifying value repeats, compared case-insensitively.
///
/// Empty values never match. Each repeat adds both itself and the first row
/// that carried the value.
pub fn check(records: &[ProjectedRecord], identifying_field: &str) -> DuplicateSet {
    let mut duplicates = DuplicateSet::new();
    let mut first_seen: HashMap<String, usize> = HashMap::new();

    for (row_index, record) in records.iter().enumerate() {
        let value = record.value(identifying_field);
        if value.is_empty() {
            continue;
        }
        match first_seen.entry(value.to_lowercase()) {
            Entry::Occupied(first) => duplicates.insert_pair(*first.get(), row_index),
            Entry::Vacant(slot) => {
                slot.insert(row_index);
            }
        }
    }

    duplicates
}

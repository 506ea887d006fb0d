use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One failed rule on one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// 0-based position in the current row set.
    pub row_index: usize,
    pub target_field: String,
    pub message: String,
}

impl ValidationError {
    /// Error for a required field that is empty after mapping and defaults.
    pub fn required(row_index: usize, field: &str) -> Self {
        Self {
            row_index,
            target_field: field.to_string(),
            message: format!("{field} is required"),
        }
    }
}

/// Row indices suspected to describe the same entity.
///
/// Membership is symmetric: a row flagged as a repeat is always accompanied
/// by the row it repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DuplicateSet(BTreeSet<usize>);

impl DuplicateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `first` and `repeat` share an identifying value.
    pub fn insert_pair(&mut self, first: usize, repeat: usize) {
        self.0.insert(first);
        self.0.insert(repeat);
    }

    pub fn contains(&self, row_index: usize) -> bool {
        self.0.contains(&row_index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }
}

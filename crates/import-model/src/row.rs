use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One source record as handed over by the CSV parser.
///
/// A header missing from the row reads as an empty string; short rows are
/// treated as missing values, not errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    pub cells: BTreeMap<String, String>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value for `header`, or `""` when the row has no such cell.
    pub fn value(&self, header: &str) -> &str {
        self.cells.get(header).map_or("", String::as_str)
    }

    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(header.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A row after mapping, transformation and default filling.
///
/// Keys are target field names; only mapped or defaulted fields appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectedRecord {
    pub fields: BTreeMap<String, String>,
}

impl ProjectedRecord {
    /// Value for `field`, or `""` when the field was neither mapped nor defaulted.
    pub fn value(&self, field: &str) -> &str {
        self.fields.get(field).map_or("", String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_empty_value(&self, field: &str) -> bool {
        self.value(field).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_header_reads_empty() {
        let row: Row = [("Name", "Ada")].into_iter().collect();
        assert_eq!(row.value("Name"), "Ada");
        assert_eq!(row.value("Phone"), "");
    }
}

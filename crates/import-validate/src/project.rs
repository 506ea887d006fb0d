//! Row projection: map and transform, then fill defaults.

use std::collections::BTreeMap;

use import_model::{ColumnMapping, ProjectedRecord, Row, TransformKind};

/// Mapping inputs shared by projection and validation.
#[derive(Debug, Clone, Copy)]
pub struct Projection<'a> {
    pub mappings: &'a [ColumnMapping],
    pub transformations: &'a BTreeMap<String, TransformKind>,
    pub default_values: &'a BTreeMap<String, String>,
}

impl<'a> Projection<'a> {
    pub fn new(
        mappings: &'a [ColumnMapping],
        transformations: &'a BTreeMap<String, TransformKind>,
        default_values: &'a BTreeMap<String, String>,
    ) -> Self {
        Self {
            mappings,
            transformations,
            default_values,
        }
    }

    /// Projects one row.
    ///
    /// Phase one walks the mappings in header order; when several headers bind
    /// the same field the first non-empty transformed value is kept. Phase two
    /// fills every field that is still empty from the defaults, including
    /// fields no header is bound to.
    pub fn project(&self, row: &Row) -> ProjectedRecord {
        let mut record = ProjectedRecord::default();

        for mapping in self.mappings {
            let Some(field) = mapping.target_field.as_deref() else {
                continue;
            };
            let kind = self.transformations.get(field).copied().unwrap_or_default();
            let value = kind.apply(row.value(&mapping.source_header));
            match record.fields.get_mut(field) {
                Some(existing) if existing.is_empty() => *existing = value,
                Some(_) => {}
                None => {
                    record.fields.insert(field.to_string(), value);
                }
            }
        }

        for (field, default) in self.default_values {
            let slot = record.fields.entry(field.clone()).or_default();
            if slot.is_empty() {
                slot.clone_from(default);
            }
        }

        record
    }

    /// Projects every row, preserving order.
    pub fn project_all(&self, rows: &[Row]) -> Vec<ProjectedRecord> {
        rows.iter().map(|row| self.project(row)).collect()
    }
}

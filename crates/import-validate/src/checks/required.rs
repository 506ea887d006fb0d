//! Required field checks.
//!
//! Every required field must be non-empty after projection and default
//! filling. All offending row/field pairs are reported.

use import_model::{ProjectedRecord, ValidationError};

/// Check required fields, row by row in catalog order.
pub fn check(records: &[ProjectedRecord], required_fields: &[String]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (row_index, record) in records.iter().enumerate() {
        for field in required_fields {
            if record.is_empty_value(field) {
                errors.push(ValidationError::required(row_index, field));
            }
        }
    }
    errors
}

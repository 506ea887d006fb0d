//! Validation for the CSV import engine.
//!
//! A pass projects each row through the current mappings (map and
//! transform, then fill defaults) and runs three checks over the projected
//! records:
//!
//! - **Required fields**: every required field non-empty; blocks preview
//! - **Duplicates**: repeated identifying values, case-insensitive; advisory
//! - **Formats**: email and phone shape; advisory
//!
//! # Example
//!
//! ```ignore
//! use import_validate::{ValidationInput, validate};
//!
//! let report = validate(&rows, &input);
//! if report.passed() { /* move on */ }
//! ```

#![deny(unsafe_code)]

mod checks;
mod issue;
mod project;
mod report;

use std::time::Instant;

use tracing::{debug, info_span};

use import_model::{FieldCatalog, ProjectedRecord, Row};

pub use checks::format::is_valid as is_valid_format;
pub use issue::{Finding, FormatIssue, Severity};
pub use project::Projection;
pub use report::ValidationReport;

/// Everything a validation pass reads besides the rows.
#[derive(Debug, Clone, Copy)]
pub struct ValidationInput<'a> {
    pub catalog: &'a FieldCatalog,
    pub projection: Projection<'a>,
}

impl<'a> ValidationInput<'a> {
    pub fn new(catalog: &'a FieldCatalog, projection: Projection<'a>) -> Self {
        Self {
            catalog,
            projection,
        }
    }
}

/// Validate `rows` against the current mappings.
///
/// Pure with respect to its inputs. Duplicate detection is skipped when the
/// catalog names no identifying field.
pub fn validate(rows: &[Row], input: &ValidationInput<'_>) -> ValidationReport {
    let records = input.projection.project_all(rows);
    validate_records(&records, input.catalog)
}

/// Run the checks over already projected records.
pub fn validate_records(records: &[ProjectedRecord], catalog: &FieldCatalog) -> ValidationReport {
    let span = info_span!("validate", rows = records.len());
    let _guard = span.enter();
    let start = Instant::now();

    let errors = checks::required::check(records, &catalog.required_fields());
    let duplicates = catalog
        .identifying_field()
        .map(|field| checks::duplicate::check(records, field))
        .unwrap_or_default();
    let warnings = checks::format::check(records, catalog.formats());

    debug!(
        errors = errors.len(),
        duplicates = duplicates.len(),
        warnings = warnings.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "validation complete"
    );

    ValidationReport {
        row_count: records.len(),
        errors,
        duplicates,
        warnings,
    }
}

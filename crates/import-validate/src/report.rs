//! Validation report.

use std::collections::BTreeSet;

use serde::Serialize;

use import_model::{DuplicateSet, ValidationError};

use crate::issue::{Finding, FormatIssue};

/// Outcome of one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Rows in the validated set.
    pub row_count: usize,
    /// Required-field failures, row by row.
    pub errors: Vec<ValidationError>,
    /// Rows sharing an identifying value. Advisory.
    pub duplicates: DuplicateSet,
    /// Format mismatches. Advisory.
    pub warnings: Vec<FormatIssue>,
}

impl ValidationReport {
    /// Whether the row set may move on to preview.
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn errors_for_row(&self, row_index: usize) -> Vec<&ValidationError> {
        self.errors
            .iter()
            .filter(|e| e.row_index == row_index)
            .collect()
    }

    pub fn warnings_for_row(&self, row_index: usize) -> Vec<&FormatIssue> {
        self.warnings
            .iter()
            .filter(|w| w.row_index == row_index)
            .collect()
    }

    pub fn is_duplicate(&self, row_index: usize) -> bool {
        self.duplicates.contains(row_index)
    }

    /// Rows with at least one error.
    pub fn rows_with_errors(&self) -> BTreeSet<usize> {
        self.errors.iter().map(|e| e.row_index).collect()
    }

    /// Errors then warnings, ordered by row.
    pub fn findings(&self) -> Vec<Finding> {
        let mut findings: Vec<Finding> = self
            .errors
            .iter()
            .map(Finding::from)
            .chain(self.warnings.iter().map(Finding::from))
            .collect();
        findings.sort_by(|a, b| {
            a.row_index
                .cmp(&b.row_index)
                .then_with(|| a.severity.cmp(&b.severity))
        });
        findings
    }
}

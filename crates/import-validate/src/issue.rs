//! Validation finding types.

use serde::{Deserialize, Serialize};

use import_model::{FieldFormat, ValidationError};

/// Finding severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Blocks the move to preview.
    Error,
    /// Advisory only.
    Warning,
}

impl Severity {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
        }
    }
}

/// Populated value that does not look like its field's format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatIssue {
    pub row_index: usize,
    pub target_field: String,
    pub format: FieldFormat,
    pub value: String,
}

impl FormatIssue {
    pub fn message(&self) -> String {
        format!(
            "{} does not look like a valid {}: {:?}",
            self.target_field,
            self.format.label(),
            self.value
        )
    }
}

/// Flattened view of a report entry, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub row_index: usize,
    pub target_field: String,
    pub severity: Severity,
    pub message: String,
}

impl From<&ValidationError> for Finding {
    fn from(error: &ValidationError) -> Self {
        Self {
            row_index: error.row_index,
            target_field: error.target_field.clone(),
            severity: Severity::Error,
            message: error.message.clone(),
        }
    }
}

impl From<&FormatIssue> for Finding {
    fn from(issue: &FormatIssue) -> Self {
        Self {
            row_index: issue.row_index,
            target_field: issue.target_field.clone(),
            severity: Severity::Warning,
            message: issue.message(),
        }
    }
}

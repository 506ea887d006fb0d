//! Error types for mapping operations.

use thiserror::Error;

/// Errors from mapping operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MappingError {
    /// Header not present in the uploaded file.
    #[error("Header not found: {0}")]
    HeaderNotFound(String),

    /// Field not present in the catalog.
    #[error("Field not found: {field}{}", hint(.suggestion))]
    FieldNotFound {
        /// The requested field name.
        field: String,
        /// Closest catalog field, if any is similar enough.
        suggestion: Option<String>,
    },
}

fn hint(suggestion: &Option<String>) -> String {
    suggestion
        .as_deref()
        .map(|name| format!(" (did you mean '{name}'?)"))
        .unwrap_or_default()
}

impl MappingError {
    /// Get the field name associated with this error, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::FieldNotFound { field, .. } => Some(field),
            Self::HeaderNotFound(_) => None,
        }
    }

    /// Get the header associated with this error, if any.
    pub fn header(&self) -> Option<&str> {
        match self {
            Self::HeaderNotFound(header) => Some(header),
            Self::FieldNotFound { .. } => None,
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::FieldNotFound { suggestion, .. } => suggestion.as_deref(),
            Self::HeaderNotFound(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_not_found_message_includes_hint() {
        let err = MappingError::FieldNotFound {
            field: "Emial".to_string(),
            suggestion: Some("Email".to_string()),
        };
        assert_eq!(err.to_string(), "Field not found: Emial (did you mean 'Email'?)");
        assert_eq!(err.field(), Some("Emial"));

        let bare = MappingError::FieldNotFound {
            field: "X".to_string(),
            suggestion: None,
        };
        assert_eq!(bare.to_string(), "Field not found: X");
    }
}

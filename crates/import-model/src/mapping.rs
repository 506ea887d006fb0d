//! Column mapping and per-field transformation types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Binding of one source header to at most one target field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Header from the uploaded file.
    pub source_header: String,
    /// Target field, or `None` when the header is unmapped.
    pub target_field: Option<String>,
}

impl ColumnMapping {
    pub fn new(source_header: impl Into<String>, target_field: Option<String>) -> Self {
        Self {
            source_header: source_header.into(),
            target_field,
        }
    }

    pub fn unmapped(source_header: impl Into<String>) -> Self {
        Self::new(source_header, None)
    }

    pub fn is_mapped(&self) -> bool {
        self.target_field.is_some()
    }

    pub fn binds(&self, field: &str) -> bool {
        self.target_field.as_deref() == Some(field)
    }
}

/// Per-field value normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    /// Equivalent to having no transformation.
    #[default]
    None,
    Trim,
    Uppercase,
    Lowercase,
}

impl TransformKind {
    pub const ALL: [Self; 4] = [Self::None, Self::Trim, Self::Uppercase, Self::Lowercase];

    /// Applies the transformation. Case mapping is Unicode-aware and locale-insensitive.
    pub fn apply(&self, value: &str) -> String {
        match self {
            Self::None => value.to_string(),
            Self::Trim => value.trim().to_string(),
            Self::Uppercase => value.to_uppercase(),
            Self::Lowercase => value.to_lowercase(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Trim => "trim",
            Self::Uppercase => "uppercase",
            Self::Lowercase => "lowercase",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl FromStr for TransformKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "trim" => Ok(Self::Trim),
            "uppercase" | "upper" => Ok(Self::Uppercase),
            "lowercase" | "lower" => Ok(Self::Lowercase),
            other => Err(ModelError::UnknownTransform(other.to_string())),
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transforms_apply() {
        assert_eq!(TransformKind::Trim.apply("  a b "), "a b");
        assert_eq!(TransformKind::Uppercase.apply("straße"), "STRASSE");
        assert_eq!(TransformKind::Lowercase.apply("ÀB"), "àb");
        assert_eq!(TransformKind::None.apply(" x "), " x ");
    }

    #[test]
    fn transform_parse_aliases() {
        assert_eq!("UPPER".parse::<TransformKind>(), Ok(TransformKind::Uppercase));
        assert_eq!("lower".parse::<TransformKind>(), Ok(TransformKind::Lowercase));
        assert!("titlecase".parse::<TransformKind>().is_err());
    }
}

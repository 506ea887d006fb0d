//! Reusable mapping templates.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Opaque template identifier, assigned when the template is saved.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TemplateId(String);

impl TemplateId {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidTemplateId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TemplateId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<TemplateId> for String {
    fn from(id: TemplateId) -> Self {
        id.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named snapshot of bound mappings and default values.
///
/// Serialized as `{id, name, mappings, defaultValues}`. Unknown keys are
/// ignored and missing collections default to empty so externally stored
/// templates stay loadable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingTemplate {
    pub id: TemplateId,
    #[serde(default)]
    pub name: String,
    /// Source header -> target field. Unmapped headers are not stored.
    #[serde(default)]
    pub mappings: BTreeMap<String, String>,
    /// Target field -> default value.
    #[serde(default)]
    pub default_values: BTreeMap<String, String>,
}

impl MappingTemplate {
    pub fn field_for(&self, header: &str) -> Option<&str> {
        self.mappings.get(header).map(String::as_str)
    }

    pub fn mapping_count(&self) -> usize {
        self.mappings.len()
    }

    pub fn default_count(&self) -> usize {
        self.default_values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_id_rejects_blank() {
        assert!(TemplateId::new("   ").is_err());
        assert_eq!(TemplateId::new(" abc ").unwrap().as_str(), "abc");
    }
}

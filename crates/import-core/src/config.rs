//! Import configuration loaded from TOML.
//!
//! ```toml
//! page_size = 50
//! min_confidence = 0.35
//! identifying_field = "Email"
//!
//! [[fields]]
//! name = "Email"
//! synonyms = ["mail", "e-mail"]
//! format = "email"
//!
//! [[fields]]
//! name = "FullName"
//! required = true
//! ```
//!
//! Every key is optional; missing keys fall back to the built-in lead
//! catalog and defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use import_map::DEFAULT_MIN_CONFIDENCE;
use import_model::{FieldCatalog, FieldDef, ModelError};

use crate::pager::DEFAULT_PAGE_SIZE;

/// Errors from loading or checking configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid field catalog: {0}")]
    Catalog(#[from] ModelError),

    #[error("page_size must be at least 1")]
    InvalidPageSize,

    #[error("min_confidence must be between 0 and 1, got {0}")]
    InvalidConfidence(f32),
}

/// Session-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Rows per preview page.
    pub page_size: usize,
    /// Auto-map acceptance threshold (exclusive).
    pub min_confidence: f32,
    /// Duplicate-detection key.
    pub identifying_field: Option<String>,
    /// Directory holding saved templates.
    pub template_dir: Option<PathBuf>,
    /// Target fields in display order.
    pub fields: Vec<FieldDef>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        let catalog = FieldCatalog::lead_catalog();
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            identifying_field: catalog.identifying_field().map(str::to_string),
            template_dir: None,
            fields: catalog.fields().to_vec(),
        }
    }
}

impl ImportConfig {
    /// Load and check a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.check()?;
        debug!(path = %path.display(), fields = config.fields.len(), "config loaded");
        Ok(config)
    }

    /// Parse and check TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.check()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Build the field catalog.
    pub fn catalog(&self) -> Result<FieldCatalog, ConfigError> {
        let catalog = FieldCatalog::new(self.fields.clone())?;
        let Some(identifying) = self.identifying_field.as_deref() else {
            return Ok(catalog);
        };
        if !catalog.contains(identifying.trim()) {
            warn!(
                field = identifying,
                "identifying field is not in the catalog; duplicate detection finds nothing"
            );
        }
        Ok(catalog.with_identifying_field(identifying))
    }

    /// Check value ranges and the catalog.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::InvalidConfidence(self.min_confidence));
        }
        FieldCatalog::new(self.fields.clone())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips() {
        let config = ImportConfig::default();
        let text = config.to_toml_string().expect("serialize");
        let parsed = ImportConfig::from_toml_str(&text).expect("parse");
        assert_eq!(parsed, config);
    }
}

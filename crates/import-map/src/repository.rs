//! Template repository for persisting mapping templates between runs.
//!
//! # Storage Format
//!
//! Each template is a pretty-printed JSON file named `{id}.json` holding the
//! template fields plus `savedAt` and `version`. Files that fail to parse are
//! skipped when listing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use import_model::{MappingTemplate, TemplateId};

/// Repository for storing and retrieving mapping templates.
#[derive(Debug, Clone)]
pub struct TemplateRepository {
    /// Base directory for template files.
    base_dir: PathBuf,
}

/// Metadata about a stored template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateMetadata {
    pub id: TemplateId,
    pub name: String,
    /// File path where the template is stored.
    pub file_path: PathBuf,
    pub mapping_count: usize,
    pub default_count: usize,
    pub saved_at: Option<DateTime<Utc>>,
}

/// Template with repository metadata, as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTemplate {
    #[serde(flatten)]
    pub template: MappingTemplate,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
    /// Version of the file format.
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl StoredTemplate {
    pub fn new(template: MappingTemplate) -> Self {
        Self {
            template,
            saved_at: Some(Utc::now()),
            version: default_version(),
        }
    }
}

impl TemplateRepository {
    /// Create a repository at the given directory, creating it if needed.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).with_context(|| {
            format!(
                "Failed to create template repository: {}",
                base_dir.display()
            )
        })?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Save a template, replacing any file with the same id.
    pub fn save(&self, template: &MappingTemplate) -> Result<PathBuf> {
        let stored = StoredTemplate::new(template.clone());
        let path = self.template_path(&template.id);
        let json = serde_json::to_string_pretty(&stored)
            .with_context(|| format!("Failed to serialize template {}", template.id))?;

        // Write to a sibling temp file first so a crash never leaves a torn file.
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, json)
            .with_context(|| format!("Failed to write template to {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to move template into {}", path.display()))?;
        debug!(template_id = %template.id, path = %path.display(), "template written");
        Ok(path)
    }

    /// Load a template by id. Returns `None` if no file exists.
    pub fn load(&self, id: &TemplateId) -> Result<Option<MappingTemplate>> {
        let path = self.template_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let stored = read_stored(&path)?;
        Ok(Some(stored.template))
    }

    /// Load every readable template, ordered by name then id.
    pub fn load_all(&self) -> Result<Vec<MappingTemplate>> {
        let mut templates: Vec<MappingTemplate> = self
            .stored_entries()?
            .into_iter()
            .map(|(_, stored)| stored.template)
            .collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(templates)
    }

    /// List all available templates in the repository.
    pub fn list(&self) -> Result<Vec<TemplateMetadata>> {
        let mut metadata: Vec<TemplateMetadata> = self
            .stored_entries()?
            .into_iter()
            .map(|(path, stored)| TemplateMetadata {
                mapping_count: stored.template.mapping_count(),
                default_count: stored.template.default_count(),
                id: stored.template.id,
                name: stored.template.name,
                file_path: path,
                saved_at: stored.saved_at,
            })
            .collect();
        metadata.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(metadata)
    }

    /// Delete a template. Returns whether a file was removed.
    pub fn delete(&self, id: &TemplateId) -> Result<bool> {
        let path = self.template_path(id);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to delete template: {}", path.display()))?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn exists(&self, id: &TemplateId) -> bool {
        self.template_path(id).exists()
    }

    fn stored_entries(&self) -> Result<Vec<(PathBuf, StoredTemplate)>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.base_dir)
            .with_context(|| format!("Failed to read repository: {}", self.base_dir.display()))?
        {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match read_stored(&path) {
                Ok(stored) => entries.push((path, stored)),
                Err(error) => warn!(path = %path.display(), %error, "skipping unreadable template"),
            }
        }
        Ok(entries)
    }

    fn template_path(&self, id: &TemplateId) -> PathBuf {
        self.base_dir.join(format!("{}.json", normalize_id(id.as_str())))
    }
}

fn read_stored(path: &Path) -> Result<StoredTemplate> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read template from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse template from {}", path.display()))
}

/// Normalize an id for use in filenames.
fn normalize_id(id: &str) -> String {
    id.trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_filename_safe() {
        assert_eq!(normalize_id("../etc/passwd"), "___etc_passwd");
        assert_eq!(normalize_id("ab12-cd"), "ab12-cd");
    }
}

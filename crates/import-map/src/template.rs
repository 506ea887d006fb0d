//! In-memory template store.

use std::collections::BTreeMap;

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use import_model::{ColumnMapping, MappingTemplate, TemplateId};

/// Bytes of the digest kept for a template id.
const TEMPLATE_ID_BYTES: usize = 8;

/// Saved mapping templates plus the currently active one.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    templates: Vec<MappingTemplate>,
    active: Option<TemplateId>,
    issued: u64,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from previously persisted templates.
    ///
    /// Later entries with an id already present are skipped.
    pub fn from_templates(templates: impl IntoIterator<Item = MappingTemplate>) -> Self {
        let mut store = Self::new();
        for template in templates {
            store.insert(template);
        }
        store
    }

    /// Adds an existing template. Returns `false` if its id is taken.
    pub fn insert(&mut self, template: MappingTemplate) -> bool {
        if self.get(&template.id).is_some() {
            return false;
        }
        self.templates.push(template);
        true
    }

    /// Snapshots the mapped headers and defaults under `name`.
    ///
    /// Unmapped headers are not recorded. The new template becomes active.
    pub fn save(
        &mut self,
        name: &str,
        mappings: &[ColumnMapping],
        default_values: &BTreeMap<String, String>,
    ) -> TemplateId {
        let id = self.next_id(name);
        let template = MappingTemplate {
            id: id.clone(),
            name: name.to_string(),
            mappings: mappings
                .iter()
                .filter_map(|m| {
                    m.target_field
                        .as_ref()
                        .map(|field| (m.source_header.clone(), field.clone()))
                })
                .collect(),
            default_values: default_values.clone(),
        };
        info!(
            template_id = %id,
            name,
            mappings = template.mapping_count(),
            defaults = template.default_count(),
            "template saved"
        );
        self.templates.push(template);
        self.active = Some(id.clone());
        id
    }

    /// Re-applies template `id` to the current `headers`.
    ///
    /// Headers the template does not name come back unmapped. Returns `None`
    /// for an unknown id, leaving the active marker untouched.
    pub fn load<S: AsRef<str>>(
        &mut self,
        id: &TemplateId,
        headers: &[S],
    ) -> Option<(Vec<ColumnMapping>, BTreeMap<String, String>)> {
        let Some(template) = self.get(id) else {
            debug!(template_id = %id, "template not found");
            return None;
        };
        let mappings: Vec<ColumnMapping> = headers
            .iter()
            .map(|header| {
                let header = header.as_ref();
                ColumnMapping::new(header, template.field_for(header).map(str::to_string))
            })
            .collect();
        let defaults = template.default_values.clone();
        info!(
            template_id = %id,
            mapped = mappings.iter().filter(|m| m.is_mapped()).count(),
            "template loaded"
        );
        self.active = Some(id.clone());
        Some((mappings, defaults))
    }

    pub fn get(&self, id: &TemplateId) -> Option<&MappingTemplate> {
        self.templates.iter().find(|t| &t.id == id)
    }

    /// Templates in the order they were saved.
    pub fn templates(&self) -> &[MappingTemplate] {
        &self.templates
    }

    pub fn active(&self) -> Option<&TemplateId> {
        self.active.as_ref()
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }

    /// Removes template `id`, clearing the active marker if it pointed there.
    pub fn remove(&mut self, id: &TemplateId) -> Option<MappingTemplate> {
        let position = self.templates.iter().position(|t| &t.id == id)?;
        if self.active.as_ref() == Some(id) {
            self.active = None;
        }
        Some(self.templates.remove(position))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    fn next_id(&mut self, name: &str) -> TemplateId {
        let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        loop {
            self.issued += 1;
            let mut hasher = Sha256::new();
            hasher.update(self.issued.to_le_bytes());
            hasher.update(stamp.to_le_bytes());
            hasher.update(name.as_bytes());
            let digest = hasher.finalize();
            let candidate = hex::encode(&digest[..TEMPLATE_ID_BYTES]);
            if self.templates.iter().all(|t| t.id.as_str() != candidate)
                && let Ok(id) = TemplateId::new(candidate)
            {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_hex_and_distinct() {
        let mut store = TemplateStore::new();
        let a = store.save("same", &[], &BTreeMap::new());
        let b = store.save("same", &[], &BTreeMap::new());
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), TEMPLATE_ID_BYTES * 2);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }
}

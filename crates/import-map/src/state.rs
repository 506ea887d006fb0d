//! Mapping state: header bindings, per-field transformations and defaults.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use import_model::{ColumnMapping, FieldCatalog, TransformKind};

use crate::error::MappingError;
use crate::matcher::{FieldMatcher, MatchResult};
use crate::utils::suggest_field;

/// Everything the user has decided about how headers land on fields.
#[derive(Debug, Clone, Default)]
pub struct MappingState {
    catalog: FieldCatalog,
    /// One entry per header, in upload order.
    mappings: Vec<ColumnMapping>,
    /// Matcher output from the last auto-map, keyed by header.
    matches: BTreeMap<String, MatchResult>,
    transformations: BTreeMap<String, TransformKind>,
    default_values: BTreeMap<String, String>,
}

impl MappingState {
    pub fn new(catalog: FieldCatalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn mappings(&self) -> &[ColumnMapping] {
        &self.mappings
    }

    pub fn transformations(&self) -> &BTreeMap<String, TransformKind> {
        &self.transformations
    }

    pub fn default_values(&self) -> &BTreeMap<String, String> {
        &self.default_values
    }

    pub fn headers(&self) -> Vec<&str> {
        self.mappings
            .iter()
            .map(|m| m.source_header.as_str())
            .collect()
    }

    /// Matcher output for `header` from the most recent auto-map.
    ///
    /// Gone once the header is rebound by hand or by a template.
    pub fn match_for(&self, header: &str) -> Option<&MatchResult> {
        self.matches.get(header)
    }

    /// Rebuilds the mapping list from `headers` using the matcher.
    ///
    /// Each field is bound to at most one header: when a later header claims
    /// a field already taken, the earlier header becomes unmapped.
    pub fn auto_map<S: AsRef<str>>(&mut self, headers: &[S], matcher: &FieldMatcher) {
        let fields = self.catalog.field_names();
        let mut mappings: Vec<ColumnMapping> = Vec::with_capacity(headers.len());
        let mut claimed: BTreeMap<String, usize> = BTreeMap::new();
        let mut matches = BTreeMap::new();

        for (index, header) in headers.iter().enumerate() {
            let header = header.as_ref();
            let result = matcher.match_header(header, &fields);
            if let Some(field) = &result.field
                && let Some(previous) = claimed.insert(field.clone(), index)
            {
                debug!(
                    field = %field,
                    previous = %mappings[previous].source_header,
                    header,
                    "field reclaimed by later header"
                );
                mappings[previous].target_field = None;
                matches.remove(&mappings[previous].source_header);
            }
            mappings.push(ColumnMapping::new(header, result.field.clone()));
            matches.insert(header.to_string(), result);
        }

        debug!(
            headers = headers.len(),
            mapped = claimed.len(),
            "auto-map complete"
        );
        self.mappings = mappings;
        self.matches = matches;
    }

    /// Binds `header` to `field`, or unbinds it when `field` is `None`.
    ///
    /// Several headers may bind the same field.
    pub fn set_mapping(&mut self, header: &str, field: Option<&str>) -> Result<(), MappingError> {
        if let Some(field) = field {
            self.ensure_field(field)?;
        }
        let mut found = false;
        for mapping in self
            .mappings
            .iter_mut()
            .filter(|m| m.source_header == header)
        {
            mapping.target_field = field.map(str::to_string);
            found = true;
        }
        if found {
            self.forget_match(header, field);
            Ok(())
        } else {
            Err(MappingError::HeaderNotFound(header.to_string()))
        }
    }

    /// Unbinds `header`. Returns whether it was mapped.
    pub fn clear_mapping(&mut self, header: &str) -> bool {
        let mut cleared = false;
        for mapping in self
            .mappings
            .iter_mut()
            .filter(|m| m.source_header == header)
        {
            cleared |= mapping.target_field.take().is_some();
        }
        self.forget_match(header, None);
        cleared
    }

    /// Sets the transformation for `field`; `TransformKind::None` removes it.
    pub fn set_transformation(
        &mut self,
        field: &str,
        kind: TransformKind,
    ) -> Result<(), MappingError> {
        self.ensure_field(field)?;
        if kind.is_none() {
            self.transformations.remove(field);
        } else {
            self.transformations.insert(field.to_string(), kind);
        }
        Ok(())
    }

    pub fn transformation_for(&self, field: &str) -> TransformKind {
        self.transformations
            .get(field)
            .copied()
            .unwrap_or_default()
    }

    /// Sets the default for `field`, replacing any prior value.
    pub fn set_default_value(
        &mut self,
        field: &str,
        value: impl Into<String>,
    ) -> Result<(), MappingError> {
        self.ensure_field(field)?;
        self.default_values.insert(field.to_string(), value.into());
        Ok(())
    }

    /// Removes the default for `field`. Returns whether one existed.
    pub fn remove_default_value(&mut self, field: &str) -> bool {
        self.default_values.remove(field).is_some()
    }

    pub fn default_for(&self, field: &str) -> Option<&str> {
        self.default_values.get(field).map(String::as_str)
    }

    /// Replaces mappings and defaults wholesale, e.g. from a template.
    ///
    /// Bindings to fields outside the catalog are dropped and those headers
    /// left unmapped; defaults for such fields are skipped.
    pub fn replace(
        &mut self,
        mut mappings: Vec<ColumnMapping>,
        mut default_values: BTreeMap<String, String>,
    ) {
        for mapping in &mut mappings {
            if let Some(field) = mapping
                .target_field
                .take_if(|field| !self.catalog.contains(field))
            {
                warn!(
                    header = %mapping.source_header,
                    field = %field,
                    "binding to unknown field dropped"
                );
            }
        }
        default_values.retain(|field, _| {
            let known = self.catalog.contains(field);
            if !known {
                warn!(field = %field, "default for unknown field dropped");
            }
            known
        });
        self.mappings = mappings;
        self.default_values = default_values;
        self.matches.clear();
    }

    /// Drops every header, match, transformation and default.
    pub fn clear(&mut self) {
        self.mappings.clear();
        self.matches.clear();
        self.transformations.clear();
        self.default_values.clear();
    }

    pub fn field_for_header(&self, header: &str) -> Option<&str> {
        self.mappings
            .iter()
            .find(|m| m.source_header == header)
            .and_then(|m| m.target_field.as_deref())
    }

    pub fn is_field_mapped(&self, field: &str) -> bool {
        self.mappings.iter().any(|m| m.binds(field))
    }

    /// Headers bound to `field`, in upload order.
    pub fn headers_for_field(&self, field: &str) -> Vec<&str> {
        self.mappings
            .iter()
            .filter(|m| m.binds(field))
            .map(|m| m.source_header.as_str())
            .collect()
    }

    /// Fields that are neither mapped nor defaulted, in catalog order.
    pub fn default_candidates(&self) -> Vec<&str> {
        let mapped: BTreeSet<&str> = self
            .mappings
            .iter()
            .filter_map(|m| m.target_field.as_deref())
            .collect();
        self.catalog
            .fields()
            .iter()
            .map(|f| f.name.as_str())
            .filter(|name| !mapped.contains(name) && !self.default_values.contains_key(*name))
            .collect()
    }

    /// Get summary counts.
    pub fn summary(&self) -> MappingSummary {
        let required = self.catalog.required_fields();
        let unmapped_required: Vec<String> = required
            .iter()
            .filter(|field| !self.is_field_mapped(field))
            .cloned()
            .collect();
        MappingSummary {
            total_headers: self.mappings.len(),
            mapped_headers: self.mappings.iter().filter(|m| m.is_mapped()).count(),
            defaults: self.default_values.len(),
            required_total: required.len(),
            required_mapped: required.len() - unmapped_required.len(),
            unmapped_required,
        }
    }

    /// Drops the auto-map result for `header` unless it still names `field`.
    fn forget_match(&mut self, header: &str, field: Option<&str>) {
        if self
            .matches
            .get(header)
            .is_some_and(|result| result.field.as_deref() != field)
        {
            self.matches.remove(header);
        }
    }

    fn ensure_field(&self, field: &str) -> Result<(), MappingError> {
        if self.catalog.contains(field) {
            Ok(())
        } else {
            Err(MappingError::FieldNotFound {
                field: field.to_string(),
                suggestion: suggest_field(&self.catalog, field),
            })
        }
    }
}

/// Summary of mapping counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingSummary {
    /// Number of headers in the upload.
    pub total_headers: usize,
    /// Headers bound to a field.
    pub mapped_headers: usize,
    /// Fields with a default value.
    pub defaults: usize,
    /// Total required fields.
    pub required_total: usize,
    /// Required fields bound to at least one header.
    pub required_mapped: usize,
    /// Required fields no header is bound to, in catalog order.
    pub unmapped_required: Vec<String>,
}

impl MappingSummary {
    /// Whether every required field has a header.
    ///
    /// A default alone does not count; the field may still validate through
    /// its default.
    pub fn all_required_mapped(&self) -> bool {
        self.unmapped_required.is_empty()
    }
}

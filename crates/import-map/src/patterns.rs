use std::collections::BTreeMap;

use import_model::FieldCatalog;

use crate::utils::normalize_key;

/// Builds the synonym table: field name -> normalized synonyms.
///
/// Synonyms that normalize to nothing are dropped; order is preserved and
/// repeats are removed.
pub fn build_synonym_map(catalog: &FieldCatalog) -> BTreeMap<String, Vec<String>> {
    let mut patterns = BTreeMap::new();
    for field in catalog.fields() {
        let mut values: Vec<String> = Vec::new();
        for synonym in &field.synonyms {
            let normalized = normalize_key(synonym);
            if normalized.is_empty() || values.contains(&normalized) {
                continue;
            }
            values.push(normalized);
        }
        patterns.insert(field.name.clone(), values);
    }
    patterns
}

//! Utility functions for mapping operations.

use import_model::FieldCatalog;
use rapidfuzz::distance::jaro_winkler::similarity as jaro_similarity;

/// Minimum Jaro-Winkler similarity for a "did you mean" field suggestion.
const SUGGESTION_MIN_SIMILARITY: f64 = 0.75;

/// Normalizes text for comparison: lowercases and drops whitespace and the
/// separators `_ - . / \ ( )`.
pub fn normalize_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !is_separator(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_separator(c: char) -> bool {
    matches!(c, '_' | '-' | '.' | '/' | '\\' | '(' | ')')
}

/// Closest catalog field name to `name`, for error hints.
pub fn suggest_field(catalog: &FieldCatalog, name: &str) -> Option<String> {
    let wanted = normalize_key(name);
    if wanted.is_empty() {
        return None;
    }
    let mut best: Option<(f64, &str)> = None;
    for field in catalog.fields() {
        let score = jaro_similarity(wanted.chars(), normalize_key(&field.name).chars());
        if score < SUGGESTION_MIN_SIMILARITY {
            continue;
        }
        if best.is_none_or(|(top, _)| score > top) {
            best = Some((score, field.name.as_str()));
        }
    }
    best.map(|(_, name)| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_separators() {
        assert_eq!(normalize_key(" Phone_Number (Home) "), "phonenumberhome");
        assert_eq!(normalize_key("E-Mail/Address"), "emailaddress");
        assert_eq!(normalize_key("a.b\\c"), "abc");
        assert_eq!(normalize_key("__--"), "");
    }

    #[test]
    fn suggests_close_field_names() {
        let catalog = FieldCatalog::lead_catalog();
        assert_eq!(suggest_field(&catalog, "Emial"), Some("Email".to_string()));
        assert_eq!(suggest_field(&catalog, "zip_code"), Some("ZipCode".to_string()));
        assert_eq!(suggest_field(&catalog, "qqqq"), None);
    }
}

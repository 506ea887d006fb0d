//! Advisory email and phone format checks.

use std::sync::LazyLock;

use regex::Regex;

use import_model::{FieldFormat, ProjectedRecord};

use crate::issue::FormatIssue;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"));

/// E.164 digits with an optional leading `+`.
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("Invalid phone regex"));

/// Whether `value` passes the check for `format`.
///
/// Phone numbers are compared after dropping spaces, hyphens, dots and
/// parentheses.
pub fn is_valid(format: FieldFormat, value: &str) -> bool {
    match format {
        FieldFormat::Email => EMAIL_REGEX.is_match(value.trim()),
        FieldFormat::Phone => {
            let compact: String = value
                .chars()
                .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '.' | '(' | ')'))
                .collect();
            PHONE_REGEX.is_match(&compact)
        }
    }
}

/// Check populated values of format-bearing fields.
pub fn check<'a>(
    records: &[ProjectedRecord],
    formats: impl IntoIterator<Item = (&'a str, FieldFormat)>,
) -> Vec<FormatIssue> {
    let formats: Vec<(&str, FieldFormat)> = formats.into_iter().collect();
    let mut issues = Vec::new();
    for (row_index, record) in records.iter().enumerate() {
        for &(field, format) in &formats {
            let value = record.value(field);
            if value.trim().is_empty() || is_valid(format, value) {
                continue;
            }
            issues.push(FormatIssue {
                row_index,
                target_field: field.to_string(),
                format,
                value: value.to_string(),
            });
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid(FieldFormat::Email, "a@x.com"));
        assert!(is_valid(FieldFormat::Email, " first.last@mail.example.org "));
        assert!(!is_valid(FieldFormat::Email, "a@x"));
        assert!(!is_valid(FieldFormat::Email, "a b@x.com"));
        assert!(!is_valid(FieldFormat::Email, "@x.com"));
    }

    #[test]
    fn phone_shapes() {
        assert!(is_valid(FieldFormat::Phone, "+919876543210"));
        assert!(is_valid(FieldFormat::Phone, "(555) 123-4567"));
        assert!(!is_valid(FieldFormat::Phone, "0123456"));
        assert!(!is_valid(FieldFormat::Phone, "call me"));
        assert!(!is_valid(FieldFormat::Phone, "+1234567890123456"));
    }
}

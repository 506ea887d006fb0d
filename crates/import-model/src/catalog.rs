//! Target field catalog.
//!
//! The catalog is the fixed, ordered list of fields an upload can be mapped
//! onto. It is supplied once at session start and never mutated afterwards.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Value format a field is expected to follow.
///
/// Format checks are advisory; they never block an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldFormat {
    /// `local@domain.tld`
    Email,
    /// E.164 phone number, optional leading `+`.
    Phone,
}

impl FieldFormat {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

impl FromStr for FieldFormat {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            other => Err(ModelError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for FieldFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One importable target field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name as shown to users and used as the record key.
    pub name: String,
    /// Every row must end up with a non-empty value for this field.
    #[serde(default)]
    pub required: bool,
    /// Known header spellings for this field, used by auto-mapping.
    #[serde(default)]
    pub synonyms: Vec<String>,
    /// Optional advisory value format.
    #[serde(default)]
    pub format: Option<FieldFormat>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            synonyms: Vec::new(),
            format: None,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_synonyms(mut self, synonyms: &[&str]) -> Self {
        self.synonyms = synonyms.iter().map(|s| (*s).to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: FieldFormat) -> Self {
        self.format = Some(format);
        self
    }
}

/// Ordered list of importable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCatalog", into = "RawCatalog")]
pub struct FieldCatalog {
    fields: Vec<FieldDef>,
    identifying_field: Option<String>,
}

impl FieldCatalog {
    /// Builds a catalog, rejecting empty or duplicate field names.
    ///
    /// Names are compared exactly; `Email` and `email` are distinct fields.
    pub fn new(fields: Vec<FieldDef>) -> Result<Self> {
        if fields.is_empty() {
            return Err(ModelError::EmptyCatalog);
        }
        let mut seen = BTreeSet::new();
        let mut cleaned = Vec::with_capacity(fields.len());
        for mut field in fields {
            let name = field.name.trim().to_string();
            if name.is_empty() {
                return Err(ModelError::EmptyFieldName);
            }
            if !seen.insert(name.clone()) {
                return Err(ModelError::DuplicateField(name));
            }
            field.name = name;
            cleaned.push(field);
        }
        Ok(Self {
            fields: cleaned,
            identifying_field: None,
        })
    }

    /// Sets the field used as the duplicate-detection key.
    ///
    /// The field is not required to exist in the catalog; when it does not,
    /// duplicate detection finds nothing.
    #[must_use]
    pub fn with_identifying_field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        let trimmed = field.trim();
        self.identifying_field = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    /// The lead/contact catalog used when no configuration is supplied.
    pub fn lead_catalog() -> Self {
        let fields = vec![
            FieldDef::new("FullName").required().with_synonyms(&[
                "name",
                "fullname",
                "full name",
                "customer",
                "client",
                "person",
                "username",
            ]),
            FieldDef::new("Email")
                .with_synonyms(&["email", "e-mail", "mail", "emailaddress", "email address"])
                .with_format(FieldFormat::Email),
            FieldDef::new("Contact")
                .required()
                .with_synonyms(&[
                    "phone",
                    "mobile",
                    "cell",
                    "contact",
                    "phonenumber",
                    "phone number",
                    "telephone",
                    "tel",
                ])
                .with_format(FieldFormat::Phone),
            FieldDef::new("Gender").with_synonyms(&["gender", "sex"]),
            FieldDef::new("Qualification").with_synonyms(&[
                "qualification",
                "degree",
                "education",
                "diploma",
                "cert",
            ]),
            FieldDef::new("SchoolOrCollegeName").with_synonyms(&[
                "school",
                "college",
                "university",
                "institution",
                "academy",
                "campus",
            ]),
            FieldDef::new("LeadSource").with_synonyms(&[
                "source",
                "leadsource",
                "lead source",
                "origin",
                "channel",
                "found us",
            ]),
            FieldDef::new("InterestedCourse").with_synonyms(&[
                "course",
                "program",
                "class",
                "training",
                "interested",
                "interest",
            ]),
            FieldDef::new("Address").with_synonyms(&["address", "location", "residence"]),
            FieldDef::new("City").with_synonyms(&["city", "town", "municipality"]),
            FieldDef::new("Street").with_synonyms(&["street", "road", "avenue", "lane", "st"]),
            FieldDef::new("State").with_synonyms(&["state", "province", "region"]),
            FieldDef::new("ZipCode").with_synonyms(&[
                "zip",
                "zipcode",
                "postal",
                "postalcode",
                "post code",
                "pin",
            ]),
            FieldDef::new("Country").with_synonyms(&["country", "nation"]),
            FieldDef::new("Notes").with_synonyms(&[
                "note",
                "notes",
                "comment",
                "comments",
                "remark",
                "remarks",
                "additional",
            ]),
        ];
        Self {
            fields,
            identifying_field: Some("Email".to_string()),
        }
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in catalog order.
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    /// Required field names in catalog order.
    pub fn required_fields(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.clone())
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.get(name).is_some_and(|f| f.required)
    }

    pub fn identifying_field(&self) -> Option<&str> {
        self.identifying_field.as_deref()
    }

    /// Fields that declare an advisory format.
    pub fn formats(&self) -> impl Iterator<Item = (&str, FieldFormat)> {
        self.fields
            .iter()
            .filter_map(|f| f.format.map(|fmt| (f.name.as_str(), fmt)))
    }
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self::lead_catalog()
    }
}

#[derive(Serialize, Deserialize)]
struct RawCatalog {
    fields: Vec<FieldDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    identifying_field: Option<String>,
}

impl TryFrom<RawCatalog> for FieldCatalog {
    type Error = ModelError;

    fn try_from(raw: RawCatalog) -> Result<Self> {
        let catalog = Self::new(raw.fields)?;
        Ok(match raw.identifying_field {
            Some(field) => catalog.with_identifying_field(field),
            None => catalog,
        })
    }
}

impl From<FieldCatalog> for RawCatalog {
    fn from(catalog: FieldCatalog) -> Self {
        Self {
            fields: catalog.fields,
            identifying_field: catalog.identifying_field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_names() {
        let err = FieldCatalog::new(vec![FieldDef::new("City"), FieldDef::new(" City ")])
            .unwrap_err();
        assert_eq!(err, ModelError::DuplicateField("City".to_string()));
    }

    #[test]
    fn rejects_empty_catalog_and_blank_names() {
        assert_eq!(FieldCatalog::new(vec![]), Err(ModelError::EmptyCatalog));
        assert_eq!(
            FieldCatalog::new(vec![FieldDef::new("  ")]),
            Err(ModelError::EmptyFieldName)
        );
    }

    #[test]
    fn lead_catalog_required_subset() {
        let catalog = FieldCatalog::lead_catalog();
        assert_eq!(catalog.len(), 15);
        assert_eq!(catalog.required_fields(), vec!["FullName", "Contact"]);
        assert_eq!(catalog.identifying_field(), Some("Email"));
        for required in catalog.required_fields() {
            assert!(catalog.contains(&required));
        }
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("EMAIL".parse::<FieldFormat>(), Ok(FieldFormat::Email));
        assert!("fax".parse::<FieldFormat>().is_err());
    }
}

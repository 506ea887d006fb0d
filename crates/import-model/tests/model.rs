//! Tests for import-model types.

use std::collections::BTreeMap;

use import_model::{
    DuplicateSet, FieldCatalog, FieldDef, FieldFormat, MappingTemplate, TemplateId,
    ValidationError,
};

fn sample_template() -> MappingTemplate {
    let mut mappings = BTreeMap::new();
    mappings.insert("E-mail".to_string(), "Email".to_string());
    mappings.insert("Phone".to_string(), "Contact".to_string());
    let mut default_values = BTreeMap::new();
    default_values.insert("Country".to_string(), "India".to_string());
    MappingTemplate {
        id: TemplateId::new("t-1").unwrap(),
        name: "Leads".to_string(),
        mappings,
        default_values,
    }
}

#[test]
fn template_persisted_layout() {
    insta::assert_json_snapshot!(sample_template(), @r#"
    {
      "id": "t-1",
      "name": "Leads",
      "mappings": {
        "E-mail": "Email",
        "Phone": "Contact"
      },
      "defaultValues": {
        "Country": "India"
      }
    }
    "#);
}

#[test]
fn template_tolerates_unknown_and_missing_keys() {
    let json = r#"{"id": "legacy", "mappings": {"Name": "FullName"}, "version": 3}"#;
    let template: MappingTemplate = serde_json::from_str(json).expect("parse template");
    assert_eq!(template.id.as_str(), "legacy");
    assert_eq!(template.name, "");
    assert_eq!(template.field_for("Name"), Some("FullName"));
    assert!(template.default_values.is_empty());
}

#[test]
fn template_without_id_is_rejected() {
    let json = r#"{"id": "  ", "name": "broken"}"#;
    assert!(serde_json::from_str::<MappingTemplate>(json).is_err());
}

#[test]
fn catalog_round_trips_through_serde() {
    let catalog = FieldCatalog::new(vec![
        FieldDef::new("Name").required(),
        FieldDef::new("Mail").with_format(FieldFormat::Email),
    ])
    .unwrap()
    .with_identifying_field("Mail");

    let json = serde_json::to_string(&catalog).expect("serialize catalog");
    let round: FieldCatalog = serde_json::from_str(&json).expect("deserialize catalog");
    assert_eq!(round, catalog);
    assert_eq!(round.identifying_field(), Some("Mail"));
}

#[test]
fn catalog_deserialize_rejects_duplicates() {
    let json = r#"{"fields": [{"name": "A"}, {"name": "A"}]}"#;
    assert!(serde_json::from_str::<FieldCatalog>(json).is_err());
}

#[test]
fn required_error_message() {
    let error = ValidationError::required(4, "Contact");
    assert_eq!(error.row_index, 4);
    assert_eq!(error.target_field, "Contact");
    assert_eq!(error.message, "Contact is required");
}

#[test]
fn duplicate_set_is_symmetric() {
    let mut set = DuplicateSet::new();
    set.insert_pair(0, 3);
    set.insert_pair(0, 5);
    assert_eq!(set.to_vec(), vec![0, 3, 5]);
    assert!(set.contains(3));
    assert!(!set.contains(1));
}

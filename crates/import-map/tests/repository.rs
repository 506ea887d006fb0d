use std::collections::BTreeMap;
use std::fs;

use import_map::{TemplateRepository, TemplateStore};
use import_model::{ColumnMapping, MappingTemplate, TemplateId};

fn sample_template(name: &str) -> MappingTemplate {
    let mut store = TemplateStore::new();
    let id = store.save(
        name,
        &[ColumnMapping::new("E-mail", Some("Email".to_string()))],
        &BTreeMap::from([("Country".to_string(), "India".to_string())]),
    );
    store.get(&id).cloned().expect("saved")
}

#[test]
fn repository_save_and_load() {
    let dir = tempfile::tempdir().expect("temp dir");
    let repo = TemplateRepository::new(dir.path()).expect("create repo");

    let template = sample_template("Leads");
    let path = repo.save(&template).expect("save template");
    assert!(path.exists());
    assert!(repo.exists(&template.id));

    let loaded = repo
        .load(&template.id)
        .expect("load template")
        .expect("template should exist");
    assert_eq!(loaded, template);
}

#[test]
fn repository_load_missing_returns_none() {
    let dir = tempfile::tempdir().expect("temp dir");
    let repo = TemplateRepository::new(dir.path()).expect("create repo");
    let id = TemplateId::new("missing").expect("id");
    assert!(repo.load(&id).expect("load").is_none());
    assert!(!repo.delete(&id).expect("delete"));
}

#[test]
fn repository_list_sorts_and_skips_garbage() {
    let dir = tempfile::tempdir().expect("temp dir");
    let repo = TemplateRepository::new(dir.path()).expect("create repo");
    repo.save(&sample_template("Zeta")).expect("save");
    repo.save(&sample_template("Alpha")).expect("save");
    fs::write(dir.path().join("broken.json"), "{not json").expect("write garbage");
    fs::write(dir.path().join("notes.txt"), "ignored").expect("write text");

    let listed = repo.list().expect("list");
    let names: Vec<&str> = listed.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Zeta"]);
    assert_eq!(listed[0].mapping_count, 1);
    assert_eq!(listed[0].default_count, 1);
    assert!(listed[0].saved_at.is_some());

    assert_eq!(repo.load_all().expect("load all").len(), 2);
}

#[test]
fn repository_reads_templates_without_metadata() {
    let dir = tempfile::tempdir().expect("temp dir");
    let repo = TemplateRepository::new(dir.path()).expect("create repo");
    fs::write(
        dir.path().join("legacy.json"),
        r#"{"id": "legacy", "name": "Old", "mappings": {"Mobile": "Contact"}}"#,
    )
    .expect("write legacy");

    let id = TemplateId::new("legacy").expect("id");
    let loaded = repo.load(&id).expect("load").expect("exists");
    assert_eq!(loaded.field_for("Mobile"), Some("Contact"));
    assert!(loaded.default_values.is_empty());
}

#[test]
fn repository_delete() {
    let dir = tempfile::tempdir().expect("temp dir");
    let repo = TemplateRepository::new(dir.path()).expect("create repo");
    let template = sample_template("Leads");
    repo.save(&template).expect("save");
    assert!(repo.delete(&template.id).expect("delete"));
    assert!(!repo.exists(&template.id));
}

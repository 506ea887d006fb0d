//! Import session workflow.

use import_core::{
    CommitBatch, CommitError, CommitSink, CommitStatus, ImportSession, SessionError, SortSpec,
    Step,
};
use std::collections::BTreeMap;

use import_map::TemplateStore;
use import_model::{MappingTemplate, Row, TemplateId, TransformKind};

#[derive(Default)]
struct RecordingSink {
    batches: Vec<CommitBatch>,
    reject_next: bool,
}

impl CommitSink for RecordingSink {
    async fn commit(&mut self, batch: CommitBatch) -> Result<(), CommitError> {
        if std::mem::take(&mut self.reject_next) {
            return Err(CommitError::Rejected("backend unavailable".to_string()));
        }
        self.batches.push(batch);
        Ok(())
    }
}

fn headers() -> Vec<String> {
    ["Name", "E-mail", "Phone"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn row(name: &str, email: &str, phone: &str) -> Row {
    [("Name", name), ("E-mail", email), ("Phone", phone)]
        .into_iter()
        .collect()
}

fn valid_rows() -> Vec<Row> {
    vec![
        row("Ada", "ada@x.com", "+4412345"),
        row("Bob", "bob@x.com", "+4467890"),
    ]
}

fn session_in_mapping(rows: Vec<Row>) -> ImportSession {
    let mut session = ImportSession::default();
    session.load_upload(headers(), rows).expect("upload accepted");
    session
}

fn session_in_preview() -> ImportSession {
    let mut session = session_in_mapping(valid_rows());
    assert!(session.validate_data().passed());
    assert_eq!(session.step(), Step::Preview);
    session
}

#[test]
fn empty_upload_stays_in_upload() {
    let mut session = ImportSession::default();
    let err = session.load_upload(headers(), Vec::new()).unwrap_err();
    assert!(matches!(err, SessionError::EmptyUpload { headers: 3, rows: 0 }));
    assert_eq!(session.step(), Step::Upload);

    let err = session.load_upload(Vec::new(), valid_rows()).unwrap_err();
    assert!(matches!(err, SessionError::EmptyUpload { headers: 0, .. }));
    assert!(err.user_message().contains("no header row"));
    assert_eq!(session.step(), Step::Upload);
    assert!(session.rows().is_empty());
}

#[test]
fn upload_auto_maps_and_moves_to_mapping() {
    let session = session_in_mapping(valid_rows());
    assert_eq!(session.step(), Step::Mapping);
    assert_eq!(session.page_number(), 1);
    assert_eq!(session.mapping().field_for_header("Name"), Some("FullName"));
    assert_eq!(session.mapping().field_for_header("E-mail"), Some("Email"));
    assert_eq!(session.mapping().field_for_header("Phone"), Some("Contact"));
}

#[test]
fn upload_outside_upload_step_is_refused() {
    let mut session = session_in_mapping(valid_rows());
    let err = session.load_upload(headers(), valid_rows()).unwrap_err();
    assert!(matches!(
        err,
        SessionError::InvalidStep {
            step: Step::Mapping,
            ..
        }
    ));
}

#[test]
fn failed_validation_stays_in_mapping() {
    let mut session = session_in_mapping(vec![
        row("Ada", "ada@x.com", "+4412345"),
        row("Bob", "bob@x.com", ""),
    ]);
    let report = session.validate_data();
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].row_index, 1);
    assert_eq!(report.errors[0].target_field, "Contact");
    assert_eq!(session.step(), Step::Mapping);
    assert_eq!(session.errors().len(), 1);

    session
        .set_default_value("Contact", "+4400000")
        .expect("default");
    assert!(session.validate_data().passed());
    assert_eq!(session.step(), Step::Preview);
    assert!(session.errors().is_empty());
}

#[test]
fn duplicates_do_not_block_preview() {
    let mut session = session_in_mapping(vec![
        row("Ada", "a@x.com", "+4412345"),
        row("Ada", "A@X.COM", "+4412345"),
    ]);
    let report = session.validate_data();
    assert_eq!(report.duplicates.to_vec(), vec![0, 1]);
    assert_eq!(session.step(), Step::Preview);
}

#[test]
fn going_back_keeps_mapping_edits() {
    let mut session = session_in_preview();
    assert!(session.go_back());
    assert_eq!(session.step(), Step::Mapping);
    session
        .set_transformation("FullName", TransformKind::Uppercase)
        .expect("transform");
    session.set_mapping("E-mail", None).expect("unmap");

    assert!(session.go_back());
    assert_eq!(session.step(), Step::Upload);
    assert!(!session.go_back());
    assert_eq!(session.mapping().field_for_header("E-mail"), None);
    assert_eq!(
        session.mapping().transformation_for("FullName"),
        TransformKind::Uppercase
    );
}

#[test]
fn mapping_edits_report_unknown_names() {
    let mut session = session_in_mapping(valid_rows());
    assert!(session.set_mapping("Fax", Some("Contact")).is_err());
    let err = session.set_default_value("Contry", "India").unwrap_err();
    assert_eq!(err.suggestion(), Some("Country"));
}

#[tokio::test]
async fn commit_moves_to_confirmation() {
    let mut session = session_in_mapping(valid_rows());
    session
        .set_default_value("Country", "India")
        .expect("default");
    assert!(session.validate_data().passed());
    let mut sink = RecordingSink::default();

    let status = session.commit(&mut sink).await.expect("commit");
    assert_eq!(status, CommitStatus::Committed { records: 2 });
    assert_eq!(session.step(), Step::Confirmation);

    let batch = &sink.batches[0];
    assert_eq!(batch.fields, vec!["FullName", "Email", "Contact", "Country"]);
    assert_eq!(batch.records[1].value("Email"), "bob@x.com");
    assert_eq!(batch.records[1].value("Country"), "India");
    assert!(!batch.records[0].contains("Notes"));
}

#[tokio::test]
async fn rejected_commit_stays_in_preview_and_can_retry() {
    let mut session = session_in_preview();
    let mut sink = RecordingSink {
        reject_next: true,
        ..RecordingSink::default()
    };

    let err = session.commit(&mut sink).await.unwrap_err();
    assert!(matches!(err, SessionError::Commit(CommitError::Rejected(_))));
    assert_eq!(session.step(), Step::Preview);
    assert!(!session.is_commit_pending());
    assert!(session.last_commit_error().is_some());

    let status = session.commit(&mut sink).await.expect("retry");
    assert_eq!(status, CommitStatus::Committed { records: 2 });
    assert_eq!(session.step(), Step::Confirmation);
    assert!(session.last_commit_error().is_none());
}

#[tokio::test]
async fn commit_outside_preview_is_skipped() {
    let mut session = session_in_mapping(valid_rows());
    let mut sink = RecordingSink::default();
    let status = session.commit(&mut sink).await.expect("no-op");
    assert_eq!(status, CommitStatus::Skipped);
    assert!(sink.batches.is_empty());
    assert_eq!(session.step(), Step::Mapping);
}

#[test]
fn second_commit_while_pending_is_a_no_op() {
    let mut session = session_in_preview();
    let ticket = session.begin_commit().expect("first commit");
    assert!(session.is_commit_pending());
    assert!(session.begin_commit().is_none());
    assert_eq!(ticket.batch().len(), 2);

    session.finish_commit(ticket, Ok(())).expect("finish");
    assert_eq!(session.step(), Step::Confirmation);
    assert!(session.begin_commit().is_none());
}

#[test]
fn edit_in_preview_requires_validating_again() {
    let mut session = session_in_preview();
    session.set_mapping("Phone", None).expect("unmap");
    assert_eq!(session.step(), Step::Mapping);
    assert!(session.report().is_none());
    assert!(session.begin_commit().is_none());

    let report = session.validate_data();
    assert_eq!(report.error_count(), 2);
    assert!(report.errors.iter().all(|e| e.target_field == "Contact"));
    assert_eq!(session.step(), Step::Mapping);
    assert!(session.begin_commit().is_none());

    session.set_mapping("Phone", Some("Contact")).expect("remap");
    assert!(session.validate_data().passed());
    let ticket = session.begin_commit().expect("commit");
    assert!(ticket.batch().records.iter().all(|r| r.contains("Contact")));
}

#[test]
fn default_and_transform_edits_leave_preview() {
    let mut session = session_in_preview();
    session
        .set_default_value("Country", "India")
        .expect("default");
    assert_eq!(session.step(), Step::Mapping);

    assert!(session.validate_data().passed());
    session
        .set_transformation("FullName", TransformKind::Uppercase)
        .expect("transform");
    assert_eq!(session.step(), Step::Mapping);

    assert!(session.validate_data().passed());
    assert!(!session.clear_mapping("Missing"));
    assert!(!session.remove_default_value("City"));
    assert_eq!(session.step(), Step::Preview);
}

#[test]
fn going_back_is_refused_while_commit_pending() {
    let mut session = session_in_preview();
    let ticket = session.begin_commit().expect("commit");
    assert!(!session.go_back());
    assert_eq!(session.step(), Step::Preview);

    session.finish_commit(ticket, Ok(())).expect("finish");
    assert_eq!(session.step(), Step::Confirmation);
}

#[test]
fn commit_finished_after_leaving_preview_is_stale() {
    let mut session = session_in_preview();
    let ticket = session.begin_commit().expect("commit");
    session.set_mapping("Name", None).expect("unmap");
    assert_eq!(session.step(), Step::Mapping);

    let err = session.finish_commit(ticket, Ok(())).unwrap_err();
    assert!(matches!(err, SessionError::StaleTicket));
    assert_eq!(session.step(), Step::Mapping);
    assert!(!session.is_commit_pending());
}

#[test]
fn ticket_from_before_reset_is_stale() {
    let mut session = session_in_preview();
    let ticket = session.begin_commit().expect("commit");
    session.reset();
    let err = session.finish_commit(ticket, Ok(())).unwrap_err();
    assert!(matches!(err, SessionError::StaleTicket));
    assert_eq!(session.step(), Step::Upload);
}

#[tokio::test]
async fn reset_keeps_templates_only() {
    let mut session = session_in_preview();
    let id = session.save_template("Leads");
    let mut sink = RecordingSink::default();
    session.commit(&mut sink).await.expect("commit");

    session.reset();
    assert_eq!(session.step(), Step::Upload);
    assert!(session.headers().is_empty());
    assert!(session.rows().is_empty());
    assert!(session.mapping().mappings().is_empty());
    assert!(session.mapping().default_values().is_empty());
    assert!(session.report().is_none());
    assert_eq!(session.page_number(), 1);
    assert!(session.templates().active().is_none());
    assert!(session.templates().get(&id).is_some());
}

#[test]
fn template_load_replaces_mapping_wholesale() {
    let mut session = session_in_mapping(valid_rows());
    session
        .set_default_value("Country", "India")
        .expect("default");
    session.set_mapping("E-mail", None).expect("unmap");
    let id = session.save_template("No email");
    assert_eq!(session.templates().active(), Some(&id));

    session.remap();
    session.remove_default_value("Country");
    assert_eq!(session.mapping().field_for_header("E-mail"), Some("Email"));

    assert!(session.load_template(&id));
    assert_eq!(session.mapping().field_for_header("E-mail"), None);
    assert_eq!(session.mapping().field_for_header("Name"), Some("FullName"));
    assert_eq!(session.mapping().default_for("Country"), Some("India"));

    let unknown = import_model::TemplateId::new("missing").expect("id");
    assert!(!session.load_template(&unknown));
}

#[test]
fn template_fields_outside_catalog_are_skipped() {
    let id = TemplateId::new("legacy").expect("id");
    let template = MappingTemplate {
        id: id.clone(),
        name: "Legacy".to_string(),
        mappings: BTreeMap::from([
            ("Name".to_string(), "FullName".to_string()),
            ("E-mail".to_string(), "Email".to_string()),
            ("Phone".to_string(), "Fax".to_string()),
        ]),
        default_values: BTreeMap::from([
            ("Contact".to_string(), "+4400000".to_string()),
            ("Planet".to_string(), "Earth".to_string()),
        ]),
    };
    let mut session =
        ImportSession::default().with_templates(TemplateStore::from_templates([template]));
    assert!(!session.load_template(&id));

    session
        .load_upload(headers(), valid_rows())
        .expect("upload accepted");
    assert!(session.load_template(&id));
    assert_eq!(session.mapping().field_for_header("Phone"), None);
    assert_eq!(session.mapping().default_for("Contact"), Some("+4400000"));
    assert_eq!(session.mapping().default_for("Planet"), None);
    assert_eq!(session.output_fields(), vec!["FullName", "Email", "Contact"]);
    assert!(
        session
            .projected_records()
            .iter()
            .all(|r| !r.contains("Planet") && !r.contains("Fax"))
    );
}

#[test]
fn paging_clamps_and_resizes() {
    let rows: Vec<Row> = (0..65)
        .map(|i| row(&format!("Person {i:02}"), &format!("p{i}@x.com"), "+4412345"))
        .collect();
    let mut session = session_in_mapping(rows);
    assert_eq!(session.page_size(), 30);
    assert_eq!(session.total_pages(), 3);

    assert_eq!(session.set_page(10), 3);
    let page = session.current_page();
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.start, 60);

    session.set_page_size(50);
    assert_eq!(session.total_pages(), 2);
    assert_eq!(session.page_number(), 2);

    session.set_page_size(0);
    assert_eq!(session.page_size(), 1);
    assert_eq!(session.set_page(0), 1);
}

#[test]
fn preview_sorts_within_page_and_flags_rows() {
    let mut session = session_in_mapping(vec![
        row("Cy", "cy@x.com", "+4411111"),
        row("Ada", "ada@x.com", "+4422222"),
        row("Bob", "ADA@x.com", ""),
    ]);
    session.validate_data();

    let unsorted = session.preview(None);
    let names: Vec<&str> = unsorted.iter().map(|r| r.record.value("FullName")).collect();
    assert_eq!(names, vec!["Cy", "Ada", "Bob"]);

    let sorted = session.preview(Some(&SortSpec::ascending("FullName")));
    let order: Vec<usize> = sorted.iter().map(|r| r.index).collect();
    assert_eq!(order, vec![1, 2, 0]);

    let descending = session.preview(Some(&SortSpec::descending("FullName")));
    assert_eq!(descending[0].index, 0);

    let bob = sorted.iter().find(|r| r.index == 2).expect("bob");
    assert_eq!(bob.errors.len(), 1);
    assert!(bob.duplicate);
    assert!(!sorted[2].duplicate);

    // Unbound field keeps upload order.
    let by_notes = session.preview(Some(&SortSpec::ascending("Notes")));
    assert_eq!(by_notes.iter().map(|r| r.index).collect::<Vec<_>>(), vec![0, 1, 2]);
}

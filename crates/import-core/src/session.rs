//! Import session: the upload → mapping → preview → confirmation workflow.

use std::cmp::Ordering;
use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use import_map::{FieldMatcher, MappingError, MappingState, TemplateStore};
use import_model::{
    DuplicateSet, FieldCatalog, ProjectedRecord, Row, TemplateId, TransformKind, ValidationError,
};
use import_validate::{Projection, ValidationInput, ValidationReport, validate};

use crate::commit::{CommitBatch, CommitError, CommitSink, CommitStatus, CommitTicket};
use crate::config::{ConfigError, ImportConfig};
use crate::error::{Result, SessionError};
use crate::pager::{self, DEFAULT_PAGE_SIZE, Page};

/// Workflow step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    #[default]
    Upload,
    Mapping,
    Preview,
    Confirmation,
}

impl Step {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Mapping => "mapping",
            Self::Preview => "preview",
            Self::Confirmation => "confirmation",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Preview sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Preview ordering: by the raw value of the first header bound to `field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Descending,
        }
    }
}

/// One row as shown on the preview page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewRow {
    /// Position in the full row set.
    pub index: usize,
    pub record: ProjectedRecord,
    /// Errors from the last validation pass.
    pub errors: Vec<ValidationError>,
    pub duplicate: bool,
}

/// One import, owned by a single caller.
#[derive(Debug)]
pub struct ImportSession {
    step: Step,
    matcher: FieldMatcher,
    headers: Vec<String>,
    rows: Vec<Row>,
    mapping: MappingState,
    templates: TemplateStore,
    report: Option<ValidationReport>,
    page: usize,
    page_size: usize,
    pending_commit: Option<u64>,
    commits_started: u64,
    last_commit_error: Option<String>,
}

impl Default for ImportSession {
    fn default() -> Self {
        Self::new(FieldCatalog::lead_catalog())
    }
}

impl ImportSession {
    pub fn new(catalog: FieldCatalog) -> Self {
        Self {
            step: Step::Upload,
            matcher: FieldMatcher::new(&catalog),
            headers: Vec::new(),
            rows: Vec::new(),
            mapping: MappingState::new(catalog),
            templates: TemplateStore::new(),
            report: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            pending_commit: None,
            commits_started: 0,
            last_commit_error: None,
        }
    }

    /// Session for a checked configuration.
    pub fn from_config(config: &ImportConfig) -> std::result::Result<Self, ConfigError> {
        config.check()?;
        let catalog = config.catalog()?;
        let mut session = Self::new(catalog);
        session.matcher = session.matcher.with_min_confidence(config.min_confidence);
        session.page_size = config.page_size;
        Ok(session)
    }

    /// Replaces the template store, e.g. with templates read from disk.
    #[must_use]
    pub fn with_templates(mut self, templates: TemplateStore) -> Self {
        self.templates = templates;
        self
    }

    // === Accessors ===

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn catalog(&self) -> &FieldCatalog {
        self.mapping.catalog()
    }

    pub fn matcher(&self) -> &FieldMatcher {
        &self.matcher
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn mapping(&self) -> &MappingState {
        &self.mapping
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    /// Report from the most recent validation pass.
    pub fn report(&self) -> Option<&ValidationReport> {
        self.report.as_ref()
    }

    pub fn errors(&self) -> &[ValidationError] {
        self.report
            .as_ref()
            .map(|r| r.errors.as_slice())
            .unwrap_or_default()
    }

    pub fn duplicates(&self) -> Option<&DuplicateSet> {
        self.report.as_ref().map(|r| &r.duplicates)
    }

    pub fn is_commit_pending(&self) -> bool {
        self.pending_commit.is_some()
    }

    /// Message from the last rejected commit, cleared on success or reset.
    pub fn last_commit_error(&self) -> Option<&str> {
        self.last_commit_error.as_deref()
    }

    // === Upload ===

    /// Takes a parsed upload and moves to mapping.
    ///
    /// Headers are auto-mapped, the page resets to 1 and the active template
    /// marker is cleared. Fails without touching state when there is no
    /// header or no row.
    pub fn load_upload(&mut self, headers: Vec<String>, rows: Vec<Row>) -> Result<()> {
        if self.step != Step::Upload {
            return Err(SessionError::InvalidStep {
                operation: "load an upload",
                step: self.step,
            });
        }
        if headers.is_empty() || rows.is_empty() {
            warn!(
                headers = headers.len(),
                rows = rows.len(),
                "upload rejected: nothing to import"
            );
            return Err(SessionError::EmptyUpload {
                headers: headers.len(),
                rows: rows.len(),
            });
        }

        let span = info_span!("load_upload", headers = headers.len(), rows = rows.len());
        let _guard = span.enter();

        self.mapping.clear();
        self.mapping.auto_map(&headers, &self.matcher);
        self.templates.clear_active();
        self.headers = headers;
        self.rows = rows;
        self.report = None;
        self.page = 1;
        self.step = Step::Mapping;

        let summary = self.mapping.summary();
        info!(
            row_count = self.rows.len(),
            mapped = summary.mapped_headers,
            unmapped_required = summary.unmapped_required.len(),
            "upload accepted"
        );
        Ok(())
    }

    // === Mapping edits ===
    //
    // An edit made from preview sends the session back to mapping and drops
    // the report, so the data has to validate again before a commit.

    /// Re-runs auto-mapping over the current headers.
    pub fn remap(&mut self) {
        self.mapping.auto_map(&self.headers, &self.matcher);
        self.page = 1;
        self.mapping_edited();
    }

    pub fn set_mapping(
        &mut self,
        header: &str,
        field: Option<&str>,
    ) -> std::result::Result<(), MappingError> {
        self.mapping.set_mapping(header, field)?;
        debug!(header, field, "mapping set");
        self.mapping_edited();
        Ok(())
    }

    pub fn clear_mapping(&mut self, header: &str) -> bool {
        let cleared = self.mapping.clear_mapping(header);
        if cleared {
            self.mapping_edited();
        }
        cleared
    }

    pub fn set_transformation(
        &mut self,
        field: &str,
        kind: TransformKind,
    ) -> std::result::Result<(), MappingError> {
        self.mapping.set_transformation(field, kind)?;
        debug!(field, transform = %kind, "transformation set");
        self.mapping_edited();
        Ok(())
    }

    pub fn set_default_value(
        &mut self,
        field: &str,
        value: impl Into<String>,
    ) -> std::result::Result<(), MappingError> {
        self.mapping.set_default_value(field, value)?;
        debug!(field, "default value set");
        self.mapping_edited();
        Ok(())
    }

    pub fn remove_default_value(&mut self, field: &str) -> bool {
        let removed = self.mapping.remove_default_value(field);
        if removed {
            self.mapping_edited();
        }
        removed
    }

    fn mapping_edited(&mut self) {
        if self.step == Step::Preview {
            self.step = Step::Mapping;
            self.report = None;
            info!("mapping changed, back to mapping");
        }
    }

    // === Templates ===

    /// Saves the current mapping and defaults as a new active template.
    pub fn save_template(&mut self, name: &str) -> TemplateId {
        self.templates
            .save(name, self.mapping.mappings(), self.mapping.default_values())
    }

    /// Applies template `id` to the current headers.
    ///
    /// Bindings and defaults naming fields outside the catalog are skipped.
    /// Returns `false` and changes nothing when the id is unknown or there
    /// is no upload being mapped.
    pub fn load_template(&mut self, id: &TemplateId) -> bool {
        if !matches!(self.step, Step::Mapping | Step::Preview) {
            debug!(step = %self.step, template_id = %id, "template load ignored");
            return false;
        }
        let Some((mappings, defaults)) = self.templates.load(id, &self.headers) else {
            return false;
        };
        self.mapping.replace(mappings, defaults);
        self.page = 1;
        self.mapping_edited();
        true
    }

    // === Validation ===

    /// Validates every row and advances mapping → preview on zero errors.
    ///
    /// The report is always recomputed and stored; in any other step the
    /// step is left alone.
    pub fn validate_data(&mut self) -> &ValidationReport {
        let start = Instant::now();
        let input = ValidationInput::new(self.mapping.catalog(), self.projection());
        let report = validate(&self.rows, &input);

        info!(
            row_count = report.row_count,
            error_count = report.error_count(),
            duplicate_count = report.duplicates.len(),
            warning_count = report.warning_count(),
            duration_ms = start.elapsed().as_millis() as u64,
            "validation complete"
        );
        if self.step == Step::Mapping && report.passed() {
            self.step = Step::Preview;
            info!("moved to preview");
        }
        self.report.insert(report)
    }

    // === Navigation ===

    /// Steps back one stage (mapping → upload, preview → mapping).
    ///
    /// Mapping state is kept. Not allowed while a commit is pending. Returns
    /// whether the step changed.
    pub fn go_back(&mut self) -> bool {
        if self.pending_commit.is_some() {
            debug!("step back ignored: a commit is pending");
            return false;
        }
        let previous = match self.step {
            Step::Mapping => Step::Upload,
            Step::Preview => Step::Mapping,
            Step::Upload | Step::Confirmation => return false,
        };
        debug!(from = %self.step, to = %previous, "step back");
        self.step = previous;
        true
    }

    /// Returns to upload, keeping only the saved templates.
    pub fn reset(&mut self) {
        self.headers.clear();
        self.rows.clear();
        self.mapping.clear();
        self.templates.clear_active();
        self.report = None;
        self.page = 1;
        self.pending_commit = None;
        self.last_commit_error = None;
        self.step = Step::Upload;
        info!(templates = self.templates.len(), "session reset");
    }

    // === Paging ===

    pub fn page_number(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        pager::total_pages(self.rows.len(), self.page_size)
    }

    /// Moves to `page`, clamped to the valid range. Returns the page shown.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.page = pager::clamp_page(page, self.total_pages());
        self.page
    }

    /// Changes rows per page (zero counts as one), clamping the current page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = pager::clamp_page(self.page, self.total_pages());
    }

    pub fn current_page(&self) -> Page<'_, Row> {
        pager::page(&self.rows, self.page_size, self.page)
    }

    /// Projected rows of the current page, optionally sorted.
    ///
    /// Sorting applies within the page and is stable. A sort on a field no
    /// header is bound to keeps upload order.
    pub fn preview(&self, sort: Option<&SortSpec>) -> Vec<PreviewRow> {
        let page = self.current_page();
        let projection = self.projection();
        let mut indexed: Vec<(usize, &Row)> = page.indexed().collect();

        if let Some(spec) = sort
            && let Some(&header) = self.mapping.headers_for_field(&spec.field).first()
        {
            indexed.sort_by(|(_, a), (_, b)| {
                let ordering: Ordering = a.value(header).cmp(b.value(header));
                match spec.order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        indexed
            .into_iter()
            .map(|(index, row)| PreviewRow {
                index,
                record: projection.project(row),
                errors: self
                    .report
                    .as_ref()
                    .map(|r| r.errors_for_row(index).into_iter().cloned().collect())
                    .unwrap_or_default(),
                duplicate: self.report.as_ref().is_some_and(|r| r.is_duplicate(index)),
            })
            .collect()
    }

    /// Projected records for every row.
    pub fn projected_records(&self) -> Vec<ProjectedRecord> {
        self.projection().project_all(&self.rows)
    }

    /// Fields that carry data into the commit, in catalog order.
    pub fn output_fields(&self) -> Vec<String> {
        self.catalog()
            .fields()
            .iter()
            .map(|f| f.name.as_str())
            .filter(|name| {
                self.mapping.is_field_mapped(name) || self.mapping.default_for(name).is_some()
            })
            .map(str::to_string)
            .collect()
    }

    // === Commit ===

    /// Starts the commit hand-off.
    ///
    /// Returns `None` outside preview, while another commit is pending, or
    /// when the last validation pass did not pass.
    pub fn begin_commit(&mut self) -> Option<CommitTicket> {
        if self.step != Step::Preview {
            debug!(step = %self.step, "commit ignored outside preview");
            return None;
        }
        if !self.report.as_ref().is_some_and(ValidationReport::passed) {
            warn!("commit refused: data has not passed validation");
            return None;
        }
        if self.pending_commit.is_some() {
            debug!("commit ignored: another commit is pending");
            return None;
        }
        self.commits_started += 1;
        let id = self.commits_started;
        self.pending_commit = Some(id);
        let batch = CommitBatch {
            fields: self.output_fields(),
            records: self.projected_records(),
        };
        info!(commit = id, record_count = batch.len(), "commit started");
        Some(CommitTicket::new(id, batch))
    }

    /// Records the sink's answer for `ticket`.
    ///
    /// Success moves to confirmation; failure stays in preview so the commit
    /// can be retried. A ticket from an earlier commit, or one finished after
    /// the session left preview, is stale.
    pub fn finish_commit(
        &mut self,
        ticket: CommitTicket,
        outcome: std::result::Result<(), CommitError>,
    ) -> Result<()> {
        if self.pending_commit != Some(ticket.id) {
            return Err(SessionError::StaleTicket);
        }
        self.pending_commit = None;
        if self.step != Step::Preview {
            warn!(commit = ticket.id, step = %self.step, "commit finished outside preview");
            return Err(SessionError::StaleTicket);
        }
        match outcome {
            Ok(()) => {
                self.last_commit_error = None;
                self.step = Step::Confirmation;
                info!(commit = ticket.id, "commit accepted");
                Ok(())
            }
            Err(err) => {
                warn!(commit = ticket.id, error = %err, "commit rejected");
                self.last_commit_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Runs the whole hand-off against `sink`.
    pub async fn commit<S: CommitSink>(&mut self, sink: &mut S) -> Result<CommitStatus> {
        let Some(mut ticket) = self.begin_commit() else {
            return Ok(CommitStatus::Skipped);
        };
        let batch = ticket.take_batch();
        let records = batch.len();
        let outcome = sink.commit(batch).await;
        self.finish_commit(ticket, outcome)?;
        Ok(CommitStatus::Committed { records })
    }

    fn projection(&self) -> Projection<'_> {
        Projection::new(
            self.mapping.mappings(),
            self.mapping.transformations(),
            self.mapping.default_values(),
        )
    }
}

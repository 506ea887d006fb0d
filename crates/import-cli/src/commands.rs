use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use tracing::{debug, info, trace, warn};

use import_cli::logging::redact_value;
use import_cli::sink::CsvFileSink;
use import_core::{CommitStatus, ImportConfig, ImportSession, SortSpec, Step};
use import_ingest::read_csv_path;
use import_map::{TemplateRepository, TemplateStore, suggest_field};
use import_model::TemplateId;

use crate::cli::{MapArgs, RunArgs, TemplateCommand};
use crate::summary;

const APP_NAME: &str = "csv-import";

/// Outcome of `run`.
#[derive(Debug)]
pub struct RunResult {
    pub step: Step,
    pub error_count: usize,
    pub warning_count: usize,
    pub dry_run: bool,
    /// Output file and record count when the import was written.
    pub written: Option<(PathBuf, usize)>,
}

impl RunResult {
    /// Whether the run ended where it was asked to.
    pub fn succeeded(&self) -> bool {
        match self.step {
            Step::Confirmation => true,
            Step::Preview => self.dry_run,
            Step::Upload | Step::Mapping => false,
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<ImportConfig> {
    match path {
        Some(path) => {
            ImportConfig::load(path).with_context(|| format!("load config {}", path.display()))
        }
        None => Ok(ImportConfig::default()),
    }
}

/// Opens the template repository: flag, then config, then the platform data dir.
pub fn open_repository(dir: Option<&Path>, config: &ImportConfig) -> Result<TemplateRepository> {
    let dir = match dir.or(config.template_dir.as_deref()) {
        Some(dir) => dir.to_path_buf(),
        None => ProjectDirs::from("", "", APP_NAME)
            .map(|dirs| dirs.data_dir().join("templates"))
            .context("no home directory found; pass --template-dir")?,
    };
    debug!(dir = %dir.display(), "template repository");
    TemplateRepository::new(dir)
}

pub fn run_fields(config: &ImportConfig) -> Result<()> {
    let catalog = config.catalog()?;
    summary::print_catalog(&catalog);
    Ok(())
}

pub fn run_map(config: &ImportConfig, args: &MapArgs) -> Result<()> {
    let session = upload_session(config, &args.csv, TemplateStore::new())?;
    summary::print_mapping(&session);
    Ok(())
}

pub async fn run_import(
    config: &ImportConfig,
    repository: &TemplateRepository,
    args: &RunArgs,
) -> Result<RunResult> {
    let templates = TemplateStore::from_templates(repository.load_all()?);
    let mut session = upload_session(config, &args.csv, templates)?;
    if let Some(page_size) = args.page_size {
        session.set_page_size(page_size);
    }

    if let Some(id) = &args.template {
        let id = TemplateId::new(id.as_str())?;
        if !session.load_template(&id) {
            bail!("template not found: {id}");
        }
    }
    args.edits().apply(&mut session)?;
    summary::print_mapping(&session);

    if let Some(name) = &args.save_template {
        let id = session.save_template(name);
        if args.dry_run {
            info!(template_id = %id, "dry run: template not persisted");
        } else if let Some(template) = session.templates().get(&id) {
            let path = repository.save(template)?;
            println!("Saved template '{name}' as {id} ({})", path.display());
        }
    }

    let report = session.validate_data();
    let findings = report.findings();
    let (error_count, warning_count) = (report.error_count(), report.warning_count());

    session.set_page(args.page);
    let sort = args.sort.as_deref().map(|field| {
        if !session.catalog().contains(field) {
            warn!(
                field,
                suggestion = suggest_field(session.catalog(), field).as_deref(),
                "sort field is not in the catalog"
            );
        }
        if args.descending {
            SortSpec::descending(field)
        } else {
            SortSpec::ascending(field)
        }
    });
    let fields = session.output_fields();
    let preview = session.preview(sort.as_ref());
    for row in &preview {
        for field in &fields {
            trace!(
                row = row.index,
                field = %field,
                value = redact_value(row.record.value(field)),
                "preview cell"
            );
        }
    }
    summary::print_preview(&session, &fields, &preview);
    summary::print_findings(&findings);

    let mut result = RunResult {
        step: session.step(),
        error_count,
        warning_count,
        dry_run: args.dry_run,
        written: None,
    };
    if session.step() != Step::Preview {
        return Ok(result);
    }
    if args.dry_run {
        println!("Dry run: nothing written.");
        return Ok(result);
    }

    let output = args.output_path();
    let mut sink = CsvFileSink::new(&output).with_progress(io::stderr().is_terminal());
    match session.commit(&mut sink).await {
        Ok(CommitStatus::Committed { records }) => {
            result.written = Some((output, records));
        }
        Ok(CommitStatus::Skipped) => bail!("commit skipped in the {} step", session.step()),
        Err(error) => return Err(anyhow!(error.user_message())),
    }
    result.step = session.step();
    Ok(result)
}

pub fn run_templates(repository: &TemplateRepository, command: &TemplateCommand) -> Result<()> {
    match command {
        TemplateCommand::List => summary::print_templates(&repository.list()?),
        TemplateCommand::Show { id } => {
            let id = TemplateId::new(id.as_str())?;
            let template = repository
                .load(&id)?
                .with_context(|| format!("template not found: {id}"))?;
            summary::print_template(&template);
        }
        TemplateCommand::Delete { id } => {
            let id = TemplateId::new(id.as_str())?;
            if !repository.delete(&id)? {
                bail!("template not found: {id}");
            }
            println!("Deleted template {id}");
        }
    }
    Ok(())
}

fn upload_session(
    config: &ImportConfig,
    path: &Path,
    templates: TemplateStore,
) -> Result<ImportSession> {
    let upload = read_csv_path(path).with_context(|| format!("read {}", path.display()))?;
    let mut session = ImportSession::from_config(config)?.with_templates(templates);
    session
        .load_upload(upload.headers, upload.rows)
        .map_err(|error| anyhow!(error.user_message()))
        .with_context(|| format!("load {}", path.display()))?;
    Ok(session)
}

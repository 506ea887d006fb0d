//! Commit sink that writes the projected records to a CSV file.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::{Column, CsvWriter, DataFrame, IntoColumn, NamedFrom, SerWriter, Series};
use tracing::{debug, info};

use import_core::{CommitBatch, CommitError, CommitSink};

/// Writes each committed batch to `path`, replacing the file.
#[derive(Debug, Clone)]
pub struct CsvFileSink {
    path: PathBuf,
    show_progress: bool,
    written: usize,
}

impl CsvFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            show_progress: false,
            written: 0,
        }
    }

    /// Show a spinner on stderr while the write is pending.
    #[must_use]
    pub fn with_progress(mut self, enable: bool) -> Self {
        self.show_progress = enable;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records written by the last successful commit.
    pub fn written(&self) -> usize {
        self.written
    }

    fn spinner(&self, records: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Writing {records} records to {}", self.path.display()));
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}

impl CommitSink for CsvFileSink {
    async fn commit(&mut self, batch: CommitBatch) -> Result<(), CommitError> {
        if batch.fields.is_empty() {
            return Err(CommitError::Rejected(
                "no field is mapped or defaulted".to_string(),
            ));
        }
        let records = batch.len();
        let spinner = self.spinner(records);
        let path = self.path.clone();

        let joined = tokio::task::spawn_blocking(move || write_batch(&path, &batch)).await;
        spinner.finish_and_clear();
        let rows = joined.map_err(CommitError::failed)??;

        self.written = rows;
        info!(path = %self.path.display(), record_count = rows, "records written");
        Ok(())
    }
}

/// Builds one string column per field, in batch order.
pub fn batch_frame(batch: &CommitBatch) -> Result<DataFrame, CommitError> {
    let columns: Vec<Column> = batch
        .fields
        .iter()
        .map(|field| {
            let values: Vec<String> = batch
                .records
                .iter()
                .map(|record| record.value(field).to_string())
                .collect();
            Series::new(field.as_str().into(), values).into_column()
        })
        .collect();
    DataFrame::new(columns).map_err(CommitError::failed)
}

fn write_batch(path: &Path, batch: &CommitBatch) -> Result<usize, CommitError> {
    let mut frame = batch_frame(batch)?;
    let mut file = File::create(path).map_err(CommitError::failed)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)
        .map_err(CommitError::failed)?;
    debug!(path = %path.display(), columns = frame.width(), "csv flushed");
    Ok(frame.height())
}

//! Logging setup for the `csv-import` binary.
//!
//! - `error`: fatal command failures
//! - `warn`: rejected uploads, failed commits, unreadable templates
//! - `info`: stage completions with counts (upload, validation, commit)
//! - `debug`: mapping edits and per-step details
//! - `trace`: preview cells, redacted unless `--log-data` is given

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::{self, writer::BoxMakeWriter};
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

static LOG_DATA_ENABLED: AtomicBool = AtomicBool::new(false);

/// Placeholder used when row-level logging is disabled.
pub const REDACTED_VALUE: &str = "[REDACTED]";

/// Returns true if row-level logging is explicitly enabled.
pub fn log_data_enabled() -> bool {
    LOG_DATA_ENABLED.load(Ordering::Relaxed)
}

/// Returns the input value when data logging is enabled, otherwise a redacted token.
pub fn redact_value(value: &str) -> &str {
    if log_data_enabled() {
        value
    } else {
        REDACTED_VALUE
    }
}

/// Logging settings resolved from the command line.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Maximum level for the workspace crates.
    pub level_filter: LevelFilter,
    /// Let `RUST_LOG` replace the level filter when it is set.
    pub use_env_filter: bool,
    /// Colors on stderr. Never used for a log file.
    pub with_ansi: bool,
    pub format: LogFormat,
    /// Append to this file instead of writing to stderr.
    pub log_file: Option<PathBuf>,
    /// Whether row values may be logged.
    pub log_data: bool,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line format.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
    /// One JSON object per event, with timestamps.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            with_ansi: true,
            format: LogFormat::default(),
            log_file: None,
            log_data: false,
        }
    }
}

type FmtLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

/// Installs the global subscriber. Call once at startup.
///
/// # Errors
///
/// Fails when the log file cannot be opened or a subscriber is already set.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let (writer, ansi) = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(io::stderr), config.with_ansi),
    };
    LOG_DATA_ENABLED.store(config.log_data, Ordering::Release);

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(fmt_layer(config, writer, ansi))
        .try_init()
        .context("install tracing subscriber")
}

/// Module paths only show from debug up; at lower levels they are noise.
fn fmt_layer(config: &LogConfig, writer: BoxMakeWriter, ansi: bool) -> FmtLayer {
    let with_target = config.level_filter >= LevelFilter::DEBUG;
    match config.format {
        LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .without_time()
            .with_target(with_target)
            .with_ansi(ansi)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .without_time()
            .with_target(with_target)
            .with_ansi(ansi)
            .with_writer(writer)
            .boxed(),
    }
}

/// Directive applying `level` to every workspace crate.
pub fn default_directive(level_filter: LevelFilter) -> String {
    let level = level_filter.to_string().to_lowercase();
    format!(
        "warn,import_cli={level},import_core={level},import_ingest={level},\
         import_map={level},import_model={level},import_validate={level}"
    )
}

fn env_filter(config: &LogConfig) -> EnvFilter {
    if config.use_env_filter
        && let Ok(filter) = EnvFilter::try_from_default_env()
    {
        return filter;
    }
    EnvFilter::new(default_directive(config.level_filter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_covers_workspace_crates() {
        let directive = default_directive(LevelFilter::DEBUG);
        assert!(directive.starts_with("warn,"));
        for krate in ["import_cli", "import_core", "import_map", "import_validate"] {
            assert!(directive.contains(&format!("{krate}=debug")), "{directive}");
        }
    }

    #[test]
    fn unopenable_log_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = LogConfig {
            log_file: Some(dir.path().join("missing").join("import.log")),
            log_data: true,
            ..LogConfig::default()
        };
        let err = init_logging(&config).unwrap_err();
        assert!(err.to_string().starts_with("open log file"), "{err:#}");
        assert!(!log_data_enabled());
    }
}

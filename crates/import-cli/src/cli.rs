//! CLI argument definitions for the CSV import tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use import_cli::edits::{Assignment, MappingEdits};

#[derive(Parser)]
#[command(
    name = "csv-import",
    version,
    about = "Map CSV columns onto a field catalog, validate and import",
    long_about = "Map the columns of a CSV upload onto a fixed field catalog.\n\n\
                  Headers are matched by name and synonyms, rows are validated for\n\
                  required fields and duplicates, and accepted records are written out."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// TOML file with the field catalog and session settings.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding saved templates (default: platform data dir).
    #[arg(long = "template-dir", value_name = "DIR", global = true)]
    pub template_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the catalog fields.
    Fields,

    /// Auto-map the headers of a CSV file and show the result.
    Map(MapArgs),

    /// Map, validate, preview and import a CSV file.
    Run(RunArgs),

    /// Manage saved mapping templates.
    #[command(subcommand)]
    Templates(TemplateCommand),
}

#[derive(Args)]
pub struct MapArgs {
    /// CSV file to read.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,
}

#[derive(Args)]
pub struct RunArgs {
    /// CSV file to read.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Apply a saved template instead of the auto-mapping.
    #[arg(long = "template", value_name = "ID")]
    pub template: Option<String>,

    /// Unbind a header (repeatable).
    #[arg(long = "unmap", value_name = "HEADER")]
    pub unmap: Vec<String>,

    /// Bind a header to a field (repeatable).
    #[arg(long = "map", value_name = "HEADER=FIELD")]
    pub map: Vec<Assignment>,

    /// Default value for a field left empty (repeatable).
    #[arg(long = "default", value_name = "FIELD=VALUE")]
    pub defaults: Vec<Assignment>,

    /// Transformation for a field: none, trim, uppercase, lowercase (repeatable).
    #[arg(long = "transform", value_name = "FIELD=KIND")]
    pub transforms: Vec<Assignment>,

    /// Save the final mapping as a template with this name.
    #[arg(long = "save-template", value_name = "NAME")]
    pub save_template: Option<String>,

    /// Preview page to show (clamped to the valid range).
    #[arg(long = "page", value_name = "N", default_value_t = 1)]
    pub page: usize,

    /// Rows per preview page (default from config).
    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<usize>,

    /// Sort the preview page by a field.
    #[arg(long = "sort", value_name = "FIELD")]
    pub sort: Option<String>,

    /// Sort descending.
    #[arg(long = "desc", requires = "sort")]
    pub descending: bool,

    /// Output CSV for the imported records (default: <CSV>.imported.csv).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Validate and preview without writing anything.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

impl RunArgs {
    pub fn edits(&self) -> MappingEdits {
        MappingEdits {
            unmap: self.unmap.clone(),
            map: self.map.clone(),
            defaults: self.defaults.clone(),
            transforms: self.transforms.clone(),
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.csv.with_extension("imported.csv"))
    }
}

#[derive(Subcommand)]
pub enum TemplateCommand {
    /// List saved templates.
    List,
    /// Show the mappings and defaults of a template.
    Show {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Delete a template.
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

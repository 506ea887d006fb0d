//! CSV import CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tracing::Instrument;
use tracing::level_filters::LevelFilter;

use import_cli::logging::{LogConfig, LogFormat, init_logging};

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    load_config, open_repository, run_fields, run_import, run_map, run_templates,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error:#}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

async fn run(cli: &Cli) -> anyhow::Result<i32> {
    let config = load_config(cli.config.as_deref())?;
    match &cli.command {
        Command::Fields => run_fields(&config)?,
        Command::Map(args) => run_map(&config, args)?,
        Command::Run(args) => {
            let repository = open_repository(cli.template_dir.as_deref(), &config)?;
            let span = tracing::info_span!("run", file = %args.csv.display());
            let result = run_import(&config, &repository, args)
                .instrument(span)
                .await?;
            if let Some((path, records)) = &result.written {
                println!("Imported {records} records to {}", path.display());
            }
            if result.error_count > 0 {
                eprintln!(
                    "{} error(s) must be fixed before importing.",
                    result.error_count
                );
            }
            if result.warning_count > 0 {
                println!("{} format warning(s)", result.warning_count);
            }
            return Ok(if result.succeeded() { 0 } else { 1 });
        }
        Command::Templates(command) => {
            let repository = open_repository(cli.template_dir.as_deref(), &config)?;
            run_templates(&repository, command)?;
        }
    }
    Ok(0)
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}

// ==========================================
// Community Dashboard Loader - CLI entry point
// ==========================================
// Usage:
//   community-dashboard-loader [run|validate|init-db] [--config FILE]
//       [--source-folder DIR] [--database FILE] [--as-of YYYY-MM-DD]
// ==========================================

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use community_dashboard_loader::config::{FixedClock, PipelineConfig, SystemClock};
use community_dashboard_loader::db::{init_staging_schema, open_sqlite_connection};
use community_dashboard_loader::logging::{self, LogFormat};
use community_dashboard_loader::PipelineOrchestrator;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "community-dashboard-loader", version, about = "Validate the monthly community extract and load it into staging")]
struct Cli {
    /// JSON config file (defaults to the user config directory, then built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Folder holding `<Month Year>-Community.xlsx`
    #[arg(long, global = true)]
    source_folder: Option<PathBuf>,

    /// SQLite database holding the staging tables
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Treat this date as today when resolving the reporting period
    #[arg(long, global = true, value_parser = parse_date)]
    as_of: Option<NaiveDate>,

    #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Text)]
    log_format: LogFormatArg,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Validate the source and load it into staging (default)
    Run,
    /// Validate the source without touching the database
    Validate,
    /// Create the staging tables and procedure registry if absent
    InitDb,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum LogFormatArg {
    Text,
    Json,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(match cli.log_format {
        LogFormatArg::Text => LogFormat::Text,
        LogFormatArg::Json => LogFormat::Json,
    });
    tracing::info!(version = community_dashboard_loader::VERSION, "community-dashboard-loader");

    let mut config = PipelineConfig::load(cli.config.as_deref())?;
    if let Some(folder) = cli.source_folder {
        config.source_folder = folder;
    }
    if let Some(database) = cli.database {
        config.database_path = database;
    }

    match cli.command.unwrap_or(Command::Run) {
        Command::InitDb => {
            let conn = open_sqlite_connection(&config.database_path).with_context(|| {
                format!("cannot open database {}", config.database_path.display())
            })?;
            init_staging_schema(&conn, &config.staging).context("staging schema setup failed")?;
            tracing::info!(database = %config.database_path.display(), "staging schema ready");
            Ok(())
        }
        command => {
            let orchestrator = match cli.as_of {
                Some(today) => PipelineOrchestrator::new(config, FixedClock(today)),
                None => PipelineOrchestrator::new(config, SystemClock),
            };
            let summary = match command {
                Command::Validate => orchestrator.validate_only()?,
                _ => orchestrator.run()?,
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
    }
}

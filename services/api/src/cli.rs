use crate::infra::{fetch_remote, open_session};
use crate::render::render_session;
use crate::routes::menu;
use crate::server;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use hr_analytics::analysis::{AnalysisKind, AnalysisReport};
use hr_analytics::config::AppConfig;
use hr_analytics::dataset::{DataSource, DatasetLoader};
use hr_analytics::error::AppError;
use hr_analytics::telemetry;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "HR Analytics",
    about = "Explore payroll and headcount exports from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// List the available analyses
    Menu,
    /// Load a dataset and print one or more analyses
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// CSV or XLSX export to analyze
    #[arg(long, conflicts_with = "remote")]
    pub(crate) file: Option<PathBuf>,
    /// Fetch the CSV from HR_DATA_URL (the default when no file is given)
    #[arg(long)]
    pub(crate) remote: bool,
    /// Analysis slug as listed by `menu`; repeatable
    #[arg(long = "analysis", value_name = "SLUG", conflicts_with = "all")]
    pub(crate) analyses: Vec<AnalysisKind>,
    /// Run every analysis (the default when none is named)
    #[arg(long)]
    pub(crate) all: bool,
    /// Reporting cutoff (YYYY-MM-DD). Defaults to HR_REPORT_CUTOFF, then the
    /// end of the latest period in the data.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) cutoff: Option<NaiveDate>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct AnalyzeOutput<'a> {
    source: DataSource,
    cutoff: NaiveDate,
    rows: usize,
    reports: &'a [AnalysisReport],
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Menu => {
            print_menu();
            Ok(())
        }
        Command::Analyze(args) => run_analyze(args).await,
    }
}

fn print_menu() {
    println!("Available analyses");
    for entry in menu() {
        if entry.requires.is_empty() {
            println!("- {:<32} {}", entry.slug, entry.label);
        } else {
            let columns: Vec<&str> = entry
                .requires
                .iter()
                .map(|column| column.canonical_name())
                .collect();
            println!(
                "- {:<32} {} (needs {})",
                entry.slug,
                entry.label,
                columns.join(", ")
            );
        }
    }
}

pub(crate) async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let (dataset, source) = match args.file {
        Some(path) if !args.remote => (DatasetLoader::from_path(&path)?, DataSource::Upload),
        _ => (fetch_remote(&config.data).await?, DataSource::Remote),
    };

    let requested: &[AnalysisKind] = if args.all { &[] } else { &args.analyses };
    let session = open_session(dataset, source, args.cutoff, &config.data);
    let reports: Vec<AnalysisReport> = selected_kinds(requested)
        .into_iter()
        .map(|kind| session.run(kind))
        .collect();

    match args.format {
        OutputFormat::Text => println!("{}", render_session(&session, &reports)),
        OutputFormat::Json => {
            let output = AnalyzeOutput {
                source,
                cutoff: session.cutoff(),
                rows: session.dataset().len(),
                reports: &reports,
            };
            let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::from)?;
            println!("{json}");
        }
    }

    Ok(())
}

/// Named analyses in menu order, or the whole menu when none is named.
fn selected_kinds(requested: &[AnalysisKind]) -> Vec<AnalysisKind> {
    AnalysisKind::ordered()
        .into_iter()
        .filter(|kind| requested.is_empty() || requested.contains(kind))
        .collect()
}

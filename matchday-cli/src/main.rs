//! matchday CLI
//!
//! Harvests league match results and statistics from the results site into
//! a local SQLite store.

mod error;
mod spinner;

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use owo_colors::OwoColorize;
use owo_colors::Stream::{Stderr, Stdout};

use matchday_import::{
    DEFAULT_BATCH_SIZE, DEFAULT_START_YEAR, Settings, SettingsOverrides, harvest_with_settings,
};

use crate::error::CliError;
use crate::spinner::{SpinnerProgress, print_summary};

#[derive(Parser)]
#[command(name = "matchday")]
#[command(about = "Harvest league match results and statistics into SQLite", long_about = None)]
struct Cli {
    /// Matches extracted concurrently
    #[arg(short, long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Skip seasons starting before this year
    #[arg(short, long, default_value_t = DEFAULT_START_YEAR)]
    start_year: u32,

    /// SQLite database file (overrides DB_PATH and settings.toml)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// WebDriver endpoint (overrides WEBDRIVER_URL and settings.toml)
    #[arg(long)]
    webdriver: Option<String>,

    /// Show the browser window
    #[arg(long)]
    headful: bool,

    /// Write a harvest report to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors and hide progress
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        eprintln!(
            "{} {}",
            "\u{2718}".if_supports_color(Stderr, |t| t.red()),
            e
        );
        std::process::exit(1);
    }
}

/// Install env_logger at the level picked by `-v`/`-q`. `RUST_LOG` still
/// takes precedence for individual modules.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(level)
        .filter_module("hyper", LevelFilter::Warn)
        .filter_module("hyper_util", LevelFilter::Warn)
        .filter_module("html5ever", LevelFilter::Warn)
        .filter_module("selectors", LevelFilter::Warn)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let overrides = SettingsOverrides {
        db_path: cli.database,
        webdriver_url: cli.webdriver,
        headless: cli.headful.then_some(false),
    };
    let settings = Settings::load(&overrides)?;

    log::info!(
        "{} {}",
        "Store:".if_supports_color(Stdout, |t| t.bold()),
        settings.db_path.display()
    );
    log::info!(
        "{} {}{}",
        "WebDriver:".if_supports_color(Stdout, |t| t.bold()),
        settings.webdriver_url,
        if settings.headless { "" } else { " (headful)" }
    );

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::runtime(format!("Failed to create tokio runtime: {}", e)))?;

    let progress = SpinnerProgress::new(cli.quiet);
    let result = rt.block_on(harvest_with_settings(
        &settings,
        cli.batch_size,
        cli.start_year,
        &progress,
    ));
    progress.finish();
    let report = result?;

    if !cli.quiet {
        print_summary(&report);
        print_store_totals(&settings)?;
    }

    if let Some(path) = cli.report {
        report.write_to_file(&path)?;
        log::info!("Report written to {}", path.display());
    }
    Ok(())
}

fn print_store_totals(settings: &Settings) -> Result<(), CliError> {
    let conn = matchday_db::open_database(&settings.db_path)
        .map_err(|e| CliError::database(e.to_string()))?;
    let counts =
        matchday_db::store_counts(&conn).map_err(|e| CliError::database(e.to_string()))?;
    println!(
        "  {}",
        format!(
            "Store holds {} matches, {} teams, {} referees, {} stadiums",
            counts.matches, counts.teams, counts.referees, counts.stadiums
        )
        .if_supports_color(Stdout, |t| t.dimmed())
    );
    Ok(())
}

//! unzipper - extract every zip archive in a directory into its own folder
//!
//! Each `<name>.zip` directly inside the source directory is extracted into
//! `<destination>/<name>/`. Archives whose folder already exists are skipped
//! unless `--force-overwrite` is given. Extractions run in parallel.
//!
//! `--timercount <n>` runs a small timer demo instead.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::process;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;
use unzipper_core::batch::{self, BatchOptions};
use unzipper_core::{Config, ProgressReporter, RunSummary, TimerSummary};

/// Extract a directory of zip files into per-archive folders
#[derive(Parser, Debug)]
#[command(name = "unzipper")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The source path containing the zip files to unzip
    #[arg(short, long, value_name = "SOURCE")]
    source: Option<PathBuf>,

    /// The destination where the zip files will be unzipped
    #[arg(short, long, value_name = "DESTINATION")]
    destination: Option<PathBuf>,

    /// Force overwrite of destination directory if it exists
    #[arg(short, long = "force-overwrite", visible_alias = "forceOverwrite")]
    force_overwrite: bool,

    /// Number of simultaneous timers to run for the timer test
    #[arg(short, long = "timercount", value_name = "TIMERCOUNT")]
    timer_count: Option<String>,

    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show a progress bar while extracting
    #[arg(long)]
    progress: bool,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all log output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    match run() {
        Ok(()) => process::exit(0),
        Err(e) => {
            error!("Error: {:#}", e);
            process::exit(map_error_to_exit_code(&e));
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            warn!("Ignoring configuration: {}", e);
            Config::default()
        }),
    };

    if let Some(raw) = &cli.timer_count {
        match raw.trim().parse::<usize>() {
            Ok(count) => {
                let summary = unzipper_core::run_timers(count, config.timers.duration())?;
                print_timer_summary(&summary);
            }
            Err(_) => {
                println!("\nPlease provide a valid int value for -t (timer count)");
                print_help()?;
            }
        }
        return Ok(());
    }

    let (Some(source), Some(destination)) = (&cli.source, &cli.destination) else {
        println!("\nPlease provide values for both -s (source path) and -d (destination path)");
        print_help()?;
        return Ok(());
    };

    let options = BatchOptions {
        force_overwrite: cli.force_overwrite,
        settle_delay: config.extract.settle_delay(),
    };
    let mut reporter = ProgressReporter::new(cli.progress);
    let summary = batch::run(source, destination, &options, &mut reporter)?;
    print_run_summary(&summary);

    Ok(())
}

fn print_help() -> Result<()> {
    Cli::command().print_help()?;
    println!();
    Ok(())
}

fn print_run_summary(summary: &RunSummary) {
    if summary.all_succeeded() {
        println!("All tasks finished.");
    } else {
        println!("Some tasks failed.");
        for failure in &summary.failures {
            println!("  {}: {}", failure.archive.display(), failure.error);
        }
    }

    println!(
        "\nCompleted in {} seconds.\n{} zip files found.\n{} zip files unzipped.\n{} zip files skipped.",
        summary.elapsed.as_secs(),
        summary.total_found,
        summary.extracted,
        summary.skipped
    );
}

fn print_timer_summary(summary: &TimerSummary) {
    if summary.all_succeeded() {
        println!("All tasks finished.");
    } else {
        println!("Some tasks failed.");
    }
    println!(
        "Ran {} timers in {} seconds",
        summary.count,
        summary.elapsed.as_secs()
    );
}

/// Map errors to exit codes:
/// - 0: Success (per-archive failures included)
/// - 1: General error
/// - 2: IO error or missing input
/// - 3: Invalid path or format
fn map_error_to_exit_code(err: &anyhow::Error) -> i32 {
    if let Some(core_err) = err.downcast_ref::<unzipper_core::Error>() {
        match core_err {
            unzipper_core::Error::Io(_) => 2,
            unzipper_core::Error::NotFound(_) => 2,
            unzipper_core::Error::Zip(_) => 2,
            unzipper_core::Error::InvalidPath(_) => 3,
            unzipper_core::Error::UnsupportedFormat(_) => 3,
            unzipper_core::Error::Config(_) => 1,
        }
    } else if err.is::<std::io::Error>() {
        2
    } else {
        1
    }
}

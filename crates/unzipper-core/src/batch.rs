//! Batch extraction of every archive in a directory
//!
//! A run has three phases. The orchestrating thread lists the archives and
//! decides, per archive, whether its destination folder is skipped or
//! (re)written. Every archive that is not skipped then becomes one unit of
//! work on the rayon pool. Finally the run waits for all units and folds
//! their outcomes into a [`RunSummary`].
//!
//! A unit that fails never affects its siblings. Its error is kept in the
//! summary so the caller can say which archive failed and why.

use crate::archive::{self, archive_stem, is_archive};
use crate::progress::ProgressReporter;
use crate::{Error, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Options for a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Replace destination folders that already exist instead of skipping them
    pub force_overwrite: bool,
    /// Pause after each successful extraction
    pub settle_delay: Duration,
}

/// One archive slated for extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveJob {
    /// The archive file
    pub source: PathBuf,
    /// Folder the archive is extracted into: destination root joined with the stem
    pub destination: PathBuf,
    /// The destination already exists and must be deleted first
    pub overwrite: bool,
}

/// Skip/extract decisions for the archives of one run
#[derive(Debug, Default)]
pub struct Plan {
    pub jobs: Vec<ArchiveJob>,
    pub skipped: Vec<PathBuf>,
}

/// Terminal state of one extraction unit
#[derive(Debug)]
pub struct JobOutcome {
    pub job: ArchiveJob,
    pub result: Result<()>,
}

/// An archive whose extraction failed
#[derive(Debug)]
pub struct FailedJob {
    pub archive: PathBuf,
    pub destination: PathBuf,
    pub error: Error,
}

/// Counters for one run
///
/// `extracted` counts the archives that were handed to a unit, whether or
/// not the unit succeeded, so `total_found == extracted + skipped` always
/// holds. Failed units are listed in `failures`.
#[derive(Debug)]
pub struct RunSummary {
    pub total_found: usize,
    pub extracted: usize,
    pub skipped: usize,
    pub failures: Vec<FailedJob>,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Number of units that failed
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Whether every unit reached a successful terminal state
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// List the archives directly inside `source_dir`, sorted by file name
///
/// Subdirectories are not descended into and only regular files (or links
/// to them) with the archive extension are returned.
pub fn find_archives(source_dir: &Path) -> Result<Vec<PathBuf>> {
    if !source_dir.exists() {
        return Err(Error::NotFound(source_dir.to_path_buf()));
    }
    if !source_dir.is_dir() {
        return Err(Error::InvalidPath(format!(
            "{:?} is not a directory",
            source_dir
        )));
    }

    let mut archives = Vec::new();
    for entry in WalkDir::new(source_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && is_archive(path) {
            archives.push(path.to_path_buf());
        } else {
            debug!(path = ?path, "Ignoring non-archive entry");
        }
    }

    Ok(archives)
}

/// Decide, per archive, whether it is skipped or extracted
///
/// An archive is skipped when its destination folder already exists and
/// `force_overwrite` is off. This only inspects the filesystem.
pub fn plan(archives: &[PathBuf], destination_dir: &Path, force_overwrite: bool) -> Result<Plan> {
    let mut plan = Plan::default();

    for source in archives {
        let destination = destination_dir.join(archive_stem(source)?);
        let exists = destination.is_dir();

        if exists && !force_overwrite {
            info!(
                "Skipping: {} Destination already exists: {}",
                source.display(),
                destination.display()
            );
            plan.skipped.push(source.clone());
            continue;
        }

        plan.jobs.push(ArchiveJob {
            source: source.clone(),
            destination,
            overwrite: exists,
        });
    }

    Ok(plan)
}

/// Body of one extraction unit
pub fn run_job(job: &ArchiveJob, settle_delay: Duration) -> Result<()> {
    if job.overwrite && job.destination.is_dir() {
        debug!(destination = ?job.destination, "Removing existing destination");
        fs::remove_dir_all(&job.destination)?;
    }

    archive::extract(&job.source, &job.destination)?;

    if !settle_delay.is_zero() {
        thread::sleep(settle_delay);
    }

    Ok(())
}

/// Extract every archive in `source_dir` into its own folder under `destination_dir`
///
/// Fails only if `source_dir` cannot be listed; errors from individual
/// archives are reported through [`RunSummary::failures`]. Returns once
/// every unit has finished.
pub fn run(
    source_dir: &Path,
    destination_dir: &Path,
    options: &BatchOptions,
    progress: &mut ProgressReporter,
) -> Result<RunSummary> {
    let start = Instant::now();

    info!(
        "Source: {} Destination: {}",
        source_dir.display(),
        destination_dir.display()
    );

    let archives = find_archives(source_dir)?;
    let Plan { jobs, skipped } = plan(&archives, destination_dir, options.force_overwrite)?;

    for job in &jobs {
        info!(
            "Extracting: {} to: {}",
            job.source.display(),
            job.destination.display()
        );
    }

    progress.start("Extracting", jobs.len() as u64);
    let extracted = jobs.len();

    let outcomes: Vec<JobOutcome> = {
        let reporter: &ProgressReporter = progress;
        jobs.into_par_iter()
            .map(|job| {
                let result = run_job(&job, options.settle_delay);
                match &result {
                    Ok(()) => info!(
                        "Extracted: {} to: {}",
                        job.source.display(),
                        job.destination.display()
                    ),
                    Err(e) => warn!("Failed to extract {}: {}", job.source.display(), e),
                }
                reporter.inc(1);
                JobOutcome { job, result }
            })
            .collect()
    };

    progress.finish("Done");

    let failures: Vec<FailedJob> = outcomes
        .into_iter()
        .filter_map(|JobOutcome { job, result }| {
            result.err().map(|error| FailedJob {
                archive: job.source,
                destination: job.destination,
                error,
            })
        })
        .collect();

    Ok(RunSummary {
        total_found: archives.len(),
        extracted,
        skipped: skipped.len(),
        failures,
        elapsed: start.elapsed(),
    })
}

//! Unzipper - batch extraction of zip archives
//!
//! This library finds every zip archive directly inside a source directory
//! and extracts each one into its own folder under a destination root,
//! running the extractions concurrently. It also carries a small timer demo
//! used to eyeball task scheduling overhead.

pub mod archive;
pub mod batch;
pub mod config;
pub mod error;
pub mod progress;
pub mod security;
pub mod timers;

pub use error::{Error, Result};

// Re-export commonly used types
pub use archive::{archive_stem, extract, is_archive, ARCHIVE_EXTENSION};
pub use batch::{ArchiveJob, BatchOptions, FailedJob, JobOutcome, RunSummary};
pub use config::Config;
pub use progress::ProgressReporter;
pub use timers::{run_timers, TimerSummary};

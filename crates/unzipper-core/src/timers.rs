//! Concurrent timer demo
//!
//! Starts `count` tasks that each sleep for the same duration and waits for
//! all of them. With real concurrency the whole group finishes in roughly
//! one duration; the gap between that and the measured time is the
//! scheduling overhead.

use crate::Result;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Outcome of a timer demo run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSummary {
    /// Timers started
    pub count: usize,
    /// Timers that panicked or were cancelled
    pub failed: usize,
    /// Wall-clock time for the whole group
    pub elapsed: Duration,
}

impl TimerSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Run `count` concurrent timers of `duration` each and wait for all of them
pub fn run_timers(count: usize, duration: Duration) -> Result<TimerSummary> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .thread_name("unzipper-timer")
        .build()?;

    Ok(runtime.block_on(run_timers_async(count, duration)))
}

/// Async body of [`run_timers`], for callers that already own a runtime
pub async fn run_timers_async(count: usize, duration: Duration) -> TimerSummary {
    let start = Instant::now();
    info!("Number of timers: {}", count);

    let mut tasks = JoinSet::new();
    for i in 0..count {
        info!("Starting timer {}", i);
        tasks.spawn(async move {
            tokio::time::sleep(duration).await;
            info!("Finished timer {}", i);
        });
    }

    let mut failed = 0;
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            warn!("Timer task failed: {}", e);
            failed += 1;
        }
    }

    TimerSummary {
        count,
        failed,
        elapsed: start.elapsed(),
    }
}

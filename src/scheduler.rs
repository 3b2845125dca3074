//! Sequential poll loop.
//!
//! One long-lived task drives all polling: wait the interval, run a cycle
//! to completion, repeat. The interval is measured from the end of one
//! cycle to the start of the next, so a cycle that outlasts the interval
//! can never overlap with its successor. Spawning a task per tick would
//! break that guarantee; a plain loop over a sleep is the whole mechanism.

use std::time::Duration;

use tokio::sync::watch;

use crate::engine::PollEngine;
use crate::feed::FeedFetcher;
use crate::notify::Notifier;
use crate::store::SubscriptionStore;

pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Run cycles until `shutdown` flips to true or its sender is dropped.
    ///
    /// Shutdown is observed while waiting; a cycle already in flight runs
    /// to completion before the loop exits.
    pub async fn run<S, F, N>(
        &self,
        engine: &PollEngine<S, F, N>,
        mut shutdown: watch::Receiver<bool>,
    ) where
        S: SubscriptionStore,
        F: FeedFetcher,
        N: Notifier,
    {
        tracing::info!(interval_ms = self.interval.as_millis() as u64, "Scheduler started");
        loop {
            // Fixed deadline per wait: watch sends that are not a shutdown
            // must not restart the interval.
            let deadline = tokio::time::Instant::now() + self.interval;
            loop {
                tokio::select! {
                    _ = tokio::time::sleep_until(deadline) => break,
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            tracing::info!("Scheduler stopped");
                            return;
                        }
                    }
                }
            }

            engine.run_one_cycle().await;

            if *shutdown.borrow() {
                break;
            }
        }
        tracing::info!("Scheduler stopped");
    }
}

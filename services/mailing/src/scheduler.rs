//! Periodic sweep trigger owned by the `serve` binary.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::usecase::sweep::Sweeper;

/// Calls [`Sweeper::sweep`] every `period` until shut down. The first pass runs
/// immediately; ticks missed while a pass is running are skipped.
pub struct Scheduler<S: Sweeper> {
    sweeper: S,
    period: Duration,
}

impl<S: Sweeper> Scheduler<S> {
    pub fn new(sweeper: S, period: Duration) -> Self {
        Self { sweeper, period }
    }

    /// Runs until `shutdown` flips to `true` or its sender is dropped. A pass in
    /// progress is allowed to finish.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(period_secs = self.period.as_secs(), "sweep scheduler started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.sweeper.sweep().await {
                        error!(error = %e, "scheduled sweep failed");
                    }
                }
                _ = shutdown.changed() => break,
            }
            if *shutdown.borrow() {
                break;
            }
        }
        info!("sweep scheduler stopped");
    }
}

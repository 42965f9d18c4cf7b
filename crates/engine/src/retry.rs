//! Periodic retry sweep.
//!
//! The sweep is what makes delivery *eventual*: whatever the inline attempt
//! did or didn't manage, every eligible job is re-discovered here and
//! re-attempted until it terminates. Multiple instances may sweep the same
//! store concurrently; per-job exclusivity comes from `claim`, not from
//! sweep coordination.

use std::time::Duration;

use chrono::Utc;

use crate::executor::{DeliveryExecutor, DeliveryOutcome};
use crate::store::JobStore;

pub struct RetrySweeper {
    store: JobStore,
    executor: DeliveryExecutor,
    environment: String,
    interval: Duration,
}

impl RetrySweeper {
    pub fn new(
        store: JobStore,
        executor: DeliveryExecutor,
        environment: String,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            executor,
            environment,
            interval,
        }
    }

    /// Run forever: one sweep immediately at startup, then one per interval.
    pub async fn run(&self) {
        tracing::info!(
            environment = %self.environment,
            interval_secs = self.interval.as_secs(),
            "Retry sweeper started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            self.sweep().await;
        }
    }

    /// One pass: scan for eligible jobs and attempt each in FIFO order.
    ///
    /// One job's failure never aborts the pass. A failed scan is logged and
    /// the sweeper simply waits for the next tick.
    pub async fn sweep(&self) {
        let jobs = match self.store.find_eligible(&self.environment, Utc::now()).await {
            Ok(jobs) => jobs,
            Err(e) => {
                tracing::error!(error = %e, "Eligibility scan failed, waiting for next sweep");
                return;
            }
        };

        if jobs.is_empty() {
            tracing::debug!("Retry sweep found no eligible jobs");
            return;
        }

        tracing::info!(count = jobs.len(), "Retry sweep starting");

        for job in jobs {
            match self.executor.execute(job.id, &self.environment).await {
                Ok(DeliveryOutcome::AlreadyClaimed) => {
                    tracing::debug!(job_id = %job.id, "Skipped: claimed by another worker");
                }
                Ok(outcome) => {
                    tracing::info!(job_id = %job.id, outcome = %outcome, "Sweep attempt finished");
                }
                Err(e) => {
                    tracing::error!(job_id = %job.id, error = %e, "Sweep attempt errored");
                }
            }
        }

        tracing::info!("Retry sweep completed");
    }
}

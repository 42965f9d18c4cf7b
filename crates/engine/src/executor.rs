//! One delivery attempt, end to end: claim → notify → record outcome.

use std::sync::Arc;

use uuid::Uuid;

use herald_common::error::AppError;
use herald_common::types::JobStatus;
use herald_notifier::Notifier;

use crate::store::JobStore;

/// Result of one `execute` call.
///
/// `AlreadyClaimed` is a normal race outcome, not an error — another worker
/// holds the job, or the job is no longer claimable. Callers log it and
/// move on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    AlreadyClaimed,
    Sent,
    Retrying,
    Failed,
}

impl std::fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryOutcome::AlreadyClaimed => write!(f, "already_claimed"),
            DeliveryOutcome::Sent => write!(f, "sent"),
            DeliveryOutcome::Retrying => write!(f, "retrying"),
            DeliveryOutcome::Failed => write!(f, "failed"),
        }
    }
}

/// Drives a single job through one delivery attempt.
#[derive(Clone)]
pub struct DeliveryExecutor {
    store: JobStore,
    notifier: Arc<dyn Notifier>,
}

impl DeliveryExecutor {
    pub fn new(store: JobStore, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Attempt delivery of one job.
    ///
    /// The claim runs first, so of any number of concurrent `execute` calls
    /// on the same job only the winner reaches the notifier. Transport
    /// faults and provider-reported failures arrive on one channel and are
    /// recorded identically; a `SendFailure` never propagates past here.
    pub async fn execute(&self, id: Uuid, environment: &str) -> Result<DeliveryOutcome, AppError> {
        if !self.store.claim(id, environment).await? {
            tracing::debug!(job_id = %id, "Job already claimed elsewhere, skipping");
            return Ok(DeliveryOutcome::AlreadyClaimed);
        }

        let job = self.store.get_by_id(id).await?;

        match self.notifier.send(&job).await {
            Ok(()) => {
                self.store.record_success(id).await?;
                Ok(DeliveryOutcome::Sent)
            }
            Err(failure) => {
                let diagnostic = failure
                    .diagnostic
                    .unwrap_or_else(|| "notification delivery failed".to_string());
                let updated = self.store.record_failure(id, &diagnostic).await?;
                if updated.status == JobStatus::Failed {
                    Ok(DeliveryOutcome::Failed)
                } else {
                    Ok(DeliveryOutcome::Retrying)
                }
            }
        }
    }
}

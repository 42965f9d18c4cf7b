//! Submission intake: durable create plus one best-effort inline attempt.

use herald_common::error::AppError;
use herald_common::types::{DeliveryJob, SubmissionPayload};

use crate::executor::DeliveryExecutor;
use crate::store::JobStore;

/// Accept a validated submission.
///
/// The job is durably created first; only a storage failure propagates to
/// the caller. The inline delivery attempt runs in the background and its
/// outcome — including losing the claim race to a concurrently-started
/// sweep — never surfaces here. Eventual delivery is owned by the retry
/// sweep.
pub async fn accept(
    store: &JobStore,
    executor: &DeliveryExecutor,
    payload: SubmissionPayload,
    environment: &str,
) -> Result<DeliveryJob, AppError> {
    let job = store.create(&payload, environment).await?;

    let executor = executor.clone();
    let job_id = job.id;
    let env = environment.to_string();
    tokio::spawn(async move {
        match executor.execute(job_id, &env).await {
            Ok(outcome) => {
                tracing::debug!(job_id = %job_id, outcome = %outcome, "Inline delivery attempt finished");
            }
            Err(e) => {
                tracing::error!(job_id = %job_id, error = %e, "Inline delivery attempt errored");
            }
        }
    });

    Ok(job)
}

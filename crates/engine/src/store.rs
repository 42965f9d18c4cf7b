//! Durable job persistence and the atomic claim primitive.
//!
//! All mutual exclusion in the system lives here: `claim` is a single
//! conditional UPDATE, and a job in `processing` status is untouchable by
//! every other worker until its outcome is recorded. There is no lock
//! manager and no read-then-write window.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use herald_common::error::AppError;
use herald_common::types::{DeliveryJob, JobStatus, ServiceSelection, SubmissionPayload};

use crate::backoff;

/// Handle to the `delivery_jobs` table. Cheap to clone; wraps the shared pool.
#[derive(Clone)]
pub struct JobStore {
    pool: PgPool,
}

/// Flat row image of `delivery_jobs`. The `selected_services` column holds a
/// JSON-encoded array of records; element order and numeric values survive
/// the round trip unchanged.
#[derive(sqlx::FromRow)]
struct JobRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    message: Option<String>,
    listing_id: String,
    listing_name: String,
    selected_services: String,
    status: JobStatus,
    retry_count: i32,
    created_at: DateTime<Utc>,
    last_retry_at: Option<DateTime<Utc>>,
    error_message: Option<String>,
    environment: String,
}

impl TryFrom<JobRow> for DeliveryJob {
    type Error = serde_json::Error;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let selected_services: Vec<ServiceSelection> =
            serde_json::from_str(&row.selected_services)?;
        Ok(DeliveryJob {
            id: row.id,
            payload: SubmissionPayload {
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
                phone: row.phone,
                message: row.message,
                listing_id: row.listing_id,
                listing_name: row.listing_name,
                selected_services,
            },
            status: row.status,
            retry_count: row.retry_count,
            created_at: row.created_at,
            last_retry_at: row.last_retry_at,
            error_message: row.error_message,
            environment: row.environment,
        })
    }
}

impl JobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Durably create a job for an accepted submission.
    ///
    /// The insert is a single statement: either the full row becomes
    /// visible or nothing does.
    pub async fn create(
        &self,
        payload: &SubmissionPayload,
        environment: &str,
    ) -> Result<DeliveryJob, AppError> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();
        let selected_services = serde_json::to_string(&payload.selected_services)?;

        sqlx::query(
            r#"
            INSERT INTO delivery_jobs
                (id, first_name, last_name, email, phone, message,
                 listing_id, listing_name, selected_services,
                 status, retry_count, created_at, environment)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(id)
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.message)
        .bind(&payload.listing_id)
        .bind(&payload.listing_name)
        .bind(&selected_services)
        .bind(JobStatus::Pending.to_string())
        .bind(0_i32)
        .bind(created_at)
        .bind(environment)
        .execute(&self.pool)
        .await?;

        tracing::info!(job_id = %id, environment, "Delivery job created");

        Ok(DeliveryJob {
            id,
            payload: payload.clone(),
            status: JobStatus::Pending,
            retry_count: 0,
            created_at,
            last_retry_at: None,
            error_message: None,
            environment: environment.to_string(),
        })
    }

    /// Atomically claim a job for processing.
    ///
    /// Of any number of concurrent callers, exactly one observes `true`:
    /// Postgres serializes the row update and the status predicate no longer
    /// holds for whoever arrives after the winner. A `false` return is the
    /// normal outcome of losing the race (or of the job being ineligible)
    /// and must be tolerated by callers.
    pub async fn claim(&self, id: Uuid, environment: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE delivery_jobs
            SET status = $1
            WHERE id = $2
              AND environment = $3
              AND status IN ($4, $5, $6)
              AND retry_count < $7
            "#,
        )
        .bind(JobStatus::Processing.to_string())
        .bind(id)
        .bind(environment)
        .bind(JobStatus::Pending.to_string())
        .bind(JobStatus::Retrying.to_string())
        .bind(JobStatus::Failed.to_string())
        .bind(backoff::MAX_ATTEMPTS)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Mark a claimed job as delivered. Terminal.
    ///
    /// No extra locking: the caller holds the `processing` status, so no
    /// other worker can touch the row.
    pub async fn record_success(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE delivery_jobs SET status = $1 WHERE id = $2")
            .bind(JobStatus::Sent.to_string())
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!(job_id = %id, "Delivery recorded as sent");
        Ok(())
    }

    /// Record a failed attempt on a claimed job and return the updated row.
    ///
    /// The increment and the terminal check run in one statement; the job
    /// moves to `failed` exactly when the new count reaches the ceiling.
    pub async fn record_failure(&self, id: Uuid, err_msg: &str) -> Result<DeliveryJob, AppError> {
        let row: JobRow = sqlx::query_as(
            r#"
            UPDATE delivery_jobs
            SET retry_count = retry_count + 1,
                status = CASE WHEN retry_count + 1 >= $1 THEN 'failed' ELSE 'retrying' END,
                last_retry_at = $2,
                error_message = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(backoff::MAX_ATTEMPTS)
        .bind(Utc::now())
        .bind(err_msg)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        let job: DeliveryJob = row.try_into()?;
        tracing::warn!(
            job_id = %id,
            retry_count = job.retry_count,
            status = %job.status,
            error = err_msg,
            "Delivery attempt failed"
        );
        Ok(job)
    }

    /// Snapshot of jobs currently eligible for a delivery attempt, oldest
    /// first. Returned jobs are NOT claimed; callers go through `claim` and
    /// must tolerate losing.
    pub async fn find_eligible(
        &self,
        environment: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<DeliveryJob>, AppError> {
        let rows: Vec<JobRow> = sqlx::query_as(
            r#"
            SELECT * FROM delivery_jobs
            WHERE environment = $1
              AND status IN ($2, $3, $4)
              AND retry_count < $5
            ORDER BY created_at ASC
            "#,
        )
        .bind(environment)
        .bind(JobStatus::Pending.to_string())
        .bind(JobStatus::Retrying.to_string())
        .bind(JobStatus::Failed.to_string())
        .bind(backoff::MAX_ATTEMPTS)
        .fetch_all(&self.pool)
        .await?;

        let mut jobs = Vec::with_capacity(rows.len());
        for row in rows {
            let job: DeliveryJob = row.try_into()?;
            if backoff::is_eligible(job.retry_count, job.created_at, now) {
                jobs.push(job);
            }
        }
        Ok(jobs)
    }

    /// Operator escape hatch: put a job back at the start of the retry
    /// cycle, even from a terminal state. Clears the attempt history.
    pub async fn reset(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE delivery_jobs
            SET status = $1,
                retry_count = 0,
                last_retry_at = NULL,
                error_message = NULL
            WHERE id = $2
            "#,
        )
        .bind(JobStatus::Retrying.to_string())
        .bind(id)
        .execute(&self.pool)
        .await?;

        tracing::info!(job_id = %id, "Job reset for reprocessing");
        Ok(())
    }

    /// Fetch a job by id.
    pub async fn get_by_id(&self, id: Uuid) -> Result<DeliveryJob, AppError> {
        let row: Option<JobRow> = sqlx::query_as("SELECT * FROM delivery_jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(row.try_into()?),
            None => Err(AppError::NotFound(format!("Job {} not found", id))),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Delivery lifecycle of a job.
///
/// `sent` and `failed` are terminal — no automatic transition leaves them.
/// `processing` doubles as the exclusion token: the worker that moved a job
/// into `processing` is the only one allowed to record its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Retrying,
    Sent,
    Failed,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Retrying => write!(f, "retrying"),
            JobStatus::Sent => write!(f, "sent"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One service the submitter selected on the form, with its listed price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSelection {
    pub name: String,
    pub price: f64,
}

/// Pass-through content of a form submission. The delivery engine never
/// interprets these fields; they flow unchanged from intake to the notifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub listing_id: String,
    pub listing_name: String,
    #[serde(default)]
    pub selected_services: Vec<ServiceSelection>,
}

/// A persisted delivery job: one accepted submission plus its delivery state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryJob {
    pub id: Uuid,
    #[serde(flatten)]
    pub payload: SubmissionPayload,
    pub status: JobStatus,
    pub retry_count: i32,
    /// Immutable; all backoff thresholds are measured from this instant.
    pub created_at: DateTime<Utc>,
    pub last_retry_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    /// Partition tag copied from the creating deployment's identity.
    pub environment: String,
}

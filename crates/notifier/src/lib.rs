//! Notification transport boundary.
//!
//! The delivery engine talks to exactly one interface: [`Notifier::send`].
//! Transport faults and provider-reported rejections both surface as
//! [`SendFailure`] — the engine treats them identically and records the
//! diagnostic on the job.

pub mod format;

use async_trait::async_trait;

use herald_common::config::AppConfig;
use herald_common::types::DeliveryJob;

/// A failed delivery attempt, carrying the provider's diagnostic when one
/// could be extracted.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}", .diagnostic.as_deref().unwrap_or("notification delivery failed"))]
pub struct SendFailure {
    pub diagnostic: Option<String>,
}

impl SendFailure {
    pub fn new(diagnostic: impl Into<String>) -> Self {
        Self {
            diagnostic: Some(diagnostic.into()),
        }
    }
}

/// Outbound notification transport.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one notification for `job`.
    async fn send(&self, job: &DeliveryJob) -> Result<(), SendFailure>;
}

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

/// Email notifier backed by the Resend HTTP API.
pub struct EmailNotifier {
    client: reqwest::Client,
    api_key: Option<String>,
    from: String,
    to: String,
}

impl EmailNotifier {
    pub fn new(api_key: Option<String>, from: String, to: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            from,
            to,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.resend_api_key.clone(),
            config.email_from.clone(),
            config.submissions_email_to.clone(),
        )
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send(&self, job: &DeliveryJob) -> Result<(), SendFailure> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(SendFailure::new(
                "email delivery is not configured (RESEND_API_KEY unset)",
            ));
        };

        let subject = format!("New Submission - {} - {}", job.payload.listing_name, job.id);
        let body = serde_json::json!({
            "from": self.from,
            "to": [self.to],
            "subject": subject,
            "text": format::submission_body(job),
        });

        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SendFailure::new(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(job_id = %job.id, "Notification accepted by email provider");
            return Ok(());
        }

        // Resend error bodies carry a "message" field; fall back to the
        // bare status when the body is missing or unparseable.
        let diagnostic = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| v.get("message")?.as_str().map(str::to_string))
            .unwrap_or_else(|| format!("email provider returned HTTP {}", status));

        tracing::warn!(job_id = %job.id, %status, diagnostic, "Email provider rejected notification");
        Err(SendFailure::new(diagnostic))
    }
}

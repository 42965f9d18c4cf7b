use serde::Deserialize;

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection string
    pub database_url: String,

    /// Partition tag for this deployment (e.g. "production", "staging").
    /// Stamped onto every job at creation; workers only touch jobs
    /// carrying their own tag.
    pub environment: String,

    /// Retry sweep interval in seconds (default: 300)
    pub sweep_interval_secs: u64,

    /// Maximum number of PostgreSQL connections in the pool (default: 20)
    pub db_max_connections: u32,

    /// Resend API key for email delivery
    pub resend_api_key: Option<String>,

    /// Email sender address
    pub email_from: String,

    /// Mailbox that receives submission notifications
    pub submissions_email_to: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            environment: std::env::var("HERALD_ENVIRONMENT")
                .unwrap_or_else(|_| "production".to_string()),
            sweep_interval_secs: std::env::var("SWEEP_INTERVAL_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("SWEEP_INTERVAL_SECS must be a valid u64"))?,
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DB_MAX_CONNECTIONS must be a valid u32"))?,
            resend_api_key: std::env::var("RESEND_API_KEY").ok(),
            email_from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "no-reply@herald.example".to_string()),
            submissions_email_to: std::env::var("SUBMISSIONS_EMAIL_TO")
                .unwrap_or_else(|_| "submissions@herald.example".to_string()),
        })
    }
}

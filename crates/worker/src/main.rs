use std::sync::Arc;
use std::time::Duration;

use herald_common::config::AppConfig;
use herald_common::db;
use herald_engine::executor::DeliveryExecutor;
use herald_engine::retry::RetrySweeper;
use herald_engine::store::JobStore;
use herald_notifier::EmailNotifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "herald_worker=info,herald_engine=info".into()),
        )
        .json()
        .init();

    tracing::info!("Herald delivery worker starting...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // Connect to database
    let pool = db::create_pool(&config.database_url, config.db_max_connections).await?;

    // Run migrations
    sqlx::migrate!("../../migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    let store = JobStore::new(pool.clone());
    let notifier = Arc::new(EmailNotifier::from_config(&config));
    let executor = DeliveryExecutor::new(store.clone(), notifier);

    let sweeper = RetrySweeper::new(
        store,
        executor,
        config.environment.clone(),
        Duration::from_secs(config.sweep_interval_secs),
    );

    // Run with graceful shutdown on Ctrl+C
    tokio::select! {
        _ = sweeper.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping gracefully...");
        }
    }

    pool.close().await;
    tracing::info!("Herald delivery worker stopped.");
    Ok(())
}

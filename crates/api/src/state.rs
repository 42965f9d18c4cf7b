//! Shared application state for the Axum API server.

use herald_common::config::AppConfig;
use herald_engine::executor::DeliveryExecutor;
use herald_engine::store::JobStore;

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub store: JobStore,
    pub executor: DeliveryExecutor,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(store: JobStore, executor: DeliveryExecutor, config: AppConfig) -> Self {
        Self {
            store,
            executor,
            config,
        }
    }
}

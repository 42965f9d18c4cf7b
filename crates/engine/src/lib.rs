//! Delivery-state engine.
//!
//! One accepted submission becomes one [`DeliveryJob`](herald_common::types::DeliveryJob)
//! row, and that row is driven to `sent` or `failed` through a claim/execute
//! protocol whose only synchronization primitive is a conditional UPDATE.
//! Any number of worker instances may race on the same table.

pub mod backoff;
pub mod executor;
pub mod intake;
pub mod retry;
pub mod store;

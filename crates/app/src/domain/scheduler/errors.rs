//! Scheduler errors.

use thiserror::Error;

use crate::domain::{sales::SalesServiceError, shops::ShopsServiceError};

/// Failures that abort a whole tick. Per-sale failures are logged instead.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("failed to load due sales")]
    Sales(#[from] SalesServiceError),

    #[error("failed to load shops")]
    Shops(#[from] ShopsServiceError),
}

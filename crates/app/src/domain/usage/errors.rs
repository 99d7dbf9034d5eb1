//! Usage limiter errors.

use thiserror::Error;

use crate::domain::{sales::SalesServiceError, shops::ShopsServiceError};

#[derive(Debug, Error)]
pub enum UsageLimiterError {
    #[error("failed to load shop plan")]
    Shop(#[from] ShopsServiceError),

    #[error("failed to load scheduled sales")]
    Sales(#[from] SalesServiceError),
}

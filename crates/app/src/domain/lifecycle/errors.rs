//! Lifecycle errors.

use pricedrop::status::{SaleStatus, StatusError};
use thiserror::Error;

use crate::domain::{
    sales::SalesServiceError, shops::ShopsServiceError, usage::UsageLimiterError,
};

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("sale not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("a sale that is {0} cannot be edited")]
    NotEditable(SaleStatus),

    #[error(transparent)]
    InvalidTransition(#[from] StatusError),

    #[error("{message}")]
    Conflict { message: String },

    #[error("{message}")]
    LimitExceeded { message: String },

    #[error("sale storage failed")]
    Sales(#[source] SalesServiceError),

    #[error("shop lookup failed")]
    Shops(#[source] ShopsServiceError),

    #[error("usage limit check failed")]
    Usage(#[from] UsageLimiterError),
}

impl From<SalesServiceError> for LifecycleError {
    fn from(error: SalesServiceError) -> Self {
        match error {
            SalesServiceError::NotFound => Self::NotFound,
            SalesServiceError::Validation(message) => Self::Validation(message),
            SalesServiceError::NotEditable(status) => Self::NotEditable(status),
            other => Self::Sales(other),
        }
    }
}

impl From<ShopsServiceError> for LifecycleError {
    fn from(error: ShopsServiceError) -> Self {
        match error {
            ShopsServiceError::NotFound => Self::NotFound,
            other => Self::Shops(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use pricedrop::status::Transition;

    use super::*;

    #[test]
    fn missing_rows_surface_as_not_found() {
        assert!(matches!(
            LifecycleError::from(SalesServiceError::NotFound),
            LifecycleError::NotFound
        ));
        assert!(matches!(
            LifecycleError::from(ShopsServiceError::NotFound),
            LifecycleError::NotFound
        ));
    }

    #[test]
    fn invalid_transition_message_is_passed_through() {
        let error = LifecycleError::from(StatusError::InvalidTransition {
            from: SaleStatus::Pending,
            transition: Transition::Revert,
        });

        assert_eq!(error.to_string(), "cannot revert a sale that is pending");
    }
}

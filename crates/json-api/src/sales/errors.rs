//! Sale Errors

use salvo::http::StatusError;
use tracing::error;

use pricedrop_app::domain::{lifecycle::LifecycleError, sales::SalesServiceError};

pub(crate) fn into_status_error(error: LifecycleError) -> StatusError {
    match error {
        LifecycleError::NotFound => StatusError::not_found().brief("Sale not found"),
        LifecycleError::Validation(message) => StatusError::bad_request().brief(message),
        LifecycleError::NotEditable(status) => {
            StatusError::conflict().brief(format!("A sale that is {status} cannot be edited"))
        }
        LifecycleError::InvalidTransition(source) => {
            StatusError::conflict().brief(source.to_string())
        }
        LifecycleError::Conflict { message } => StatusError::conflict().brief(message),
        LifecycleError::LimitExceeded { message } => {
            StatusError::payment_required().brief(message)
        }
        LifecycleError::Sales(SalesServiceError::AlreadyExists) => {
            StatusError::conflict().brief("Sale already exists")
        }
        LifecycleError::Sales(
            SalesServiceError::InvalidReference
            | SalesServiceError::MissingRequiredData
            | SalesServiceError::InvalidData,
        ) => StatusError::bad_request().brief("Invalid sale payload"),
        LifecycleError::Sales(source) => {
            error!("sale storage failed: {source}");

            StatusError::internal_server_error()
        }
        LifecycleError::Shops(source) => {
            error!("shop lookup failed: {source}");

            StatusError::internal_server_error()
        }
        LifecycleError::Usage(source) => {
            error!("usage limit check failed: {source}");

            StatusError::internal_server_error()
        }
    }
}

pub(crate) fn from_sales_error(error: SalesServiceError) -> StatusError {
    into_status_error(error.into())
}

#[cfg(test)]
mod tests {
    use pricedrop::status::{SaleStatus, StatusError as TransitionError, Transition};
    use salvo::http::StatusCode;

    use super::*;

    fn code(error: LifecycleError) -> StatusCode {
        into_status_error(error).code
    }

    #[test]
    fn lifecycle_errors_map_to_http_statuses() {
        assert_eq!(code(LifecycleError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            code(LifecycleError::Validation("title must not be empty".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            code(LifecycleError::NotEditable(SaleStatus::Active)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            code(LifecycleError::InvalidTransition(
                TransitionError::InvalidTransition {
                    from: SaleStatus::Pending,
                    transition: Transition::Revert,
                }
            )),
            StatusCode::CONFLICT
        );
        assert_eq!(
            code(LifecycleError::LimitExceeded {
                message: "Upgrade".to_string()
            }),
            StatusCode::PAYMENT_REQUIRED
        );
    }

    #[test]
    fn missing_sales_are_not_found() {
        assert_eq!(
            from_sales_error(SalesServiceError::NotFound).code,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            from_sales_error(SalesServiceError::InvalidData).code,
            StatusCode::BAD_REQUEST
        );
    }
}

//! Activate Sale Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    sales::{errors::into_status_error, models::ActivationResponse},
    state::State,
};

/// Activate Sale Handler
///
/// Starts a pending sale, or restarts a completed one, immediately. The overlap and plan
/// usage checks the scheduler applies run here too.
#[endpoint(
    tags("sales"),
    summary = "Activate Sale",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Sale activated"),
        (status_code = StatusCode::NOT_FOUND, description = "Sale not found"),
        (status_code = StatusCode::PAYMENT_REQUIRED, description = "Plan variant limit exceeded"),
        (status_code = StatusCode::CONFLICT, description = "Sale is already active or overlaps another sale"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    sale: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ActivationResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let shop = depot.shop_uuid_or_401()?;

    let report = state
        .app
        .lifecycle
        .reactivate(shop, sale.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(report.into()))
}

//! Deactivate Sale Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    sales::{errors::into_status_error, models::RevertResponse},
    state::State,
};

/// Deactivate Sale Handler
///
/// Ends an active sale now. Variants whose price was edited by hand during the sale keep
/// that price.
#[endpoint(
    tags("sales"),
    summary = "Deactivate Sale",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Sale deactivated"),
        (status_code = StatusCode::NOT_FOUND, description = "Sale not found"),
        (status_code = StatusCode::CONFLICT, description = "Sale is not active"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    sale: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<RevertResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let shop = depot.shop_uuid_or_401()?;

    let report = state
        .app
        .lifecycle
        .deactivate(shop, sale.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(report.into()))
}

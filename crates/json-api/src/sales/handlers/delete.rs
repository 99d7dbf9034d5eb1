//! Delete Sale Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    sales::{errors::into_status_error, models::DeleteSaleResponse},
    state::State,
};

/// Delete Sale Handler
///
/// Active sales are reverted before they are deleted; the revert report is returned.
#[endpoint(
    tags("sales"),
    summary = "Delete Sale",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Sale deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Sale not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    sale: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<DeleteSaleResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let shop = depot.shop_uuid_or_401()?;

    let reverted = state
        .app
        .lifecycle
        .delete_sale(shop, sale.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(DeleteSaleResponse {
        reverted: reverted.map(Into::into),
    }))
}

//! List Sales Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    sales::{errors::from_sales_error, models::SalesResponse},
    state::State,
};

/// List Sales Handler
///
/// Returns every sale of the authenticated shop, newest first.
#[endpoint(
    tags("sales"),
    summary = "List Sales",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Sales"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<SalesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let shop = depot.shop_uuid_or_401()?;

    let sales = state
        .app
        .sales
        .list_sales(shop)
        .await
        .map_err(from_sales_error)?;

    Ok(Json(SalesResponse {
        sales: sales.into_iter().map(Into::into).collect(),
    }))
}

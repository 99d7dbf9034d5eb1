//! Create Sale Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use pricedrop_app::domain::sales::{data::NewSale, records::SaleUuid};

use crate::{
    extensions::*,
    sales::{
        errors::into_status_error,
        models::{SalePayload, SaleResponse},
    },
    state::State,
};

/// Create Sale Handler
///
/// Stores a pending sale. Sales overlapping another scheduled sale on a shared variant are
/// rejected unless `allow_override` is set.
#[endpoint(
    tags("sales"),
    summary = "Create Sale",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Sale created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::CONFLICT, description = "Overlapping sale or duplicate UUID"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<SalePayload>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<SaleResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let shop = depot.shop_uuid_or_401()?;

    let payload = json.into_inner();
    let uuid = payload.uuid.map_or_else(SaleUuid::new, SaleUuid::from_uuid);
    let details = payload.into_details()?;

    let sale = state
        .app
        .lifecycle
        .create_sale(shop, NewSale { uuid, details })
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/sales/{}", sale.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(sale.into()))
}

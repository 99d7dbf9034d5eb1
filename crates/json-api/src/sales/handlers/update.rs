//! Update Sale Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    extensions::*,
    sales::{
        errors::into_status_error,
        models::{SalePayload, SaleResponse},
    },
    state::State,
};

/// Update Sale Handler
///
/// Replaces the details and items of a pending or completed sale. Active sales must be
/// deactivated first.
#[endpoint(
    tags("sales"),
    summary = "Update Sale",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Sale updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Sale not found"),
        (status_code = StatusCode::CONFLICT, description = "Sale is active or overlaps another sale"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    sale: PathParam<Uuid>,
    json: JsonBody<SalePayload>,
    depot: &mut Depot,
) -> Result<Json<SaleResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let shop = depot.shop_uuid_or_401()?;

    let details = json.into_inner().into_details()?;

    let sale = state
        .app
        .lifecycle
        .update_sale(shop, sale.into_inner().into(), details)
        .await
        .map_err(into_status_error)?;

    Ok(Json(sale.into()))
}

#[cfg(test)]
mod tests {
    use pricedrop::status::SaleStatus;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use pricedrop_app::domain::{
        lifecycle::LifecycleError,
        sales::records::{SaleRecord, SaleUuid},
    };

    use crate::test_helpers::{Mocks, TEST_SHOP_UUID, make_sale, service};

    use super::{super::tests::sale_body, *};

    fn make_service(mocks: Mocks) -> Service {
        service(mocks, Router::with_path("sales/{sale}").put(handler))
    }

    #[tokio::test]
    async fn test_update_sale_returns_updated_sale() -> TestResult {
        let uuid = SaleUuid::new();

        let mut body = sale_body();
        body["title"] = json!("Spring, extended");

        let mut mocks = Mocks::new();

        mocks
            .lifecycle
            .expect_update_sale()
            .once()
            .withf(move |shop, sale, details| {
                *shop == TEST_SHOP_UUID && *sale == uuid && details.title == "Spring, extended"
            })
            .return_once(move |_, _, details| {
                Ok(SaleRecord {
                    title: details.title,
                    status: SaleStatus::Pending,
                    ..make_sale(uuid)
                })
            });

        let mut res = TestClient::put(format!("http://example.com/sales/{uuid}"))
            .json(&body)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let sale: SaleResponse = res.take_json().await?;

        assert_eq!(sale.title, "Spring, extended");
        assert_eq!(sale.status, "pending");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_active_sale_returns_409() -> TestResult {
        let uuid = SaleUuid::new();
        let mut mocks = Mocks::new();

        mocks
            .lifecycle
            .expect_update_sale()
            .once()
            .return_once(|_, _, _| Err(LifecycleError::NotEditable(SaleStatus::Active)));

        let res = TestClient::put(format!("http://example.com/sales/{uuid}"))
            .json(&sale_body())
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_with_unknown_discount_type_returns_400() -> TestResult {
        let uuid = SaleUuid::new();

        let mut body = sale_body();
        body["discount_type"] = json!("bogo");

        let mut mocks = Mocks::new();

        mocks.lifecycle.expect_update_sale().never();

        let res = TestClient::put(format!("http://example.com/sales/{uuid}"))
            .json(&body)
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}

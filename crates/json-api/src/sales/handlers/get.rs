//! Get Sale Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    sales::{errors::from_sales_error, models::SaleResponse},
    state::State,
};

/// Get Sale Handler
#[endpoint(
    tags("sales"),
    summary = "Get Sale",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Sale"),
        (status_code = StatusCode::NOT_FOUND, description = "Sale not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    sale: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<SaleResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let shop = depot.shop_uuid_or_401()?;

    let sale = state
        .app
        .sales
        .get_sale(shop, sale.into_inner().into())
        .await
        .map_err(from_sales_error)?;

    Ok(Json(sale.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use pricedrop_app::domain::sales::{SalesServiceError, records::SaleUuid};

    use crate::test_helpers::{Mocks, TEST_SHOP_UUID, make_sale, service};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service(mocks, Router::with_path("sales/{sale}").get(handler))
    }

    #[tokio::test]
    async fn test_get_returns_sale_with_items() -> TestResult {
        let uuid = SaleUuid::new();
        let mut mocks = Mocks::new();

        mocks
            .sales
            .expect_get_sale()
            .once()
            .withf(move |shop, sale| *shop == TEST_SHOP_UUID && *sale == uuid)
            .return_once(move |_, _| Ok(make_sale(uuid)));

        let mut res = TestClient::get(format!("http://example.com/sales/{uuid}"))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let sale: SaleResponse = res.take_json().await?;

        assert_eq!(sale.uuid, uuid.into_uuid());
        assert_eq!(sale.strategy, "use_current_as_compare");
        assert_eq!(sale.starts_at, "2026-03-01T00:00:00Z");
        assert_eq!(sale.items.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_sale_returns_404() -> TestResult {
        let uuid = SaleUuid::new();
        let mut mocks = Mocks::new();

        mocks
            .sales
            .expect_get_sale()
            .once()
            .return_once(|_, _| Err(SalesServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/sales/{uuid}"))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_invalid_uuid_returns_400() -> TestResult {
        let mut mocks = Mocks::new();

        mocks.sales.expect_get_sale().never();

        let res = TestClient::get("http://example.com/sales/123")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}

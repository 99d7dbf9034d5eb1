//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use pricedrop::{
    catalog::{ProductId, VariantId},
    discounts::{Discount, DiscountStrategy},
    reversion::DeactivationStrategy,
    status::SaleStatus,
    windows::SaleWindow,
};
use pricedrop_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        lifecycle::MockLifecycleService,
        sales::{
            MockSalesService,
            records::{SaleItemRecord, SaleItemUuid, SaleRecord, SaleUuid},
        },
        scheduler::MockSchedulerService,
        shops::{MockShopsService, records::ShopUuid},
    },
};
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_SHOP_UUID: ShopUuid = ShopUuid::from_uuid(Uuid::nil());

#[salvo::handler]
pub(crate) async fn inject_shop(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_shop_uuid(TEST_SHOP_UUID);
    ctrl.call_next(req, depot, res).await;
}

/// Mocked services behind a handler under test. Calls without an expectation panic.
pub(crate) struct Mocks {
    pub(crate) sales: MockSalesService,
    pub(crate) lifecycle: MockLifecycleService,
    pub(crate) scheduler: MockSchedulerService,
    pub(crate) auth: MockAuthService,
}

impl Mocks {
    pub(crate) fn new() -> Self {
        Self {
            sales: MockSalesService::new(),
            lifecycle: MockLifecycleService::new(),
            scheduler: MockSchedulerService::new(),
            auth: MockAuthService::new(),
        }
    }

    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            shops: Arc::new(MockShopsService::new()),
            sales: Arc::new(self.sales),
            auth: Arc::new(self.auth),
            lifecycle: Arc::new(self.lifecycle),
            scheduler: Arc::new(self.scheduler),
        })
    }
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    Mocks {
        auth,
        ..Mocks::new()
    }
    .into_state()
}

/// Serve `route` with the mocks injected and the test shop already authenticated.
pub(crate) fn service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(inject_shop)
            .push(route),
    )
}

/// An active two-day, 20% sale over one variant.
pub(crate) fn make_sale(uuid: SaleUuid) -> SaleRecord {
    let start: Timestamp = "2026-03-01T00:00:00Z".parse().expect("valid timestamp");
    let end: Timestamp = "2026-03-03T00:00:00Z".parse().expect("valid timestamp");

    SaleRecord {
        uuid,
        shop: TEST_SHOP_UUID,
        title: "Spring".to_string(),
        discount: Discount::percentage(Decimal::from(20)).expect("valid discount"),
        window: SaleWindow::new(start, end).expect("valid window"),
        status: SaleStatus::Active,
        strategy: DiscountStrategy::UseCurrentAsCompare,
        deactivation: DeactivationStrategy::Restore,
        allow_override: false,
        exclude_drafts: false,
        exclude_on_sale: false,
        timer: None,
        tags_to_add: vec!["on-sale".to_string()],
        tags_to_remove: Vec::new(),
        items: vec![SaleItemRecord {
            uuid: SaleItemUuid::new(),
            product: ProductId::from("gid://shopify/Product/1"),
            variant: VariantId::from("gid://shopify/ProductVariant/11"),
            original_price: Decimal::new(10_000, 2),
        }],
        created_at: start,
        updated_at: start,
    }
}

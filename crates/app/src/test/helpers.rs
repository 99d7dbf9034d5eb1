//! Test Helpers

use std::error::Error;

use jiff::{Timestamp, ToSpan};
use pricedrop::{
    catalog::{ProductId, VariantId, VariantSnapshot},
    discounts::{Discount, DiscountStrategy},
    reversion::DeactivationStrategy,
    status::SaleStatus,
    windows::SaleWindow,
};
use rust_decimal::Decimal;

use crate::domain::{
    sales::{
        data::{NewSaleItem, SaleDetails},
        records::{SaleItemRecord, SaleItemUuid, SaleRecord, SaleUuid},
    },
    shops::records::{ShopRecord, ShopUuid},
};

pub(crate) type TestError = Box<dyn Error + Send + Sync>;

/// Midnight UTC of day `n` after the Unix epoch.
pub(crate) fn day(n: i64) -> Result<Timestamp, jiff::Error> {
    Timestamp::UNIX_EPOCH.checked_add((n * 24).hours())
}

pub(crate) fn shop_record() -> ShopRecord {
    ShopRecord {
        uuid: ShopUuid::new(),
        domain: "demo.myshopify.com".to_string(),
        access_token: "shpat_test".to_string(),
        variant_limit: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// Product id used for a variant in tests: one product per variant.
pub(crate) fn product_of(variant: &str) -> ProductId {
    ProductId::new(format!("product-{variant}"))
}

/// A variant priced at `price` with no compare-at price.
pub(crate) fn variant_snapshot(variant: &str, price: Decimal) -> VariantSnapshot {
    VariantSnapshot {
        variant: VariantId::from(variant),
        product: product_of(variant),
        price,
        compare_at: None,
    }
}

/// Ten percent off, current price shown as compare-at, two hour window from `start`.
pub(crate) fn sale_details(
    title: &str,
    variants: &[&str],
    start: Timestamp,
) -> Result<SaleDetails, TestError> {
    let end = start.checked_add(2.hours())?;

    details_with_window(title, variants, SaleWindow::new(start, end)?)
}

pub(crate) fn details_with_window(
    title: &str,
    variants: &[&str],
    window: SaleWindow,
) -> Result<SaleDetails, TestError> {
    Ok(SaleDetails {
        title: title.to_string(),
        discount: Discount::percentage(Decimal::TEN)?,
        window,
        strategy: DiscountStrategy::UseCurrentAsCompare,
        deactivation: DeactivationStrategy::Restore,
        allow_override: false,
        exclude_drafts: false,
        exclude_on_sale: false,
        timer: None,
        tags_to_add: Vec::new(),
        tags_to_remove: Vec::new(),
        items: variants
            .iter()
            .map(|variant| NewSaleItem {
                product: product_of(variant),
                variant: VariantId::from(*variant),
            })
            .collect(),
    })
}

/// Materialise stored state for a sale as the repositories would return it.
pub(crate) fn record_from(shop: ShopUuid, uuid: SaleUuid, details: SaleDetails) -> SaleRecord {
    SaleRecord {
        uuid,
        shop,
        title: details.title,
        discount: details.discount,
        window: details.window,
        status: SaleStatus::Pending,
        strategy: details.strategy,
        deactivation: details.deactivation,
        allow_override: details.allow_override,
        exclude_drafts: details.exclude_drafts,
        exclude_on_sale: details.exclude_on_sale,
        timer: details.timer,
        tags_to_add: details.tags_to_add,
        tags_to_remove: details.tags_to_remove,
        items: details
            .items
            .into_iter()
            .map(|item| SaleItemRecord {
                uuid: SaleItemUuid::new(),
                product: item.product,
                variant: item.variant,
                original_price: Decimal::ZERO,
            })
            .collect(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn sale_record(
    shop: ShopUuid,
    title: &str,
    variants: &[&str],
    start: Timestamp,
    end: Timestamp,
) -> Result<SaleRecord, TestError> {
    let details = details_with_window(title, variants, SaleWindow::new(start, end)?)?;

    Ok(record_from(shop, SaleUuid::new(), details))
}

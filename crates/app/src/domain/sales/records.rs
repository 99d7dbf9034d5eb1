//! Sale Records

use jiff::Timestamp;
use pricedrop::{
    catalog::{ProductId, VariantId},
    discounts::{Discount, DiscountStrategy},
    reversion::{DeactivationStrategy, RevertPlan},
    status::SaleStatus,
    windows::SaleWindow,
};
use rust_decimal::Decimal;

use crate::{domain::shops::records::ShopUuid, uuids::TypedUuid};

/// Sale UUID
pub type SaleUuid = TypedUuid<SaleRecord>;

/// Sale Item UUID
pub type SaleItemUuid = TypedUuid<SaleItemRecord>;

/// Countdown timer marker; timers are owned elsewhere and only referenced here.
#[derive(Debug)]
pub struct Timer;

/// Timer UUID
pub type TimerUuid = TypedUuid<Timer>;

/// Sale Record
#[derive(Debug, Clone)]
pub struct SaleRecord {
    pub uuid: SaleUuid,
    pub shop: ShopUuid,
    pub title: String,
    pub discount: Discount,
    pub window: SaleWindow,
    pub status: SaleStatus,
    pub strategy: DiscountStrategy,
    pub deactivation: DeactivationStrategy,
    pub allow_override: bool,
    pub exclude_drafts: bool,
    pub exclude_on_sale: bool,
    pub timer: Option<TimerUuid>,
    pub tags_to_add: Vec<String>,
    pub tags_to_remove: Vec<String>,
    pub items: Vec<SaleItemRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SaleRecord {
    /// Variants covered by this sale, in item order.
    #[must_use]
    pub fn variant_ids(&self) -> Vec<VariantId> {
        self.items.iter().map(|item| item.variant.clone()).collect()
    }

    /// Parameters needed to plan this sale's price reversion.
    #[must_use]
    pub fn revert_plan(&self) -> RevertPlan {
        RevertPlan {
            discount: self.discount,
            strategy: self.strategy,
            deactivation: self.deactivation,
        }
    }
}

/// Sale Item Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleItemRecord {
    pub uuid: SaleItemUuid,
    pub product: ProductId,
    pub variant: VariantId,

    /// Price captured at activation; zero before activation and again once the sale completes.
    pub original_price: Decimal,
}

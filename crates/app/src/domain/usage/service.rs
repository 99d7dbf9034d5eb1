//! Plan usage limiter.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use pricedrop::{catalog::VariantId, windows::SaleWindow};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::domain::{
    sales::{SalesService, records::SaleUuid},
    shops::{ShopsService, records::ShopUuid},
    usage::errors::UsageLimiterError,
};

/// Outcome of a usage gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitCheck {
    pub ok: bool,
    pub message: Option<String>,
}

impl LimitCheck {
    #[must_use]
    pub fn allowed() -> Self {
        Self {
            ok: true,
            message: None,
        }
    }

    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
        }
    }
}

/// Counts concurrently scheduled variants against the shop's plan.
#[derive(Clone)]
pub struct PlanUsageLimiter {
    shops: Arc<dyn ShopsService>,
    sales: Arc<dyn SalesService>,
}

impl PlanUsageLimiter {
    #[must_use]
    pub fn new(shops: Arc<dyn ShopsService>, sales: Arc<dyn SalesService>) -> Self {
        Self { shops, sales }
    }
}

#[async_trait]
impl UsageLimiter for PlanUsageLimiter {
    #[tracing::instrument(
        name = "usage.limiter.check_global_variant_limit",
        skip(self, variants),
        fields(shop_uuid = %shop, variant_count = variants.len()),
        err
    )]
    async fn check_global_variant_limit(
        &self,
        shop: ShopUuid,
        variants: &[VariantId],
        window: SaleWindow,
        exclude: Option<SaleUuid>,
    ) -> Result<LimitCheck, UsageLimiterError> {
        let Some(limit) = self.shops.get_shop(shop).await?.variant_limit else {
            return Ok(LimitCheck::allowed());
        };

        let scheduled = self
            .sales
            .list_overlapping_sales(shop, window, exclude)
            .await?;

        let mut distinct: FxHashSet<&VariantId> = variants.iter().collect();

        distinct.extend(
            scheduled
                .iter()
                .filter(|sale| Some(sale.uuid) != exclude)
                .flat_map(|sale| sale.items.iter().map(|item| &item.variant)),
        );

        let total = u64::try_from(distinct.len()).unwrap_or(u64::MAX);

        if total > limit {
            return Ok(LimitCheck::rejected(format!(
                "This sale would put {total} variants on sale at the same time, above your plan's \
                 limit of {limit}. Upgrade your plan to schedule more variants."
            )));
        }

        Ok(LimitCheck::allowed())
    }
}

#[automock]
#[async_trait]
pub trait UsageLimiter: Send + Sync {
    /// Gate a sale on the number of distinct variants scheduled during its window.
    async fn check_global_variant_limit(
        &self,
        shop: ShopUuid,
        variants: &[VariantId],
        window: SaleWindow,
        exclude: Option<SaleUuid>,
    ) -> Result<LimitCheck, UsageLimiterError>;
}

//! Sale lifecycle service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use pricedrop::{
    catalog::{ProductId, VariantId, VariantPriceUpdate},
    reversion::RevertDecision,
    status::{SaleStatus, Transition},
    windows::SaleWindow,
};
use tracing::{info, warn};

use crate::{
    catalog::{Catalog, SnapshotResolver, push_price_updates},
    domain::{
        lifecycle::{
            errors::LifecycleError,
            reports::{ActivationReport, Admission, RevertReport},
        },
        sales::{
            ConflictDetector, SalesService,
            data::{ActivatedItem, NewSale, SaleDetails},
            records::{SaleRecord, SaleUuid, TimerUuid},
        },
        shops::{
            ShopsService,
            records::{ShopRecord, ShopUuid},
        },
        usage::UsageLimiter,
    },
};

/// Candidate fields the overlap gate looks at.
struct Candidate<'a> {
    variants: &'a [VariantId],
    exclude: Option<SaleUuid>,
    window: SaleWindow,
    timer: Option<TimerUuid>,
    allow_override: bool,
}

#[derive(Clone)]
pub struct SaleLifecycle {
    sales: Arc<dyn SalesService>,
    shops: Arc<dyn ShopsService>,
    catalog: Arc<dyn Catalog>,
    limiter: Arc<dyn UsageLimiter>,
    resolver: SnapshotResolver,
    conflicts: ConflictDetector,
}

impl SaleLifecycle {
    #[must_use]
    pub fn new(
        sales: Arc<dyn SalesService>,
        shops: Arc<dyn ShopsService>,
        catalog: Arc<dyn Catalog>,
        limiter: Arc<dyn UsageLimiter>,
    ) -> Self {
        Self {
            resolver: SnapshotResolver::new(Arc::clone(&catalog)),
            conflicts: ConflictDetector::new(Arc::clone(&sales)),
            sales,
            shops,
            catalog,
            limiter,
        }
    }

    /// Blocking overlap message for a candidate, `None` when it may proceed.
    async fn blocking_overlap(
        &self,
        shop: ShopUuid,
        candidate: Candidate<'_>,
    ) -> Result<Option<String>, LifecycleError> {
        let check = self
            .conflicts
            .check_overlap(
                shop,
                candidate.variants,
                candidate.exclude,
                candidate.window,
                candidate.timer,
            )
            .await?;

        let Some(message) = check.message() else {
            return Ok(None);
        };

        if candidate.allow_override {
            warn!(%message, "overlapping sale allowed by override");

            return Ok(None);
        }

        Ok(Some(message))
    }

    async fn ensure_schedulable(
        &self,
        shop: ShopUuid,
        details: &SaleDetails,
        exclude: Option<SaleUuid>,
    ) -> Result<(), LifecycleError> {
        let variants = details.variant_ids();

        let blocking = self
            .blocking_overlap(
                shop,
                Candidate {
                    variants: &variants,
                    exclude,
                    window: details.window,
                    timer: details.timer,
                    allow_override: details.allow_override,
                },
            )
            .await?;

        match blocking {
            Some(message) => Err(LifecycleError::Conflict { message }),
            None => Ok(()),
        }
    }

    #[tracing::instrument(
        name = "lifecycle.run_activation",
        skip(self, shop, sale),
        fields(shop_uuid = %shop.uuid, sale_uuid = %sale.uuid, from = %sale.status),
        err
    )]
    async fn run_activation(
        &self,
        shop: &ShopRecord,
        sale: SaleRecord,
    ) -> Result<ActivationReport, LifecycleError> {
        let from = sale.status;
        let snapshots = self
            .resolver
            .fetch_variant_snapshots(shop, &sale.variant_ids())
            .await;

        let mut captured = Vec::with_capacity(sale.items.len());
        let mut updates: Vec<(ProductId, VariantPriceUpdate)> = Vec::with_capacity(sale.items.len());
        let mut skipped = 0;

        for item in &sale.items {
            let Some(snapshot) = snapshots.get(&item.variant) else {
                warn!(variant_id = %item.variant, "variant missing from catalog, skipping");
                skipped += 1;
                continue;
            };

            // An original stored by an interrupted attempt wins over the live price,
            // which may already be discounted.
            let stored = !item.original_price.is_zero();
            let original = if stored {
                item.original_price
            } else {
                snapshot.price
            };

            match sale
                .strategy
                .apply(original, snapshot.compare_at, &sale.discount)
            {
                Ok(change) => {
                    if !stored {
                        captured.push(ActivatedItem {
                            item: item.uuid,
                            original_price: original,
                        });
                    }
                    updates.push((
                        snapshot.product.clone(),
                        VariantPriceUpdate::new(item.variant.clone(), change),
                    ));
                }
                Err(err) => {
                    warn!(variant_id = %item.variant, error = %err, "cannot price variant, skipping");
                    skipped += 1;
                }
            }
        }

        let captured_count = captured.len();
        let still_current = self
            .sales
            .capture_original_prices(shop.uuid, sale.uuid, from, captured)
            .await?;

        if !still_current {
            info!("sale changed status concurrently, activation abandoned");

            return Ok(ActivationReport::noop(sale.uuid));
        }

        info!(captured = captured_count, "stored original prices");

        let outcome = push_price_updates(self.catalog.as_ref(), shop, updates).await;

        let transitioned = self
            .sales
            .transition_status(shop.uuid, sale.uuid, from, SaleStatus::Active)
            .await?;

        if !transitioned {
            warn!("sale was transitioned by another caller after prices were written");
        }

        if outcome.updated_variants == 0 {
            warn!("sale activated without updating any variant");
        }

        info!(
            updated = outcome.updated_variants,
            skipped,
            failed_products = outcome.failed_product_ids.len(),
            "activated sale"
        );

        Ok(ActivationReport {
            sale: sale.uuid,
            updated: outcome.updated_variants,
            skipped,
            outcome,
            transitioned,
        })
    }

    #[tracing::instrument(
        name = "lifecycle.run_revert",
        skip(self, shop, sale),
        fields(shop_uuid = %shop.uuid, sale_uuid = %sale.uuid),
        err
    )]
    async fn run_revert(
        &self,
        shop: &ShopRecord,
        sale: SaleRecord,
    ) -> Result<RevertReport, LifecycleError> {
        let plan = sale.revert_plan();
        let snapshots = self
            .resolver
            .fetch_variant_snapshots(shop, &sale.variant_ids())
            .await;

        let mut updates: Vec<(ProductId, VariantPriceUpdate)> = Vec::with_capacity(sale.items.len());
        let mut skipped = 0;

        for item in &sale.items {
            let Some(snapshot) = snapshots.get(&item.variant) else {
                warn!(variant_id = %item.variant, "variant missing from catalog, skipping");
                skipped += 1;
                continue;
            };

            match plan.decide(item.original_price, snapshot) {
                Ok(RevertDecision::Restore(change)) => updates.push((
                    snapshot.product.clone(),
                    VariantPriceUpdate::new(item.variant.clone(), change),
                )),
                Ok(RevertDecision::Skip(reason)) => {
                    warn!(variant_id = %item.variant, %reason, "leaving variant price untouched");
                    skipped += 1;
                }
                Err(err) => {
                    warn!(variant_id = %item.variant, error = %err, "cannot compute expected price, skipping");
                    skipped += 1;
                }
            }
        }

        let current = self.sales.get_sale_status(shop.uuid, sale.uuid).await?;

        if current != SaleStatus::Active {
            info!(%current, "sale changed status concurrently, revert abandoned");

            return Ok(RevertReport::noop(sale.uuid));
        }

        let outcome = push_price_updates(self.catalog.as_ref(), shop, updates).await;

        let transitioned = self.sales.complete_sale(shop.uuid, sale.uuid).await?;

        info!(
            restored = outcome.updated_variants,
            skipped,
            failed_products = outcome.failed_product_ids.len(),
            transitioned,
            "reverted sale"
        );

        Ok(RevertReport {
            sale: sale.uuid,
            restored: outcome.updated_variants,
            skipped,
            outcome,
            transitioned,
        })
    }
}

#[async_trait]
impl LifecycleService for SaleLifecycle {
    async fn create_sale(
        &self,
        shop: ShopUuid,
        sale: NewSale,
    ) -> Result<SaleRecord, LifecycleError> {
        sale.details.validate()?;

        self.ensure_schedulable(shop, &sale.details, None).await?;

        Ok(self.sales.create_sale(shop, sale).await?)
    }

    async fn update_sale(
        &self,
        shop: ShopUuid,
        sale: SaleUuid,
        details: SaleDetails,
    ) -> Result<SaleRecord, LifecycleError> {
        details.validate()?;

        let status = self.sales.get_sale_status(shop, sale).await?;

        if status == SaleStatus::Active {
            return Err(LifecycleError::NotEditable(status));
        }

        self.ensure_schedulable(shop, &details, Some(sale)).await?;

        Ok(self.sales.update_sale(shop, sale, details).await?)
    }

    #[tracing::instrument(
        name = "lifecycle.admit",
        skip(self, sale),
        fields(shop_uuid = %shop, sale_uuid = %sale.uuid),
        err
    )]
    async fn admit(&self, shop: ShopUuid, sale: &SaleRecord) -> Result<Admission, LifecycleError> {
        let variants = sale.variant_ids();

        let blocking = self
            .blocking_overlap(
                shop,
                Candidate {
                    variants: &variants,
                    exclude: Some(sale.uuid),
                    window: sale.window,
                    timer: sale.timer,
                    allow_override: sale.allow_override,
                },
            )
            .await?;

        if let Some(message) = blocking {
            return Ok(Admission::Conflict(message));
        }

        let limit = self
            .limiter
            .check_global_variant_limit(shop, &variants, sale.window, Some(sale.uuid))
            .await?;

        if !limit.ok {
            return Ok(Admission::LimitExceeded(limit.message.unwrap_or_default()));
        }

        Ok(Admission::Admitted)
    }

    async fn activate(
        &self,
        shop: ShopUuid,
        sale: SaleUuid,
    ) -> Result<ActivationReport, LifecycleError> {
        let record = self.sales.get_sale(shop, sale).await?;

        if let Err(err) = record.status.next(Transition::Activate) {
            info!(sale_uuid = %sale, reason = %err, "activation is a no-op");

            return Ok(ActivationReport::noop(sale));
        }

        let shop = self.shops.get_shop(shop).await?;

        self.run_activation(&shop, record).await
    }

    async fn reactivate(
        &self,
        shop: ShopUuid,
        sale: SaleUuid,
    ) -> Result<ActivationReport, LifecycleError> {
        let record = self.sales.get_sale(shop, sale).await?;

        record.status.next(Transition::Reactivate)?;

        match self.admit(shop, &record).await? {
            Admission::Admitted => {}
            Admission::Conflict(message) => return Err(LifecycleError::Conflict { message }),
            Admission::LimitExceeded(message) => {
                return Err(LifecycleError::LimitExceeded { message });
            }
        }

        let shop = self.shops.get_shop(shop).await?;

        self.run_activation(&shop, record).await
    }

    async fn revert(&self, shop: ShopUuid, sale: SaleUuid) -> Result<RevertReport, LifecycleError> {
        let record = self.sales.get_sale(shop, sale).await?;

        if let Err(err) = record.status.next(Transition::Revert) {
            info!(sale_uuid = %sale, reason = %err, "revert is a no-op");

            return Ok(RevertReport::noop(sale));
        }

        let shop = self.shops.get_shop(shop).await?;

        self.run_revert(&shop, record).await
    }

    async fn deactivate(
        &self,
        shop: ShopUuid,
        sale: SaleUuid,
    ) -> Result<RevertReport, LifecycleError> {
        let record = self.sales.get_sale(shop, sale).await?;

        record.status.next(Transition::Revert)?;

        let shop = self.shops.get_shop(shop).await?;

        self.run_revert(&shop, record).await
    }

    #[tracing::instrument(
        name = "lifecycle.delete_sale",
        skip(self),
        fields(shop_uuid = %shop, sale_uuid = %sale),
        err
    )]
    async fn delete_sale(
        &self,
        shop: ShopUuid,
        sale: SaleUuid,
    ) -> Result<Option<RevertReport>, LifecycleError> {
        let record = self.sales.get_sale(shop, sale).await?;

        let reverted = if record.status == SaleStatus::Active {
            let shop_record = self.shops.get_shop(shop).await?;

            Some(self.run_revert(&shop_record, record).await?)
        } else {
            None
        };

        self.sales.delete_sale(shop, sale).await?;

        info!("deleted sale");

        Ok(reverted)
    }
}

#[automock]
#[async_trait]
pub trait LifecycleService: Send + Sync {
    /// Validate, gate on conflicts and store a new pending sale.
    async fn create_sale(&self, shop: ShopUuid, sale: NewSale)
    -> Result<SaleRecord, LifecycleError>;

    /// Validate, gate on conflicts and replace a non-active sale.
    async fn update_sale(
        &self,
        shop: ShopUuid,
        sale: SaleUuid,
        details: SaleDetails,
    ) -> Result<SaleRecord, LifecycleError>;

    /// Run the overlap and plan usage gates for a sale about to activate.
    async fn admit(&self, shop: ShopUuid, sale: &SaleRecord) -> Result<Admission, LifecycleError>;

    /// Activate a pending sale. A no-op for sales in any other status.
    async fn activate(
        &self,
        shop: ShopUuid,
        sale: SaleUuid,
    ) -> Result<ActivationReport, LifecycleError>;

    /// User-initiated activation of a pending or completed sale, gated like the scheduler.
    async fn reactivate(
        &self,
        shop: ShopUuid,
        sale: SaleUuid,
    ) -> Result<ActivationReport, LifecycleError>;

    /// Revert an active sale. A no-op for sales in any other status.
    async fn revert(&self, shop: ShopUuid, sale: SaleUuid) -> Result<RevertReport, LifecycleError>;

    /// User-initiated revert; fails unless the sale is active.
    async fn deactivate(
        &self,
        shop: ShopUuid,
        sale: SaleUuid,
    ) -> Result<RevertReport, LifecycleError>;

    /// Delete a sale, reverting it first when active.
    async fn delete_sale(
        &self,
        shop: ShopUuid,
        sale: SaleUuid,
    ) -> Result<Option<RevertReport>, LifecycleError>;
}

#[cfg(test)]
mod tests {
    use pricedrop::{
        catalog::VariantSnapshot,
        discounts::{Discount, DiscountStrategy},
    };
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        domain::{
            shops::MockShopsService,
            usage::{LimitCheck, MockUsageLimiter},
        },
        test::{
            fakes::{FakeCatalog, FakeSalesService},
            helpers::{
                day, details_with_window, product_of, sale_record, shop_record, variant_snapshot,
            },
        },
    };

    use super::*;

    struct Harness {
        shop: ShopRecord,
        sales: Arc<FakeSalesService>,
        catalog: Arc<FakeCatalog>,
        lifecycle: SaleLifecycle,
    }

    fn harness(
        shop: ShopRecord,
        sales: Vec<SaleRecord>,
        catalog: FakeCatalog,
        limiter: MockUsageLimiter,
    ) -> Harness {
        let sales = Arc::new(FakeSalesService::with_sales(sales));
        let catalog = Arc::new(catalog);

        let mut shops = MockShopsService::new();
        let record = shop.clone();

        shops
            .expect_get_shop()
            .returning(move |_| Ok(record.clone()));

        Harness {
            lifecycle: SaleLifecycle::new(
                sales.clone(),
                Arc::new(shops),
                catalog.clone(),
                Arc::new(limiter),
            ),
            shop,
            sales,
            catalog,
        }
    }

    fn allow_all() -> MockUsageLimiter {
        let mut limiter = MockUsageLimiter::new();

        limiter
            .expect_check_global_variant_limit()
            .returning(|_, _, _, _| Ok(LimitCheck::allowed()));

        limiter
    }

    fn priced_at_100(variants: &[&str]) -> FakeCatalog {
        FakeCatalog::new(
            variants
                .iter()
                .map(|variant| variant_snapshot(variant, Decimal::from(100))),
        )
    }

    #[tokio::test]
    async fn activation_discounts_every_variant_and_captures_originals() -> TestResult {
        let shop = shop_record();
        let sale = sale_record(shop.uuid, "Spring", &["v1", "v2", "v3"], day(1)?, day(2)?)?;
        let uuid = sale.uuid;
        let h = harness(shop, vec![sale], priced_at_100(&["v1", "v2", "v3"]), allow_all());

        let report = h.lifecycle.activate(h.shop.uuid, uuid).await?;

        assert!(report.transitioned);
        assert_eq!(report.updated, 3);
        assert_eq!(report.skipped, 0);

        for variant in ["v1", "v2", "v3"] {
            let snapshot = h.catalog.snapshot(variant).ok_or("variant missing")?;

            assert_eq!(snapshot.price, Decimal::from(90));
            assert_eq!(snapshot.compare_at, Some(Decimal::from(100)));
        }

        let stored = h.sales.sale(uuid).ok_or("sale missing")?;

        assert_eq!(stored.status, SaleStatus::Active);
        assert!(
            stored
                .items
                .iter()
                .all(|item| item.original_price == Decimal::from(100))
        );

        Ok(())
    }

    #[tokio::test]
    async fn second_activation_is_a_noop() -> TestResult {
        let shop = shop_record();
        let sale = sale_record(shop.uuid, "Spring", &["v1", "v2"], day(1)?, day(2)?)?;
        let uuid = sale.uuid;
        let h = harness(shop, vec![sale], priced_at_100(&["v1", "v2"]), allow_all());

        h.lifecycle.activate(h.shop.uuid, uuid).await?;

        let fetches = h.catalog.fetch_calls();
        let updates = h.catalog.update_calls();

        let again = h.lifecycle.activate(h.shop.uuid, uuid).await?;

        assert_eq!(again, ActivationReport::noop(uuid));
        assert_eq!(h.catalog.fetch_calls(), fetches);
        assert_eq!(h.catalog.update_calls(), updates);
        assert_eq!(
            h.catalog.snapshot("v1").map(|s| s.price),
            Some(Decimal::from(90))
        );

        Ok(())
    }

    #[tokio::test]
    async fn retry_after_failed_status_write_keeps_the_first_original() -> TestResult {
        let shop = shop_record();
        let sale = sale_record(shop.uuid, "Spring", &["v1"], day(1)?, day(2)?)?;
        let uuid = sale.uuid;
        let h = harness(shop, vec![sale], priced_at_100(&["v1"]), allow_all());

        h.sales.fail_next_status_write();

        let first = h.lifecycle.activate(h.shop.uuid, uuid).await;

        assert!(first.is_err(), "expected the status write to fail, got {first:?}");

        let interrupted = h.sales.sale(uuid).ok_or("sale missing")?;

        assert_eq!(interrupted.status, SaleStatus::Pending);
        assert_eq!(
            interrupted.items.first().map(|item| item.original_price),
            Some(Decimal::from(100))
        );
        assert_eq!(
            h.catalog.snapshot("v1").map(|s| s.price),
            Some(Decimal::from(90))
        );

        let retried = h.lifecycle.activate(h.shop.uuid, uuid).await?;

        assert!(retried.transitioned);
        assert_eq!(h.sales.status(uuid), Some(SaleStatus::Active));
        assert_eq!(
            h.catalog.snapshot("v1").map(|s| s.price),
            Some(Decimal::from(90))
        );

        let reverted = h.lifecycle.revert(h.shop.uuid, uuid).await?;

        assert!(reverted.transitioned);
        assert_eq!(reverted.restored, 1);
        assert_eq!(
            h.catalog.snapshot("v1").map(|s| s.price),
            Some(Decimal::from(100))
        );

        Ok(())
    }

    #[tokio::test]
    async fn reactivation_captures_fresh_originals() -> TestResult {
        let shop = shop_record();
        let sale = sale_record(shop.uuid, "Spring", &["v1"], day(1)?, day(2)?)?;
        let uuid = sale.uuid;
        let h = harness(shop, vec![sale], priced_at_100(&["v1"]), allow_all());

        h.lifecycle.activate(h.shop.uuid, uuid).await?;
        h.lifecycle.revert(h.shop.uuid, uuid).await?;

        let completed = h.sales.sale(uuid).ok_or("sale missing")?;

        assert!(completed.items.iter().all(|item| item.original_price.is_zero()));

        h.catalog.set_price("v1", Decimal::from(200));
        h.lifecycle.reactivate(h.shop.uuid, uuid).await?;

        let reactivated = h.sales.sale(uuid).ok_or("sale missing")?;

        assert_eq!(
            reactivated.items.first().map(|item| item.original_price),
            Some(Decimal::from(200))
        );
        assert_eq!(
            h.catalog.snapshot("v1").map(|s| s.price),
            Some(Decimal::from(180))
        );

        Ok(())
    }

    #[tokio::test]
    async fn compare_at_strategy_round_trips_through_revert() -> TestResult {
        let shop = shop_record();
        let mut sale = sale_record(shop.uuid, "Clearance", &["v1"], day(1)?, day(2)?)?;

        sale.strategy = DiscountStrategy::CompareAt;
        sale.discount = Discount::percentage(Decimal::from(20))?;

        let uuid = sale.uuid;
        let catalog = FakeCatalog::new([VariantSnapshot {
            compare_at: Some(Decimal::from(150)),
            ..variant_snapshot("v1", Decimal::from(100))
        }]);
        let h = harness(shop, vec![sale], catalog, allow_all());

        h.lifecycle.activate(h.shop.uuid, uuid).await?;

        let discounted = h.catalog.snapshot("v1").ok_or("variant missing")?;

        assert_eq!(discounted.price, Decimal::from(120));
        assert_eq!(discounted.compare_at, Some(Decimal::from(150)));

        let report = h.lifecycle.revert(h.shop.uuid, uuid).await?;

        assert!(report.transitioned);
        assert_eq!(report.restored, 1);

        let restored = h.catalog.snapshot("v1").ok_or("variant missing")?;

        assert_eq!(restored.price, Decimal::from(100));
        assert_eq!(restored.compare_at, Some(Decimal::from(150)));

        Ok(())
    }

    #[tokio::test]
    async fn revert_leaves_hand_edited_prices_alone() -> TestResult {
        let shop = shop_record();
        let sale = sale_record(shop.uuid, "Spring", &["v1", "v2", "v3"], day(1)?, day(2)?)?;
        let uuid = sale.uuid;
        let h = harness(shop, vec![sale], priced_at_100(&["v1", "v2", "v3"]), allow_all());

        h.lifecycle.activate(h.shop.uuid, uuid).await?;
        h.catalog.set_price("v2", Decimal::from(65));

        let report = h.lifecycle.revert(h.shop.uuid, uuid).await?;

        assert!(report.transitioned);
        assert_eq!(report.restored, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(h.sales.status(uuid), Some(SaleStatus::Completed));

        let edited = h.catalog.snapshot("v2").ok_or("variant missing")?;
        let restored = h.catalog.snapshot("v1").ok_or("variant missing")?;

        assert_eq!(edited.price, Decimal::from(65));
        assert_eq!(restored.price, Decimal::from(100));
        assert_eq!(restored.compare_at, None);

        Ok(())
    }

    #[tokio::test]
    async fn revert_of_pending_sale_is_a_noop() -> TestResult {
        let shop = shop_record();
        let sale = sale_record(shop.uuid, "Spring", &["v1"], day(1)?, day(2)?)?;
        let uuid = sale.uuid;
        let h = harness(shop, vec![sale], priced_at_100(&["v1"]), allow_all());

        let report = h.lifecycle.revert(h.shop.uuid, uuid).await?;

        assert_eq!(report, RevertReport::noop(uuid));
        assert_eq!(h.catalog.fetch_calls(), 0);
        assert_eq!(h.sales.status(uuid), Some(SaleStatus::Pending));

        Ok(())
    }

    #[tokio::test]
    async fn deactivating_a_pending_sale_is_rejected() -> TestResult {
        let shop = shop_record();
        let sale = sale_record(shop.uuid, "Spring", &["v1"], day(1)?, day(2)?)?;
        let uuid = sale.uuid;
        let h = harness(shop, vec![sale], priced_at_100(&["v1"]), allow_all());

        let result = h.lifecycle.deactivate(h.shop.uuid, uuid).await;

        assert!(
            matches!(result, Err(LifecycleError::InvalidTransition(_))),
            "expected InvalidTransition, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn deleting_an_active_sale_restores_prices_once() -> TestResult {
        let shop = shop_record();
        let sale = sale_record(shop.uuid, "Spring", &["v1", "v2", "v3"], day(1)?, day(2)?)?;
        let uuid = sale.uuid;
        let h = harness(shop, vec![sale], priced_at_100(&["v1", "v2", "v3"]), allow_all());

        h.lifecycle.activate(h.shop.uuid, uuid).await?;

        let report = h
            .lifecycle
            .delete_sale(h.shop.uuid, uuid)
            .await?
            .ok_or("active sale should have been reverted")?;

        assert_eq!(report.restored, 3);
        assert_eq!(h.sales.len(), 0);

        // One bulk update per product on activation and again on revert.
        assert_eq!(h.catalog.update_calls(), 6);

        for variant in ["v1", "v2", "v3"] {
            assert_eq!(
                h.catalog.snapshot(variant).map(|s| s.price),
                Some(Decimal::from(100))
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn deleting_a_pending_sale_skips_the_catalog() -> TestResult {
        let shop = shop_record();
        let sale = sale_record(shop.uuid, "Spring", &["v1"], day(1)?, day(2)?)?;
        let uuid = sale.uuid;
        let h = harness(shop, vec![sale], priced_at_100(&["v1"]), allow_all());

        let reverted = h.lifecycle.delete_sale(h.shop.uuid, uuid).await?;

        assert!(reverted.is_none());
        assert_eq!(h.sales.len(), 0);
        assert_eq!(h.catalog.fetch_calls(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn failing_product_does_not_block_the_rest() -> TestResult {
        let shop = shop_record();
        let sale = sale_record(shop.uuid, "Spring", &["v1", "v2", "v3"], day(1)?, day(2)?)?;
        let uuid = sale.uuid;
        let catalog = priced_at_100(&["v1", "v2", "v3"]).failing(product_of("v2"));
        let h = harness(shop, vec![sale], catalog, allow_all());

        let report = h.lifecycle.activate(h.shop.uuid, uuid).await?;

        assert!(report.transitioned);
        assert_eq!(report.updated, 2);
        assert_eq!(report.outcome.failed_product_ids, vec![product_of("v2")]);
        assert_eq!(
            h.catalog.snapshot("v2").map(|s| s.price),
            Some(Decimal::from(100))
        );
        assert_eq!(
            h.catalog.snapshot("v3").map(|s| s.price),
            Some(Decimal::from(90))
        );

        Ok(())
    }

    #[tokio::test]
    async fn variants_missing_upstream_are_skipped() -> TestResult {
        let shop = shop_record();
        let sale = sale_record(shop.uuid, "Spring", &["v1", "gone"], day(1)?, day(2)?)?;
        let uuid = sale.uuid;
        let h = harness(shop, vec![sale], priced_at_100(&["v1"]), allow_all());

        let report = h.lifecycle.activate(h.shop.uuid, uuid).await?;

        assert_eq!(report.updated, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(h.sales.status(uuid), Some(SaleStatus::Active));

        Ok(())
    }

    #[tokio::test]
    async fn overlapping_create_is_rejected_unless_overridden() -> TestResult {
        let shop = shop_record();
        let existing = sale_record(shop.uuid, "January", &["v1"], day(1)?, day(10)?)?;
        let h = harness(shop, vec![existing], priced_at_100(&["v1"]), allow_all());

        let window = SaleWindow::new(day(5)?, day(15)?)?;
        let details = details_with_window("Overlap", &["v1", "v2"], window)?;

        let result = h
            .lifecycle
            .create_sale(
                h.shop.uuid,
                NewSale {
                    uuid: SaleUuid::new(),
                    details: details.clone(),
                },
            )
            .await;

        match result {
            Err(LifecycleError::Conflict { message }) => assert!(message.contains("January")),
            other => panic!("expected Conflict, got {other:?}"),
        }

        let overridden = SaleDetails {
            allow_override: true,
            ..details
        };

        h.lifecycle
            .create_sale(
                h.shop.uuid,
                NewSale {
                    uuid: SaleUuid::new(),
                    details: overridden,
                },
            )
            .await?;

        assert_eq!(h.sales.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn active_sales_cannot_be_edited() -> TestResult {
        let shop = shop_record();
        let mut sale = sale_record(shop.uuid, "Spring", &["v1"], day(1)?, day(2)?)?;

        sale.status = SaleStatus::Active;

        let uuid = sale.uuid;
        let h = harness(shop, vec![sale], priced_at_100(&["v1"]), allow_all());

        let details = details_with_window("Edited", &["v1"], SaleWindow::new(day(1)?, day(3)?)?)?;
        let result = h.lifecycle.update_sale(h.shop.uuid, uuid, details).await;

        assert!(
            matches!(result, Err(LifecycleError::NotEditable(SaleStatus::Active))),
            "expected NotEditable, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn reactivation_respects_the_plan_limit() -> TestResult {
        let shop = shop_record();
        let mut sale = sale_record(shop.uuid, "Spring", &["v1"], day(1)?, day(2)?)?;

        sale.status = SaleStatus::Completed;

        let uuid = sale.uuid;

        let mut limiter = MockUsageLimiter::new();

        limiter
            .expect_check_global_variant_limit()
            .times(1)
            .returning(|_, _, _, _| Ok(LimitCheck::rejected("Upgrade your plan")));

        let h = harness(shop, vec![sale], priced_at_100(&["v1"]), limiter);

        let result = h.lifecycle.reactivate(h.shop.uuid, uuid).await;

        assert!(
            matches!(result, Err(LifecycleError::LimitExceeded { .. })),
            "expected LimitExceeded, got {result:?}"
        );
        assert_eq!(h.catalog.update_calls(), 0);
        assert_eq!(h.sales.status(uuid), Some(SaleStatus::Completed));

        Ok(())
    }

    #[tokio::test]
    async fn reactivation_is_blocked_by_overlapping_sales() -> TestResult {
        let shop = shop_record();
        let mut finished = sale_record(shop.uuid, "Spring", &["v1"], day(1)?, day(3)?)?;

        finished.status = SaleStatus::Completed;

        let uuid = finished.uuid;
        let pending = sale_record(shop.uuid, "Summer", &["v1"], day(2)?, day(4)?)?;
        let h = harness(shop, vec![finished, pending], priced_at_100(&["v1"]), allow_all());

        let result = h.lifecycle.reactivate(h.shop.uuid, uuid).await;

        match result {
            Err(LifecycleError::Conflict { message }) => assert!(message.contains("Summer")),
            other => panic!("expected Conflict, got {other:?}"),
        }

        Ok(())
    }

    #[tokio::test]
    async fn completed_sale_can_be_reactivated() -> TestResult {
        let shop = shop_record();
        let mut sale = sale_record(shop.uuid, "Spring", &["v1"], day(1)?, day(2)?)?;

        sale.status = SaleStatus::Completed;

        let uuid = sale.uuid;
        let h = harness(shop, vec![sale], priced_at_100(&["v1"]), allow_all());

        let report = h.lifecycle.reactivate(h.shop.uuid, uuid).await?;

        assert!(report.transitioned);
        assert_eq!(h.sales.status(uuid), Some(SaleStatus::Active));

        Ok(())
    }
}

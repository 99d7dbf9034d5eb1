//! Scheduler driver service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::domain::{
    lifecycle::{Admission, LifecycleService},
    sales::{SalesService, records::SaleRecord},
    scheduler::errors::SchedulerError,
    shops::{ShopsService, records::ShopUuid},
};

/// Which shops a tick starts sales for. Ended sales are always swept for every shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickScope {
    Shop(ShopUuid),
    AllShops,
}

impl TickScope {
    fn includes(self, shop: ShopUuid) -> bool {
        match self {
            Self::Shop(scoped) => scoped == shop,
            Self::AllShops => true,
        }
    }
}

/// What one tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickSummary {
    /// Sales moved to active by this tick.
    pub started: usize,

    /// Sales moved to completed by this tick.
    pub ended: usize,

    /// Titles of every sale that was due to start.
    pub sales_to_start: Vec<String>,

    /// Titles of every sale that was due to end.
    pub sales_to_end: Vec<String>,

    /// Titles of pending sales whose window passed before any tick started them.
    pub sales_missed: Vec<String>,
}

#[derive(Clone)]
pub struct SchedulerDriver {
    sales: Arc<dyn SalesService>,
    shops: Arc<dyn ShopsService>,
    lifecycle: Arc<dyn LifecycleService>,
}

impl SchedulerDriver {
    #[must_use]
    pub fn new(
        sales: Arc<dyn SalesService>,
        shops: Arc<dyn ShopsService>,
        lifecycle: Arc<dyn LifecycleService>,
    ) -> Self {
        Self {
            sales,
            shops,
            lifecycle,
        }
    }

    async fn start_due_sales(
        &self,
        shop: ShopUuid,
        now: Timestamp,
        summary: &mut TickSummary,
    ) -> Result<(), SchedulerError> {
        for sale in self.sales.list_due_to_start(shop, now).await? {
            summary.sales_to_start.push(sale.title.clone());

            if self.start_sale(shop, &sale).await {
                summary.started += 1;
            }
        }

        for sale in self.sales.list_missed_sales(shop, now).await? {
            warn!(
                shop_uuid = %shop,
                sale_uuid = %sale.uuid,
                ends_at = %sale.window.end(),
                "sale window passed while it was still pending"
            );

            summary.sales_missed.push(sale.title);
        }

        Ok(())
    }

    /// Gate and activate one sale, `true` when this call moved it to active.
    async fn start_sale(&self, shop: ShopUuid, sale: &SaleRecord) -> bool {
        match self.lifecycle.admit(shop, sale).await {
            Ok(Admission::Admitted) => {}
            Ok(Admission::Conflict(message)) => {
                info!(sale_uuid = %sale.uuid, %message, "sale deferred by overlapping sale");

                return false;
            }
            Ok(Admission::LimitExceeded(message)) => {
                info!(sale_uuid = %sale.uuid, %message, "sale deferred by plan limit");

                return false;
            }
            Err(err) => {
                error!(sale_uuid = %sale.uuid, error = %err, "failed to gate sale");

                return false;
            }
        }

        match self.lifecycle.activate(shop, sale.uuid).await {
            Ok(report) => report.transitioned,
            Err(err) => {
                error!(sale_uuid = %sale.uuid, error = %err, "failed to activate sale");

                false
            }
        }
    }

    async fn end_due_sales(
        &self,
        scope: TickScope,
        now: Timestamp,
        summary: &mut TickSummary,
    ) -> Result<(), SchedulerError> {
        for sale in self.sales.list_due_to_end(now).await? {
            let reported = scope.includes(sale.shop);

            if reported {
                summary.sales_to_end.push(sale.title.clone());
            }

            match self.lifecycle.revert(sale.shop, sale.uuid).await {
                Ok(report) if report.transitioned && reported => summary.ended += 1,
                Ok(_) => {}
                Err(err) => {
                    error!(
                        shop_uuid = %sale.shop,
                        sale_uuid = %sale.uuid,
                        error = %err,
                        "failed to revert sale"
                    );
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl SchedulerService for SchedulerDriver {
    #[tracing::instrument(name = "scheduler.tick", skip(self), err)]
    async fn tick(&self, scope: TickScope, now: Timestamp) -> Result<TickSummary, SchedulerError> {
        let mut summary = TickSummary::default();

        let shops = match scope {
            TickScope::Shop(shop) => vec![shop],
            TickScope::AllShops => self
                .shops
                .list_shops()
                .await?
                .into_iter()
                .map(|shop| shop.uuid)
                .collect(),
        };

        for shop in shops {
            self.start_due_sales(shop, now, &mut summary).await?;
        }

        self.end_due_sales(scope, now, &mut summary).await?;

        info!(
            started = summary.started,
            ended = summary.ended,
            due_to_start = summary.sales_to_start.len(),
            due_to_end = summary.sales_to_end.len(),
            missed = summary.sales_missed.len(),
            "scheduler tick finished"
        );

        Ok(summary)
    }
}

#[automock]
#[async_trait]
pub trait SchedulerService: Send + Sync {
    /// Start due sales for `scope` and revert every sale that has ended by `now`.
    async fn tick(&self, scope: TickScope, now: Timestamp) -> Result<TickSummary, SchedulerError>;
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use pricedrop::{catalog::PartialOutcome, status::SaleStatus};
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        domain::{
            lifecycle::{
                ActivationReport, LifecycleError, MockLifecycleService, RevertReport,
                SaleLifecycle,
            },
            sales::records::SaleUuid,
            shops::{MockShopsService, ShopsServiceError, records::ShopRecord},
            usage::{LimitCheck, MockUsageLimiter},
        },
        test::{
            fakes::{FakeCatalog, FakeSalesService},
            helpers::{sale_record, shop_record, variant_snapshot},
        },
    };

    use super::*;

    fn shops_of(records: Vec<ShopRecord>) -> MockShopsService {
        let mut shops = MockShopsService::new();
        let listed = records.clone();

        shops
            .expect_list_shops()
            .returning(move || Ok(listed.clone()));

        shops.expect_get_shop().returning(move |uuid| {
            records
                .iter()
                .find(|shop| shop.uuid == uuid)
                .cloned()
                .ok_or(ShopsServiceError::NotFound)
        });

        shops
    }

    fn activated(sale: SaleUuid) -> ActivationReport {
        ActivationReport {
            sale,
            updated: 1,
            skipped: 0,
            outcome: PartialOutcome::default(),
            transitioned: true,
        }
    }

    #[tokio::test]
    async fn sale_runs_from_start_to_finish_across_two_ticks() -> TestResult {
        let shop = shop_record();
        let now = Timestamp::now();
        let sale = sale_record(
            shop.uuid,
            "Spring",
            &["v1", "v2", "v3"],
            now.checked_sub(1.hour())?,
            now.checked_add(1.hour())?,
        )?;
        let uuid = sale.uuid;

        let sales = Arc::new(FakeSalesService::with_sales(vec![sale]));
        let catalog = Arc::new(FakeCatalog::new(
            ["v1", "v2", "v3"].map(|variant| variant_snapshot(variant, Decimal::from(100))),
        ));
        let shops: Arc<dyn ShopsService> = Arc::new(shops_of(vec![shop.clone()]));

        let mut limiter = MockUsageLimiter::new();

        limiter
            .expect_check_global_variant_limit()
            .returning(|_, _, _, _| Ok(LimitCheck::allowed()));

        let lifecycle = Arc::new(SaleLifecycle::new(
            sales.clone(),
            Arc::clone(&shops),
            catalog.clone(),
            Arc::new(limiter),
        ));
        let driver = SchedulerDriver::new(sales.clone(), shops, lifecycle);

        let first = driver.tick(TickScope::Shop(shop.uuid), now).await?;

        assert_eq!(first.started, 1);
        assert_eq!(first.sales_to_start, vec!["Spring".to_string()]);
        assert_eq!(sales.status(uuid), Some(SaleStatus::Active));

        for variant in ["v1", "v2", "v3"] {
            assert_eq!(
                catalog.snapshot(variant).map(|s| s.price),
                Some(Decimal::from(90))
            );
        }

        let later = now.checked_add(2.hours())?;
        let second = driver.tick(TickScope::Shop(shop.uuid), later).await?;

        assert_eq!(second.started, 0);
        assert_eq!(second.ended, 1);
        assert_eq!(second.sales_to_end, vec!["Spring".to_string()]);
        assert_eq!(sales.status(uuid), Some(SaleStatus::Completed));

        for variant in ["v1", "v2", "v3"] {
            let snapshot = catalog.snapshot(variant).ok_or("variant missing")?;

            assert_eq!(snapshot.price, Decimal::from(100));
            assert_eq!(snapshot.compare_at, None);
        }

        let idle = driver.tick(TickScope::Shop(shop.uuid), later).await?;

        assert_eq!(idle, TickSummary::default());

        Ok(())
    }

    #[tokio::test]
    async fn pending_sale_past_its_window_is_reported_as_missed() -> TestResult {
        let shop = shop_record();
        let now = Timestamp::now();
        let sale = sale_record(
            shop.uuid,
            "Overnight",
            &["v1"],
            now.checked_sub(3.hours())?,
            now.checked_sub(1.hour())?,
        )?;
        let uuid = sale.uuid;

        let mut lifecycle = MockLifecycleService::new();

        lifecycle.expect_admit().never();
        lifecycle.expect_activate().never();
        lifecycle.expect_revert().never();

        let sales = Arc::new(FakeSalesService::with_sales(vec![sale]));
        let driver = SchedulerDriver::new(
            sales.clone(),
            Arc::new(shops_of(vec![shop.clone()])),
            Arc::new(lifecycle),
        );

        let summary = driver.tick(TickScope::Shop(shop.uuid), now).await?;

        assert_eq!(summary.started, 0);
        assert!(summary.sales_to_start.is_empty());
        assert_eq!(summary.sales_missed, vec!["Overnight".to_string()]);
        assert_eq!(sales.status(uuid), Some(SaleStatus::Pending));

        Ok(())
    }

    #[tokio::test]
    async fn conflicting_sale_stays_pending() -> TestResult {
        let shop = shop_record();
        let now = Timestamp::now();
        let sale = sale_record(
            shop.uuid,
            "Spring",
            &["v1"],
            now.checked_sub(1.hour())?,
            now.checked_add(1.hour())?,
        )?;

        let mut lifecycle = MockLifecycleService::new();

        lifecycle
            .expect_admit()
            .returning(|_, _| Ok(Admission::Conflict("overlaps Winter".to_string())));
        lifecycle.expect_activate().never();

        let sales = Arc::new(FakeSalesService::with_sales(vec![sale]));
        let driver = SchedulerDriver::new(
            sales.clone(),
            Arc::new(shops_of(vec![shop.clone()])),
            Arc::new(lifecycle),
        );

        let summary = driver.tick(TickScope::Shop(shop.uuid), now).await?;

        assert_eq!(summary.started, 0);
        assert_eq!(summary.sales_to_start, vec!["Spring".to_string()]);

        Ok(())
    }

    #[tokio::test]
    async fn one_failing_sale_does_not_stop_the_tick() -> TestResult {
        let shop = shop_record();
        let now = Timestamp::now();
        let start = now.checked_sub(1.hour())?;
        let end = now.checked_add(1.hour())?;
        let broken = sale_record(shop.uuid, "Broken", &["v1"], start, end)?;
        let healthy = sale_record(shop.uuid, "Healthy", &["v2"], start, end)?;
        let broken_uuid = broken.uuid;

        let mut lifecycle = MockLifecycleService::new();

        lifecycle
            .expect_admit()
            .returning(|_, _| Ok(Admission::Admitted));
        lifecycle.expect_activate().returning(move |_, sale| {
            if sale == broken_uuid {
                Err(LifecycleError::NotFound)
            } else {
                Ok(activated(sale))
            }
        });

        let sales = Arc::new(FakeSalesService::with_sales(vec![broken, healthy]));
        let driver = SchedulerDriver::new(
            sales,
            Arc::new(shops_of(vec![shop.clone()])),
            Arc::new(lifecycle),
        );

        let summary = driver.tick(TickScope::Shop(shop.uuid), now).await?;

        assert_eq!(summary.started, 1);
        assert_eq!(summary.sales_to_start.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn all_shops_scope_starts_every_shop() -> TestResult {
        let first = shop_record();
        let second = shop_record();
        let now = Timestamp::now();
        let start = now.checked_sub(1.hour())?;
        let end = now.checked_add(1.hour())?;

        let sales = Arc::new(FakeSalesService::with_sales(vec![
            sale_record(first.uuid, "First", &["v1"], start, end)?,
            sale_record(second.uuid, "Second", &["v1"], start, end)?,
        ]));

        let mut lifecycle = MockLifecycleService::new();

        lifecycle
            .expect_admit()
            .times(2)
            .returning(|_, _| Ok(Admission::Admitted));
        lifecycle
            .expect_activate()
            .times(2)
            .returning(|_, sale| Ok(activated(sale)));

        let driver = SchedulerDriver::new(
            sales,
            Arc::new(shops_of(vec![first, second])),
            Arc::new(lifecycle),
        );

        let summary = driver.tick(TickScope::AllShops, now).await?;

        assert_eq!(summary.started, 2);

        Ok(())
    }

    #[tokio::test]
    async fn end_sweep_reverts_other_shops_without_reporting_them() -> TestResult {
        let ours = shop_record();
        let theirs = shop_record();
        let now = Timestamp::now();
        let start = now.checked_sub(3.hours())?;
        let end = now.checked_sub(1.hour())?;

        let mut foreign = sale_record(theirs.uuid, "Foreign", &["v1"], start, end)?;

        foreign.status = SaleStatus::Active;

        let mut lifecycle = MockLifecycleService::new();

        lifecycle
            .expect_revert()
            .times(1)
            .returning(|_, sale| {
                Ok(RevertReport {
                    transitioned: true,
                    ..RevertReport::noop(sale)
                })
            });

        let driver = SchedulerDriver::new(
            Arc::new(FakeSalesService::with_sales(vec![foreign])),
            Arc::new(shops_of(vec![ours.clone(), theirs])),
            Arc::new(lifecycle),
        );

        let summary = driver.tick(TickScope::Shop(ours.uuid), now).await?;

        assert_eq!(summary.ended, 0);
        assert!(summary.sales_to_end.is_empty());

        Ok(())
    }

    #[test]
    fn summary_serializes_in_camel_case() -> TestResult {
        let summary = TickSummary {
            started: 1,
            ended: 2,
            sales_to_start: vec!["Spring".to_string()],
            sales_to_end: vec![],
            sales_missed: vec!["Overnight".to_string()],
        };

        let json = serde_json::to_value(&summary)?;

        assert_eq!(json["salesToStart"][0], "Spring");
        assert_eq!(json["salesMissed"][0], "Overnight");
        assert_eq!(json["ended"], 2);

        Ok(())
    }
}

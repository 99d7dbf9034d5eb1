//! Sales service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use pricedrop::{status::SaleStatus, windows::SaleWindow};
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    database::Db,
    domain::{
        sales::{
            data::{ActivatedItem, NewSale, SaleDetails},
            errors::SalesServiceError,
            records::{SaleItemRecord, SaleRecord, SaleUuid},
            repositories::{PgSaleItemsRepository, PgSalesRepository},
        },
        shops::records::ShopUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgSalesService {
    db: Db,
    sales: PgSalesRepository,
    items: PgSaleItemsRepository,
}

impl PgSalesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            sales: PgSalesRepository::new(),
            items: PgSaleItemsRepository::new(),
        }
    }

    async fn with_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut sales: Vec<SaleRecord>,
    ) -> Result<Vec<SaleRecord>, sqlx::Error> {
        if sales.is_empty() {
            return Ok(sales);
        }

        let uuids: Vec<SaleUuid> = sales.iter().map(|sale| sale.uuid).collect();
        let mut items: FxHashMap<SaleUuid, Vec<SaleItemRecord>> = FxHashMap::default();

        for owned in self.items.list_items(tx, &uuids).await? {
            items.entry(owned.sale).or_default().push(owned.item);
        }

        for sale in &mut sales {
            sale.items = items.remove(&sale.uuid).unwrap_or_default();
        }

        Ok(sales)
    }

    async fn with_items_one(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut sale: SaleRecord,
    ) -> Result<SaleRecord, sqlx::Error> {
        sale.items = self
            .items
            .list_items(tx, &[sale.uuid])
            .await?
            .into_iter()
            .map(|owned| owned.item)
            .collect();

        Ok(sale)
    }
}

#[async_trait]
impl SalesService for PgSalesService {
    #[tracing::instrument(
        name = "sales.service.create_sale",
        skip(self, sale),
        fields(shop_uuid = %shop, sale_uuid = %sale.uuid, item_count = sale.details.items.len()),
        err
    )]
    async fn create_sale(
        &self,
        shop: ShopUuid,
        sale: NewSale,
    ) -> Result<SaleRecord, SalesServiceError> {
        sale.details.validate()?;

        let mut tx = self.db.begin().await?;

        let record = self
            .sales
            .create_sale(&mut tx, shop, sale.uuid, &sale.details)
            .await?;

        self.items
            .create_items(&mut tx, record.uuid, &sale.details.items)
            .await?;

        let record = self.with_items_one(&mut tx, record).await?;

        tx.commit().await?;

        info!(sale_uuid = %record.uuid, "created sale");

        Ok(record)
    }

    #[tracing::instrument(
        name = "sales.service.update_sale",
        skip(self, details),
        fields(shop_uuid = %shop, sale_uuid = %sale, item_count = details.items.len()),
        err
    )]
    async fn update_sale(
        &self,
        shop: ShopUuid,
        sale: SaleUuid,
        details: SaleDetails,
    ) -> Result<SaleRecord, SalesServiceError> {
        details.validate()?;

        let mut tx = self.db.begin().await?;

        let status = self.sales.lock_sale_status(&mut tx, shop, sale).await?;

        if status == SaleStatus::Active {
            return Err(SalesServiceError::NotEditable(status));
        }

        let record = self
            .sales
            .update_sale(&mut tx, shop, sale, &details)
            .await?;

        self.items.delete_items(&mut tx, sale).await?;
        self.items.create_items(&mut tx, sale, &details.items).await?;

        let record = self.with_items_one(&mut tx, record).await?;

        tx.commit().await?;

        info!("updated sale");

        Ok(record)
    }

    async fn get_sale(
        &self,
        shop: ShopUuid,
        sale: SaleUuid,
    ) -> Result<SaleRecord, SalesServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.sales.get_sale(&mut tx, shop, sale).await?;
        let record = self.with_items_one(&mut tx, record).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn get_sale_status(
        &self,
        shop: ShopUuid,
        sale: SaleUuid,
    ) -> Result<SaleStatus, SalesServiceError> {
        let mut tx = self.db.begin().await?;

        let status = self.sales.lock_sale_status(&mut tx, shop, sale).await?;

        tx.commit().await?;

        Ok(status)
    }

    async fn list_sales(&self, shop: ShopUuid) -> Result<Vec<SaleRecord>, SalesServiceError> {
        let mut tx = self.db.begin().await?;

        let sales = self.sales.list_sales(&mut tx, shop).await?;
        let sales = self.with_items(&mut tx, sales).await?;

        tx.commit().await?;

        Ok(sales)
    }

    async fn list_due_to_start(
        &self,
        shop: ShopUuid,
        now: Timestamp,
    ) -> Result<Vec<SaleRecord>, SalesServiceError> {
        let mut tx = self.db.begin().await?;

        let sales = self.sales.list_due_to_start(&mut tx, shop, now).await?;
        let sales = self.with_items(&mut tx, sales).await?;

        tx.commit().await?;

        Ok(sales)
    }

    async fn list_missed_sales(
        &self,
        shop: ShopUuid,
        now: Timestamp,
    ) -> Result<Vec<SaleRecord>, SalesServiceError> {
        let mut tx = self.db.begin().await?;

        let sales = self.sales.list_missed_sales(&mut tx, shop, now).await?;
        let sales = self.with_items(&mut tx, sales).await?;

        tx.commit().await?;

        Ok(sales)
    }

    async fn list_due_to_end(&self, now: Timestamp) -> Result<Vec<SaleRecord>, SalesServiceError> {
        let mut tx = self.db.begin().await?;

        let sales = self.sales.list_due_to_end(&mut tx, now).await?;
        let sales = self.with_items(&mut tx, sales).await?;

        tx.commit().await?;

        Ok(sales)
    }

    async fn list_overlapping_sales(
        &self,
        shop: ShopUuid,
        window: SaleWindow,
        exclude: Option<SaleUuid>,
    ) -> Result<Vec<SaleRecord>, SalesServiceError> {
        let mut tx = self.db.begin().await?;

        let sales = self
            .sales
            .list_overlapping_sales(&mut tx, shop, window, exclude)
            .await?;
        let sales = self.with_items(&mut tx, sales).await?;

        tx.commit().await?;

        Ok(sales)
    }

    #[tracing::instrument(
        name = "sales.service.capture_original_prices",
        skip(self, captured),
        fields(shop_uuid = %shop, sale_uuid = %sale, from = %from, captured = captured.len()),
        err
    )]
    async fn capture_original_prices(
        &self,
        shop: ShopUuid,
        sale: SaleUuid,
        from: SaleStatus,
        captured: Vec<ActivatedItem>,
    ) -> Result<bool, SalesServiceError> {
        let mut tx = self.db.begin().await?;

        let status = self.sales.lock_sale_status(&mut tx, shop, sale).await?;

        if status != from {
            tx.rollback().await?;

            return Ok(false);
        }

        if !captured.is_empty() {
            self.items
                .set_original_prices(&mut tx, sale, &captured)
                .await?;
        }

        tx.commit().await?;

        Ok(true)
    }

    #[tracing::instrument(
        name = "sales.service.complete_sale",
        skip(self),
        fields(shop_uuid = %shop, sale_uuid = %sale),
        err
    )]
    async fn complete_sale(
        &self,
        shop: ShopUuid,
        sale: SaleUuid,
    ) -> Result<bool, SalesServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .sales
            .transition_status(&mut tx, shop, sale, SaleStatus::Active, SaleStatus::Completed)
            .await?;

        if rows_affected == 0 {
            tx.rollback().await?;

            return Ok(false);
        }

        self.items.clear_original_prices(&mut tx, sale).await?;

        tx.commit().await?;

        Ok(true)
    }

    #[tracing::instrument(
        name = "sales.service.transition_status",
        skip(self),
        fields(shop_uuid = %shop, sale_uuid = %sale, from = %from, to = %to),
        err
    )]
    async fn transition_status(
        &self,
        shop: ShopUuid,
        sale: SaleUuid,
        from: SaleStatus,
        to: SaleStatus,
    ) -> Result<bool, SalesServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .sales
            .transition_status(&mut tx, shop, sale, from, to)
            .await?;

        tx.commit().await?;

        Ok(rows_affected > 0)
    }

    #[tracing::instrument(
        name = "sales.service.delete_sale",
        skip(self),
        fields(shop_uuid = %shop, sale_uuid = %sale),
        err
    )]
    async fn delete_sale(&self, shop: ShopUuid, sale: SaleUuid) -> Result<(), SalesServiceError> {
        let mut tx = self.db.begin().await?;

        // Unknown or foreign sales fail here with NotFound.
        self.sales.lock_sale_status(&mut tx, shop, sale).await?;
        self.items.delete_items(&mut tx, sale).await?;

        let rows_affected = self.sales.delete_sale(&mut tx, shop, sale).await?;

        if rows_affected == 0 {
            return Err(SalesServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait SalesService: Send + Sync {
    /// Creates a pending sale together with its items.
    async fn create_sale(&self, shop: ShopUuid, sale: NewSale)
    -> Result<SaleRecord, SalesServiceError>;

    /// Replaces a non-active sale's fields and items, resetting it to pending.
    async fn update_sale(
        &self,
        shop: ShopUuid,
        sale: SaleUuid,
        details: SaleDetails,
    ) -> Result<SaleRecord, SalesServiceError>;

    /// Retrieve a single sale with its items.
    async fn get_sale(&self, shop: ShopUuid, sale: SaleUuid)
    -> Result<SaleRecord, SalesServiceError>;

    /// Fresh read of a sale's status.
    async fn get_sale_status(
        &self,
        shop: ShopUuid,
        sale: SaleUuid,
    ) -> Result<SaleStatus, SalesServiceError>;

    /// Retrieves all of a shop's sales.
    async fn list_sales(&self, shop: ShopUuid) -> Result<Vec<SaleRecord>, SalesServiceError>;

    /// Pending sales of a shop whose window has started but not yet ended.
    async fn list_due_to_start(
        &self,
        shop: ShopUuid,
        now: Timestamp,
    ) -> Result<Vec<SaleRecord>, SalesServiceError>;

    /// Pending sales of a shop whose whole window passed without them starting.
    async fn list_missed_sales(
        &self,
        shop: ShopUuid,
        now: Timestamp,
    ) -> Result<Vec<SaleRecord>, SalesServiceError>;

    /// Active sales of every shop whose window has ended.
    async fn list_due_to_end(&self, now: Timestamp) -> Result<Vec<SaleRecord>, SalesServiceError>;

    /// Pending and active sales of a shop whose window overlaps `window`.
    async fn list_overlapping_sales(
        &self,
        shop: ShopUuid,
        window: SaleWindow,
        exclude: Option<SaleUuid>,
    ) -> Result<Vec<SaleRecord>, SalesServiceError>;

    /// Store captured original prices on items that do not hold one yet, provided
    /// the sale is still in `from`. The status itself is left untouched. Returns
    /// `false` when the sale was no longer in `from`.
    async fn capture_original_prices(
        &self,
        shop: ShopUuid,
        sale: SaleUuid,
        from: SaleStatus,
        captured: Vec<ActivatedItem>,
    ) -> Result<bool, SalesServiceError>;

    /// Move an active sale to completed and forget its captured originals. Returns
    /// `false` when the sale was no longer active.
    async fn complete_sale(&self, shop: ShopUuid, sale: SaleUuid)
    -> Result<bool, SalesServiceError>;

    /// Conditionally move a sale from `from` to `to`. Returns `false` when the sale
    /// was no longer in `from`.
    async fn transition_status(
        &self,
        shop: ShopUuid,
        sale: SaleUuid,
        from: SaleStatus,
        to: SaleStatus,
    ) -> Result<bool, SalesServiceError>;

    /// Deletes a sale and its items.
    async fn delete_sale(&self, shop: ShopUuid, sale: SaleUuid) -> Result<(), SalesServiceError>;
}

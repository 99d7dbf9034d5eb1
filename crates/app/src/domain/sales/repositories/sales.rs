//! Sales Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use pricedrop::{
    discounts::{Discount, DiscountType},
    status::SaleStatus,
    windows::SaleWindow,
};
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    sales::{
        data::SaleDetails,
        records::{SaleRecord, SaleUuid, TimerUuid},
    },
    shops::records::ShopUuid,
};

const CREATE_SALE_SQL: &str = include_str!("sql/create_sale.sql");
const UPDATE_SALE_SQL: &str = include_str!("sql/update_sale.sql");
const GET_SALE_SQL: &str = include_str!("sql/get_sale.sql");
const LOCK_SALE_STATUS_SQL: &str = include_str!("sql/lock_sale_status.sql");
const LIST_SALES_SQL: &str = include_str!("sql/list_sales.sql");
const LIST_DUE_TO_START_SQL: &str = include_str!("sql/list_due_to_start.sql");
const LIST_MISSED_SALES_SQL: &str = include_str!("sql/list_missed_sales.sql");
const LIST_DUE_TO_END_SQL: &str = include_str!("sql/list_due_to_end.sql");
const LIST_OVERLAPPING_SALES_SQL: &str = include_str!("sql/list_overlapping_sales.sql");
const TRANSITION_STATUS_SQL: &str = include_str!("sql/transition_status.sql");
const DELETE_SALE_SQL: &str = include_str!("sql/delete_sale.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgSalesRepository;

impl PgSalesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_sale(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        sale: SaleUuid,
        details: &SaleDetails,
    ) -> Result<SaleRecord, sqlx::Error> {
        query_as::<Postgres, SaleRecord>(CREATE_SALE_SQL)
            .bind(sale.into_uuid())
            .bind(shop.into_uuid())
            .bind(&details.title)
            .bind(details.discount.kind().as_str())
            .bind(details.discount.value())
            .bind(SqlxTimestamp::from(details.window.start()))
            .bind(SqlxTimestamp::from(details.window.end()))
            .bind(details.strategy.as_str())
            .bind(details.deactivation.as_str())
            .bind(details.allow_override)
            .bind(details.exclude_drafts)
            .bind(details.exclude_on_sale)
            .bind(details.timer.map(TimerUuid::into_uuid))
            .bind(&details.tags_to_add)
            .bind(&details.tags_to_remove)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_sale(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        sale: SaleUuid,
        details: &SaleDetails,
    ) -> Result<SaleRecord, sqlx::Error> {
        query_as::<Postgres, SaleRecord>(UPDATE_SALE_SQL)
            .bind(sale.into_uuid())
            .bind(shop.into_uuid())
            .bind(&details.title)
            .bind(details.discount.kind().as_str())
            .bind(details.discount.value())
            .bind(SqlxTimestamp::from(details.window.start()))
            .bind(SqlxTimestamp::from(details.window.end()))
            .bind(details.strategy.as_str())
            .bind(details.deactivation.as_str())
            .bind(details.allow_override)
            .bind(details.exclude_drafts)
            .bind(details.exclude_on_sale)
            .bind(details.timer.map(TimerUuid::into_uuid))
            .bind(&details.tags_to_add)
            .bind(&details.tags_to_remove)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_sale(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        sale: SaleUuid,
    ) -> Result<SaleRecord, sqlx::Error> {
        query_as::<Postgres, SaleRecord>(GET_SALE_SQL)
            .bind(sale.into_uuid())
            .bind(shop.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Read a sale's status and hold its row lock until the transaction ends.
    pub(crate) async fn lock_sale_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        sale: SaleUuid,
    ) -> Result<SaleStatus, sqlx::Error> {
        let status: String = query_scalar(LOCK_SALE_STATUS_SQL)
            .bind(sale.into_uuid())
            .bind(shop.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        decode_column("status", status.parse::<SaleStatus>())
    }

    pub(crate) async fn list_sales(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
    ) -> Result<Vec<SaleRecord>, sqlx::Error> {
        query_as::<Postgres, SaleRecord>(LIST_SALES_SQL)
            .bind(shop.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_due_to_start(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        now: Timestamp,
    ) -> Result<Vec<SaleRecord>, sqlx::Error> {
        query_as::<Postgres, SaleRecord>(LIST_DUE_TO_START_SQL)
            .bind(shop.into_uuid())
            .bind(SqlxTimestamp::from(now))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_missed_sales(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        now: Timestamp,
    ) -> Result<Vec<SaleRecord>, sqlx::Error> {
        query_as::<Postgres, SaleRecord>(LIST_MISSED_SALES_SQL)
            .bind(shop.into_uuid())
            .bind(SqlxTimestamp::from(now))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_due_to_end(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        now: Timestamp,
    ) -> Result<Vec<SaleRecord>, sqlx::Error> {
        query_as::<Postgres, SaleRecord>(LIST_DUE_TO_END_SQL)
            .bind(SqlxTimestamp::from(now))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_overlapping_sales(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        window: SaleWindow,
        exclude: Option<SaleUuid>,
    ) -> Result<Vec<SaleRecord>, sqlx::Error> {
        query_as::<Postgres, SaleRecord>(LIST_OVERLAPPING_SALES_SQL)
            .bind(shop.into_uuid())
            .bind(exclude.map(SaleUuid::into_uuid))
            .bind(SqlxTimestamp::from(window.start()))
            .bind(SqlxTimestamp::from(window.end()))
            .fetch_all(&mut **tx)
            .await
    }

    /// Conditionally move a sale between statuses, returning the number of rows changed.
    pub(crate) async fn transition_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        sale: SaleUuid,
        from: SaleStatus,
        to: SaleStatus,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(TRANSITION_STATUS_SQL)
            .bind(sale.into_uuid())
            .bind(shop.into_uuid())
            .bind(from.as_str())
            .bind(to.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_sale(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shop: ShopUuid,
        sale: SaleUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_SALE_SQL)
            .bind(sale.into_uuid())
            .bind(shop.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn decode_column<T, E>(column: &str, value: Result<T, E>) -> sqlx::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    value.map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for SaleRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let discount_type: String = row.try_get("discount_type")?;
        let discount_value: Decimal = row.try_get("discount_value")?;
        let kind = decode_column("discount_type", discount_type.parse::<DiscountType>())?;
        let discount = decode_column("discount_value", Discount::new(kind, discount_value))?;

        let window = decode_column(
            "ends_at",
            SaleWindow::new(
                row.try_get::<SqlxTimestamp, _>("starts_at")?.to_jiff(),
                row.try_get::<SqlxTimestamp, _>("ends_at")?.to_jiff(),
            ),
        )?;

        let status: String = row.try_get("status")?;
        let strategy: String = row.try_get("discount_strategy")?;
        let deactivation: String = row.try_get("deactivation_strategy")?;

        Ok(Self {
            uuid: SaleUuid::from_uuid(row.try_get("uuid")?),
            shop: ShopUuid::from_uuid(row.try_get("shop_uuid")?),
            title: row.try_get("title")?,
            discount,
            window,
            status: decode_column("status", status.parse())?,
            strategy: decode_column("discount_strategy", strategy.parse())?,
            deactivation: decode_column("deactivation_strategy", deactivation.parse())?,
            allow_override: row.try_get("allow_override")?,
            exclude_drafts: row.try_get("exclude_drafts")?,
            exclude_on_sale: row.try_get("exclude_on_sale")?,
            timer: row
                .try_get::<Option<Uuid>, _>("timer_uuid")?
                .map(TimerUuid::from_uuid),
            tags_to_add: row.try_get("tags_to_add")?,
            tags_to_remove: row.try_get("tags_to_remove")?,
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

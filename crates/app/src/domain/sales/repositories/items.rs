//! Sale Items Repository

use pricedrop::catalog::{ProductId, VariantId};
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::sales::{
    data::{ActivatedItem, NewSaleItem},
    records::{SaleItemRecord, SaleItemUuid, SaleUuid},
};

const CREATE_SALE_ITEMS_SQL: &str = include_str!("sql/create_sale_items.sql");
const LIST_SALE_ITEMS_SQL: &str = include_str!("sql/list_sale_items.sql");
const DELETE_SALE_ITEMS_SQL: &str = include_str!("sql/delete_sale_items.sql");
const SET_ORIGINAL_PRICES_SQL: &str = include_str!("sql/set_original_prices.sql");
const CLEAR_ORIGINAL_PRICES_SQL: &str = include_str!("sql/clear_original_prices.sql");

/// Sale item row tagged with its owning sale.
#[derive(Debug, Clone)]
pub(crate) struct OwnedSaleItem {
    pub(crate) sale: SaleUuid,
    pub(crate) item: SaleItemRecord,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgSaleItemsRepository;

impl PgSaleItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sale: SaleUuid,
        items: &[NewSaleItem],
    ) -> Result<(), sqlx::Error> {
        let uuids: Vec<Uuid> = items
            .iter()
            .map(|_| SaleItemUuid::new().into_uuid())
            .collect();
        let products: Vec<&str> = items.iter().map(|item| item.product.as_str()).collect();
        let variants: Vec<&str> = items.iter().map(|item| item.variant.as_str()).collect();

        query(CREATE_SALE_ITEMS_SQL)
            .bind(sale.into_uuid())
            .bind(uuids)
            .bind(products)
            .bind(variants)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn list_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sales: &[SaleUuid],
    ) -> Result<Vec<OwnedSaleItem>, sqlx::Error> {
        let sales: Vec<Uuid> = sales.iter().map(|sale| sale.into_uuid()).collect();

        query_as::<Postgres, OwnedSaleItem>(LIST_SALE_ITEMS_SQL)
            .bind(sales)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn delete_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sale: SaleUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_SALE_ITEMS_SQL)
            .bind(sale.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Stores captured originals on items that do not hold one yet.
    pub(crate) async fn set_original_prices(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sale: SaleUuid,
        captured: &[ActivatedItem],
    ) -> Result<u64, sqlx::Error> {
        let items: Vec<Uuid> = captured
            .iter()
            .map(|captured| captured.item.into_uuid())
            .collect();
        let prices: Vec<Decimal> = captured
            .iter()
            .map(|captured| captured.original_price)
            .collect();

        let rows_affected = query(SET_ORIGINAL_PRICES_SQL)
            .bind(sale.into_uuid())
            .bind(items)
            .bind(prices)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn clear_original_prices(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sale: SaleUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_ORIGINAL_PRICES_SQL)
            .bind(sale.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for OwnedSaleItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            sale: SaleUuid::from_uuid(row.try_get("sale_uuid")?),
            item: SaleItemRecord {
                uuid: SaleItemUuid::from_uuid(row.try_get("uuid")?),
                product: ProductId::new(row.try_get::<String, _>("product_id")?),
                variant: VariantId::new(row.try_get::<String, _>("variant_id")?),
                original_price: row.try_get("original_price")?,
            },
        })
    }
}

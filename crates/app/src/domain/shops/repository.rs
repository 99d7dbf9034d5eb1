//! Shops Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};

use crate::domain::shops::{
    data::NewShop,
    records::{ShopRecord, ShopUuid},
};

const CREATE_SHOP_SQL: &str = include_str!("sql/create_shop.sql");
const GET_SHOP_SQL: &str = include_str!("sql/get_shop.sql");
const LIST_SHOPS_SQL: &str = include_str!("sql/list_shops.sql");

#[derive(Debug, Clone)]
/// PostgreSQL-backed shops repository.
pub(crate) struct PgShopsRepository {
    pool: PgPool,
}

impl PgShopsRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn create_shop(&self, shop: NewShop) -> Result<ShopRecord, sqlx::Error> {
        let variant_limit = shop
            .variant_limit
            .map(i64::try_from)
            .transpose()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "variant_limit".to_string(),
                source: Box::new(e),
            })?;

        query_as::<Postgres, ShopRecord>(CREATE_SHOP_SQL)
            .bind(shop.uuid.into_uuid())
            .bind(shop.domain)
            .bind(shop.access_token)
            .bind(shop.token_hash)
            .bind(variant_limit)
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn get_shop(&self, shop: ShopUuid) -> Result<ShopRecord, sqlx::Error> {
        query_as::<Postgres, ShopRecord>(GET_SHOP_SQL)
            .bind(shop.into_uuid())
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn list_shops(&self) -> Result<Vec<ShopRecord>, sqlx::Error> {
        query_as::<Postgres, ShopRecord>(LIST_SHOPS_SQL)
            .fetch_all(&self.pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ShopRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let variant_limit = row
            .try_get::<Option<i64>, _>("variant_limit")?
            .map(u64::try_from)
            .transpose()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "variant_limit".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: ShopUuid::from_uuid(row.try_get("uuid")?),
            domain: row.try_get("domain")?,
            access_token: row.try_get("access_token")?,
            variant_limit,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

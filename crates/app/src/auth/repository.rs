//! Auth repository.

use sqlx::{PgPool, query_scalar};
use uuid::Uuid;

use crate::domain::shops::records::ShopUuid;

const FIND_SHOP_BY_TOKEN_HASH_SQL: &str = include_str!("sql/find_shop_by_token_hash.sql");

#[derive(Debug, Clone)]
pub(crate) struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn find_shop_by_token_hash(
        &self,
        hash: &str,
    ) -> Result<Option<ShopUuid>, sqlx::Error> {
        query_scalar::<_, Uuid>(FIND_SHOP_BY_TOKEN_HASH_SQL)
            .bind(hash)
            .fetch_optional(&self.pool)
            .await
            .map(|uuid| uuid.map(ShopUuid::from_uuid))
    }
}

//! Shops service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;

use crate::domain::shops::{
    data::NewShop,
    errors::ShopsServiceError,
    records::{ShopRecord, ShopUuid},
    repository::PgShopsRepository,
};

#[derive(Debug, Clone)]
pub struct PgShopsService {
    repository: PgShopsRepository,
}

impl PgShopsService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgShopsRepository::new(pool),
        }
    }
}

#[async_trait]
impl ShopsService for PgShopsService {
    async fn create_shop(&self, shop: NewShop) -> Result<ShopRecord, ShopsServiceError> {
        if shop.domain.trim().is_empty() || shop.access_token.trim().is_empty() {
            return Err(ShopsServiceError::InvalidData);
        }

        self.repository
            .create_shop(shop)
            .await
            .map_err(Into::into)
    }

    async fn get_shop(&self, shop: ShopUuid) -> Result<ShopRecord, ShopsServiceError> {
        self.repository.get_shop(shop).await.map_err(Into::into)
    }

    async fn list_shops(&self) -> Result<Vec<ShopRecord>, ShopsServiceError> {
        self.repository.list_shops().await.map_err(Into::into)
    }
}

#[automock]
#[async_trait]
/// Shop persistence operations.
pub trait ShopsService: Send + Sync {
    /// Registers a shop.
    async fn create_shop(&self, shop: NewShop) -> Result<ShopRecord, ShopsServiceError>;

    /// Loads a shop together with its platform credentials.
    async fn get_shop(&self, shop: ShopUuid) -> Result<ShopRecord, ShopsServiceError>;

    /// Lists every registered shop, oldest first.
    async fn list_shops(&self) -> Result<Vec<ShopRecord>, ShopsServiceError>;
}

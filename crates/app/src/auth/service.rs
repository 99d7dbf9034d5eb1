//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;

use crate::{
    auth::{AuthServiceError, hash_token, repository::PgAuthRepository},
    domain::shops::records::ShopUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<ShopUuid, AuthServiceError> {
        if bearer_token.trim().is_empty() {
            return Err(AuthServiceError::NotFound);
        }

        self.repository
            .find_shop_by_token_hash(&hash_token(bearer_token))
            .await?
            .ok_or(AuthServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the shop it was issued to.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<ShopUuid, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    #[ignore = "requires a Docker daemon for testcontainers"]
    async fn known_token_resolves_to_its_shop() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgAuthService::new(ctx.db.pool().clone());

        let shop = svc.authenticate_bearer(&ctx.token).await?;

        assert_eq!(shop, ctx.shop.uuid);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for testcontainers"]
    async fn unknown_token_is_not_found() {
        let ctx = TestContext::new().await;
        let svc = PgAuthService::new(ctx.db.pool().clone());

        let result = svc.authenticate_bearer("pd_nope").await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}

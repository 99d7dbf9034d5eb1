//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    catalog::{CatalogConfig, CatalogError, ShopifyCatalog},
    database::{self, Db},
    domain::{
        lifecycle::{LifecycleService, SaleLifecycle},
        sales::{PgSalesService, SalesService},
        scheduler::{SchedulerDriver, SchedulerService},
        shops::{PgShopsService, ShopsService},
        usage::PlanUsageLimiter,
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to build catalog client")]
    Catalog(#[source] CatalogError),
}

/// Every service the binaries need, wired to one connection pool.
#[derive(Clone)]
pub struct AppContext {
    pub shops: Arc<dyn ShopsService>,
    pub sales: Arc<dyn SalesService>,
    pub auth: Arc<dyn AuthService>,
    pub lifecycle: Arc<dyn LifecycleService>,
    pub scheduler: Arc<dyn SchedulerService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or building the catalog
    /// client fails.
    pub async fn from_database_url(
        url: &str,
        catalog: CatalogConfig,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let catalog = Arc::new(ShopifyCatalog::new(catalog).map_err(AppInitError::Catalog)?);

        let shops: Arc<dyn ShopsService> = Arc::new(PgShopsService::new(pool.clone()));
        let sales: Arc<dyn SalesService> = Arc::new(PgSalesService::new(Db::new(pool.clone())));
        let limiter = Arc::new(PlanUsageLimiter::new(Arc::clone(&shops), Arc::clone(&sales)));

        let lifecycle: Arc<dyn LifecycleService> = Arc::new(SaleLifecycle::new(
            Arc::clone(&sales),
            Arc::clone(&shops),
            catalog,
            limiter,
        ));

        let scheduler = Arc::new(SchedulerDriver::new(
            Arc::clone(&sales),
            Arc::clone(&shops),
            Arc::clone(&lifecycle),
        ));

        Ok(Self {
            auth: Arc::new(PgAuthService::new(pool)),
            shops,
            sales,
            lifecycle,
            scheduler,
        })
    }
}

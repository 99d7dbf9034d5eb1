//! Catalog Config

use std::time::Duration;

use clap::Args;
use pricedrop_app::catalog::{CatalogConfig, shopify::DEFAULT_API_VERSION};

/// Commerce platform client settings.
#[derive(Debug, Args)]
pub struct CatalogSettings {
    /// Admin API version used for catalog calls
    #[arg(long, env = "CATALOG_API_VERSION", default_value = DEFAULT_API_VERSION)]
    pub catalog_api_version: String,

    /// Per-request catalog timeout in seconds
    #[arg(long, env = "CATALOG_TIMEOUT_SECONDS", default_value_t = 30)]
    pub catalog_timeout_seconds: u64,
}

impl CatalogSettings {
    #[must_use]
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            api_version: self.catalog_api_version.clone(),
            timeout: Duration::from_secs(self.catalog_timeout_seconds),
        }
    }
}

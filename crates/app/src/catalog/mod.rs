//! Catalog
//!
//! Access to the external commerce platform's variant prices.

pub mod errors;
pub mod mutations;
pub mod resolver;
pub mod shopify;

use async_trait::async_trait;
use mockall::automock;
use pricedrop::catalog::{ProductId, VariantId, VariantPriceUpdate, VariantSnapshot};

use crate::domain::shops::records::ShopRecord;

pub use errors::CatalogError;
pub use mutations::push_price_updates;
pub use resolver::SnapshotResolver;
pub use shopify::{CatalogConfig, ShopifyCatalog};

#[automock]
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Look up live prices for a batch of variants. Unknown ids are absent from the result.
    async fn fetch_variants(
        &self,
        shop: &ShopRecord,
        variants: &[VariantId],
    ) -> Result<Vec<VariantSnapshot>, CatalogError>;

    /// Write prices for variants belonging to one product.
    async fn bulk_update_variants(
        &self,
        shop: &ShopRecord,
        product: &ProductId,
        updates: &[VariantPriceUpdate],
    ) -> Result<(), CatalogError>;
}

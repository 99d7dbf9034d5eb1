//! Price snapshot resolver.

use std::sync::Arc;

use pricedrop::catalog::{SNAPSHOT_BATCH_SIZE, VariantId, VariantSnapshot};
use rustc_hash::FxHashMap;
use tracing::error;

use crate::{catalog::Catalog, domain::shops::records::ShopRecord};

/// Fetches live variant prices in bounded batches.
///
/// A failing batch is logged and left out of the result; its variants are picked up
/// again on the next scheduler tick.
#[derive(Clone)]
pub struct SnapshotResolver {
    catalog: Arc<dyn Catalog>,
}

impl SnapshotResolver {
    #[must_use]
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    #[tracing::instrument(
        name = "catalog.resolver.fetch_variant_snapshots",
        skip(self, shop, variants),
        fields(shop_uuid = %shop.uuid, variant_count = variants.len())
    )]
    pub async fn fetch_variant_snapshots(
        &self,
        shop: &ShopRecord,
        variants: &[VariantId],
    ) -> FxHashMap<VariantId, VariantSnapshot> {
        let mut snapshots = FxHashMap::default();

        for (batch, chunk) in variants.chunks(SNAPSHOT_BATCH_SIZE).enumerate() {
            match self.catalog.fetch_variants(shop, chunk).await {
                Ok(found) => {
                    snapshots.extend(
                        found
                            .into_iter()
                            .map(|snapshot| (snapshot.variant.clone(), snapshot)),
                    );
                }
                Err(err) => {
                    error!(batch, batch_size = chunk.len(), error = %err, "failed to fetch variant snapshots");
                }
            }
        }

        snapshots
    }
}

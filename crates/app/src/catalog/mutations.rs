//! Best-effort price mutations.

use pricedrop::catalog::{PartialOutcome, ProductId, VariantPriceUpdate, group_by_product};
use tracing::error;

use crate::{catalog::Catalog, domain::shops::records::ShopRecord};

/// Issue one bulk update per product, sequentially.
///
/// A failed product is recorded in the outcome and does not stop the remaining
/// products. Nothing is rolled back.
pub async fn push_price_updates<I>(
    catalog: &dyn Catalog,
    shop: &ShopRecord,
    updates: I,
) -> PartialOutcome
where
    I: IntoIterator<Item = (ProductId, VariantPriceUpdate)>,
{
    let mut outcome = PartialOutcome::default();

    for (product, group) in group_by_product(updates) {
        match catalog.bulk_update_variants(shop, &product, &group).await {
            Ok(()) => outcome.record_success(product, group.len()),
            Err(err) => {
                error!(product_id = %product, variant_count = group.len(), error = %err, "failed to update product prices");

                outcome.record_failure(product, err.to_string());
            }
        }
    }

    outcome
}

//! Catalog
//!
//! Identifiers and payloads exchanged with the external commerce platform, plus the
//! batching helpers used when talking to it.

use std::{collections::BTreeMap, fmt};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::discounts::PriceChange;

/// Maximum number of variants requested from the platform in one query.
pub const SNAPSHOT_BATCH_SIZE: usize = 250;

/// Platform identifier of a product variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(String);

/// Platform identifier of a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

macro_rules! external_id {
    ($name:ident) => {
        impl $name {
            /// Wrap a platform identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Take the raw identifier.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

external_id!(VariantId);
external_id!(ProductId);

/// Live price state of a variant as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSnapshot {
    /// Variant identifier.
    pub variant: VariantId,

    /// Owning product.
    pub product: ProductId,

    /// Current selling price.
    pub price: Decimal,

    /// Current compare-at price.
    pub compare_at: Option<Decimal>,
}

/// Price write for a single variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantPriceUpdate {
    /// Variant to update.
    pub variant: VariantId,

    /// New selling price.
    pub price: Decimal,

    /// New compare-at price; `None` clears it.
    pub compare_at: Option<Decimal>,
}

impl VariantPriceUpdate {
    /// Build an update from a computed price change.
    pub fn new(variant: VariantId, change: PriceChange) -> Self {
        Self {
            variant,
            price: change.price,
            compare_at: change.compare_at,
        }
    }
}

/// Group updates by product; the platform's bulk update endpoint is scoped per product.
///
/// Groups are returned in product id order so repeated runs issue calls in the same order.
pub fn group_by_product<I>(updates: I) -> Vec<(ProductId, Vec<VariantPriceUpdate>)>
where
    I: IntoIterator<Item = (ProductId, VariantPriceUpdate)>,
{
    let mut groups: BTreeMap<ProductId, Vec<VariantPriceUpdate>> = BTreeMap::new();

    for (product, update) in updates {
        groups.entry(product).or_default().push(update);
    }

    groups.into_iter().collect()
}

/// Result of a best-effort batch of per-product mutations.
///
/// External mutations are never rolled back; callers inspect this to see which
/// products were left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialOutcome {
    /// Products whose bulk update succeeded.
    pub succeeded_product_ids: Vec<ProductId>,

    /// Products whose bulk update failed.
    pub failed_product_ids: Vec<ProductId>,

    /// Error messages collected from failed updates.
    pub errors: Vec<String>,

    /// Number of variants covered by successful updates.
    pub updated_variants: usize,
}

impl PartialOutcome {
    /// Record a successful product update covering `variants` variants.
    pub fn record_success(&mut self, product: ProductId, variants: usize) {
        self.succeeded_product_ids.push(product);
        self.updated_variants += variants;
    }

    /// Record a failed product update.
    pub fn record_failure(&mut self, product: ProductId, error: impl Into<String>) {
        self.failed_product_ids.push(product);
        self.errors.push(error.into());
    }

    /// Whether every attempted product update succeeded.
    pub fn is_complete(&self) -> bool {
        self.failed_product_ids.is_empty()
    }
}

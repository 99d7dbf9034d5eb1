//! Sale Data

use pricedrop::{
    catalog::{ProductId, VariantId},
    discounts::{Discount, DiscountStrategy},
    reversion::DeactivationStrategy,
    windows::SaleWindow,
};
use rust_decimal::Decimal;
use rustc_hash::FxHashSet;

use crate::domain::sales::{
    errors::SalesServiceError,
    records::{SaleItemUuid, SaleUuid, TimerUuid},
};

/// Editable sale fields shared by creation and update.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleDetails {
    pub title: String,
    pub discount: Discount,
    pub window: SaleWindow,
    pub strategy: DiscountStrategy,
    pub deactivation: DeactivationStrategy,
    pub allow_override: bool,
    pub exclude_drafts: bool,
    pub exclude_on_sale: bool,
    pub timer: Option<TimerUuid>,
    pub tags_to_add: Vec<String>,
    pub tags_to_remove: Vec<String>,
    pub items: Vec<NewSaleItem>,
}

impl SaleDetails {
    /// Check the fields the typed discount and window cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`SalesServiceError::Validation`] for a blank title, no items, or a
    /// variant listed twice.
    pub fn validate(&self) -> Result<(), SalesServiceError> {
        if self.title.trim().is_empty() {
            return Err(SalesServiceError::Validation(
                "title must not be empty".to_string(),
            ));
        }

        if self.items.is_empty() {
            return Err(SalesServiceError::Validation(
                "a sale needs at least one variant".to_string(),
            ));
        }

        let mut seen = FxHashSet::default();

        for item in &self.items {
            if !seen.insert(&item.variant) {
                return Err(SalesServiceError::Validation(format!(
                    "variant {} is listed more than once",
                    item.variant
                )));
            }
        }

        Ok(())
    }

    /// Variants the sale would cover.
    #[must_use]
    pub fn variant_ids(&self) -> Vec<VariantId> {
        self.items.iter().map(|item| item.variant.clone()).collect()
    }
}

/// New Sale Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewSale {
    pub uuid: SaleUuid,
    pub details: SaleDetails,
}

/// New Sale Item Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSaleItem {
    pub product: ProductId,
    pub variant: VariantId,
}

/// Original price captured for one item during activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivatedItem {
    pub item: SaleItemUuid,
    pub original_price: Decimal,
}

//! Sale request and response bodies.

use std::string::ToString;

use jiff::Timestamp;
use pricedrop::{
    catalog::{PartialOutcome, ProductId, VariantId},
    discounts::{Discount, DiscountStrategy, DiscountType},
    reversion::DeactivationStrategy,
    windows::SaleWindow,
};
use pricedrop_app::domain::{
    lifecycle::{ActivationReport, RevertReport},
    sales::{
        data::{NewSaleItem, SaleDetails},
        records::{SaleItemRecord, SaleRecord, TimerUuid},
    },
};
use rust_decimal::Decimal;
use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct SaleItemPayload {
    /// Platform product id
    pub product_id: String,

    /// Platform variant id
    pub variant_id: String,
}

/// Editable sale fields.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct SalePayload {
    /// UUID for a new sale; generated when omitted and ignored on update
    #[serde(default)]
    pub uuid: Option<Uuid>,

    pub title: String,

    /// `percentage` or `fixed_amount`
    pub discount_type: String,

    /// Decimal string, e.g. `"15"` or `"4.99"`
    pub discount_value: String,

    /// RFC 3339 timestamp
    pub starts_at: String,

    /// RFC 3339 timestamp, after `starts_at`
    pub ends_at: String,

    /// `compare_at`, `keep_compare_at`, `use_current_as_compare` or `increase_compare`
    pub strategy: String,

    /// `restore` or `replace_with_compare`
    pub deactivation: String,

    /// Schedule even when another sale covers the same variants
    #[serde(default)]
    pub allow_override: bool,

    #[serde(default)]
    pub exclude_drafts: bool,

    #[serde(default)]
    pub exclude_on_sale: bool,

    /// Countdown timer shown while the sale runs
    #[serde(default)]
    pub timer: Option<Uuid>,

    #[serde(default)]
    pub tags_to_add: Vec<String>,

    #[serde(default)]
    pub tags_to_remove: Vec<String>,

    pub items: Vec<SaleItemPayload>,
}

fn bad_request(field: &str, error: impl ToString) -> StatusError {
    StatusError::bad_request().brief(format!("{field}: {}", error.to_string()))
}

impl SalePayload {
    /// Parse the textual fields into typed sale details.
    pub(crate) fn into_details(self) -> Result<SaleDetails, StatusError> {
        let kind: DiscountType = self
            .discount_type
            .parse()
            .map_err(|error| bad_request("discount_type", error))?;
        let value: Decimal = self
            .discount_value
            .parse()
            .map_err(|error| bad_request("discount_value", error))?;
        let discount =
            Discount::new(kind, value).map_err(|error| bad_request("discount_value", error))?;

        let starts_at: Timestamp = self
            .starts_at
            .parse()
            .map_err(|error| bad_request("starts_at", error))?;
        let ends_at: Timestamp = self
            .ends_at
            .parse()
            .map_err(|error| bad_request("ends_at", error))?;
        let window =
            SaleWindow::new(starts_at, ends_at).map_err(|error| bad_request("ends_at", error))?;

        let strategy: DiscountStrategy = self
            .strategy
            .parse()
            .map_err(|error| bad_request("strategy", error))?;
        let deactivation: DeactivationStrategy = self
            .deactivation
            .parse()
            .map_err(|error| bad_request("deactivation", error))?;

        Ok(SaleDetails {
            title: self.title,
            discount,
            window,
            strategy,
            deactivation,
            allow_override: self.allow_override,
            exclude_drafts: self.exclude_drafts,
            exclude_on_sale: self.exclude_on_sale,
            timer: self.timer.map(TimerUuid::from_uuid),
            tags_to_add: self.tags_to_add,
            tags_to_remove: self.tags_to_remove,
            items: self
                .items
                .into_iter()
                .map(|item| NewSaleItem {
                    product: ProductId::from(item.product_id),
                    variant: VariantId::from(item.variant_id),
                })
                .collect(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SaleItemResponse {
    pub uuid: Uuid,
    pub product_id: String,
    pub variant_id: String,

    /// Price captured for the running sale, `"0.00"` while it is not running
    pub original_price: String,
}

impl From<SaleItemRecord> for SaleItemResponse {
    fn from(item: SaleItemRecord) -> Self {
        Self {
            uuid: item.uuid.into(),
            product_id: item.product.into_inner(),
            variant_id: item.variant.into_inner(),
            original_price: item.original_price.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SaleResponse {
    pub uuid: Uuid,
    pub title: String,

    /// `pending`, `active` or `completed`
    pub status: String,

    pub discount_type: String,
    pub discount_value: String,
    pub starts_at: String,
    pub ends_at: String,
    pub strategy: String,
    pub deactivation: String,
    pub allow_override: bool,
    pub exclude_drafts: bool,
    pub exclude_on_sale: bool,
    pub timer: Option<Uuid>,
    pub tags_to_add: Vec<String>,
    pub tags_to_remove: Vec<String>,
    pub items: Vec<SaleItemResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<SaleRecord> for SaleResponse {
    fn from(sale: SaleRecord) -> Self {
        Self {
            uuid: sale.uuid.into(),
            title: sale.title,
            status: sale.status.to_string(),
            discount_type: sale.discount.kind().to_string(),
            discount_value: sale.discount.value().to_string(),
            starts_at: sale.window.start().to_string(),
            ends_at: sale.window.end().to_string(),
            strategy: sale.strategy.to_string(),
            deactivation: sale.deactivation.to_string(),
            allow_override: sale.allow_override,
            exclude_drafts: sale.exclude_drafts,
            exclude_on_sale: sale.exclude_on_sale,
            timer: sale.timer.map(Into::into),
            tags_to_add: sale.tags_to_add,
            tags_to_remove: sale.tags_to_remove,
            items: sale.items.into_iter().map(Into::into).collect(),
            created_at: sale.created_at.to_string(),
            updated_at: sale.updated_at.to_string(),
        }
    }
}

/// Products whose bulk price update failed, with the collected errors.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct FailedProducts {
    pub product_ids: Vec<String>,
    pub errors: Vec<String>,
}

impl From<PartialOutcome> for FailedProducts {
    fn from(outcome: PartialOutcome) -> Self {
        Self {
            product_ids: outcome
                .failed_product_ids
                .into_iter()
                .map(ProductId::into_inner)
                .collect(),
            errors: outcome.errors,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ActivationResponse {
    pub sale: Uuid,

    /// Variants whose discounted price was written
    pub updated: usize,

    /// Variants left untouched
    pub skipped: usize,

    pub failed: FailedProducts,

    /// Whether this call moved the sale to active
    pub activated: bool,
}

impl From<ActivationReport> for ActivationResponse {
    fn from(report: ActivationReport) -> Self {
        Self {
            sale: report.sale.into(),
            updated: report.updated,
            skipped: report.skipped,
            failed: report.outcome.into(),
            activated: report.transitioned,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RevertResponse {
    pub sale: Uuid,

    /// Variants whose price was restored
    pub restored: usize,

    /// Variants left as they were, including prices edited by hand during the sale
    pub skipped: usize,

    pub failed: FailedProducts,

    /// Whether this call moved the sale to completed
    pub completed: bool,
}

impl From<RevertReport> for RevertResponse {
    fn from(report: RevertReport) -> Self {
        Self {
            sale: report.sale.into(),
            restored: report.restored,
            skipped: report.skipped,
            failed: report.outcome.into(),
            completed: report.transitioned,
        }
    }
}

/// Sales belonging to the authenticated shop.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SalesResponse {
    pub sales: Vec<SaleResponse>,
}

/// Deleted sale, with the revert that ran first when it was active.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DeleteSaleResponse {
    pub reverted: Option<RevertResponse>,
}

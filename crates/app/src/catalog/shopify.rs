//! GraphQL Admin API client.

use std::time::Duration;

use async_trait::async_trait;
use pricedrop::{
    catalog::{ProductId, VariantId, VariantPriceUpdate, VariantSnapshot},
    prices::round_price,
};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;
use tracing::warn;

use crate::{
    catalog::{Catalog, CatalogError},
    domain::shops::records::ShopRecord,
};

const VARIANT_SNAPSHOTS_QUERY: &str = include_str!("graphql/variant_snapshots.graphql");
const BULK_UPDATE_VARIANT_PRICES_MUTATION: &str =
    include_str!("graphql/bulk_update_variant_prices.graphql");

/// Default Admin API version.
pub const DEFAULT_API_VERSION: &str = "2025-01";

/// Configuration for talking to the platform.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Admin API version segment, e.g. `"2025-01"`.
    pub api_version: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the platform's GraphQL Admin API.
#[derive(Debug, Clone)]
pub struct ShopifyCatalog {
    config: CatalogConfig,
    http: Client,
}

impl ShopifyCatalog {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, http })
    }

    fn endpoint(&self, shop: &ShopRecord) -> String {
        format!(
            "https://{}/admin/api/{}/graphql.json",
            shop.domain, self.config.api_version
        )
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        shop: &ShopRecord,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, CatalogError> {
        let response = self
            .http
            .post(self.endpoint(shop))
            .header("X-Shopify-Access-Token", &shop.access_token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();

            return Err(CatalogError::Status { status, body });
        }

        let parsed: GraphQlResponse<T> = response.json().await?;

        parsed.into_data()
    }
}

#[async_trait]
impl Catalog for ShopifyCatalog {
    #[tracing::instrument(
        name = "catalog.shopify.fetch_variants",
        skip(self, shop, variants),
        fields(shop_domain = %shop.domain, variant_count = variants.len()),
        err
    )]
    async fn fetch_variants(
        &self,
        shop: &ShopRecord,
        variants: &[VariantId],
    ) -> Result<Vec<VariantSnapshot>, CatalogError> {
        let data: NodesData = self
            .execute(shop, VARIANT_SNAPSHOTS_QUERY, json!({ "ids": variants }))
            .await?;

        Ok(data.into_snapshots())
    }

    #[tracing::instrument(
        name = "catalog.shopify.bulk_update_variants",
        skip(self, shop, updates),
        fields(shop_domain = %shop.domain, product_id = %product, variant_count = updates.len()),
        err
    )]
    async fn bulk_update_variants(
        &self,
        shop: &ShopRecord,
        product: &ProductId,
        updates: &[VariantPriceUpdate],
    ) -> Result<(), CatalogError> {
        let variables = json!({
            "productId": product,
            "variants": variant_inputs(updates),
        });

        let data: BulkUpdateData = self
            .execute(shop, BULK_UPDATE_VARIANT_PRICES_MUTATION, variables)
            .await?;

        data.into_result()
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,

    #[serde(default)]
    errors: Vec<GraphQlError>,
}

impl<T> GraphQlResponse<T> {
    fn into_data(self) -> Result<T, CatalogError> {
        if !self.errors.is_empty() {
            let messages: Vec<String> = self.errors.into_iter().map(|e| e.message).collect();

            return Err(CatalogError::Query(messages.join("; ")));
        }

        self.data
            .ok_or_else(|| CatalogError::Query("response carried no data".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct NodesData {
    nodes: Vec<Option<VariantNode>>,
}

impl NodesData {
    fn into_snapshots(self) -> Vec<VariantSnapshot> {
        let mut snapshots = Vec::with_capacity(self.nodes.len());

        // Deleted ids come back as null, ids of other types as empty objects.
        for node in self.nodes.into_iter().flatten() {
            let (Some(id), Some(price), Some(product)) = (node.id, node.price, node.product)
            else {
                continue;
            };

            let parsed = parse_price(&id, price).and_then(|price| {
                let compare_at = node
                    .compare_at_price
                    .map(|value| parse_price(&id, value))
                    .transpose()?;

                Ok((price, compare_at))
            });

            let (price, compare_at) = match parsed {
                Ok(parsed) => parsed,
                Err(err) => {
                    warn!(variant_id = %id, error = %err, "unreadable variant price, skipping");
                    continue;
                }
            };

            snapshots.push(VariantSnapshot {
                price,
                variant: VariantId::new(id),
                product: ProductId::new(product.id),
                compare_at,
            });
        }

        snapshots
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VariantNode {
    id: Option<String>,
    price: Option<String>,
    compare_at_price: Option<String>,
    product: Option<ProductNode>,
}

#[derive(Debug, Deserialize)]
struct ProductNode {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulkUpdateData {
    product_variants_bulk_update: Option<BulkUpdatePayload>,
}

impl BulkUpdateData {
    fn into_result(self) -> Result<(), CatalogError> {
        let errors: Vec<String> = self
            .product_variants_bulk_update
            .map(|payload| payload.user_errors)
            .unwrap_or_default()
            .into_iter()
            .map(UserError::describe)
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::UserErrors(errors))
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulkUpdatePayload {
    #[serde(default)]
    user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
struct UserError {
    #[serde(default)]
    field: Option<Vec<String>>,
    message: String,
}

impl UserError {
    fn describe(self) -> String {
        match self.field {
            Some(field) if !field.is_empty() => format!("{}: {}", field.join("."), self.message),
            _ => self.message,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VariantInput<'a> {
    id: &'a VariantId,
    price: String,
    compare_at_price: Option<String>,
}

fn variant_inputs(updates: &[VariantPriceUpdate]) -> Vec<VariantInput<'_>> {
    updates
        .iter()
        .map(|update| VariantInput {
            id: &update.variant,
            price: format_price(update.price),
            compare_at_price: update.compare_at.map(format_price),
        })
        .collect()
}

fn format_price(value: Decimal) -> String {
    format!("{:.2}", round_price(value))
}

fn parse_price(variant: &str, value: String) -> Result<Decimal, CatalogError> {
    value
        .parse::<Decimal>()
        .map_err(|_| CatalogError::InvalidPrice {
            variant: variant.to_string(),
            value,
        })
}

use std::time::Duration;

use clap::Args;
use jiff::Timestamp;
use pricedrop_app::{
    catalog::{CatalogConfig, shopify::DEFAULT_API_VERSION},
    context::AppContext,
    domain::{scheduler::TickScope, shops::records::ShopUuid},
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct TickArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Admin API version used for catalog calls
    #[arg(long, env = "CATALOG_API_VERSION", default_value = DEFAULT_API_VERSION)]
    catalog_api_version: String,

    /// Per-request catalog timeout in seconds
    #[arg(long, env = "CATALOG_TIMEOUT_SECONDS", default_value_t = 30)]
    catalog_timeout_seconds: u64,

    /// Only start sales for this shop; every shop when omitted
    #[arg(long)]
    shop_uuid: Option<Uuid>,

    /// Evaluate due sales at this instant (RFC 3339) instead of now
    #[arg(long)]
    at: Option<String>,
}

pub(crate) async fn run(args: TickArgs) -> Result<(), String> {
    let now = parse_at(args.at.as_deref())?.unwrap_or_else(Timestamp::now);

    let context = AppContext::from_database_url(
        &args.database_url,
        CatalogConfig {
            api_version: args.catalog_api_version,
            timeout: Duration::from_secs(args.catalog_timeout_seconds),
        },
    )
    .await
    .map_err(|error| format!("failed to initialise services: {error}"))?;

    let scope = args
        .shop_uuid
        .map_or(TickScope::AllShops, |uuid| {
            TickScope::Shop(ShopUuid::from_uuid(uuid))
        });

    let summary = context
        .scheduler
        .tick(scope, now)
        .await
        .map_err(|error| format!("scheduler tick failed: {error}"))?;

    let json = serde_json::to_string_pretty(&summary)
        .map_err(|error| format!("failed to encode summary: {error}"))?;

    println!("{json}");

    Ok(())
}

fn parse_at(raw: Option<&str>) -> Result<Option<Timestamp>, String> {
    raw.map(|value| {
        value
            .parse::<Timestamp>()
            .map_err(|error| format!("invalid --at timestamp: {error}"))
    })
    .transpose()
}

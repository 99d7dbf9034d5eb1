use clap::Args;
use pricedrop_app::{
    auth::{generate_token, hash_token},
    database,
    domain::shops::{PgShopsService, ShopsService, data::NewShop, records::ShopUuid},
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateShopArgs {
    /// Platform shop domain, e.g. `example.myshopify.com`
    #[arg(long)]
    domain: String,

    /// Platform Admin API access token
    #[arg(long, env = "SHOP_ACCESS_TOKEN", hide_env_values = true)]
    access_token: String,

    /// Maximum number of variants on sale at once; unlimited when omitted
    #[arg(long)]
    variant_limit: Option<u64>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Optional shop UUID; generated when omitted
    #[arg(long)]
    shop_uuid: Option<Uuid>,
}

pub(crate) async fn run(args: CreateShopArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgShopsService::new(pool);
    let uuid = args
        .shop_uuid
        .map_or_else(ShopUuid::new, ShopUuid::from_uuid);
    let token = generate_token();

    let shop = service
        .create_shop(NewShop {
            uuid,
            domain: args.domain,
            access_token: args.access_token,
            token_hash: hash_token(&token),
            variant_limit: args.variant_limit,
        })
        .await
        .map_err(|error| format!("failed to create shop: {error}"))?;

    println!("shop_uuid: {}", shop.uuid);
    println!("shop_domain: {}", shop.domain);
    println!("api_token: {token}");
    println!("store this token now; it is only shown once");

    Ok(())
}

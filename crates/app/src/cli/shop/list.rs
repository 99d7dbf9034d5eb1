use clap::Args;
use pricedrop_app::{
    database,
    domain::shops::{PgShopsService, ShopsService},
};

#[derive(Debug, Args)]
pub(crate) struct ListShopsArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: ListShopsArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let shops = PgShopsService::new(pool)
        .list_shops()
        .await
        .map_err(|error| format!("failed to list shops: {error}"))?;

    for shop in shops {
        let limit = shop
            .variant_limit
            .map_or_else(|| "unlimited".to_string(), |limit| limit.to_string());

        println!("{}\t{}\t{limit}", shop.uuid, shop.domain);
    }

    Ok(())
}

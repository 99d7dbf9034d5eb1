use clap::{Args, Subcommand};

mod create;
mod list;

#[derive(Debug, Args)]
pub(crate) struct ShopCommand {
    #[command(subcommand)]
    command: ShopSubcommand,
}

#[derive(Debug, Subcommand)]
enum ShopSubcommand {
    Create(create::CreateShopArgs),
    List(list::ListShopsArgs),
}

pub(crate) async fn run(command: ShopCommand) -> Result<(), String> {
    match command.command {
        ShopSubcommand::Create(args) => create::run(args).await,
        ShopSubcommand::List(args) => list::run(args).await,
    }
}

use clap::{Parser, Subcommand};

mod db;
mod scheduler;
mod shop;

#[derive(Debug, Parser)]
#[command(name = "pricedrop-app", about = "Pricedrop CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Shop(shop::ShopCommand),
    Scheduler(scheduler::SchedulerCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Shop(command) => shop::run(command).await,
            Commands::Scheduler(command) => scheduler::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}

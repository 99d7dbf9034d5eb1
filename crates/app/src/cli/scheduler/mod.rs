use clap::{Args, Subcommand};

mod tick;

#[derive(Debug, Args)]
pub(crate) struct SchedulerCommand {
    #[command(subcommand)]
    command: SchedulerSubcommand,
}

#[derive(Debug, Subcommand)]
enum SchedulerSubcommand {
    Tick(tick::TickArgs),
}

pub(crate) async fn run(command: SchedulerCommand) -> Result<(), String> {
    match command.command {
        SchedulerSubcommand::Tick(args) => tick::run(args).await,
    }
}

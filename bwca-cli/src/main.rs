//! BWCA CLI - lake lookups and Big Fish Index rankings for the Boundary Waters.

use bwca_cmd::{Command, Config};
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "bwca-cli",
    version,
    about = "Boundary Waters lake, campsite and Big Fish Index toolkit"
)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("{:?}", cli.config);
    bwca_cmd::run(&cli.config, cli.command).await
}

//! Command dispatch.

use super::command::{Cli, Commands};
use super::output::{self, OutputConfig};
use super::{execute, history, recover, simulate, status, wallet};
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Configure output and logging, then run the selected command.
pub async fn run(cli: Cli) -> Result<()> {
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    let config = Config::load(&cli.config)?;
    config.init_logging();

    match &cli.command {
        Commands::Status => status::execute(&config).await,
        Commands::Simulate(args) => simulate::execute(&config, args).await,
        Commands::Execute(args) => execute::execute(&config, args).await,
        Commands::History(args) => history::execute(&config, args).await,
        Commands::LinkWallet(args) => wallet::execute(&config, args),
        Commands::Recover => recover::execute(&config).await,
    }
}

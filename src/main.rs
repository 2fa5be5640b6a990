use anyhow::Context;
use clap::Parser;
use rebalancer::adapter::inbound::cli::command::Cli;
use rebalancer::adapter::inbound::cli::{output, run};

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    if let Err(e) = runtime.block_on(run::run(cli)) {
        output::error(&e.to_string());
        std::process::exit(1);
    }
    Ok(())
}

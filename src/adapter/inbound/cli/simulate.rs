//! Handler for the `simulate` command.

use serde_json::json;

use super::command::SimulateArgs;
use super::input::{load_allocation, sentiment_reading};
use crate::adapter::inbound::cli::output;
use crate::domain::execution::Recommendation;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_services;
use crate::infrastructure::config::Config;
use crate::port::inbound::rebalance::RebalanceService;

/// Execute the simulate command.
pub async fn execute(config: &Config, args: &SimulateArgs) -> Result<()> {
    let allocation = load_allocation(&args.allocation)?;
    let provided = sentiment_reading(&args.sentiment)?;
    let services = build_services(config, None).await?;
    let engine = &services.engine;

    let sentiment = match provided {
        Some(reading) => reading,
        None => engine.sentiment().await,
    };
    let report = engine.simulate(&allocation, &sentiment).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "simulate",
            "allocationId": allocation.id,
            "sentiment": sentiment,
            "report": report,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Allocation", &allocation.id);
    output::field(
        "Sentiment",
        format!("{} ({})", sentiment.score, sentiment.label),
    );
    let strategies = if report.active_strategies.is_empty() {
        output::muted("none")
    } else {
        report
            .active_strategies
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    output::field("Active", strategies);
    output::field("Est. gas", format!("${}", report.estimated_gas_cost_usd));
    output::field("Est. profit", format!("${}", report.estimated_profit_usd));

    println!();
    match &report.recommendation {
        Recommendation::Execute => output::success("Recommendation: execute"),
        Recommendation::Hold { reason } => output::warning(&format!("Recommendation: hold ({reason})")),
    }
    Ok(())
}

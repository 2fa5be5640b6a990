//! Handler for the `execute` command.

use serde_json::json;

use super::command::ExecuteArgs;
use super::input::{load_allocation, sentiment_reading};
use crate::adapter::inbound::cli::output;
use crate::domain::rebalance::{RebalanceRecord, RebalanceStatus};
use crate::error::Result;
use crate::infrastructure::bootstrap::build_services;
use crate::infrastructure::config::Config;
use crate::port::inbound::rebalance::{ExecuteRequest, RebalanceService};
use crate::port::outbound::store::RecordStore;

/// Execute the rebalance and wait for any live confirmation.
pub async fn execute(config: &Config, args: &ExecuteArgs) -> Result<()> {
    let allocation = load_allocation(&args.allocation)?;
    let provided = sentiment_reading(&args.sentiment)?;
    let services = build_services(config, None).await?;
    let engine = &services.engine;

    let mut request = ExecuteRequest::new(allocation).with_trigger(args.trigger);
    if let Some(reading) = provided {
        request = request.with_sentiment(reading);
    }

    let result = engine.execute(request).await?;
    engine.drain_monitors().await;

    let record = match &result.record_id {
        Some(id) => services.store.get(id).await?,
        None => None,
    };

    if output::is_json() {
        output::json_output(json!({
            "command": "execute",
            "result": result,
            "record": record,
            "metrics": services.metrics.snapshot(),
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Mode", result.mode);
    output::field(
        "Sentiment",
        format!("{} ({})", result.sentiment_score, result.sentiment_label),
    );

    if !result.executed {
        println!();
        output::warning("No strategy conditions met, nothing executed");
        return Ok(());
    }

    let strategies = result
        .active_strategies
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    output::field("Active", strategies);
    output::field("Est. gas", format!("${}", result.estimated_gas_cost_usd));
    if let Some(tx_hash) = &result.tx_hash {
        output::field("Transaction", output::muted(tx_hash));
    }

    println!();
    match record {
        Some(record) => print_outcome(&record),
        None => output::warning("Record not found after execution"),
    }
    Ok(())
}

fn print_outcome(record: &RebalanceRecord) {
    match record.status {
        RebalanceStatus::Success => {
            let profit = record.profit_usd.unwrap_or_default();
            output::success(&format!(
                "Rebalance {} succeeded, profit {}",
                record.id,
                output::positive(format!("${profit}"))
            ));
        }
        RebalanceStatus::Failed => output::warning(&format!(
            "Rebalance {} failed: {}",
            record.id,
            output::negative(record.error_message.as_deref().unwrap_or("unknown error"))
        )),
        RebalanceStatus::Pending => {
            output::warning(&format!("Rebalance {} is still pending", record.id));
        }
    }
}

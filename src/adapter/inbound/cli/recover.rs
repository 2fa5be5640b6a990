//! Handler for the `recover` command.

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_services;
use crate::infrastructure::config::Config;
use crate::port::inbound::rebalance::RebalanceService;

/// Resume monitoring of pending records and wait for every outcome.
pub async fn execute(config: &Config) -> Result<()> {
    let services = build_services(config, None).await?;
    let report = services.engine.recover_pending().await?;
    services.engine.drain_monitors().await;

    if output::is_json() {
        output::json_output(json!({
            "command": "recover",
            "reattached": report.reattached,
            "expired": report.expired,
            "skipped": report.skipped,
            "failed": report.failed,
            "metrics": services.metrics.snapshot(),
        }));
        return Ok(());
    }

    output::field("Re-attached", report.reattached);
    output::field("Expired", report.expired);
    output::field("Skipped", report.skipped);
    output::field("Failed", report.failed);
    if report.skipped > 0 {
        output::hint("skipped records stay pending until a ledger can observe them");
    }
    if report.failed > 0 {
        output::warning(&format!("{} record(s) could not be recovered, run again", report.failed));
    }
    Ok(())
}

//! Handler for the `status` command.

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::application::execution::ModeSelection;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_services;
use crate::infrastructure::config::Config;
use crate::port::outbound::store::RecordStore;

/// Execute the status command.
pub async fn execute(config: &Config) -> Result<()> {
    let services = build_services(config, None).await?;
    let selection = services.engine.selection().clone();
    let pending = services.store.find_pending().await?.len();
    let sentiment = config.sentiment.endpoint().unwrap_or("none");

    if output::is_json() {
        let (signer, reason) = match &selection {
            ModeSelection::Live { signer } => (Some(signer.clone()), None),
            ModeSelection::Paper(reason) => (None, Some(reason.to_string())),
        };
        output::json_output(json!({
            "command": "status",
            "mode": selection.mode(),
            "signer": signer,
            "paperReason": reason,
            "chainId": config.ledger.chain_id,
            "vault": config.ledger.vault_address,
            "database": config.database,
            "sentimentEndpoint": sentiment,
            "pendingRecords": pending,
        }));
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    match &selection {
        ModeSelection::Live { signer } => {
            output::field("Mode", output::positive("live"));
            output::field("Keeper", signer);
        }
        ModeSelection::Paper(reason) => {
            output::field("Mode", output::highlight("paper"));
            output::field("Reason", output::muted(reason));
        }
    }

    output::section("Configuration");
    if config.ledger.is_enabled() {
        output::field("Chain", config.ledger.chain_id);
        output::field("Vault", &config.ledger.vault_address);
        output::field("Native price", format!("${}", config.ledger.native_price_usd));
    } else {
        output::field("Ledger", output::muted("disabled"));
    }
    output::field("Sentiment", sentiment);
    output::field("Database", &config.database);

    if pending > 0 {
        println!();
        output::warning(&format!("{pending} record(s) still pending"));
        output::hint("run `rebalancer recover` to resume monitoring");
    }
    Ok(())
}

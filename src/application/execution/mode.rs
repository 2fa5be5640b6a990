//! Capability probing for the execution mode.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::execution::ExecutionMode;
use crate::port::outbound::ledger::LedgerClient;

/// Why the engine is not running live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaperReason {
    NoLedger,
    NoSigner,
    Unauthorized { address: String },
    ProbeFailed { error: String },
}

impl std::fmt::Display for PaperReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoLedger => f.write_str("no ledger client configured"),
            Self::NoSigner => f.write_str("ledger client has no signing credentials"),
            Self::Unauthorized { address } => {
                write!(f, "signer {address} is not an authorized keeper")
            }
            Self::ProbeFailed { error } => write!(f, "keeper authorization check failed: {error}"),
        }
    }
}

/// Result of probing the ledger once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeSelection {
    Live { signer: String },
    Paper(PaperReason),
}

impl ModeSelection {
    #[must_use]
    pub fn mode(&self) -> ExecutionMode {
        match self {
            Self::Live { .. } => ExecutionMode::Live,
            Self::Paper(_) => ExecutionMode::Paper,
        }
    }
}

/// Probe the ledger and decide the mode. Logs the decision; never fails.
pub async fn select_mode(ledger: Option<&Arc<dyn LedgerClient>>) -> ModeSelection {
    let selection = probe(ledger).await;
    match &selection {
        ModeSelection::Live { signer } => {
            info!(mode = "live", signer = %signer, "Keeper authorized, live execution enabled");
        }
        ModeSelection::Paper(reason) => {
            warn!(mode = "paper", reason = %reason, "Live execution unavailable, using paper trading");
        }
    }
    selection
}

async fn probe(ledger: Option<&Arc<dyn LedgerClient>>) -> ModeSelection {
    let Some(ledger) = ledger else {
        return ModeSelection::Paper(PaperReason::NoLedger);
    };
    let Some(signer) = ledger.signer_address() else {
        return ModeSelection::Paper(PaperReason::NoSigner);
    };
    match ledger.is_authorized_signer(&signer).await {
        Ok(true) => ModeSelection::Live { signer },
        Ok(false) => ModeSelection::Paper(PaperReason::Unauthorized { address: signer }),
        Err(e) => ModeSelection::Paper(PaperReason::ProbeFailed {
            error: e.to_string(),
        }),
    }
}

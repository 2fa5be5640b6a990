//! Scripted ledger client.
//!
//! Every behaviour the engine depends on can be scripted: authorization,
//! gas estimation, submission and the eventual receipt. Counters expose how
//! often the engine reached the ledger.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::LedgerError;
use crate::port::outbound::ledger::{
    Confirmation, FeeData, LedgerClient, RebalanceCall, ReceiptStatus, SubmittedTransaction,
};

/// Keeper address reported by [`ScriptedLedger::authorized`].
pub const KEEPER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Gas units returned by default.
pub const GAS_UNITS: u64 = 100_000;

/// Gas price returned by default: 20 gwei.
pub const GAS_PRICE_WEI: u128 = 20_000_000_000;

/// How `wait_for_confirmation` behaves.
#[derive(Debug, Clone)]
pub enum ConfirmationScript {
    /// Mined with the given status after `delay`.
    Mined { status: ReceiptStatus, delay: Duration },
    /// The ledger call itself fails.
    Error(String),
    /// Never resolves.
    Never,
    /// Panics inside the watcher task.
    Panic,
}

pub struct ScriptedLedger {
    signer: Option<String>,
    authorized: bool,
    probe_error: Option<String>,
    estimate_error: Option<String>,
    submit_error: Option<String>,
    gas_units: u64,
    gas_price_wei: u128,
    confirmation: ConfirmationScript,
    submissions: AtomicUsize,
    confirmation_waits: AtomicUsize,
    last_call: Mutex<Option<RebalanceCall>>,
}

impl ScriptedLedger {
    /// Authorized keeper whose transactions confirm immediately.
    pub fn authorized() -> Self {
        Self {
            signer: Some(KEEPER.to_string()),
            authorized: true,
            probe_error: None,
            estimate_error: None,
            submit_error: None,
            gas_units: GAS_UNITS,
            gas_price_wei: GAS_PRICE_WEI,
            confirmation: ConfirmationScript::Mined {
                status: ReceiptStatus::Success,
                delay: Duration::ZERO,
            },
            submissions: AtomicUsize::new(0),
            confirmation_waits: AtomicUsize::new(0),
            last_call: Mutex::new(None),
        }
    }

    /// Signer is known to the vault but not a keeper.
    #[must_use]
    pub fn unauthorized(mut self) -> Self {
        self.authorized = false;
        self
    }

    /// Read-only client.
    #[must_use]
    pub fn without_signer(mut self) -> Self {
        self.signer = None;
        self
    }

    /// The authorization probe errors.
    #[must_use]
    pub fn failing_probe(mut self, reason: &str) -> Self {
        self.probe_error = Some(reason.to_string());
        self
    }

    #[must_use]
    pub fn with_gas(mut self, units: u64, price_wei: u128) -> Self {
        self.gas_units = units;
        self.gas_price_wei = price_wei;
        self
    }

    #[must_use]
    pub fn failing_estimate(mut self, reason: &str) -> Self {
        self.estimate_error = Some(reason.to_string());
        self
    }

    #[must_use]
    pub fn failing_submit(mut self, reason: &str) -> Self {
        self.submit_error = Some(reason.to_string());
        self
    }

    #[must_use]
    pub fn confirming_after(mut self, delay: Duration) -> Self {
        self.confirmation = ConfirmationScript::Mined {
            status: ReceiptStatus::Success,
            delay,
        };
        self
    }

    #[must_use]
    pub fn reverting(mut self) -> Self {
        self.confirmation = ConfirmationScript::Mined {
            status: ReceiptStatus::Reverted,
            delay: Duration::ZERO,
        };
        self
    }

    #[must_use]
    pub fn with_confirmation(mut self, script: ConfirmationScript) -> Self {
        self.confirmation = script;
        self
    }

    /// Number of accepted or rejected `submit` calls.
    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    /// Number of `wait_for_confirmation` calls.
    pub fn confirmation_waits(&self) -> usize {
        self.confirmation_waits.load(Ordering::SeqCst)
    }

    /// The most recent call passed to `submit`.
    pub fn last_call(&self) -> Option<RebalanceCall> {
        self.last_call.lock().clone()
    }
}

#[async_trait]
impl LedgerClient for ScriptedLedger {
    fn signer_address(&self) -> Option<String> {
        self.signer.clone()
    }

    async fn is_authorized_signer(&self, _address: &str) -> Result<bool, LedgerError> {
        match &self.probe_error {
            Some(reason) => Err(LedgerError::Rpc(reason.clone())),
            None => Ok(self.authorized),
        }
    }

    async fn estimate_gas(&self, _call: &RebalanceCall) -> Result<u64, LedgerError> {
        match &self.estimate_error {
            Some(reason) => Err(LedgerError::Rpc(reason.clone())),
            None => Ok(self.gas_units),
        }
    }

    async fn submit(&self, call: &RebalanceCall) -> Result<SubmittedTransaction, LedgerError> {
        let n = self.submissions.fetch_add(1, Ordering::SeqCst) + 1;
        *self.last_call.lock() = Some(call.clone());
        if let Some(reason) = &self.submit_error {
            return Err(LedgerError::Rpc(reason.clone()));
        }
        Ok(SubmittedTransaction {
            tx_hash: format!("0x{n:064x}"),
        })
    }

    async fn wait_for_confirmation(
        &self,
        tx_hash: &str,
        _timeout: Duration,
    ) -> Result<Confirmation, LedgerError> {
        self.confirmation_waits.fetch_add(1, Ordering::SeqCst);
        match &self.confirmation {
            ConfirmationScript::Mined { status, delay } => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                Ok(Confirmation {
                    tx_hash: tx_hash.to_string(),
                    status: *status,
                    gas_used: self.gas_units,
                    gas_price_wei: self.gas_price_wei,
                    block_number: Some(42),
                })
            }
            ConfirmationScript::Error(reason) => Err(LedgerError::Rpc(reason.clone())),
            ConfirmationScript::Never => std::future::pending().await,
            ConfirmationScript::Panic => panic!("scripted confirmation panic"),
        }
    }

    async fn current_fee_data(&self) -> Result<FeeData, LedgerError> {
        Ok(FeeData {
            gas_price_wei: self.gas_price_wei,
        })
    }
}

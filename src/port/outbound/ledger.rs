//! Ledger client port.
//!
//! The engine treats the chain as a black box: it can ask whether the
//! keeper is authorized, estimate and submit a rebalance call, and wait for
//! a receipt. Fee markets, nonces and mempool behaviour belong to the
//! implementation.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::id::AllocationId;
use crate::error::LedgerError;

/// A rebalance call against the keeper vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebalanceCall {
    pub allocation_id: AllocationId,
    /// The user's wallet address.
    pub wallet: String,
    /// Ledger-level asset address (may be the native sentinel).
    pub asset_address: String,
    pub asset_decimals: u32,
    pub amount: Decimal,
}

/// Reference to a transaction accepted by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTransaction {
    pub tx_hash: String,
}

/// Execution status from a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

/// A mined receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub tx_hash: String,
    pub status: ReceiptStatus,
    pub gas_used: u64,
    pub gas_price_wei: u128,
    pub block_number: Option<u64>,
}

/// Current network fee data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeData {
    pub gas_price_wei: u128,
}

/// Port for submitting keeper transactions.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`); one client is shared
/// by every execution and monitor.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Address of the configured signer, if the client holds credentials.
    fn signer_address(&self) -> Option<String>;

    /// Whether `address` may submit rebalances on the target contract.
    async fn is_authorized_signer(&self, address: &str) -> Result<bool, LedgerError>;

    /// Gas units the call is expected to consume.
    async fn estimate_gas(&self, call: &RebalanceCall) -> Result<u64, LedgerError>;

    /// Sign and broadcast the call without waiting for inclusion.
    async fn submit(&self, call: &RebalanceCall) -> Result<SubmittedTransaction, LedgerError>;

    /// Block until the transaction is mined or `timeout` elapses.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Timeout`] when no receipt appears in time.
    async fn wait_for_confirmation(
        &self,
        tx_hash: &str,
        timeout: Duration,
    ) -> Result<Confirmation, LedgerError>;

    async fn current_fee_data(&self) -> Result<FeeData, LedgerError>;
}

//! Keeper vault client.
//!
//! Talks to a vault contract exposing `rebalance` and `isKeeper`. Providers
//! are built per call from the RPC URL; the keeper key is optional so the
//! client can still observe receipts when it cannot sign.

use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::network::{EthereumWallet, ReceiptResponse};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::sol;
use async_trait::async_trait;
use tokio::time::Instant;
use tracing::debug;
use url::Url;

use crate::domain::estimate::to_base_units;
use crate::error::LedgerError;
use crate::port::outbound::ledger::{
    Confirmation, FeeData, LedgerClient, RebalanceCall, ReceiptStatus, SubmittedTransaction,
};

/// How often to ask for a receipt while waiting.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

sol! {
    #[sol(rpc)]
    contract IRebalanceVault {
        function rebalance(address user, address asset, uint256 amount) external;
        function isKeeper(address account) external view returns (bool);
    }
}

/// [`LedgerClient`] backed by a JSON-RPC endpoint.
pub struct EvmLedgerClient {
    rpc_url: Url,
    chain_id: u64,
    vault: Address,
    signer: Option<PrivateKeySigner>,
    poll_interval: Duration,
}

impl std::fmt::Debug for EvmLedgerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmLedgerClient")
            .field("rpc_url", &self.rpc_url.as_str())
            .field("chain_id", &self.chain_id)
            .field("vault", &self.vault)
            .field("signer", &self.signer.as_ref().map(PrivateKeySigner::address))
            .finish()
    }
}

impl EvmLedgerClient {
    /// Create a client, with signing enabled when `private_key` is given.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidAddress`] for a malformed vault address
    /// and [`LedgerError::Signer`] for a malformed key.
    pub fn new(
        rpc_url: Url,
        chain_id: u64,
        vault_address: &str,
        private_key: Option<&str>,
    ) -> Result<Self, LedgerError> {
        let vault = parse_address(vault_address)?;
        let signer = private_key
            .map(|key| {
                PrivateKeySigner::from_str(key.trim())
                    .map_err(|e| LedgerError::Signer(e.to_string()))
            })
            .transpose()?;

        Ok(Self {
            rpc_url,
            chain_id,
            vault,
            signer,
            poll_interval: RECEIPT_POLL_INTERVAL,
        })
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn require_signer(&self) -> Result<&PrivateKeySigner, LedgerError> {
        self.signer
            .as_ref()
            .ok_or_else(|| LedgerError::Signer("no keeper key configured".to_string()))
    }

    fn call_args(call: &RebalanceCall) -> Result<(Address, Address, U256), LedgerError> {
        let user = parse_address(&call.wallet)?;
        let asset = parse_address(&call.asset_address)?;
        let units = to_base_units(call.amount, call.asset_decimals).ok_or_else(|| {
            LedgerError::Rpc(format!(
                "amount {} cannot be scaled to {} decimals",
                call.amount, call.asset_decimals
            ))
        })?;
        Ok((user, asset, U256::from(units)))
    }
}

fn parse_address(address: &str) -> Result<Address, LedgerError> {
    Address::from_str(address.trim()).map_err(|e| LedgerError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

fn rpc_error(e: impl std::fmt::Display) -> LedgerError {
    LedgerError::Rpc(e.to_string())
}

#[async_trait]
impl LedgerClient for EvmLedgerClient {
    fn signer_address(&self) -> Option<String> {
        self.signer.as_ref().map(|s| s.address().to_string())
    }

    async fn is_authorized_signer(&self, address: &str) -> Result<bool, LedgerError> {
        let account = parse_address(address)?;
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());

        let chain_id = provider.get_chain_id().await.map_err(rpc_error)?;
        if chain_id != self.chain_id {
            return Err(LedgerError::Rpc(format!(
                "rpc reports chain {chain_id}, expected {}",
                self.chain_id
            )));
        }

        let vault = IRebalanceVault::new(self.vault, &provider);
        vault.isKeeper(account).call().await.map_err(rpc_error)
    }

    async fn estimate_gas(&self, call: &RebalanceCall) -> Result<u64, LedgerError> {
        let signer = self.require_signer()?;
        let (user, asset, amount) = Self::call_args(call)?;
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());

        let vault = IRebalanceVault::new(self.vault, &provider);
        vault
            .rebalance(user, asset, amount)
            .from(signer.address())
            .estimate_gas()
            .await
            .map_err(rpc_error)
    }

    async fn submit(&self, call: &RebalanceCall) -> Result<SubmittedTransaction, LedgerError> {
        let signer = self.require_signer()?;
        let (user, asset, amount) = Self::call_args(call)?;
        let wallet = EthereumWallet::from(signer.clone());
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(self.rpc_url.clone());

        let vault = IRebalanceVault::new(self.vault, &provider);
        let pending = vault
            .rebalance(user, asset, amount)
            .send()
            .await
            .map_err(rpc_error)?;

        let tx_hash = format!("{:?}", pending.tx_hash());
        debug!(tx_hash = %tx_hash, allocation_id = %call.allocation_id, "Rebalance broadcast");
        Ok(SubmittedTransaction { tx_hash })
    }

    async fn wait_for_confirmation(
        &self,
        tx_hash: &str,
        timeout: Duration,
    ) -> Result<Confirmation, LedgerError> {
        let hash = TxHash::from_str(tx_hash)
            .map_err(|e| LedgerError::Rpc(format!("invalid transaction hash {tx_hash}: {e}")))?;
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());
        let deadline = Instant::now() + timeout;

        loop {
            match provider.get_transaction_receipt(hash).await {
                Ok(Some(receipt)) => {
                    let status = if receipt.status() {
                        ReceiptStatus::Success
                    } else {
                        ReceiptStatus::Reverted
                    };
                    return Ok(Confirmation {
                        tx_hash: tx_hash.to_string(),
                        status,
                        gas_used: receipt.gas_used(),
                        gas_price_wei: receipt.effective_gas_price(),
                        block_number: receipt.block_number(),
                    });
                }
                Ok(None) => {}
                Err(e) => debug!(tx_hash = %tx_hash, error = %e, "Receipt poll failed"),
            }

            if Instant::now() + self.poll_interval >= deadline {
                return Err(LedgerError::Timeout {
                    secs: timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn current_fee_data(&self) -> Result<FeeData, LedgerError> {
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());
        let gas_price_wei = provider.get_gas_price().await.map_err(rpc_error)?;
        Ok(FeeData { gas_price_wei })
    }
}

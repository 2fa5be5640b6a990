//! Ledger connection configuration.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::asset::{AssetEntry, AssetRegistry};

/// Environment variable holding the keeper's private key.
pub const KEEPER_PRIVATE_KEY_ENV: &str = "KEEPER_PRIVATE_KEY";

/// `[ledger]` section.
///
/// Leaving `vault_address` empty disables the ledger and forces paper mode.
#[derive(Clone, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub rpc_url: String,
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    #[serde(default)]
    pub vault_address: String,
    /// USD per unit of native gas token.
    #[serde(default)]
    pub native_price_usd: Decimal,
    #[serde(default = "default_confirmation_timeout_secs")]
    pub confirmation_timeout_secs: u64,
    /// Overrides and additions to the built-in asset table.
    #[serde(default)]
    pub assets: BTreeMap<String, AssetConfig>,
    /// Loaded from [`KEEPER_PRIVATE_KEY_ENV`], never from the file.
    #[serde(skip)]
    pub private_key: Option<String>,
}

/// One `[ledger.assets.<id>]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetConfig {
    pub address: String,
    pub decimals: u32,
}

const fn default_chain_id() -> u64 {
    1
}

const fn default_confirmation_timeout_secs() -> u64 {
    300
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rpc_url: String::new(),
            chain_id: default_chain_id(),
            vault_address: String::new(),
            native_price_usd: Decimal::ZERO,
            confirmation_timeout_secs: default_confirmation_timeout_secs(),
            assets: BTreeMap::new(),
            private_key: None,
        }
    }
}

impl fmt::Debug for LedgerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerConfig")
            .field("rpc_url", &self.rpc_url)
            .field("chain_id", &self.chain_id)
            .field("vault_address", &self.vault_address)
            .field("native_price_usd", &self.native_price_usd)
            .field("confirmation_timeout_secs", &self.confirmation_timeout_secs)
            .field("assets", &self.assets)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl LedgerConfig {
    /// Whether a target contract is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.vault_address.trim().is_empty()
    }

    #[must_use]
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }

    /// Built-in assets with configured entries layered on top.
    #[must_use]
    pub fn asset_registry(&self) -> AssetRegistry {
        self.assets
            .iter()
            .fold(AssetRegistry::default(), |registry, (id, asset)| {
                registry.with_asset(id, AssetEntry::new(asset.address.clone(), asset.decimals))
            })
    }
}

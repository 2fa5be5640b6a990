//! Internal asset id -> ledger asset address lookup.
//!
//! Unknown ids resolve to [`NATIVE_ASSET_ADDRESS`] instead of failing. The
//! resolution carries a flag so callers can log the fallback.

use std::collections::HashMap;

/// Sentinel address standing for the chain's native asset.
pub const NATIVE_ASSET_ADDRESS: &str = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE";

/// Decimals of the native asset.
pub const NATIVE_ASSET_DECIMALS: u32 = 18;

/// Built-in Ethereum mainnet token table: (id, address, decimals).
const DEFAULT_ASSETS: &[(&str, &str, u32)] = &[
    ("weth", "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", 18),
    ("usdc", "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", 6),
    ("usdt", "0xdAC17F958D2ee523a2206206994597C13D831ec7", 6),
    ("dai", "0x6B175474E89094C44Da98b954EedeAC495271d0F", 18),
    ("wbtc", "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599", 8),
    ("link", "0x514910771AF9Ca656af840dff83E8264EcF986CA", 18),
    ("uni", "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984", 18),
];

/// Ledger-level description of an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    pub address: String,
    pub decimals: u32,
}

impl AssetEntry {
    pub fn new(address: impl Into<String>, decimals: u32) -> Self {
        Self {
            address: address.into(),
            decimals,
        }
    }
}

/// Result of resolving an internal asset id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAsset {
    /// The id is in the table.
    Mapped(AssetEntry),
    /// The id is unknown; the native-asset sentinel stands in.
    NativeFallback(AssetEntry),
}

impl ResolvedAsset {
    #[must_use]
    pub fn entry(&self) -> &AssetEntry {
        match self {
            Self::Mapped(entry) | Self::NativeFallback(entry) => entry,
        }
    }

    #[must_use]
    pub fn is_native_fallback(&self) -> bool {
        matches!(self, Self::NativeFallback(_))
    }
}

/// Static asset table, keyed by lowercase internal id.
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    assets: HashMap<String, AssetEntry>,
}

impl Default for AssetRegistry {
    fn default() -> Self {
        let assets = DEFAULT_ASSETS
            .iter()
            .map(|(id, address, decimals)| ((*id).to_string(), AssetEntry::new(*address, *decimals)))
            .collect();
        Self { assets }
    }
}

impl AssetRegistry {
    /// An empty table; every lookup falls back to the native asset.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            assets: HashMap::new(),
        }
    }

    /// Add or replace an entry.
    #[must_use]
    pub fn with_asset(mut self, asset_id: &str, entry: AssetEntry) -> Self {
        self.assets.insert(asset_id.trim().to_ascii_lowercase(), entry);
        self
    }

    #[must_use]
    pub fn resolve(&self, asset_id: &str) -> ResolvedAsset {
        match self.assets.get(&asset_id.trim().to_ascii_lowercase()) {
            Some(entry) => ResolvedAsset::Mapped(entry.clone()),
            None => ResolvedAsset::NativeFallback(AssetEntry::new(
                NATIVE_ASSET_ADDRESS,
                NATIVE_ASSET_DECIMALS,
            )),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

//! User directory port.

use async_trait::async_trait;

use crate::domain::id::UserId;
use crate::error::Result;

/// Lookup of users' on-chain wallet addresses.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// The user's wallet address, or `None` if none is linked.
    async fn get_wallet_address(&self, user_id: &UserId) -> Result<Option<String>>;
}

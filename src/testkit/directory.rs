//! Fixed user directory.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::id::UserId;
use crate::error::Result;
use crate::port::outbound::directory::UserDirectory;

/// Resolves only the wallets it was built with.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    wallets: HashMap<UserId, String>,
}

impl StaticDirectory {
    /// Directory with no linked wallets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Link `address` to `user_id`.
    #[must_use]
    pub fn with_wallet(mut self, user_id: &str, address: &str) -> Self {
        self.wallets.insert(UserId::from(user_id), address.to_string());
        self
    }
}

#[async_trait]
impl UserDirectory for StaticDirectory {
    async fn get_wallet_address(&self, user_id: &UserId) -> Result<Option<String>> {
        Ok(self.wallets.get(user_id).cloned())
    }
}

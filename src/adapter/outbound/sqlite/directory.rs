//! SQLite user directory.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use diesel::prelude::*;

use super::database::connection::DbPool;
use super::database::model::WalletRow;
use super::database::schema::wallets;
use crate::domain::id::UserId;
use crate::error::{Error, Result};
use crate::port::outbound::directory::UserDirectory;

/// Wallet lookup backed by the `wallets` table.
pub struct SqliteUserDirectory {
    pool: DbPool,
}

impl SqliteUserDirectory {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Link `address` to `user_id`, replacing any previous address.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn link_wallet(&self, user_id: &UserId, address: &str) -> Result<()> {
        let row = WalletRow {
            user_id: user_id.to_string(),
            address: address.to_string(),
            linked_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        };
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        diesel::replace_into(wallets::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl UserDirectory for SqliteUserDirectory {
    async fn get_wallet_address(&self, user_id: &UserId) -> Result<Option<String>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        wallets::table
            .find(user_id.as_str())
            .select(wallets::address)
            .first::<String>(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))
    }
}

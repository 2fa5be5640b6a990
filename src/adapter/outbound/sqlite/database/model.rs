//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{rebalances, wallets};

/// Database row for a rebalance record.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = rebalances)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RebalanceRow {
    pub id: String,
    pub user_id: String,
    pub allocation_id: String,
    pub ecosystem: String,
    pub asset_id: String,
    pub trigger_type: String,
    pub sentiment_score: i32,
    pub sentiment_label: String,
    pub gas_cost_usd: Option<String>,
    pub profit_usd: Option<String>,
    pub tx_hash: Option<String>,
    pub status: String,
    pub error_message: Option<String>,
    pub executed_at: String,
}

/// Terminal update applied to a pending row. `None` leaves a column as is.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = rebalances)]
pub struct RebalanceChangeset {
    pub status: String,
    pub gas_cost_usd: Option<String>,
    pub profit_usd: Option<String>,
    pub error_message: Option<String>,
}

/// Database row for a linked wallet.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = wallets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WalletRow {
    pub user_id: String,
    pub address: String,
    pub linked_at: String,
}

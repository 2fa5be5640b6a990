//! Handler for the `history` command.

use serde_json::json;
use tabled::{Table, Tabled};

use super::command::HistoryArgs;
use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::sqlite::SqliteRecordStore;
use crate::domain::id::UserId;
use crate::domain::rebalance::RebalanceRecord;
use crate::error::Result;
use crate::infrastructure::bootstrap::open_database;
use crate::infrastructure::config::Config;
use crate::port::outbound::store::RecordStore;

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Executed")]
    executed_at: String,
    #[tabled(rename = "Allocation")]
    allocation: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Trigger")]
    trigger: &'static str,
    #[tabled(rename = "Sentiment")]
    sentiment: String,
    #[tabled(rename = "Gas USD")]
    gas: String,
    #[tabled(rename = "Profit USD")]
    profit: String,
    #[tabled(rename = "Tx")]
    tx: String,
}

impl From<&RebalanceRecord> for HistoryRow {
    fn from(record: &RebalanceRecord) -> Self {
        Self {
            executed_at: record.executed_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            allocation: record.allocation_id.to_string(),
            status: record.status.as_str(),
            trigger: record.trigger_type.as_str(),
            sentiment: format!("{} {}", record.sentiment_score, record.sentiment_label),
            gas: record.gas_cost_usd.map_or_else(|| "-".to_string(), |d| d.round_dp(2).to_string()),
            profit: record.profit_usd.map_or_else(|| "-".to_string(), |d| d.round_dp(2).to_string()),
            tx: record.tx_hash.as_deref().map_or_else(|| "-".to_string(), short_hash),
        }
    }
}

fn short_hash(hash: &str) -> String {
    if hash.len() <= 14 {
        return hash.to_string();
    }
    format!("{}…{}", &hash[..8], &hash[hash.len() - 4..])
}

/// Execute the history command.
pub async fn execute(config: &Config, args: &HistoryArgs) -> Result<()> {
    let store = SqliteRecordStore::new(open_database(config)?);
    let user_id = UserId::from(args.user.as_str());
    let records = store.find_by_user(&user_id).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "history",
            "userId": user_id,
            "records": records,
        }));
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    if records.is_empty() {
        output::warning(&format!("No rebalance records for {user_id}"));
        return Ok(());
    }

    output::section(&format!("Rebalances for {user_id}"));
    let rows: Vec<HistoryRow> = records.iter().map(HistoryRow::from).collect();
    output::lines(&Table::new(rows).to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hash_keeps_both_ends() {
        let hash = format!("0x{}", "ab".repeat(32));
        assert_eq!(short_hash(&hash), "0xababab…abab");
    }

    #[test]
    fn short_hash_leaves_short_values() {
        assert_eq!(short_hash("paper_1"), "paper_1");
    }
}

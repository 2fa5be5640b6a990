use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::id::RebalanceId;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Execution-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("no wallet address linked for user {user_id}")]
    MissingWallet { user_id: String },

    #[error("submission failed (record {record_id}): {reason}")]
    SubmissionFailed {
        record_id: RebalanceId,
        reason: String,
    },

    #[error("allocation {allocation_id} already has an execution in flight")]
    AlreadyInFlight { allocation_id: String },

    #[error("rebalance record {0} not found")]
    UnknownRecord(RebalanceId),

    #[error("invalid amount for asset {asset_id}: {reason}")]
    InvalidAmount { asset_id: String, reason: String },
}

/// Errors reported by the ledger client.
///
/// Messages are kept raw so they can be stored verbatim on failed records.
#[derive(Error, Debug, Clone)]
pub enum LedgerError {
    #[error("{0}")]
    Rpc(String),

    #[error("signer unavailable: {0}")]
    Signer(String),

    #[error("invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("no confirmation within {secs}s")]
    Timeout { secs: u64 },

    #[error("transaction {tx_hash} reverted in block {block}")]
    Reverted { tx_hash: String, block: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("sentiment provider error: {0}")]
    Sentiment(String),
}

impl Error {
    /// Store failures that may succeed when retried.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Database(_))
    }

    /// The record was already terminal when the update arrived.
    #[must_use]
    pub fn is_already_terminal(&self) -> bool {
        matches!(self, Self::Domain(DomainError::InvalidTransition { .. }))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rebalance::RebalanceStatus;

    #[test]
    fn store_errors_are_transient() {
        assert!(Error::Database("database is locked".into()).is_transient());
        assert!(Error::Connection("pool timed out".into()).is_transient());
        assert!(!Error::Parse("bad row".into()).is_transient());
    }

    #[test]
    fn invalid_transition_means_already_terminal() {
        let err = Error::from(DomainError::InvalidTransition {
            from: RebalanceStatus::Success,
            to: RebalanceStatus::Failed,
        });
        assert!(err.is_already_terminal());
        assert!(!err.is_transient());
    }
}

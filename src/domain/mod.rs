//! Exchange-agnostic domain logic: allocations, sentiment, evaluation rules,
//! rebalance records and estimation.

pub mod allocation;
pub mod asset;
pub mod error;
pub mod estimate;
pub mod evaluator;
pub mod execution;
pub mod id;
pub mod rebalance;
pub mod sentiment;
pub mod transaction;

pub use allocation::{Allocation, Condition, StrategyLayer};
pub use asset::{AssetEntry, AssetRegistry, ResolvedAsset, NATIVE_ASSET_ADDRESS};
pub use error::DomainError;
pub use estimate::{gas_cost, to_base_units, GasCost, PaperModel};
pub use evaluator::evaluate;
pub use execution::{ExecutionMode, RebalanceResult, Recommendation, SimulationReport};
pub use id::{AllocationId, RebalanceId, StrategyId, UserId};
pub use rebalance::{
    is_paper_tx, paper_tx_hash, NewRebalanceRecord, RebalanceRecord, RebalanceStatus,
    RebalanceUpdate, TriggerType, PAPER_TX_PREFIX,
};
pub use sentiment::{SentimentLabel, SentimentReading};
pub use transaction::TransactionOutcome;

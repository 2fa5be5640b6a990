//! Paper and live execution paths, mode selection and confirmation monitoring.

pub mod executor;
pub mod guard;
pub mod live;
pub mod mode;
pub mod monitor;
pub mod paper;

pub use executor::{ExecutionRequest, RebalanceExecutor};
pub use guard::{AllocationLease, InFlightAllocations};
pub use live::{LiveExecutor, LivePricing};
pub use mode::{select_mode, ModeSelection, PaperReason};
pub use monitor::{TransactionMonitor, WatchedTransaction};
pub use paper::PaperExecutor;

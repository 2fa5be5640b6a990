//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate outbound ports
//! to implement the rebalance pipeline.

pub mod execution;
pub mod rebalancer;
pub mod sentiment;

pub use rebalancer::{Rebalancer, RebalancerBuilder};
pub use sentiment::{RetryPolicy, RetryingSentiment};

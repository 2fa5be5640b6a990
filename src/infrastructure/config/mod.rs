//! Infrastructure configuration modules.

pub mod execution;
pub mod ledger;
pub mod logging;
pub mod sentiment;
pub mod settings;

pub use settings::Config;

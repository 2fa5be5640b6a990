//! CLI module graph.

pub mod command;
pub mod execute;
pub mod history;
pub mod input;
pub mod output;
pub mod recover;
pub mod run;
pub mod simulate;
pub mod status;
pub mod wallet;

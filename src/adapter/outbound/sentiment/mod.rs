//! Sentiment provider adapters.

pub mod http;
pub mod fixed;

pub use fixed::StaticSentimentProvider;
pub use http::HttpSentimentProvider;

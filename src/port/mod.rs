//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                 ┌────────────────────────────┐
//!    CLI ───────▶ │ inbound::RebalanceService  │
//!                 │       (application)        │
//!                 └─────────────┬──────────────┘
//!        ┌──────────────┬───────┴──────┬──────────────┐
//!        ▼              ▼              ▼              ▼
//!  ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐
//!  │ Sentiment │  │  Ledger   │  │  Record   │  │   User    │
//!  │ Provider  │  │  Client   │  │  Store    │  │ Directory │
//!  └───────────┘  └───────────┘  └───────────┘  └───────────┘
//! ```

pub mod inbound;
pub mod outbound;

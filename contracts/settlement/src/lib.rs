//! Settlement Manager (C5): the on-chain optimistic rollup aggregate.
//!
//! Deposits, batch submission against an operator bond, the challenge
//! window, fraud-gated slashing, finalization, and withdrawal bridging,
//! all as methods on [`Settlement`] that take an exclusive reference to
//! the aggregate and either fully apply or fully revert.

pub mod config;
pub mod error;
pub mod events;
pub mod ledger_bridge;
pub mod reentrancy;
pub mod settlement;
pub mod types;

pub use config::SettlementConfig;
pub use error::SettlementError;
pub use events::Event;
pub use ledger_bridge::{InMemoryLedger, LedgerBridge, LedgerError};
pub use reentrancy::{ReentrancyGuard, ReentrancyLock};
pub use settlement::Settlement;
pub use types::{RollupBlock, WithdrawalRequest};

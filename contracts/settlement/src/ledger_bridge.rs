//! The host provides native value moves; a ported implementation calls
//! into this collaborator for outbound transfers instead. Inbound value
//! (a `payable` call's attached amount) is already-escrowed by the host
//! by the time a `Settlement` method runs, so it arrives as a plain
//! `U256` argument rather than through this trait.

use settlement_types::{Address, U256};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("native transfer to {0} failed")]
    TransferFailed(String),
}

pub trait LedgerBridge {
    fn transfer(&mut self, to: Address, amount: U256) -> Result<(), LedgerError>;
}

/// In-memory ledger used by tests: tracks a single running balance and
/// never fails, unless asked to.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    pub transfers: Vec<(Address, U256)>,
    pub fail_next: bool,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_sent_to(&self, addr: Address) -> U256 {
        self.transfers
            .iter()
            .filter(|(a, _)| *a == addr)
            .fold(U256::ZERO, |acc, (_, amt)| acc.checked_add(amt).expect("test ledger overflow"))
    }
}

impl LedgerBridge for InMemoryLedger {
    fn transfer(&mut self, to: Address, amount: U256) -> Result<(), LedgerError> {
        if self.fail_next {
            self.fail_next = false;
            return Err(LedgerError::TransferFailed(to.to_string()));
        }
        self.transfers.push((to, amount));
        Ok(())
    }
}

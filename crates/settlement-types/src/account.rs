use crate::u256::U256;

/// On-chain account: `{ balance, nonce }`. Invariant: balance ≥ 0 (enforced
/// by `U256` itself), nonce only grows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Account {
    pub balance: U256,
    pub nonce: u64,
}

impl Account {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(balance: U256) -> Self {
        Self { balance, nonce: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.nonce == 0 && self.balance.is_zero()
    }
}

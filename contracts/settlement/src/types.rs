use settlement_types::{Address, Hash, U256};

/// A proposed layer-2 batch. `challenged` and `finalized` are mutually
/// exclusive and monotone: once either is set, the block is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RollupBlock {
    pub state_root: Hash,
    pub tx_root: Hash,
    pub host_block_number: u64,
    pub timestamp: u64,
    pub operator: Address,
    pub challenged: bool,
    pub finalized: bool,
}

impl RollupBlock {
    pub fn is_terminal(&self) -> bool {
        self.challenged || self.finalized
    }
}

/// A pending L2-balance withdrawal, bound to the rollup block number in
/// effect when it was requested; it may only be processed once that
/// block finalizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WithdrawalRequest {
    pub user: Address,
    pub amount: U256,
    pub rollup_block_number: u64,
    pub processed: bool,
}

use settlement_types::{Address, Hash, U256};

/// Events emitted by `Settlement`'s public operations. The host's event
/// log is an external collaborator; these are the logical payloads a
/// runtime adapter forwards to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Deposit {
        user: Address,
        amount: U256,
    },
    RollupBlockSubmitted {
        block_number: u64,
        state_root: Hash,
        tx_root: Hash,
        operator: Address,
    },
    Challenge {
        block_number: u64,
        challenger: Address,
    },
    BlockFinalized {
        block_number: u64,
    },
    WithdrawalRequested {
        user: Address,
        amount: U256,
        id: Hash,
    },
    WithdrawalProcessed {
        user: Address,
        amount: U256,
    },
}

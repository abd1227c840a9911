use thiserror::Error;

/// Precondition violations and transfer failures at the settlement
/// boundary. Every public operation either fully applies or fully
/// reverts; returning one of these means nothing was mutated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SettlementError {
    #[error("reentrant call detected")]
    ReentrancyDetected,

    #[error("amount must be greater than zero")]
    ZeroAmount,

    #[error("bond of {provided} is below the required operator bond of {required}")]
    InsufficientBond { provided: String, required: String },

    #[error("state root must be non-zero")]
    ZeroStateRoot,

    #[error("transaction root must be non-zero")]
    ZeroTxRoot,

    #[error("tx root does not match the submitted batch")]
    TxRootMismatch,

    #[error("rollup block {0} does not exist")]
    BlockNotFound(u64),

    #[error("rollup block {0} was already challenged")]
    BlockAlreadyChallenged(u64),

    #[error("rollup block {0} was already finalized")]
    BlockAlreadyFinalized(u64),

    #[error("rollup block {0} was challenged")]
    BlockWasChallenged(u64),

    #[error("challenge window for rollup block {0} has closed")]
    ChallengeWindowClosed(u64),

    #[error("challenge period has not yet elapsed for rollup block {0}")]
    ChallengePeriodNotElapsed(u64),

    #[error("fraud proof does not demonstrate fraud")]
    FraudProofRejected,

    #[error("insufficient L2 balance: have {have}, need {need}")]
    InsufficientBalance { have: String, need: String },

    #[error("withdrawal request {0} does not exist")]
    WithdrawalNotFound(String),

    #[error("withdrawal request {0} was already processed")]
    WithdrawalAlreadyProcessed(String),

    #[error("caller does not own withdrawal request {0}")]
    NotWithdrawalOwner(String),

    #[error("rollup block not finalized")]
    RollupBlockNotFinalized,

    #[error("native value transfer failed: {0}")]
    TransferFailed(String),
}

impl From<crate::ledger_bridge::LedgerError> for SettlementError {
    fn from(e: crate::ledger_bridge::LedgerError) -> Self {
        SettlementError::TransferFailed(e.to_string())
    }
}

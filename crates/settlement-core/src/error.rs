use thiserror::Error;

/// Errors raised by the transaction engine and state commitment layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("empty account set")]
    EmptyAccountSet,

    #[error("duplicate address in account set: {0}")]
    DuplicateAddress(String),

    #[error("account set is not sorted by address")]
    UnsortedAccountSet,

    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("recomputed state root does not match the expected root")]
    StateRootMismatch,

    #[error(transparent)]
    Crypto(#[from] settlement_crypto::CryptoError),
}

use thiserror::Error;

/// Errors that can occur in cryptographic operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CryptoError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid private key")]
    InvalidPrivateKey,

    #[error("signature recovery failed")]
    RecoveryFailed,

    #[error("merkle proof invalid or empty leaf set")]
    MerkleProofInvalid,

    #[error("invalid seed length: expected 32, got {0}")]
    InvalidSeedLength(usize),
}

impl From<k256::ecdsa::Error> for CryptoError {
    fn from(_: k256::ecdsa::Error) -> Self {
        CryptoError::InvalidSignature
    }
}

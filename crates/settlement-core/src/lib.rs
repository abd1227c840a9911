//! Settlement core: the Transaction Engine, the account-state Merkle
//! commitment, and the fraud-proof verifier that a Settlement Manager is
//! built on top of.

pub mod engine;
pub mod error;
pub mod fraud;
pub mod state_commitment;

pub use engine::{execute, recover_and_check_sender, ExecutionResult};
pub use error::CoreError;
pub use fraud::{verify_fraud_proof, FraudProof, FraudResult};
pub use state_commitment::{
    account_leaf, compute_state_root, generate_account_proof, verify_account_proof, AccountProof,
    GENESIS_STATE_ROOT,
};

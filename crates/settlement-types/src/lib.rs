//! Core type definitions for the settlement rollup contract: addresses,
//! hashes, 256-bit amounts, accounts, transactions and signatures.

pub mod account;
pub mod address;
pub mod error;
pub mod hash;
pub mod signature;
pub mod transaction;
pub mod u256;

pub use account::Account;
pub use address::Address;
pub use error::TypesError;
pub use hash::Hash;
pub use signature::EcdsaSignature;
pub use transaction::{SignedTransaction, Transaction};
pub use u256::U256;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Account, Address, EcdsaSignature, Hash, SignedTransaction, Transaction, TypesError, U256};
}

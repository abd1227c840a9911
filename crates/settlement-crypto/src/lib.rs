//! Cryptographic primitives for the settlement rollup contract:
//! keccak256 hashing, binary Merkle trees with leaf promotion, and
//! recoverable ECDSA/secp256k1 signatures.

pub mod ecdsa;
pub mod error;
pub mod hash;
pub mod merkle;

pub use ecdsa::{recover_sender, verify_sender, Keypair};
pub use error::CryptoError;
pub use hash::{eth_signed_message_hash, hash, hash_multi, hash_pair, IncrementalHasher};
pub use merkle::{compute_root, tree_depth, MerkleProof, MerkleTree};

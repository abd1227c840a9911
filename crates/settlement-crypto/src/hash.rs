use settlement_types::Hash;
use sha3::{Digest, Keccak256};

/// keccak256 hashing utilities over the host's canonical encoding.

/// Compute keccak256 of data.
pub fn hash(data: &[u8]) -> Hash {
    Hash::compute(data)
}

/// Compute keccak256 over the concatenation of several slices.
pub fn hash_multi(data: &[&[u8]]) -> Hash {
    Hash::compute_multi(data)
}

/// Incremental hasher for streaming hash computation.
pub struct IncrementalHasher {
    hasher: Keccak256,
}

impl IncrementalHasher {
    pub fn new() -> Self {
        Self { hasher: Keccak256::new() }
    }

    pub fn update(&mut self, data: &[u8]) {
        sha3::Digest::update(&mut self.hasher, data);
    }

    pub fn finalize(self) -> Hash {
        Hash::from_bytes(self.hasher.finalize().into())
    }

    pub fn reset(&mut self) {
        sha3::Digest::reset(&mut self.hasher);
    }
}

impl Default for IncrementalHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash two nodes together under raw concatenation, `H(left ‖ right)` — the
/// Merkle internal-node rule. Not commutative by design.
pub fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    hash_multi(&[left.as_bytes(), right.as_bytes()])
}

/// The host's signed-message prefix for recoverable signatures:
/// `"\x19Ethereum Signed Message:\n32"` folded in front of the 32-byte
/// transaction signing hash before recovery.
pub fn eth_signed_message_hash(message_hash: &Hash) -> Hash {
    const PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";
    hash_multi(&[PREFIX, message_hash.as_bytes()])
}

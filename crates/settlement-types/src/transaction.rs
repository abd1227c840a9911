use crate::address::Address;
use crate::hash::Hash;
use crate::signature::EcdsaSignature;
use crate::u256::U256;
use std::fmt;

/// Domain separator folded into the signing hash, so a signature over a
/// settlement transaction can never be replayed as a signature over some
/// other message shape.
const TYPE_HASH_PREIMAGE: &[u8] = b"Transaction(address from,address to,uint256 amount,uint256 nonce,uint256 fee)";

/// Unsigned transfer: `{ from, to, amount, nonce, fee }`.
///
/// Invariants enforced at execution (§4.1), not at construction: `from ≠ 0`,
/// `to ≠ 0`, `from ≠ to`, `amount > 0`, `fee ≥ 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transaction {
    pub from: Address,
    pub to: Address,
    pub amount: U256,
    pub nonce: u64,
    pub fee: U256,
}

impl Transaction {
    pub fn new(from: Address, to: Address, amount: U256, nonce: u64, fee: U256) -> Self {
        Self { from, to, amount, nonce, fee }
    }

    /// Deterministic encoding of `(from, to, amount, nonce, fee)`. The
    /// signature is never part of this encoding, nor of the Merkle leaf
    /// derived from it.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(20 + 20 + 32 + 8 + 32);
        buf.extend_from_slice(self.from.as_bytes());
        buf.extend_from_slice(self.to.as_bytes());
        buf.extend_from_slice(&self.amount.to_be_bytes());
        buf.extend_from_slice(&self.nonce.to_be_bytes());
        buf.extend_from_slice(&self.fee.to_be_bytes());
        buf
    }

    /// `H(serialize(tx))`, the leaf placed into the per-transaction Merkle
    /// batch commitment.
    pub fn merkle_leaf(&self) -> Hash {
        Hash::compute(&self.serialize())
    }

    /// `H(TYPE_HASH ‖ from ‖ to ‖ amount ‖ nonce ‖ fee)`, the digest over
    /// which the signer's ECDSA signature is taken (before the host's
    /// signed-message prefix is applied).
    pub fn signing_hash(&self) -> Hash {
        let type_hash = Hash::compute(TYPE_HASH_PREIMAGE);
        Hash::compute_multi(&[
            type_hash.as_bytes(),
            self.from.as_bytes(),
            self.to.as_bytes(),
            &self.amount.to_be_bytes(),
            &self.nonce.to_be_bytes(),
            &self.fee.to_be_bytes(),
        ])
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transaction {{ from: {}, to: {}, amount: {}, nonce: {}, fee: {} }}",
            self.from, self.to, self.amount, self.nonce, self.fee
        )
    }
}

/// A transaction together with the sender's recoverable signature over
/// `tx.signing_hash()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignedTransaction {
    pub tx: Transaction,
    pub signature: EcdsaSignature,
}

impl SignedTransaction {
    pub fn new(tx: Transaction, signature: EcdsaSignature) -> Self {
        Self { tx, signature }
    }
}

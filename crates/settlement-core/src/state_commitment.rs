//! Account-State Commitment (C3): hash accounts into leaves, enforce the
//! sort-by-address invariant, compute the state root, and generate/verify
//! account-inclusion proofs.

use crate::error::CoreError;
use once_cell::sync::Lazy;
use settlement_crypto::{hash_multi, MerkleProof, MerkleTree};
use settlement_types::{Account, Address, Hash};

/// The genesis state root, used in place of a Merkle root over an empty
/// leaf set (which is forbidden).
pub static GENESIS_STATE_ROOT: Lazy<Hash> = Lazy::new(|| Hash::compute(b"GENESIS"));

/// `H(address ‖ balance ‖ nonce)` under the host's canonical encoding.
pub fn account_leaf(address: &Address, account: &Account) -> Hash {
    hash_multi(&[
        address.as_bytes(),
        &account.balance.to_be_bytes(),
        &account.nonce.to_be_bytes(),
    ])
}

fn validate_sorted_unique(addrs: &[Address]) -> Result<(), CoreError> {
    if addrs.is_empty() {
        return Err(CoreError::EmptyAccountSet);
    }
    for window in addrs.windows(2) {
        match window[0].cmp(&window[1]) {
            std::cmp::Ordering::Less => {}
            std::cmp::Ordering::Equal => return Err(CoreError::DuplicateAddress(window[0].to_string())),
            std::cmp::Ordering::Greater => return Err(CoreError::UnsortedAccountSet),
        }
    }
    Ok(())
}

/// Compute the state root over `addrs`/`accounts`, which must be
/// strictly ascending by address with no duplicates. Fails on an empty
/// set — callers needing a root for an empty account mapping use
/// [`GENESIS_STATE_ROOT`] instead.
pub fn compute_state_root(addrs: &[Address], accounts: &[Account]) -> Result<Hash, CoreError> {
    validate_sorted_unique(addrs)?;
    let leaves: Vec<Hash> = addrs.iter().zip(accounts).map(|(a, acc)| account_leaf(a, acc)).collect();
    Ok(settlement_crypto::compute_root(&leaves)?)
}

/// A Merkle proof of account inclusion, bundled with the account data the
/// leaf was derived from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccountProof {
    pub account: Address,
    pub account_data: Account,
    pub merkle_proof: MerkleProof,
}

/// `generateAccountProof`: locate `target` in the sorted `addrs`, recompute
/// the root and require it equal `expected_root`, then return the Merkle
/// proof against the sorted leaf vector plus the account data.
pub fn generate_account_proof(
    target: Address,
    addrs: &[Address],
    accounts: &[Account],
    expected_root: Hash,
) -> Result<AccountProof, CoreError> {
    validate_sorted_unique(addrs)?;
    let index = addrs
        .iter()
        .position(|a| *a == target)
        .ok_or_else(|| CoreError::AccountNotFound(target.to_string()))?;

    let leaves: Vec<Hash> = addrs.iter().zip(accounts).map(|(a, acc)| account_leaf(a, acc)).collect();
    let tree = MerkleTree::from_leaves(&leaves)?;
    if tree.root() != expected_root {
        return Err(CoreError::StateRootMismatch);
    }

    let merkle_proof = tree.proof(index).expect("index located above");
    Ok(AccountProof { account: target, account_data: accounts[index], merkle_proof })
}

/// `verifyAccountProof`: recompute the leaf from `(proof.account,
/// proof.account_data)` and verify the Merkle path against `root`.
pub fn verify_account_proof(proof: &AccountProof, root: Hash) -> bool {
    let leaf = account_leaf(&proof.account, &proof.account_data);
    proof.merkle_proof.verify(&leaf, &root)
}

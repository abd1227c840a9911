//! Transaction Engine (C1): canonical encoding and hashing live in
//! `settlement_types::transaction`; signature recovery lives in
//! `settlement_crypto::ecdsa`. This module is deterministic single-tx
//! execution over an account pair.

use settlement_crypto::verify_sender;
use settlement_types::{Account, SignedTransaction, Transaction};

/// Outcome of `execute`. First failing check decides the result; both
/// accounts are returned unchanged on any non-`Success` outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionResult {
    Success,
    InsufficientBalance,
    InvalidNonce,
    /// Also covers structurally invalid transactions (zero/equal
    /// addresses, non-positive amount) — the verification procedure in
    /// §4.4 treats both as the same fraud-proof "invalid transaction"
    /// category.
    InvalidSignature,
}

/// Execute `tx` against the supplied pre-state accounts. Pure: performs no
/// I/O and never panics on overflow — arithmetic that would overflow is
/// routed to `InsufficientBalance` rather than wrapping.
pub fn execute(tx: &Transaction, from_acct: Account, to_acct: Account) -> (Account, Account, ExecutionResult) {
    if tx.from.is_zero() || tx.to.is_zero() || tx.from == tx.to || tx.amount.is_zero() {
        return (from_acct, to_acct, ExecutionResult::InvalidSignature);
    }

    if tx.nonce != from_acct.nonce {
        return (from_acct, to_acct, ExecutionResult::InvalidNonce);
    }

    let total_debit = match tx.amount.checked_add(&tx.fee) {
        Some(t) => t,
        None => return (from_acct, to_acct, ExecutionResult::InsufficientBalance),
    };
    if from_acct.balance < total_debit {
        return (from_acct, to_acct, ExecutionResult::InsufficientBalance);
    }

    let new_from = Account {
        balance: from_acct.balance.checked_sub(&total_debit).expect("checked above"),
        nonce: from_acct.nonce + 1,
    };
    let new_to = Account {
        balance: to_acct.balance.checked_add(&tx.amount).expect("bounded by total_debit check"),
        nonce: to_acct.nonce,
    };

    (new_from, new_to, ExecutionResult::Success)
}

/// Recover the sender of `signed.tx` and check it equals `signed.tx.from`.
pub fn recover_and_check_sender(signed: &SignedTransaction) -> bool {
    verify_sender(&signed.tx, &signed.signature, signed.tx.from)
}

//! The on-chain aggregate (C5): deposits, batch submission with bond,
//! challenge window, finalization, slashing, and withdrawals. All
//! operations take `&mut self` exclusively and either fully apply or
//! fully revert — there is no partially-observable state.

use std::collections::HashMap;

use settlement_core::{verify_fraud_proof, FraudProof, GENESIS_STATE_ROOT};
use settlement_crypto::compute_root;
use settlement_types::{Address, Hash, Transaction, U256};

use crate::config::SettlementConfig;
use crate::error::SettlementError;
use crate::events::Event;
use crate::ledger_bridge::LedgerBridge;
use crate::reentrancy::ReentrancyGuard;
use crate::types::{RollupBlock, WithdrawalRequest};

/// `currentStateRoot`, `rollupBlockNumber`, `totalValueLocked`, and the
/// four mappings are the only shared mutable state; all are written only
/// by the operations below, under the reentrancy guard where value
/// leaves the contract.
pub struct Settlement {
    config: SettlementConfig,
    current_state_root: Hash,
    rollup_block_number: u64,
    total_value_locked: U256,
    accounts: HashMap<Address, U256>,
    rollup_blocks: HashMap<u64, RollupBlock>,
    operator_bonds: HashMap<Address, U256>,
    withdrawal_requests: HashMap<Hash, WithdrawalRequest>,
    reentrancy_guard: ReentrancyGuard,
}

impl Settlement {
    pub fn new(config: SettlementConfig) -> Self {
        Self {
            config,
            current_state_root: *GENESIS_STATE_ROOT,
            rollup_block_number: 0,
            total_value_locked: U256::ZERO,
            accounts: HashMap::new(),
            rollup_blocks: HashMap::new(),
            operator_bonds: HashMap::new(),
            withdrawal_requests: HashMap::new(),
            reentrancy_guard: ReentrancyGuard::new(),
        }
    }

    // ---- mutating operations, in spec order ----

    /// `deposit()`: payable, reentrancy-guarded. `value` is the amount
    /// the host already escrowed on the caller's behalf before invoking
    /// this method.
    pub fn deposit(&mut self, caller: Address, value: U256) -> Result<Event, SettlementError> {
        let _lock = self.reentrancy_guard.enter()?;

        if value.is_zero() {
            return Err(SettlementError::ZeroAmount);
        }

        let balance = self.accounts.entry(caller).or_insert(U256::ZERO);
        *balance = balance.checked_add(&value).ok_or(SettlementError::ZeroAmount)?;
        self.total_value_locked = self
            .total_value_locked
            .checked_add(&value)
            .expect("total value locked tracks escrowed deposits");

        tracing::info!(user = %caller, amount = %value, "deposit credited");
        Ok(Event::Deposit { user: caller, amount: value })
    }

    /// `submitRollupBlock(newStateRoot, txRoot, txs)`: payable. The batch
    /// commitment consumed here is the Merkle root over
    /// `getMerkleLeaf(tx)` for each tx, matching the scheme the fraud
    /// verifier expects (§9 open question 1).
    pub fn submit_rollup_block(
        &mut self,
        caller: Address,
        value: U256,
        new_state_root: Hash,
        tx_root: Hash,
        txs: &[Transaction],
        host_block: u64,
        timestamp: u64,
    ) -> Result<Event, SettlementError> {
        if value < self.config.operator_bond {
            tracing::debug!(operator = %caller, provided = %value, "submission rejected: bond below minimum");
            return Err(SettlementError::InsufficientBond {
                provided: value.to_string(),
                required: self.config.operator_bond.to_string(),
            });
        }
        if new_state_root.is_zero() {
            return Err(SettlementError::ZeroStateRoot);
        }
        if tx_root.is_zero() {
            return Err(SettlementError::ZeroTxRoot);
        }

        let leaves: Vec<Hash> = txs.iter().map(Transaction::merkle_leaf).collect();
        let computed_tx_root = compute_root(&leaves).map_err(|_| SettlementError::TxRootMismatch)?;
        if computed_tx_root != tx_root {
            tracing::warn!(operator = %caller, "submission rejected: tx root does not match batch");
            return Err(SettlementError::TxRootMismatch);
        }

        self.rollup_block_number += 1;
        let block = RollupBlock {
            state_root: new_state_root,
            tx_root,
            host_block_number: host_block,
            timestamp,
            operator: caller,
            challenged: false,
            finalized: false,
        };
        self.rollup_blocks.insert(self.rollup_block_number, block);

        let bond = self.operator_bonds.entry(caller).or_insert(U256::ZERO);
        *bond = bond.checked_add(&value).expect("operator bond accumulation");

        self.current_state_root = new_state_root;

        tracing::info!(
            block_number = self.rollup_block_number,
            operator = %caller,
            state_root = %new_state_root,
            "rollup block submitted"
        );
        Ok(Event::RollupBlockSubmitted {
            block_number: self.rollup_block_number,
            state_root: new_state_root,
            tx_root,
            operator: caller,
        })
    }

    /// `challengeBlock(blockNum, proof)`. Slashing is gated on the fraud
    /// verifier actually finding fraud (§9 open question 2), and the
    /// window is enforced consistently with `can_challenge` (§9 open
    /// question 3).
    pub fn challenge_block(
        &mut self,
        block_num: u64,
        challenger: Address,
        proof: &FraudProof,
        host_block: u64,
        ledger: &mut dyn LedgerBridge,
    ) -> Result<Event, SettlementError> {
        let block = *self.rollup_blocks.get(&block_num).ok_or(SettlementError::BlockNotFound(block_num))?;
        if block.challenged {
            return Err(SettlementError::BlockAlreadyChallenged(block_num));
        }
        if block.finalized {
            return Err(SettlementError::BlockAlreadyFinalized(block_num));
        }
        if host_block > block.host_block_number + self.config.challenge_period {
            return Err(SettlementError::ChallengeWindowClosed(block_num));
        }
        if !verify_fraud_proof(proof).is_fraud() {
            tracing::debug!(block_number = block_num, "challenge rejected: proof does not demonstrate fraud");
            return Err(SettlementError::FraudProofRejected);
        }

        // effects before interaction: mark terminal and clear the bond
        // before the outbound transfer.
        self.rollup_blocks.get_mut(&block_num).expect("checked above").challenged = true;
        let bond = self.operator_bonds.remove(&block.operator).unwrap_or(U256::ZERO);
        let reward = bond.checked_div(&U256::from(2u64)).unwrap_or(U256::ZERO);

        let _lock = self.reentrancy_guard.enter()?;
        if let Err(e) = ledger.transfer(challenger, reward) {
            // transfer failed: the operation reverts wholly, so undo the
            // effects committed above before propagating the error.
            self.rollup_blocks.get_mut(&block_num).expect("checked above").challenged = false;
            self.operator_bonds.insert(block.operator, bond);
            return Err(e.into());
        }

        tracing::warn!(block_number = block_num, operator = %block.operator, %challenger, "rollup block challenged, bond slashed");
        Ok(Event::Challenge { block_number: block_num, challenger })
    }

    /// `finalizeBlock(blockNum)`.
    pub fn finalize_block(
        &mut self,
        block_num: u64,
        host_block: u64,
        ledger: &mut dyn LedgerBridge,
    ) -> Result<Event, SettlementError> {
        let block = *self.rollup_blocks.get(&block_num).ok_or(SettlementError::BlockNotFound(block_num))?;
        if block.finalized {
            return Err(SettlementError::BlockAlreadyFinalized(block_num));
        }
        if block.challenged {
            return Err(SettlementError::BlockWasChallenged(block_num));
        }
        if host_block <= block.host_block_number + self.config.challenge_period {
            return Err(SettlementError::ChallengePeriodNotElapsed(block_num));
        }

        self.rollup_blocks.get_mut(&block_num).expect("checked above").finalized = true;
        let bond = self.operator_bonds.remove(&block.operator).unwrap_or(U256::ZERO);

        let _lock = self.reentrancy_guard.enter()?;
        if let Err(e) = ledger.transfer(block.operator, bond) {
            self.rollup_blocks.get_mut(&block_num).expect("checked above").finalized = false;
            self.operator_bonds.insert(block.operator, bond);
            return Err(e.into());
        }

        tracing::info!(block_number = block_num, operator = %block.operator, "rollup block finalized, bond returned");
        Ok(Event::BlockFinalized { block_number: block_num })
    }

    /// `requestWithdrawal(amount)`.
    pub fn request_withdrawal(
        &mut self,
        caller: Address,
        amount: U256,
        timestamp: u64,
    ) -> Result<(Hash, Event), SettlementError> {
        if amount.is_zero() {
            return Err(SettlementError::ZeroAmount);
        }
        let balance = self.accounts.get(&caller).copied().unwrap_or(U256::ZERO);
        if balance < amount {
            return Err(SettlementError::InsufficientBalance { have: balance.to_string(), need: amount.to_string() });
        }

        let id = Hash::compute_multi(&[
            caller.as_bytes(),
            &amount.to_be_bytes(),
            &self.rollup_block_number.to_be_bytes(),
            &timestamp.to_be_bytes(),
        ]);

        self.accounts.insert(caller, balance.checked_sub(&amount).expect("checked above"));
        self.withdrawal_requests.insert(
            id,
            WithdrawalRequest { user: caller, amount, rollup_block_number: self.rollup_block_number, processed: false },
        );

        tracing::debug!(user = %caller, amount = %amount, id = %id, "withdrawal requested");
        Ok((id, Event::WithdrawalRequested { user: caller, amount, id }))
    }

    /// `processWithdrawal(id)`: reentrancy-guarded.
    pub fn process_withdrawal(
        &mut self,
        id: Hash,
        caller: Address,
        ledger: &mut dyn LedgerBridge,
    ) -> Result<Event, SettlementError> {
        let request = *self
            .withdrawal_requests
            .get(&id)
            .ok_or_else(|| SettlementError::WithdrawalNotFound(id.to_string()))?;
        if request.processed {
            return Err(SettlementError::WithdrawalAlreadyProcessed(id.to_string()));
        }
        if request.user != caller {
            return Err(SettlementError::NotWithdrawalOwner(id.to_string()));
        }
        let source_block = self
            .rollup_blocks
            .get(&request.rollup_block_number)
            .ok_or(SettlementError::BlockNotFound(request.rollup_block_number))?;
        if !source_block.finalized {
            return Err(SettlementError::RollupBlockNotFinalized);
        }

        self.withdrawal_requests.get_mut(&id).expect("checked above").processed = true;
        self.total_value_locked = self
            .total_value_locked
            .checked_sub(&request.amount)
            .expect("processed withdrawals never exceed total value locked");

        let _lock = self.reentrancy_guard.enter()?;
        if let Err(e) = ledger.transfer(caller, request.amount) {
            self.withdrawal_requests.get_mut(&id).expect("checked above").processed = false;
            self.total_value_locked = self
                .total_value_locked
                .checked_add(&request.amount)
                .expect("reverting a withdrawal never exceeds total value locked");
            return Err(e.into());
        }

        tracing::info!(user = %caller, amount = %request.amount, "withdrawal processed");
        Ok(Event::WithdrawalProcessed { user: caller, amount: request.amount })
    }

    // ---- read-only queries ----

    pub fn get_current_state(&self) -> (Hash, u64) {
        (self.current_state_root, self.rollup_block_number)
    }

    pub fn get_balance(&self, address: Address) -> U256 {
        self.accounts.get(&address).copied().unwrap_or(U256::ZERO)
    }

    pub fn get_rollup_block(&self, block_num: u64) -> Option<RollupBlock> {
        self.rollup_blocks.get(&block_num).copied()
    }

    pub fn get_operator_bond(&self, operator: Address) -> U256 {
        self.operator_bonds.get(&operator).copied().unwrap_or(U256::ZERO)
    }

    pub fn get_withdrawal_request(&self, id: Hash) -> Option<WithdrawalRequest> {
        self.withdrawal_requests.get(&id).copied()
    }

    pub fn total_value_locked(&self) -> U256 {
        self.total_value_locked
    }

    pub fn can_finalize(&self, block_num: u64, host_block: u64) -> bool {
        match self.rollup_blocks.get(&block_num) {
            Some(b) => !b.is_terminal() && host_block > b.host_block_number + self.config.challenge_period,
            None => false,
        }
    }

    pub fn can_challenge(&self, block_num: u64, host_block: u64) -> bool {
        match self.rollup_blocks.get(&block_num) {
            Some(b) => !b.is_terminal() && host_block <= b.host_block_number + self.config.challenge_period,
            None => false,
        }
    }

    pub fn can_process_withdrawal(&self, id: Hash) -> bool {
        match self.withdrawal_requests.get(&id) {
            Some(req) if !req.processed => self
                .rollup_blocks
                .get(&req.rollup_block_number)
                .map(|b| b.finalized)
                .unwrap_or(false),
            _ => false,
        }
    }
}

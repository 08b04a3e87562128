//! The stake ledger engine.

use std::collections::HashMap;

use crate::error::LedgerError;
use crate::stake::Stake;
use crate::token::AssetTransfer;
use assay_store::{StakeStore, StoreError};
use assay_types::{AssessmentIndex, MemberAddress, NxmAmount};

/// Per-staker deposited amounts and withdrawal cursors.
///
/// The ledger exclusively owns stake amounts and cursors. All token movement
/// goes through the external [`AssetTransfer`] collaborator; a failed
/// transfer aborts the operation with no state change.
pub struct StakeLedger {
    stakes: HashMap<MemberAddress, Stake>,
}

impl StakeLedger {
    pub fn new() -> Self {
        Self {
            stakes: HashMap::new(),
        }
    }

    /// Deposit `amount` for `staker`, pulling the tokens from the staker's
    /// external balance.
    ///
    /// The collaborator is debited first; if that fails nothing is recorded.
    pub fn stake(
        &mut self,
        staker: &MemberAddress,
        amount: NxmAmount,
        token: &dyn AssetTransfer,
    ) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        token.debit(staker, amount)?;
        let stake = self.stakes.entry(staker.clone()).or_default();
        stake.amount = stake
            .amount
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    /// Return `amount` of `staker`'s stake to `to`.
    ///
    /// Never dips below zero and never rewrites already-cast vote weights —
    /// those are snapshots held by the voting engine.
    pub fn unstake(
        &mut self,
        staker: &MemberAddress,
        amount: NxmAmount,
        to: &MemberAddress,
        token: &dyn AssetTransfer,
    ) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        let available = self.stakes.get(staker).map_or(NxmAmount::ZERO, |s| s.amount);
        if available < amount {
            return Err(LedgerError::InsufficientStake {
                needed: amount.raw(),
                available: available.raw(),
            });
        }
        token.transfer(to, amount)?;
        // get_mut cannot miss: a positive available balance implies an entry.
        if let Some(stake) = self.stakes.get_mut(staker) {
            stake.amount = stake.amount.saturating_sub(amount);
        }
        Ok(())
    }

    /// Slash up to `amount` from `staker`'s stake (external fraud trigger).
    ///
    /// Clamps at zero; returns the amount actually burned.
    pub fn burn(&mut self, staker: &MemberAddress, amount: NxmAmount) -> NxmAmount {
        match self.stakes.get_mut(staker) {
            Some(stake) => {
                let burned = if stake.amount < amount {
                    stake.amount
                } else {
                    amount
                };
                stake.amount = stake.amount.saturating_sub(burned);
                burned
            }
            None => NxmAmount::ZERO,
        }
    }

    /// Read-only accessor: `(amount, rewards_withdrawable_from_index)`.
    ///
    /// Stakers without a record read as an empty stake at cursor zero.
    pub fn stake_of(&self, staker: &MemberAddress) -> Stake {
        self.stakes.get(staker).copied().unwrap_or_default()
    }

    /// Move `staker`'s withdrawal cursor forward to `new_index`.
    ///
    /// The cursor is strictly non-decreasing; the reward distributor is the
    /// only caller.
    pub fn advance_cursor(
        &mut self,
        staker: &MemberAddress,
        new_index: AssessmentIndex,
    ) -> Result<(), LedgerError> {
        let stake = self.stakes.entry(staker.clone()).or_default();
        if new_index < stake.rewards_withdrawable_from_index {
            return Err(LedgerError::CursorRegression {
                current: stake.rewards_withdrawable_from_index,
                requested: new_index,
            });
        }
        stake.rewards_withdrawable_from_index = new_index;
        Ok(())
    }

    /// Number of stakers with a record.
    pub fn staker_count(&self) -> usize {
        self.stakes.len()
    }

    /// Persist all stake records to a store.
    pub fn save_to_store(&self, store: &dyn StakeStore) -> Result<(), LedgerError> {
        for (addr, stake) in &self.stakes {
            let bytes = bincode::serialize(stake)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            store.put_stake(addr, &bytes)?;
        }
        Ok(())
    }

    /// Restore the ledger from a store.
    pub fn load_from_store(store: &dyn StakeStore) -> Result<Self, LedgerError> {
        let mut stakes = HashMap::new();
        for (addr, bytes) in store.iter_stakes()? {
            let stake: Stake = bincode::deserialize(&bytes)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            stakes.insert(addr, stake);
        }
        Ok(Self { stakes })
    }
}

impl Default for StakeLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for StakeLedger {
    fn clone(&self) -> Self {
        Self {
            stakes: self.stakes.clone(),
        }
    }
}

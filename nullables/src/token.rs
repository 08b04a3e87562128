//! Nullable NXM token — in-memory balances with explicit approvals.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use assay_ledger::{AssetTransfer, TransferError};
use assay_types::{MemberAddress, NxmAmount};

/// An in-memory token for testing.
///
/// Deposits (`debit`) consume an allowance set with [`approve`]; payouts
/// (`transfer`) credit from an unbounded pool. Transfer failures can be
/// injected to exercise error propagation.
///
/// [`approve`]: NullToken::approve
pub struct NullToken {
    balances: Mutex<HashMap<MemberAddress, u128>>,
    approvals: Mutex<HashMap<MemberAddress, u128>>,
    fail_transfers: AtomicBool,
}

impl NullToken {
    pub fn new() -> Self {
        Self {
            balances: Mutex::new(HashMap::new()),
            approvals: Mutex::new(HashMap::new()),
            fail_transfers: AtomicBool::new(false),
        }
    }

    /// Set an address's external balance.
    pub fn set_balance(&self, address: &MemberAddress, amount: NxmAmount) {
        self.balances
            .lock()
            .unwrap()
            .insert(address.clone(), amount.raw());
    }

    /// Allow the assessment core to pull up to `amount` from `address`.
    pub fn approve(&self, address: &MemberAddress, amount: NxmAmount) {
        self.approvals
            .lock()
            .unwrap()
            .insert(address.clone(), amount.raw());
    }

    /// Fund and approve in one step — the common test setup.
    pub fn fund(&self, address: &MemberAddress, amount: NxmAmount) {
        self.set_balance(address, amount);
        self.approve(address, amount);
    }

    /// Make every subsequent `transfer` fail (until turned off again).
    pub fn set_fail_transfers(&self, fail: bool) {
        self.fail_transfers.store(fail, Ordering::SeqCst);
    }
}

impl Default for NullToken {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetTransfer for NullToken {
    fn transfer(&self, to: &MemberAddress, amount: NxmAmount) -> Result<(), TransferError> {
        if self.fail_transfers.load(Ordering::SeqCst) {
            return Err(TransferError::Failed("injected transfer failure".into()));
        }
        *self
            .balances
            .lock()
            .unwrap()
            .entry(to.clone())
            .or_insert(0) += amount.raw();
        Ok(())
    }

    fn debit(&self, from: &MemberAddress, amount: NxmAmount) -> Result<(), TransferError> {
        let mut approvals = self.approvals.lock().unwrap();
        let allowance = approvals.get(from).copied().unwrap_or(0);
        if allowance < amount.raw() {
            return Err(TransferError::InsufficientApproval);
        }
        let mut balances = self.balances.lock().unwrap();
        let balance = balances.get(from).copied().unwrap_or(0);
        if balance < amount.raw() {
            return Err(TransferError::InsufficientApproval);
        }
        approvals.insert(from.clone(), allowance - amount.raw());
        balances.insert(from.clone(), balance - amount.raw());
        Ok(())
    }

    fn balance_of(&self, address: &MemberAddress) -> NxmAmount {
        NxmAmount::new(
            self.balances
                .lock()
                .unwrap()
                .get(address)
                .copied()
                .unwrap_or(0),
        )
    }
}

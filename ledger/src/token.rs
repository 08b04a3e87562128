//! NXM asset-transfer collaborator.
//!
//! The token itself lives outside this core; all the assessment engine needs
//! are debit/credit primitives with explicit failure reporting. Failures are
//! propagated to callers, never swallowed.

use assay_types::{MemberAddress, NxmAmount};
use thiserror::Error;

/// Failure modes of the external token collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("insufficient approval")]
    InsufficientApproval,

    #[error("transfer failed: {0}")]
    Failed(String),
}

/// The token-movement primitive invoked by the stake ledger and the reward
/// distributor.
pub trait AssetTransfer: Send + Sync {
    /// Credit `amount` to `to` from the mutual's pool.
    fn transfer(&self, to: &MemberAddress, amount: NxmAmount) -> Result<(), TransferError>;

    /// Pull `amount` out of `from`'s external balance into the pool.
    fn debit(&self, from: &MemberAddress, amount: NxmAmount) -> Result<(), TransferError>;

    /// Current external balance of `address`.
    fn balance_of(&self, address: &MemberAddress) -> NxmAmount;
}

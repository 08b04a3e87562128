//! Stake ledger — the foundational data store of the assessment core.
//!
//! Tracks, per staker, the deposited NXM amount and the reward-withdrawal
//! cursor. Deposits pull tokens through the external [`AssetTransfer`]
//! collaborator; withdrawals push them back out. Vote weights are snapshots
//! taken elsewhere, so nothing here ever rewrites voting history.

pub mod error;
pub mod ledger;
pub mod membership;
pub mod stake;
pub mod token;

pub use error::LedgerError;
pub use ledger::StakeLedger;
pub use membership::Membership;
pub use stake::Stake;
pub use token::{AssetTransfer, TransferError};

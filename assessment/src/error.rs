use thiserror::Error;

use assay_ledger::{LedgerError, TransferError};
use assay_store::StoreError;
use assay_types::{AssessmentIndex, MemberAddress, Timestamp};

#[derive(Debug, Error)]
pub enum AssessmentError {
    #[error("no withdrawable rewards")]
    NoWithdrawableRewards,

    #[error("destination address {0} is not a member")]
    NotAMember(MemberAddress),

    #[error("already voted on assessment {0}")]
    AlreadyVoted(AssessmentIndex),

    #[error("voting is closed for assessment {0}")]
    VotingClosed(AssessmentIndex),

    #[error("assessment {0} does not exist")]
    AssessmentNotFound(AssessmentIndex),

    #[error("a stake is required to cast votes")]
    NoStake,

    #[error("assessment indices and accepted flags differ in length: {indices} != {flags}")]
    InputLengthMismatch { indices: usize, flags: usize },

    #[error("stake is locked until {until}")]
    StakeLockedUp { until: Timestamp },

    #[error("arithmetic overflow in reward computation")]
    Overflow,

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

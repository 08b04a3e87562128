//! Per-staker stake record.

use assay_types::{AssessmentIndex, NxmAmount};
use serde::{Deserialize, Serialize};

/// Stake state for a single member.
///
/// Created on first deposit and kept for the member's lifetime. The cursor
/// marks the next assessment to be considered for reward payout and only
/// ever moves forward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stake {
    /// Currently staked NXM.
    pub amount: NxmAmount,

    /// Index of the first assessment this staker has not yet been paid for.
    pub rewards_withdrawable_from_index: AssessmentIndex,
}

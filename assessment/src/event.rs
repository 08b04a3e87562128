//! Observable events for external indexers and tests.

use serde::{Deserialize, Serialize};

use assay_types::{AssessmentIndex, MemberAddress, NxmAmount};

/// Observations emitted by the assessment service, one per committed
/// state transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssessmentEvent {
    StakeDeposited {
        staker: MemberAddress,
        amount: NxmAmount,
    },
    StakeWithdrawn {
        staker: MemberAddress,
        to: MemberAddress,
        amount: NxmAmount,
    },
    VoteCast {
        staker: MemberAddress,
        assessment_index: AssessmentIndex,
        accepted: bool,
        weight: NxmAmount,
    },
    /// Carries who earned the rewards — the caller, not the destination.
    RewardWithdrawn {
        staker: MemberAddress,
        amount: NxmAmount,
    },
}

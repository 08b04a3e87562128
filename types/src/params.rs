//! Assessment parameters — governance-owned, read-only to this core.

use serde::{Deserialize, Serialize};

/// Seconds in one whole day; all parameter defaults are day-denominated.
pub const SECONDS_PER_DAY: u64 = 24 * 3600;

/// The time windows that drive every assessment's lifecycle.
///
/// Owned by an external governance collaborator; the assessment core only
/// ever reads them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentParams {
    /// Minimum window during which votes are accepted, in seconds.
    pub min_voting_period_secs: u64,

    /// Additional delay after voting closes before rewards become
    /// claimable, in seconds. Reserved for dispute mechanisms external to
    /// this core.
    pub payout_cooldown_secs: u64,

    /// How long a stake stays locked after the staker's latest vote,
    /// in seconds.
    pub stake_lockup_period_secs: u64,
}

impl AssessmentParams {
    /// Protocol defaults — the intended configuration for the live mutual.
    pub fn protocol_defaults() -> Self {
        Self {
            min_voting_period_secs: 3 * SECONDS_PER_DAY,
            payout_cooldown_secs: SECONDS_PER_DAY,
            stake_lockup_period_secs: 14 * SECONDS_PER_DAY,
        }
    }

    /// Build parameters from whole-day values.
    pub fn from_days(min_voting: u64, payout_cooldown: u64, stake_lockup: u64) -> Self {
        Self {
            min_voting_period_secs: min_voting * SECONDS_PER_DAY,
            payout_cooldown_secs: payout_cooldown * SECONDS_PER_DAY,
            stake_lockup_period_secs: stake_lockup * SECONDS_PER_DAY,
        }
    }
}

impl Default for AssessmentParams {
    fn default() -> Self {
        Self::protocol_defaults()
    }
}

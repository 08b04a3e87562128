//! Assessment registry — the append-only sequence of claim polls.

use serde::{Deserialize, Serialize};

use crate::error::AssessmentError;
use assay_store::{AssessmentStore, StoreError};
use assay_types::{AssessmentIndex, AssessmentParams, NxmAmount, Timestamp};

/// Lifecycle of a single poll, derived purely from time and config.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollStatus {
    /// Votes are accepted: `now < poll_start + min_voting_period`.
    Open,
    /// Voting closed, payout cooldown still running.
    AwaitingCooldown,
    /// Cooldown elapsed; tallies and rewards are fixed and claimable.
    Final,
}

/// Outcome of a finalized poll, read back by the claims collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    Accepted,
    Rejected,
}

/// One assessment: the poll and reward pool attached to a submitted claim.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Assessment {
    /// When the poll was created (set by the claims collaborator).
    pub poll_start: Timestamp,

    /// Running sum of stake-weighted accept votes.
    pub accepted_stake_weight: NxmAmount,

    /// Running sum of stake-weighted reject votes.
    pub rejected_stake_weight: NxmAmount,

    /// Fixed reward pool, set at creation and immutable afterwards.
    pub total_reward: NxmAmount,
}

impl Assessment {
    pub fn new(total_reward: NxmAmount, now: Timestamp) -> Self {
        Self {
            poll_start: now,
            accepted_stake_weight: NxmAmount::ZERO,
            rejected_stake_weight: NxmAmount::ZERO,
            total_reward,
        }
    }

    /// When the voting window closes.
    pub fn voting_ends_at(&self, params: &AssessmentParams) -> Timestamp {
        self.poll_start.plus_secs(params.min_voting_period_secs)
    }

    /// When rewards become claimable and the outcome becomes fixed.
    pub fn finalizes_at(&self, params: &AssessmentParams) -> Timestamp {
        self.poll_start
            .plus_secs(params.min_voting_period_secs)
            .plus_secs(params.payout_cooldown_secs)
    }

    /// Poll state at `now` — never stored, always derived.
    pub fn status(&self, params: &AssessmentParams, now: Timestamp) -> PollStatus {
        if now < self.voting_ends_at(params) {
            PollStatus::Open
        } else if now < self.finalizes_at(params) {
            PollStatus::AwaitingCooldown
        } else {
            PollStatus::Final
        }
    }

    pub fn is_final(&self, params: &AssessmentParams, now: Timestamp) -> bool {
        self.status(params, now) == PollStatus::Final
    }

    /// Combined stake weight of all voters on this poll.
    pub fn total_stake_weight(&self) -> Option<NxmAmount> {
        self.accepted_stake_weight
            .checked_add(self.rejected_stake_weight)
    }
}

/// Ordered, append-only sequence of assessments.
///
/// Indices are assigned on creation and immutable; the registry exclusively
/// owns poll tallies and reward-pool sizes. Tallies are mutated only through
/// the voting engine (crate-internal access).
pub struct AssessmentRegistry {
    assessments: Vec<Assessment>,
}

impl AssessmentRegistry {
    pub fn new() -> Self {
        Self {
            assessments: Vec::new(),
        }
    }

    /// Append a new assessment (claims collaborator entry point).
    ///
    /// Returns the index assigned to it, fixed forever.
    pub fn create_assessment(
        &mut self,
        total_reward: NxmAmount,
        now: Timestamp,
    ) -> AssessmentIndex {
        let index = self.assessments.len() as AssessmentIndex;
        self.assessments.push(Assessment::new(total_reward, now));
        index
    }

    pub fn get(&self, index: AssessmentIndex) -> Option<&Assessment> {
        self.assessments.get(index as usize)
    }

    /// Tally mutation is reserved for the voting engine.
    pub(crate) fn get_mut(&mut self, index: AssessmentIndex) -> Option<&mut Assessment> {
        self.assessments.get_mut(index as usize)
    }

    pub fn count(&self) -> u64 {
        self.assessments.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.assessments.is_empty()
    }

    /// Outcome of a finalized poll; `None` while the poll is still running.
    ///
    /// A tie rejects: acceptance requires a strict majority of stake weight.
    pub fn outcome(
        &self,
        index: AssessmentIndex,
        params: &AssessmentParams,
        now: Timestamp,
    ) -> Option<PollOutcome> {
        let assessment = self.get(index)?;
        if !assessment.is_final(params, now) {
            return None;
        }
        if assessment.accepted_stake_weight > assessment.rejected_stake_weight {
            Some(PollOutcome::Accepted)
        } else {
            Some(PollOutcome::Rejected)
        }
    }

    /// Persist every assessment to a store.
    pub fn save_to_store(&self, store: &dyn AssessmentStore) -> Result<(), AssessmentError> {
        for (index, assessment) in self.assessments.iter().enumerate() {
            let bytes = bincode::serialize(assessment)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            store.put_assessment(index as AssessmentIndex, &bytes)?;
        }
        Ok(())
    }

    /// Restore the registry from a store, in index order.
    pub fn load_from_store(store: &dyn AssessmentStore) -> Result<Self, AssessmentError> {
        let count = store.assessment_count()?;
        let mut assessments = Vec::with_capacity(count as usize);
        for index in 0..count {
            let bytes = store
                .get_assessment(index)?
                .ok_or_else(|| StoreError::NotFound(format!("assessment {index}")))?;
            let assessment: Assessment = bincode::deserialize(&bytes)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            assessments.push(assessment);
        }
        Ok(Self { assessments })
    }
}

impl Default for AssessmentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for AssessmentRegistry {
    fn clone(&self) -> Self {
        Self {
            assessments: self.assessments.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_params() -> AssessmentParams {
        // 100s voting window, 50s cooldown; lockup is irrelevant here.
        AssessmentParams {
            min_voting_period_secs: 100,
            payout_cooldown_secs: 50,
            stake_lockup_period_secs: 0,
        }
    }

    #[test]
    fn indices_are_assigned_in_order() {
        let mut registry = AssessmentRegistry::new();
        let now = Timestamp::new(1000);
        assert_eq!(registry.create_assessment(NxmAmount::new(10), now), 0);
        assert_eq!(registry.create_assessment(NxmAmount::new(20), now), 1);
        assert_eq!(registry.create_assessment(NxmAmount::new(30), now), 2);
        assert_eq!(registry.count(), 3);
        assert_eq!(registry.get(1).unwrap().total_reward, NxmAmount::new(20));
        assert!(registry.get(3).is_none());
    }

    #[test]
    fn poll_walks_through_all_three_states() {
        let params = test_params();
        let assessment = Assessment::new(NxmAmount::new(100), Timestamp::new(1000));

        assert_eq!(assessment.status(&params, Timestamp::new(1000)), PollStatus::Open);
        assert_eq!(assessment.status(&params, Timestamp::new(1099)), PollStatus::Open);
        assert_eq!(
            assessment.status(&params, Timestamp::new(1100)),
            PollStatus::AwaitingCooldown
        );
        assert_eq!(
            assessment.status(&params, Timestamp::new(1149)),
            PollStatus::AwaitingCooldown
        );
        assert_eq!(assessment.status(&params, Timestamp::new(1150)), PollStatus::Final);
        assert!(assessment.is_final(&params, Timestamp::new(9999)));
    }

    #[test]
    fn outcome_is_none_until_final() {
        let params = test_params();
        let mut registry = AssessmentRegistry::new();
        let index = registry.create_assessment(NxmAmount::new(100), Timestamp::new(0));
        registry.get_mut(index).unwrap().accepted_stake_weight = NxmAmount::new(10);

        assert_eq!(registry.outcome(index, &params, Timestamp::new(50)), None);
        assert_eq!(registry.outcome(index, &params, Timestamp::new(120)), None);
        assert_eq!(
            registry.outcome(index, &params, Timestamp::new(150)),
            Some(PollOutcome::Accepted)
        );
    }

    #[test]
    fn tied_poll_rejects() {
        let params = test_params();
        let mut registry = AssessmentRegistry::new();
        let index = registry.create_assessment(NxmAmount::new(100), Timestamp::new(0));
        {
            let a = registry.get_mut(index).unwrap();
            a.accepted_stake_weight = NxmAmount::new(40);
            a.rejected_stake_weight = NxmAmount::new(40);
        }
        assert_eq!(
            registry.outcome(index, &params, Timestamp::new(150)),
            Some(PollOutcome::Rejected)
        );
    }
}

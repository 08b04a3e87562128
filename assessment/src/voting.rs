//! Voting engine — one stake-snapshot vote per staker per assessment.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::AssessmentError;
use crate::registry::{AssessmentRegistry, PollStatus};
use assay_store::{AssessmentStore, StoreError};
use assay_types::{AssessmentIndex, AssessmentParams, MemberAddress, NxmAmount, Timestamp};

/// A cast vote, immutable once recorded.
///
/// `weight` is the staker's stake amount read at cast time — a snapshot held
/// by value, never a reference to the live stake. Later deposits, unstakes
/// or burns cannot touch it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub assessment_index: AssessmentIndex,
    pub accepted: bool,
    pub weight: NxmAmount,
    pub cast_at: Timestamp,
}

/// The only writer of vote records and the only mutator of poll tallies.
pub struct VotingEngine {
    /// Per-staker votes, keyed by assessment index.
    votes: HashMap<MemberAddress, BTreeMap<AssessmentIndex, Vote>>,
    /// Timestamp of each staker's most recent vote, for the stake lockup.
    last_vote_at: HashMap<MemberAddress, Timestamp>,
}

impl VotingEngine {
    pub fn new() -> Self {
        Self {
            votes: HashMap::new(),
            last_vote_at: HashMap::new(),
        }
    }

    /// Cast a batch of votes, all-or-nothing.
    ///
    /// Every index is validated before anything is applied: a single
    /// `AlreadyVoted`, `VotingClosed` or unknown index aborts the whole
    /// batch with no partial state, matching the guarantee callers rely on
    /// when voting on related claims together. Each vote is weighted by the
    /// staker's current stake, snapshotted into the vote record.
    pub fn cast_votes(
        &mut self,
        staker: &MemberAddress,
        indices: &[AssessmentIndex],
        accepted_flags: &[bool],
        stake_amount: NxmAmount,
        registry: &mut AssessmentRegistry,
        params: &AssessmentParams,
        now: Timestamp,
    ) -> Result<Vec<Vote>, AssessmentError> {
        if indices.len() != accepted_flags.len() {
            return Err(AssessmentError::InputLengthMismatch {
                indices: indices.len(),
                flags: accepted_flags.len(),
            });
        }
        if stake_amount.is_zero() {
            return Err(AssessmentError::NoStake);
        }

        // Validation pass: nothing is mutated until every index checks out.
        let existing = self.votes.get(staker);
        let mut seen = HashSet::new();
        for (&index, &accepted) in indices.iter().zip(accepted_flags.iter()) {
            let assessment = registry
                .get(index)
                .ok_or(AssessmentError::AssessmentNotFound(index))?;
            if existing.is_some_and(|v| v.contains_key(&index)) || !seen.insert(index) {
                return Err(AssessmentError::AlreadyVoted(index));
            }
            if assessment.status(params, now) != PollStatus::Open {
                return Err(AssessmentError::VotingClosed(index));
            }
            // Prove the tally addition fits before applying any of them.
            let tally = if accepted {
                assessment.accepted_stake_weight
            } else {
                assessment.rejected_stake_weight
            };
            tally
                .checked_add(stake_amount)
                .ok_or(AssessmentError::Overflow)?;
        }

        // Apply pass: every lookup here was validated above.
        let mut cast = Vec::with_capacity(indices.len());
        for (&index, &accepted) in indices.iter().zip(accepted_flags.iter()) {
            let assessment = registry
                .get_mut(index)
                .ok_or(AssessmentError::AssessmentNotFound(index))?;
            let tally = if accepted {
                &mut assessment.accepted_stake_weight
            } else {
                &mut assessment.rejected_stake_weight
            };
            *tally = tally
                .checked_add(stake_amount)
                .ok_or(AssessmentError::Overflow)?;

            let vote = Vote {
                assessment_index: index,
                accepted,
                weight: stake_amount,
                cast_at: now,
            };
            self.votes
                .entry(staker.clone())
                .or_default()
                .insert(index, vote.clone());
            cast.push(vote);
        }
        self.last_vote_at.insert(staker.clone(), now);
        Ok(cast)
    }

    /// The staker's vote on an assessment, if any.
    pub fn vote_of(&self, staker: &MemberAddress, index: AssessmentIndex) -> Option<&Vote> {
        self.votes.get(staker)?.get(&index)
    }

    pub fn has_voted(&self, staker: &MemberAddress, index: AssessmentIndex) -> bool {
        self.vote_of(staker, index).is_some()
    }

    /// Total votes ever cast by this staker.
    pub fn vote_count(&self, staker: &MemberAddress) -> usize {
        self.votes.get(staker).map_or(0, |v| v.len())
    }

    /// When the staker last voted; drives the stake lockup.
    pub fn last_vote_at(&self, staker: &MemberAddress) -> Option<Timestamp> {
        self.last_vote_at.get(staker).copied()
    }

    /// Persist every vote record to a store.
    pub fn save_to_store(&self, store: &dyn AssessmentStore) -> Result<(), AssessmentError> {
        for (staker, votes) in &self.votes {
            for (index, vote) in votes {
                let bytes = bincode::serialize(vote)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                store.put_vote(staker, *index, &bytes)?;
            }
        }
        Ok(())
    }

    /// Restore the engine from a store, rebuilding the last-vote index.
    pub fn load_from_store(store: &dyn AssessmentStore) -> Result<Self, AssessmentError> {
        let mut votes: HashMap<MemberAddress, BTreeMap<AssessmentIndex, Vote>> = HashMap::new();
        let mut last_vote_at: HashMap<MemberAddress, Timestamp> = HashMap::new();
        for (staker, index, bytes) in store.iter_votes()? {
            let vote: Vote = bincode::deserialize(&bytes)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            let latest = last_vote_at.entry(staker.clone()).or_insert(vote.cast_at);
            if vote.cast_at > *latest {
                *latest = vote.cast_at;
            }
            votes.entry(staker).or_default().insert(index, vote);
        }
        Ok(Self {
            votes,
            last_vote_at,
        })
    }
}

impl Default for VotingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for VotingEngine {
    fn clone(&self) -> Self {
        Self {
            votes: self.votes.clone(),
            last_vote_at: self.last_vote_at.clone(),
        }
    }
}

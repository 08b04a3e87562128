//! The assessment service — the single logical writer of the core.
//!
//! Owns the stake ledger, the registry and the voting engine; every state
//! transition flows through a `&mut self` method, reproducing the strictly
//! ordered, one-writer-at-a-time execution model of the underlying ledger.
//! Callers supply `now` explicitly; nothing here reads ambient time.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::AssessmentError;
use crate::event::AssessmentEvent;
use crate::registry::{Assessment, AssessmentRegistry, PollOutcome, PollStatus};
use crate::rewards::{RewardDistributor, RewardWithdrawal};
use crate::voting::VotingEngine;
use assay_ledger::{AssetTransfer, Membership, Stake, StakeLedger};
use assay_store::{AssessmentStore, StakeStore};
use assay_types::{AssessmentIndex, AssessmentParams, MemberAddress, NxmAmount, Timestamp};

/// Coordinating service over the assessment core.
///
/// All mutation goes through this service; the component engines are never
/// handed out mutably. Events accumulate per committed transition and are
/// drained with [`take_events`](Self::take_events).
#[derive(Clone)]
pub struct AssessmentService {
    params: AssessmentParams,
    ledger: StakeLedger,
    registry: AssessmentRegistry,
    voting: VotingEngine,
    token: Arc<dyn AssetTransfer>,
    membership: Arc<dyn Membership>,
    events: Vec<AssessmentEvent>,
}

impl AssessmentService {
    pub fn new(
        params: AssessmentParams,
        token: Arc<dyn AssetTransfer>,
        membership: Arc<dyn Membership>,
    ) -> Self {
        Self {
            params,
            ledger: StakeLedger::new(),
            registry: AssessmentRegistry::new(),
            voting: VotingEngine::new(),
            token,
            membership,
            events: Vec::new(),
        }
    }

    pub fn params(&self) -> &AssessmentParams {
        &self.params
    }

    /// Deposit stake for `staker`, debiting their external balance.
    pub fn stake(
        &mut self,
        staker: &MemberAddress,
        amount: NxmAmount,
    ) -> Result<(), AssessmentError> {
        self.ledger.stake(staker, amount, self.token.as_ref())?;
        info!(staker = %staker, amount = %amount, "stake deposited");
        self.events.push(AssessmentEvent::StakeDeposited {
            staker: staker.clone(),
            amount,
        });
        Ok(())
    }

    /// Withdraw stake to `to`, guarded by the post-vote lockup.
    pub fn unstake(
        &mut self,
        staker: &MemberAddress,
        amount: NxmAmount,
        to: &MemberAddress,
        now: Timestamp,
    ) -> Result<(), AssessmentError> {
        if let Some(last_vote) = self.voting.last_vote_at(staker) {
            let until = last_vote.plus_secs(self.params.stake_lockup_period_secs);
            if now < until {
                return Err(AssessmentError::StakeLockedUp { until });
            }
        }
        self.ledger.unstake(staker, amount, to, self.token.as_ref())?;
        info!(staker = %staker, to = %to, amount = %amount, "stake withdrawn");
        self.events.push(AssessmentEvent::StakeWithdrawn {
            staker: staker.clone(),
            to: to.clone(),
            amount,
        });
        Ok(())
    }

    /// Slash up to `amount` of `staker`'s stake (external fraud trigger).
    ///
    /// Returns the amount actually burned; past vote weights are untouched.
    pub fn burn_stake(&mut self, staker: &MemberAddress, amount: NxmAmount) -> NxmAmount {
        let burned = self.ledger.burn(staker, amount);
        if !burned.is_zero() {
            warn!(staker = %staker, burned = %burned, "stake burned");
        }
        burned
    }

    /// Create a new assessment (claims collaborator entry point).
    pub fn create_assessment(
        &mut self,
        total_reward: NxmAmount,
        now: Timestamp,
    ) -> AssessmentIndex {
        let index = self.registry.create_assessment(total_reward, now);
        debug!(index, total_reward = %total_reward, "assessment created");
        index
    }

    /// Cast a batch of votes for `staker`, weighted by their current stake.
    pub fn cast_votes(
        &mut self,
        staker: &MemberAddress,
        indices: &[AssessmentIndex],
        accepted_flags: &[bool],
        now: Timestamp,
    ) -> Result<(), AssessmentError> {
        let stake_amount = self.ledger.stake_of(staker).amount;
        let cast = self.voting.cast_votes(
            staker,
            indices,
            accepted_flags,
            stake_amount,
            &mut self.registry,
            &self.params,
            now,
        )?;
        for vote in cast {
            debug!(
                staker = %staker,
                index = vote.assessment_index,
                accepted = vote.accepted,
                weight = %vote.weight,
                "vote cast"
            );
            self.events.push(AssessmentEvent::VoteCast {
                staker: staker.clone(),
                assessment_index: vote.assessment_index,
                accepted: vote.accepted,
                weight: vote.weight,
            });
        }
        Ok(())
    }

    /// Withdraw all claimable rewards of `staker` to `destination`.
    pub fn withdraw_rewards_to(
        &mut self,
        staker: &MemberAddress,
        destination: &MemberAddress,
        batch_size_limit: u64,
        now: Timestamp,
    ) -> Result<RewardWithdrawal, AssessmentError> {
        let withdrawal = RewardDistributor::withdraw_rewards_to(
            &mut self.ledger,
            &self.registry,
            &self.voting,
            self.membership.as_ref(),
            self.token.as_ref(),
            &self.params,
            staker,
            destination,
            batch_size_limit,
            now,
        )?;
        info!(
            staker = %withdrawal.staker,
            destination = %destination,
            total = %withdrawal.total,
            rewarded = withdrawal.rewarded_assessments,
            "rewards withdrawn"
        );
        self.events.push(AssessmentEvent::RewardWithdrawn {
            staker: withdrawal.staker.clone(),
            amount: withdrawal.total,
        });
        Ok(withdrawal)
    }

    // ── Read accessors ───────────────────────────────────────────────────

    pub fn stake_of(&self, staker: &MemberAddress) -> Stake {
        self.ledger.stake_of(staker)
    }

    pub fn assessment(&self, index: AssessmentIndex) -> Option<&Assessment> {
        self.registry.get(index)
    }

    pub fn assessment_count(&self) -> u64 {
        self.registry.count()
    }

    pub fn poll_status(&self, index: AssessmentIndex, now: Timestamp) -> Option<PollStatus> {
        Some(self.registry.get(index)?.status(&self.params, now))
    }

    /// Outcome read-back for the claims collaborator; `None` until final.
    pub fn poll_outcome(&self, index: AssessmentIndex, now: Timestamp) -> Option<PollOutcome> {
        self.registry.outcome(index, &self.params, now)
    }

    pub fn has_voted(&self, staker: &MemberAddress, index: AssessmentIndex) -> bool {
        self.voting.has_voted(staker, index)
    }

    /// Drain accumulated events.
    pub fn take_events(&mut self) -> Vec<AssessmentEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Persistence ──────────────────────────────────────────────────────

    /// Persist the full core state to the given stores.
    pub fn save_to_store(
        &self,
        stakes: &dyn StakeStore,
        assessments: &dyn AssessmentStore,
    ) -> Result<(), AssessmentError> {
        self.ledger.save_to_store(stakes)?;
        self.registry.save_to_store(assessments)?;
        self.voting.save_to_store(assessments)?;
        Ok(())
    }

    /// Restore a service from the given stores.
    pub fn load_from_store(
        params: AssessmentParams,
        token: Arc<dyn AssetTransfer>,
        membership: Arc<dyn Membership>,
        stakes: &dyn StakeStore,
        assessments: &dyn AssessmentStore,
    ) -> Result<Self, AssessmentError> {
        Ok(Self {
            params,
            ledger: StakeLedger::load_from_store(stakes)?,
            registry: AssessmentRegistry::load_from_store(assessments)?,
            voting: VotingEngine::load_from_store(assessments)?,
            token,
            membership,
            events: Vec::new(),
        })
    }
}

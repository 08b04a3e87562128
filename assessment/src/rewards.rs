//! Reward distributor — pro-rata payout of finalized assessment pools.
//!
//! Walks the registry from the staker's withdrawal cursor, in index order,
//! accumulating the staker's share of every finalized poll they voted on,
//! then issues a single aggregated transfer and cements the new cursor.
//! The cursor only ever moves forward, so no assessment can pay twice.

use crate::error::AssessmentError;
use crate::registry::AssessmentRegistry;
use crate::voting::VotingEngine;
use assay_ledger::{AssetTransfer, Membership, StakeLedger};
use assay_types::{AssessmentIndex, AssessmentParams, MemberAddress, NxmAmount, Timestamp};

/// Summary of one successful withdrawal call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardWithdrawal {
    /// Who earned the rewards (the caller, not the destination).
    pub staker: MemberAddress,
    /// Aggregated amount paid out in this call.
    pub total: NxmAmount,
    /// Cursor position before the walk.
    pub from_index: AssessmentIndex,
    /// Cursor position after the walk.
    pub to_index: AssessmentIndex,
    /// How many voted-on assessments were paid in this call.
    pub rewarded_assessments: u64,
}

/// Result of the pure accrual walk, before any side effects.
struct Accrual {
    total: u128,
    new_cursor: AssessmentIndex,
    rewarded: u64,
}

/// The only reader that advances withdrawal cursors and the only initiator
/// of payout transfers.
pub struct RewardDistributor;

impl RewardDistributor {
    /// Withdraw all currently claimable rewards of `staker` to `destination`.
    ///
    /// `batch_size_limit` caps how many voted-on assessments are paid in
    /// this call; `0` means no limit. Skipped assessments the staker never
    /// voted on advance the cursor without payment and without consuming
    /// the limit, so repeated limited calls pay exactly what one unlimited
    /// call would.
    #[allow(clippy::too_many_arguments)]
    pub fn withdraw_rewards_to(
        ledger: &mut StakeLedger,
        registry: &AssessmentRegistry,
        voting: &VotingEngine,
        membership: &dyn Membership,
        token: &dyn AssetTransfer,
        params: &AssessmentParams,
        staker: &MemberAddress,
        destination: &MemberAddress,
        batch_size_limit: u64,
        now: Timestamp,
    ) -> Result<RewardWithdrawal, AssessmentError> {
        if !membership.is_member(destination) {
            return Err(AssessmentError::NotAMember(destination.clone()));
        }
        // A staker with no votes can never have anything to withdraw,
        // regardless of how far the registry has finalized.
        if voting.vote_count(staker) == 0 {
            return Err(AssessmentError::NoWithdrawableRewards);
        }

        let from_index = ledger.stake_of(staker).rewards_withdrawable_from_index;
        let accrual = Self::accrue(
            registry,
            voting,
            params,
            staker,
            from_index,
            batch_size_limit,
            now,
        )?;

        if accrual.total == 0 && accrual.new_cursor == from_index {
            return Err(AssessmentError::NoWithdrawableRewards);
        }

        // Exactly one aggregated transfer; a failure here aborts the call
        // before the cursor is cemented, leaving everything claimable.
        let total = NxmAmount::new(accrual.total);
        token.transfer(destination, total)?;
        ledger.advance_cursor(staker, accrual.new_cursor)?;

        Ok(RewardWithdrawal {
            staker: staker.clone(),
            total,
            from_index,
            to_index: accrual.new_cursor,
            rewarded_assessments: accrual.rewarded,
        })
    }

    /// The pure accrual walk: no membership checks, no transfers, no cursor
    /// mutation.
    ///
    /// Stops at the registry end, at the first non-final assessment (rewards
    /// are claimed strictly in order), or once `batch_size_limit` voted-on
    /// assessments have been accumulated. Shares use floor division; the
    /// integer residual stays in the pool.
    fn accrue(
        registry: &AssessmentRegistry,
        voting: &VotingEngine,
        params: &AssessmentParams,
        staker: &MemberAddress,
        from_index: AssessmentIndex,
        batch_size_limit: u64,
        now: Timestamp,
    ) -> Result<Accrual, AssessmentError> {
        let end = registry.count();
        let mut cursor = from_index;
        let mut total: u128 = 0;
        let mut rewarded: u64 = 0;

        while cursor < end {
            let assessment = registry
                .get(cursor)
                .ok_or(AssessmentError::AssessmentNotFound(cursor))?;
            if !assessment.is_final(params, now) {
                break;
            }
            if let Some(vote) = voting.vote_of(staker, cursor) {
                // A recorded vote implies a non-zero combined tally; the
                // share is direction-agnostic — voters are paid for
                // participating, not for picking the winning side.
                let pool_weight = assessment
                    .total_stake_weight()
                    .ok_or(AssessmentError::Overflow)?;
                let share = assessment
                    .total_reward
                    .raw()
                    .checked_mul(vote.weight.raw())
                    .ok_or(AssessmentError::Overflow)?
                    .checked_div(pool_weight.raw())
                    .ok_or(AssessmentError::Overflow)?;
                total = total.checked_add(share).ok_or(AssessmentError::Overflow)?;
                rewarded += 1;
            }
            cursor += 1;
            if batch_size_limit != 0 && rewarded >= batch_size_limit {
                break;
            }
        }

        Ok(Accrual {
            total,
            new_cursor: cursor,
            rewarded,
        })
    }
}

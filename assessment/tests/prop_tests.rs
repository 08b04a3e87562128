use std::sync::Arc;

use proptest::prelude::*;

use assay_assessment::{AssessmentError, AssessmentService};
use assay_nullables::{NullMembership, NullToken};
use assay_types::{AssessmentParams, MemberAddress, NxmAmount, Timestamp};

const VOTING: u64 = 100;
const COOLDOWN: u64 = 50;

/// Well past finalization of every poll created at t=0.
fn later() -> Timestamp {
    Timestamp::new(10_000)
}

fn member(n: usize) -> MemberAddress {
    MemberAddress::new(format!("asy_{n:0>40}"))
}

fn params() -> AssessmentParams {
    AssessmentParams {
        min_voting_period_secs: VOTING,
        payout_cooldown_secs: COOLDOWN,
        stake_lockup_period_secs: 0,
    }
}

/// A service with `stakes.len()` funded, enrolled, staked members.
fn service_with_stakers(stakes: &[u128]) -> AssessmentService {
    let token = Arc::new(NullToken::new());
    let members: Vec<MemberAddress> = (0..stakes.len()).map(member).collect();
    let membership = Arc::new(NullMembership::of(&members));
    let mut svc = AssessmentService::new(params(), token.clone(), membership);
    for (addr, &amount) in members.iter().zip(stakes.iter()) {
        token.fund(addr, NxmAmount::new(amount));
        svc.stake(addr, NxmAmount::new(amount)).unwrap();
    }
    svc
}

/// Drain a staker's rewards with a fixed batch limit, returning the total
/// paid across all calls.
fn drain(svc: &mut AssessmentService, staker: &MemberAddress, limit: u64) -> u128 {
    let mut paid = 0u128;
    let mut last_cursor = svc.stake_of(staker).rewards_withdrawable_from_index;
    loop {
        match svc.withdraw_rewards_to(staker, staker, limit, later()) {
            Ok(w) => {
                paid += w.total.raw();
                // The cursor strictly advances on every successful call and
                // never leaves the registry.
                let cursor = svc.stake_of(staker).rewards_withdrawable_from_index;
                assert!(cursor > last_cursor);
                assert!(cursor <= svc.assessment_count());
                last_cursor = cursor;
            }
            Err(AssessmentError::NoWithdrawableRewards) => return paid,
            Err(other) => panic!("unexpected error while draining: {other:?}"),
        }
    }
}

proptest! {
    /// The paid-out shares of one pool partition it proportionally: the sum
    /// never exceeds the pool and the rounding residual is smaller than the
    /// number of voters.
    #[test]
    fn payouts_partition_the_pool(
        stakes in prop::collection::vec(1u128..=1_000_000, 1..=6),
        pool in 0u128..=1_000_000_000_000,
    ) {
        let mut svc = service_with_stakers(&stakes);
        let index = svc.create_assessment(NxmAmount::new(pool), Timestamp::new(0));
        for n in 0..stakes.len() {
            svc.cast_votes(&member(n), &[index], &[n % 2 == 0], Timestamp::new(10)).unwrap();
        }

        let mut paid = 0u128;
        for n in 0..stakes.len() {
            // Every voter's call commits: even a zero share moves the cursor.
            let w = svc.withdraw_rewards_to(&member(n), &member(n), 0, later()).unwrap();
            paid += w.total.raw();
        }

        prop_assert!(paid <= pool);
        prop_assert!(pool - paid < stakes.len() as u128);
    }

    /// Withdrawing with any batch limit, across however many calls it
    /// takes, pays exactly what a single unlimited call pays.
    #[test]
    fn batched_withdrawals_equal_one_unlimited_withdrawal(
        polls in prop::collection::vec((1u128..=1_000_000, any::<bool>()), 1..=8),
        limit in 1u64..=4,
    ) {
        let mut voted: Vec<bool> = polls.iter().map(|&(_, v)| v).collect();
        // The walk needs at least one vote to have anything to pay.
        voted[0] = true;

        let build = || {
            let mut svc = service_with_stakers(&[1_000]);
            let indices: Vec<u64> = (0..polls.len() as u64).collect();
            for &(pool, _) in &polls {
                svc.create_assessment(NxmAmount::new(pool), Timestamp::new(0));
            }
            let voted_indices: Vec<u64> = indices
                .iter()
                .copied()
                .filter(|&i| voted[i as usize])
                .collect();
            let flags = vec![true; voted_indices.len()];
            svc.cast_votes(&member(0), &voted_indices, &flags, Timestamp::new(10)).unwrap();
            svc
        };

        let mut limited = build();
        let mut unlimited = build();

        let paid_limited = drain(&mut limited, &member(0), limit);
        let paid_unlimited = drain(&mut unlimited, &member(0), 0);

        prop_assert_eq!(paid_limited, paid_unlimited);
        prop_assert_eq!(
            limited.stake_of(&member(0)).rewards_withdrawable_from_index,
            unlimited.stake_of(&member(0)).rewards_withdrawable_from_index
        );
        // As the sole voter the staker collects each voted pool in full.
        let expected: u128 = polls
            .iter()
            .zip(voted.iter())
            .filter(|&(_, &v)| v)
            .map(|(&(pool, _), _)| pool)
            .sum();
        prop_assert_eq!(paid_unlimited, expected);
    }

    /// A staker who voted on nothing can never withdraw, whatever the
    /// registry looks like.
    #[test]
    fn non_voters_never_withdraw(
        pools in prop::collection::vec(1u128..=1_000_000, 0..=5),
    ) {
        let mut svc = service_with_stakers(&[500, 500]);
        for &pool in &pools {
            svc.create_assessment(NxmAmount::new(pool), Timestamp::new(0));
        }
        if !pools.is_empty() {
            // The other member votes, so the polls do carry rewards.
            svc.cast_votes(&member(1), &[0], &[true], Timestamp::new(10)).unwrap();
        }

        let result = svc.withdraw_rewards_to(&member(0), &member(0), 0, later());
        prop_assert!(matches!(result, Err(AssessmentError::NoWithdrawableRewards)));
        prop_assert_eq!(svc.stake_of(&member(0)).rewards_withdrawable_from_index, 0);
    }
}

use std::sync::Arc;

use assay_assessment::{AssessmentError, AssessmentService, PollOutcome};
use assay_nullables::{NullMembership, NullStore, NullToken};
use assay_types::{AssessmentParams, MemberAddress, NxmAmount, Timestamp};

fn member(n: u8) -> MemberAddress {
    MemberAddress::new(format!("asy_{:0>40}", n))
}

fn params() -> AssessmentParams {
    AssessmentParams {
        min_voting_period_secs: 100,
        payout_cooldown_secs: 50,
        stake_lockup_period_secs: 0,
    }
}

#[test]
fn a_reloaded_service_continues_where_the_old_one_stopped() {
    let token = Arc::new(NullToken::new());
    let membership = Arc::new(NullMembership::of(&[member(1), member(2)]));
    let mut svc = AssessmentService::new(params(), token.clone(), membership.clone());

    for n in [1, 2] {
        token.fund(&member(n), NxmAmount::new(1_000));
        svc.stake(&member(n), NxmAmount::new(100)).unwrap();
    }
    for _ in 0..3 {
        svc.create_assessment(NxmAmount::new(600), Timestamp::new(0));
    }
    svc.cast_votes(&member(1), &[0, 1, 2], &[true, true, false], Timestamp::new(10))
        .unwrap();
    svc.cast_votes(&member(2), &[0], &[true], Timestamp::new(10))
        .unwrap();

    // Member 1 collects only the first poll before the snapshot.
    let w = svc
        .withdraw_rewards_to(&member(1), &member(1), 1, Timestamp::new(200))
        .unwrap();
    assert_eq!(w.total, NxmAmount::new(300));

    let store = NullStore::new();
    svc.save_to_store(&store, &store).unwrap();

    let mut restored =
        AssessmentService::load_from_store(params(), token.clone(), membership, &store, &store)
            .unwrap();

    // Stakes, cursors, tallies and votes all survived the round-trip.
    assert_eq!(restored.stake_of(&member(1)).amount, NxmAmount::new(100));
    assert_eq!(restored.stake_of(&member(1)).rewards_withdrawable_from_index, 1);
    assert_eq!(restored.assessment_count(), 3);
    assert_eq!(
        restored.assessment(0).unwrap().accepted_stake_weight,
        NxmAmount::new(200)
    );
    assert_eq!(
        restored.poll_outcome(2, Timestamp::new(200)),
        Some(PollOutcome::Rejected)
    );
    assert!(restored.has_voted(&member(1), 2));
    assert!(!restored.has_voted(&member(2), 2));

    // The restored service pays out exactly the remaining rewards.
    let w = restored
        .withdraw_rewards_to(&member(1), &member(1), 0, Timestamp::new(200))
        .unwrap();
    assert_eq!(w.total, NxmAmount::new(1_200));
    assert_eq!(
        restored.stake_of(&member(1)).rewards_withdrawable_from_index,
        3
    );

    let result = restored.withdraw_rewards_to(&member(1), &member(1), 0, Timestamp::new(500));
    assert!(matches!(result, Err(AssessmentError::NoWithdrawableRewards)));
}

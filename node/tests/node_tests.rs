use std::sync::Arc;

use assay_assessment::{AssessmentError, AssessmentEvent, AssessmentService, PollOutcome, PollStatus};
use assay_ledger::token::AssetTransfer;
use assay_node::{AssessmentNode, NodeError};
use assay_nullables::{NullClock, NullMembership, NullToken};
use assay_types::{AssessmentParams, MemberAddress, NxmAmount};

fn member(n: u8) -> MemberAddress {
    MemberAddress::new(format!("asy_{:0>40}", n))
}

struct Fixture {
    token: Arc<NullToken>,
    clock: Arc<NullClock>,
    service: AssessmentService,
}

/// Three-day voting window, one-day cooldown, no lockup — and three funded
/// members.
fn fixture() -> Fixture {
    let token = Arc::new(NullToken::new());
    let membership = Arc::new(NullMembership::of(&[member(1), member(2), member(3)]));
    for n in [1, 2, 3] {
        token.fund(&member(n), NxmAmount::from_nxm(100));
    }
    let params = AssessmentParams::from_days(3, 1, 0);
    let service = AssessmentService::new(params, token.clone(), membership);
    Fixture {
        token,
        clock: Arc::new(NullClock::new(0)),
        service,
    }
}

#[tokio::test]
async fn full_lifecycle_through_the_node() {
    let f = fixture();
    let node = AssessmentNode::spawn(f.service, f.clock.clone());
    let staker = member(1);

    node.stake(&staker, NxmAmount::from_nxm(10)).await.unwrap();
    let index = node.create_assessment(NxmAmount::from_nxm(9)).await.unwrap();
    node.cast_votes(&staker, vec![index], vec![true]).await.unwrap();

    assert_eq!(node.poll_status(index).await.unwrap(), Some(PollStatus::Open));
    assert_eq!(node.poll_outcome(index).await.unwrap(), None);

    // Nothing claimable before the window and cooldown elapse.
    let early = node.withdraw_rewards_to(&staker, &staker, 0).await;
    assert!(matches!(
        early,
        Err(NodeError::Assessment(AssessmentError::NoWithdrawableRewards))
    ));

    f.clock.advance_days(4);
    assert_eq!(node.poll_status(index).await.unwrap(), Some(PollStatus::Final));
    assert_eq!(
        node.poll_outcome(index).await.unwrap(),
        Some(PollOutcome::Accepted)
    );

    let withdrawal = node.withdraw_rewards_to(&staker, &staker, 0).await.unwrap();
    assert_eq!(withdrawal.total, NxmAmount::from_nxm(9));
    assert_eq!(f.token.balance_of(&staker), NxmAmount::from_nxm(99));

    let stake = node.stake_of(&staker).await.unwrap();
    assert_eq!(stake.amount, NxmAmount::from_nxm(10));
    assert_eq!(stake.rewards_withdrawable_from_index, 1);

    let events = node.take_events().await.unwrap();
    assert!(events.contains(&AssessmentEvent::RewardWithdrawn {
        staker: staker.clone(),
        amount: NxmAmount::from_nxm(9),
    }));
}

#[tokio::test]
async fn equal_voters_split_the_pool_three_ways() {
    let f = fixture();
    let node = AssessmentNode::spawn(f.service, f.clock.clone());

    let index = node.create_assessment(NxmAmount::from_nxm(9)).await.unwrap();
    for n in [1, 2, 3] {
        node.stake(&member(n), NxmAmount::from_nxm(10)).await.unwrap();
        node.cast_votes(&member(n), vec![index], vec![true]).await.unwrap();
    }

    f.clock.advance_days(4);
    for n in [1, 2, 3] {
        let w = node
            .withdraw_rewards_to(&member(n), &member(n), 0)
            .await
            .unwrap();
        assert_eq!(w.total, NxmAmount::from_nxm(3));
    }
}

#[tokio::test]
async fn non_member_destination_is_rejected() {
    let f = fixture();
    let node = AssessmentNode::spawn(f.service, f.clock.clone());
    let staker = member(1);
    let outsider = member(9);

    node.stake(&staker, NxmAmount::from_nxm(10)).await.unwrap();
    let index = node.create_assessment(NxmAmount::from_nxm(9)).await.unwrap();
    node.cast_votes(&staker, vec![index], vec![true]).await.unwrap();
    f.clock.advance_days(4);

    let result = node.withdraw_rewards_to(&staker, &outsider, 0).await;
    assert!(matches!(
        result,
        Err(NodeError::Assessment(AssessmentError::NotAMember(_)))
    ));
    assert_eq!(f.token.balance_of(&outsider), NxmAmount::ZERO);
}

#[tokio::test]
async fn commands_serialize_through_one_writer() {
    let f = fixture();
    let node = Arc::new(AssessmentNode::spawn(f.service, f.clock.clone()));
    let index = node.create_assessment(NxmAmount::from_nxm(9)).await.unwrap();

    // Concurrent clients submit interleaved stakes and votes; the loop
    // orders them, so every vote sees that client's deposit.
    let mut handles = Vec::new();
    for n in [1u8, 2, 3] {
        let node = node.clone();
        handles.push(tokio::spawn(async move {
            node.stake(&member(n), NxmAmount::from_nxm(10)).await.unwrap();
            node.cast_votes(&member(n), vec![index], vec![true]).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    f.clock.advance_days(4);
    let w = node
        .withdraw_rewards_to(&member(1), &member(1), 0)
        .await
        .unwrap();
    assert_eq!(w.total, NxmAmount::from_nxm(3));
}

#[tokio::test]
async fn shutdown_returns_the_service() {
    let f = fixture();
    let node = AssessmentNode::spawn(f.service, f.clock.clone());
    let staker = member(1);
    node.stake(&staker, NxmAmount::from_nxm(10)).await.unwrap();

    let service = node.shutdown().await.unwrap();
    assert_eq!(service.stake_of(&staker).amount, NxmAmount::from_nxm(10));
}

//! The single-writer command loop.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::info;

use assay_assessment::{
    AssessmentError, AssessmentEvent, AssessmentService, PollOutcome, PollStatus, RewardWithdrawal,
};
use assay_ledger::Stake;
use assay_types::{AssessmentIndex, Clock, MemberAddress, NxmAmount};

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("assessment node has stopped")]
    Stopped,

    #[error(transparent)]
    Assessment(#[from] AssessmentError),
}

/// Commands accepted by the node's command loop.
///
/// Each carries a oneshot reply channel; the loop stamps every command with
/// the clock's current time before applying it.
enum Command {
    Stake {
        staker: MemberAddress,
        amount: NxmAmount,
        reply: oneshot::Sender<Result<(), AssessmentError>>,
    },
    Unstake {
        staker: MemberAddress,
        amount: NxmAmount,
        to: MemberAddress,
        reply: oneshot::Sender<Result<(), AssessmentError>>,
    },
    CreateAssessment {
        total_reward: NxmAmount,
        reply: oneshot::Sender<AssessmentIndex>,
    },
    CastVotes {
        staker: MemberAddress,
        indices: Vec<AssessmentIndex>,
        accepted_flags: Vec<bool>,
        reply: oneshot::Sender<Result<(), AssessmentError>>,
    },
    WithdrawRewardsTo {
        staker: MemberAddress,
        destination: MemberAddress,
        batch_size_limit: u64,
        reply: oneshot::Sender<Result<RewardWithdrawal, AssessmentError>>,
    },
    StakeOf {
        staker: MemberAddress,
        reply: oneshot::Sender<Stake>,
    },
    PollStatus {
        index: AssessmentIndex,
        reply: oneshot::Sender<Option<PollStatus>>,
    },
    PollOutcome {
        index: AssessmentIndex,
        reply: oneshot::Sender<Option<PollOutcome>>,
    },
    TakeEvents {
        reply: oneshot::Sender<Vec<AssessmentEvent>>,
    },
}

/// Spawns the command loop that owns the service.
pub struct AssessmentNode;

impl AssessmentNode {
    /// Start the node. The returned handle is the only way to reach the
    /// service; dropping it (or calling [`NodeHandle::shutdown`]) stops the
    /// loop.
    pub fn spawn(service: AssessmentService, clock: Arc<dyn Clock>) -> NodeHandle {
        let (tx, mut rx) = mpsc::channel::<Command>(1024);
        let task = tokio::spawn(async move {
            let mut service = service;
            info!("assessment node started");
            while let Some(command) = rx.recv().await {
                let now = clock.now();
                match command {
                    Command::Stake {
                        staker,
                        amount,
                        reply,
                    } => {
                        let _ = reply.send(service.stake(&staker, amount));
                    }
                    Command::Unstake {
                        staker,
                        amount,
                        to,
                        reply,
                    } => {
                        let _ = reply.send(service.unstake(&staker, amount, &to, now));
                    }
                    Command::CreateAssessment {
                        total_reward,
                        reply,
                    } => {
                        let _ = reply.send(service.create_assessment(total_reward, now));
                    }
                    Command::CastVotes {
                        staker,
                        indices,
                        accepted_flags,
                        reply,
                    } => {
                        let _ =
                            reply.send(service.cast_votes(&staker, &indices, &accepted_flags, now));
                    }
                    Command::WithdrawRewardsTo {
                        staker,
                        destination,
                        batch_size_limit,
                        reply,
                    } => {
                        let _ = reply.send(service.withdraw_rewards_to(
                            &staker,
                            &destination,
                            batch_size_limit,
                            now,
                        ));
                    }
                    Command::StakeOf { staker, reply } => {
                        let _ = reply.send(service.stake_of(&staker));
                    }
                    Command::PollStatus { index, reply } => {
                        let _ = reply.send(service.poll_status(index, now));
                    }
                    Command::PollOutcome { index, reply } => {
                        let _ = reply.send(service.poll_outcome(index, now));
                    }
                    Command::TakeEvents { reply } => {
                        let _ = reply.send(service.take_events());
                    }
                }
            }
            info!("assessment node stopped");
            service
        });
        NodeHandle { tx, task }
    }
}

/// Client handle to the node's command loop.
pub struct NodeHandle {
    tx: mpsc::Sender<Command>,
    task: JoinHandle<AssessmentService>,
}

impl NodeHandle {
    async fn request<T>(
        &self,
        command: Command,
        rx: oneshot::Receiver<T>,
    ) -> Result<T, NodeError> {
        self.tx.send(command).await.map_err(|_| NodeError::Stopped)?;
        rx.await.map_err(|_| NodeError::Stopped)
    }

    pub async fn stake(&self, staker: &MemberAddress, amount: NxmAmount) -> Result<(), NodeError> {
        let (reply, rx) = oneshot::channel();
        let command = Command::Stake {
            staker: staker.clone(),
            amount,
            reply,
        };
        Ok(self.request(command, rx).await??)
    }

    pub async fn unstake(
        &self,
        staker: &MemberAddress,
        amount: NxmAmount,
        to: &MemberAddress,
    ) -> Result<(), NodeError> {
        let (reply, rx) = oneshot::channel();
        let command = Command::Unstake {
            staker: staker.clone(),
            amount,
            to: to.clone(),
            reply,
        };
        Ok(self.request(command, rx).await??)
    }

    pub async fn create_assessment(
        &self,
        total_reward: NxmAmount,
    ) -> Result<AssessmentIndex, NodeError> {
        let (reply, rx) = oneshot::channel();
        let command = Command::CreateAssessment {
            total_reward,
            reply,
        };
        self.request(command, rx).await
    }

    pub async fn cast_votes(
        &self,
        staker: &MemberAddress,
        indices: Vec<AssessmentIndex>,
        accepted_flags: Vec<bool>,
    ) -> Result<(), NodeError> {
        let (reply, rx) = oneshot::channel();
        let command = Command::CastVotes {
            staker: staker.clone(),
            indices,
            accepted_flags,
            reply,
        };
        Ok(self.request(command, rx).await??)
    }

    pub async fn withdraw_rewards_to(
        &self,
        staker: &MemberAddress,
        destination: &MemberAddress,
        batch_size_limit: u64,
    ) -> Result<RewardWithdrawal, NodeError> {
        let (reply, rx) = oneshot::channel();
        let command = Command::WithdrawRewardsTo {
            staker: staker.clone(),
            destination: destination.clone(),
            batch_size_limit,
            reply,
        };
        Ok(self.request(command, rx).await??)
    }

    pub async fn stake_of(&self, staker: &MemberAddress) -> Result<Stake, NodeError> {
        let (reply, rx) = oneshot::channel();
        let command = Command::StakeOf {
            staker: staker.clone(),
            reply,
        };
        self.request(command, rx).await
    }

    pub async fn poll_status(
        &self,
        index: AssessmentIndex,
    ) -> Result<Option<PollStatus>, NodeError> {
        let (reply, rx) = oneshot::channel();
        self.request(Command::PollStatus { index, reply }, rx).await
    }

    pub async fn poll_outcome(
        &self,
        index: AssessmentIndex,
    ) -> Result<Option<PollOutcome>, NodeError> {
        let (reply, rx) = oneshot::channel();
        self.request(Command::PollOutcome { index, reply }, rx).await
    }

    pub async fn take_events(&self) -> Result<Vec<AssessmentEvent>, NodeError> {
        let (reply, rx) = oneshot::channel();
        self.request(Command::TakeEvents { reply }, rx).await
    }

    /// Stop the loop and recover the service (e.g. for persistence).
    pub async fn shutdown(self) -> Result<AssessmentService, NodeError> {
        drop(self.tx);
        self.task.await.map_err(|_| NodeError::Stopped)
    }
}

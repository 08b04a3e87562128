//! Assessment core — stake-weighted claims assessment.
//!
//! Members stake NXM for voting weight, vote on submitted claims while each
//! poll is open, and withdraw pro-rata rewards once polls finalize. This
//! crate holds:
//! - The append-only assessment registry and its poll state machine
//! - The voting engine (one stake-snapshot vote per staker per assessment)
//! - The reward distributor (cursor walk, aggregated payout)
//! - The single-writer service that coordinates all of the above

pub mod error;
pub mod event;
pub mod registry;
pub mod rewards;
pub mod service;
pub mod voting;

pub use error::AssessmentError;
pub use event::AssessmentEvent;
pub use registry::{Assessment, AssessmentRegistry, PollOutcome, PollStatus};
pub use rewards::{RewardDistributor, RewardWithdrawal};
pub use service::AssessmentService;
pub use voting::{Vote, VotingEngine};

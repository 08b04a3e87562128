//! Fundamental types for the Assay assessment protocol.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: member addresses, token amounts, timestamps, and the
//! governance-owned assessment parameters.

pub mod address;
pub mod amount;
pub mod params;
pub mod time;

pub use address::MemberAddress;
pub use amount::{NxmAmount, NXM_UNIT};
pub use params::AssessmentParams;
pub use time::{Clock, SystemClock, Timestamp};

/// Position of an assessment in the append-only registry.
///
/// Indices are assigned at creation and never change; per-staker withdrawal
/// cursors are expressed in the same index space.
pub type AssessmentIndex = u64;

//! Member address type with `asy_` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An Assay member address, always prefixed with `asy_`.
///
/// The address identifies a mutual member across staking, voting and reward
/// withdrawal. Membership itself is managed by an external collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberAddress(String);

impl MemberAddress {
    /// The standard prefix for all Assay member addresses.
    pub const PREFIX: &'static str = "asy_";

    /// Create a new member address from a raw string.
    ///
    /// # Panics
    /// Panics if the string does not start with `asy_`.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "address must start with asy_");
        Self(s)
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this address is well-formed.
    pub fn is_valid(&self) -> bool {
        self.0.starts_with(Self::PREFIX) && self.0.len() > Self::PREFIX.len()
    }
}

impl fmt::Display for MemberAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MemberAddress {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

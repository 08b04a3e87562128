//! Membership collaborator.

use assay_types::MemberAddress;

/// Read-only view of the mutual's member roll, owned externally.
///
/// The reward distributor consults it to validate withdrawal destinations.
pub trait Membership: Send + Sync {
    fn is_member(&self, address: &MemberAddress) -> bool;
}

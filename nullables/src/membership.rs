//! Nullable membership roll.

use std::collections::HashSet;
use std::sync::Mutex;

use assay_ledger::Membership;
use assay_types::MemberAddress;

/// An in-memory member roll for testing.
pub struct NullMembership {
    members: Mutex<HashSet<MemberAddress>>,
}

impl NullMembership {
    pub fn new() -> Self {
        Self {
            members: Mutex::new(HashSet::new()),
        }
    }

    pub fn of(addresses: &[MemberAddress]) -> Self {
        Self {
            members: Mutex::new(addresses.iter().cloned().collect()),
        }
    }

    pub fn enroll(&self, address: &MemberAddress) {
        self.members.lock().unwrap().insert(address.clone());
    }

    pub fn expel(&self, address: &MemberAddress) {
        self.members.lock().unwrap().remove(address);
    }
}

impl Default for NullMembership {
    fn default() -> Self {
        Self::new()
    }
}

impl Membership for NullMembership {
    fn is_member(&self, address: &MemberAddress) -> bool {
        self.members.lock().unwrap().contains(address)
    }
}

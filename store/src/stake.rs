//! Stake storage trait.

use crate::StoreError;
use assay_types::MemberAddress;

/// Trait for persisting the stake ledger.
///
/// One record per staker, keyed by member address. The stake ledger
/// serializes its own `Stake` records into the opaque byte values.
pub trait StakeStore {
    fn get_stake(&self, address: &MemberAddress) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_stake(&self, address: &MemberAddress, stake: &[u8]) -> Result<(), StoreError>;
    fn iter_stakes(&self) -> Result<Vec<(MemberAddress, Vec<u8>)>, StoreError>;
}

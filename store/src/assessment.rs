//! Assessment and vote storage trait.

use crate::StoreError;
use assay_types::{AssessmentIndex, MemberAddress};

/// Trait for persisting the assessment registry and its vote records.
///
/// Assessments are keyed by their registry index; votes by
/// `(voter, index)`. The engines serialize their own record types into the
/// opaque byte values.
pub trait AssessmentStore {
    fn put_assessment(&self, index: AssessmentIndex, data: &[u8]) -> Result<(), StoreError>;
    fn get_assessment(&self, index: AssessmentIndex) -> Result<Option<Vec<u8>>, StoreError>;
    fn assessment_count(&self) -> Result<u64, StoreError>;

    fn put_vote(
        &self,
        voter: &MemberAddress,
        index: AssessmentIndex,
        data: &[u8],
    ) -> Result<(), StoreError>;
    fn get_vote(
        &self,
        voter: &MemberAddress,
        index: AssessmentIndex,
    ) -> Result<Option<Vec<u8>>, StoreError>;

    /// All persisted votes, across every voter.
    fn iter_votes(&self) -> Result<Vec<(MemberAddress, AssessmentIndex, Vec<u8>)>, StoreError>;
}

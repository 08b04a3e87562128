//! Nullable store — thread-safe in-memory storage for testing.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use assay_store::{AssessmentStore, StakeStore, StoreError};
use assay_types::{AssessmentIndex, MemberAddress};

/// An in-memory stake + assessment store for testing.
pub struct NullStore {
    stakes: Mutex<HashMap<MemberAddress, Vec<u8>>>,
    assessments: Mutex<BTreeMap<AssessmentIndex, Vec<u8>>>,
    votes: Mutex<BTreeMap<(MemberAddress, AssessmentIndex), Vec<u8>>>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            stakes: Mutex::new(HashMap::new()),
            assessments: Mutex::new(BTreeMap::new()),
            votes: Mutex::new(BTreeMap::new()),
        }
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StakeStore for NullStore {
    fn get_stake(&self, address: &MemberAddress) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.stakes.lock().unwrap().get(address).cloned())
    }

    fn put_stake(&self, address: &MemberAddress, stake: &[u8]) -> Result<(), StoreError> {
        self.stakes
            .lock()
            .unwrap()
            .insert(address.clone(), stake.to_vec());
        Ok(())
    }

    fn iter_stakes(&self) -> Result<Vec<(MemberAddress, Vec<u8>)>, StoreError> {
        Ok(self
            .stakes
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

impl AssessmentStore for NullStore {
    fn put_assessment(&self, index: AssessmentIndex, data: &[u8]) -> Result<(), StoreError> {
        self.assessments
            .lock()
            .unwrap()
            .insert(index, data.to_vec());
        Ok(())
    }

    fn get_assessment(&self, index: AssessmentIndex) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.assessments.lock().unwrap().get(&index).cloned())
    }

    fn assessment_count(&self) -> Result<u64, StoreError> {
        Ok(self.assessments.lock().unwrap().len() as u64)
    }

    fn put_vote(
        &self,
        voter: &MemberAddress,
        index: AssessmentIndex,
        data: &[u8],
    ) -> Result<(), StoreError> {
        self.votes
            .lock()
            .unwrap()
            .insert((voter.clone(), index), data.to_vec());
        Ok(())
    }

    fn get_vote(
        &self,
        voter: &MemberAddress,
        index: AssessmentIndex,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .votes
            .lock()
            .unwrap()
            .get(&(voter.clone(), index))
            .cloned())
    }

    fn iter_votes(&self) -> Result<Vec<(MemberAddress, AssessmentIndex, Vec<u8>)>, StoreError> {
        Ok(self
            .votes
            .lock()
            .unwrap()
            .iter()
            .map(|((voter, index), data)| (voter.clone(), *index, data.clone()))
            .collect())
    }
}

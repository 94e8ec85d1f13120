//! Committed staking set

use parking_lot::RwLock;
use stakeset_core::{
    NodeId, Staker, StakerIterator, StakerKey, StakerReader, StakerWriter, StakingError,
    StakingResult, SubnetId, TxId,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, trace};

/// Validator slot plus the delegators bound to it.
///
/// An entry with neither is never kept in the store.
#[derive(Debug, Default)]
struct BaseValidator {
    validator: Option<Staker>,
    /// Delegators in schedule order
    delegators: BTreeMap<StakerKey, Staker>,
    /// Schedule slot of each delegator, by transaction ID
    delegator_keys: HashMap<TxId, StakerKey>,
}

impl BaseValidator {
    fn is_empty(&self) -> bool {
        self.validator.is_none() && self.delegators.is_empty()
    }
}

/// Authoritative store of committed validators and delegators.
///
/// Not internally synchronized; see [`SharedBaseStakers`].
#[derive(Debug, Default)]
pub struct BaseStakers {
    validators: HashMap<(SubnetId, NodeId), BaseValidator>,
    /// Every stored staker in schedule order
    stakers: BTreeMap<StakerKey, Staker>,
}

impl BaseStakers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_validator(&self, subnet_id: SubnetId, node_id: NodeId) -> StakingResult<&Staker> {
        self.validators
            .get(&(subnet_id, node_id))
            .and_then(|entry| entry.validator.as_ref())
            .ok_or(StakingError::NotFound)
    }

    pub fn put_validator(&mut self, staker: Staker) {
        trace!(
            subnet = %staker.subnet_id,
            node = %staker.node_id,
            tx_id = %staker.tx_id,
            "put validator"
        );

        let entry = self.validators.entry(staker.validator_key()).or_default();
        if let Some(previous) = entry.validator.replace(staker.clone()) {
            self.stakers.remove(&previous.key());
        }
        self.stakers.insert(staker.key(), staker);
    }

    pub fn delete_validator(&mut self, staker: &Staker) {
        let key = staker.validator_key();
        let Some(entry) = self.validators.get_mut(&key) else {
            return;
        };
        if let Some(previous) = entry.validator.take() {
            trace!(
                subnet = %previous.subnet_id,
                node = %previous.node_id,
                tx_id = %previous.tx_id,
                "delete validator"
            );
            let removed = self.stakers.remove(&previous.key());
            debug_assert!(removed.is_some(), "validator missing from schedule");
        }
        self.prune(key);
    }

    /// Insert the delegator, replacing any stored one with the same `tx_id`.
    pub fn put_delegator(&mut self, staker: Staker) {
        trace!(
            subnet = %staker.subnet_id,
            node = %staker.node_id,
            tx_id = %staker.tx_id,
            "put delegator"
        );

        let entry = self.validators.entry(staker.validator_key()).or_default();
        if let Some(previous) = entry.delegator_keys.insert(staker.tx_id, staker.key()) {
            entry.delegators.remove(&previous);
            self.stakers.remove(&previous);
        }
        entry.delegators.insert(staker.key(), staker.clone());
        self.stakers.insert(staker.key(), staker);
    }

    /// Remove the delegator with the staker's `tx_id` under its validator key.
    pub fn delete_delegator(&mut self, staker: &Staker) {
        let key = staker.validator_key();
        let Some(entry) = self.validators.get_mut(&key) else {
            return;
        };
        if let Some(slot) = entry.delegator_keys.remove(&staker.tx_id) {
            trace!(
                subnet = %key.0,
                node = %key.1,
                tx_id = %staker.tx_id,
                "delete delegator"
            );
            entry.delegators.remove(&slot);
            let removed = self.stakers.remove(&slot);
            debug_assert!(removed.is_some(), "delegator missing from schedule");
        }
        self.prune(key);
    }

    fn prune(&mut self, key: (SubnetId, NodeId)) {
        if self.validators.get(&key).is_some_and(BaseValidator::is_empty) {
            self.validators.remove(&key);
            debug!(subnet = %key.0, node = %key.1, "pruned empty validator entry");
        }
    }

    /// All stakers in schedule order, from the current contents.
    pub fn staker_iterator(&self) -> StakerIterator<'_> {
        StakerIterator::new(self.stakers.values().cloned())
    }

    /// Delegators of one validator entry in schedule order; empty if absent.
    pub fn delegator_iterator(&self, subnet_id: SubnetId, node_id: NodeId) -> StakerIterator<'_> {
        match self.validators.get(&(subnet_id, node_id)) {
            Some(entry) if !entry.delegators.is_empty() => {
                StakerIterator::new(entry.delegators.values().cloned())
            }
            _ => StakerIterator::empty(),
        }
    }

    /// Number of stored validators and delegators
    pub fn len(&self) -> usize {
        self.stakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stakers.is_empty()
    }

    /// Number of live `(subnet, node)` entries
    pub fn validator_entries(&self) -> usize {
        self.validators.len()
    }

    /// Next staker to transition, if any
    pub fn next_staker(&self) -> Option<&Staker> {
        self.stakers.values().next()
    }
}

impl StakerReader for BaseStakers {
    fn get_validator(&self, subnet_id: SubnetId, node_id: NodeId) -> StakingResult<Staker> {
        BaseStakers::get_validator(self, subnet_id, node_id).cloned()
    }

    fn staker_iterator(&self) -> StakerIterator<'_> {
        BaseStakers::staker_iterator(self)
    }

    fn delegator_iterator(&self, subnet_id: SubnetId, node_id: NodeId) -> StakerIterator<'_> {
        BaseStakers::delegator_iterator(self, subnet_id, node_id)
    }
}

impl StakerWriter for BaseStakers {
    fn put_validator(&mut self, staker: Staker) -> StakingResult<()> {
        BaseStakers::put_validator(self, staker);
        Ok(())
    }

    fn delete_validator(&mut self, staker: &Staker) {
        BaseStakers::delete_validator(self, staker)
    }

    fn put_delegator(&mut self, staker: Staker) {
        BaseStakers::put_delegator(self, staker)
    }

    fn delete_delegator(&mut self, staker: &Staker) {
        BaseStakers::delete_delegator(self, staker)
    }
}

/// Base store behind a lock; writers take the write guard for the whole mutation.
pub type SharedBaseStakers = Arc<RwLock<BaseStakers>>;

/// Create a shared base store
pub fn create_base_stakers() -> SharedBaseStakers {
    Arc::new(RwLock::new(BaseStakers::new()))
}

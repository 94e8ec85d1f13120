//! Uncommitted staking changes layered over a parent
//!
//! A [`DiffStakers`] records one layer of hypothetical additions and removals.
//! It never holds a reference to its parent: reads take the parent's ordered
//! sequence as an argument, and [`DiffStakers::apply`] folds the recorded
//! changes into any [`StakerWriter`].

use stakeset_core::{
    NodeId, Staker, StakerIterator, StakerKey, StakerWriter, StakingError, StakingResult,
    SubnetId, TxId,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, trace};

/// Net change recorded for a validator key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidatorStatus {
    /// No change recorded; the parent is authoritative.
    Unmodified,
    /// This diff introduces the validator.
    Added,
    /// This diff removes a validator assumed present in the parent.
    Deleted,
}

/// Outcome of a validator lookup against a single diff.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiffLookup<'a> {
    Unmodified,
    Added(&'a Staker),
    Deleted,
}

impl<'a> DiffLookup<'a> {
    pub fn status(&self) -> ValidatorStatus {
        match self {
            DiffLookup::Unmodified => ValidatorStatus::Unmodified,
            DiffLookup::Added(_) => ValidatorStatus::Added,
            DiffLookup::Deleted => ValidatorStatus::Deleted,
        }
    }

    /// Stored staker; only `Added` carries one.
    pub fn staker(&self) -> Option<&'a Staker> {
        match self {
            DiffLookup::Added(staker) => Some(staker),
            DiffLookup::Unmodified | DiffLookup::Deleted => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
struct DiffValidator {
    /// Validator introduced by this diff
    added: Option<Staker>,
    /// Parent validator removed by this diff
    deleted: Option<Staker>,
    added_delegators: BTreeMap<StakerKey, Staker>,
    /// Schedule slot of each added delegator, by transaction ID
    added_delegator_keys: HashMap<TxId, StakerKey>,
    deleted_delegators: HashMap<TxId, Staker>,
}

impl DiffValidator {
    fn lookup(&self) -> DiffLookup<'_> {
        match (&self.added, &self.deleted) {
            (Some(staker), _) => DiffLookup::Added(staker),
            (None, Some(_)) => DiffLookup::Deleted,
            (None, None) => DiffLookup::Unmodified,
        }
    }

    fn is_empty(&self) -> bool {
        self.added.is_none()
            && self.deleted.is_none()
            && self.added_delegators.is_empty()
            && self.deleted_delegators.is_empty()
    }
}

/// One layer of pending staking changes.
///
/// Empty until the first mutation; nothing is allocated for untouched diffs.
#[derive(Clone, Debug, Default)]
pub struct DiffStakers {
    validator_diffs: HashMap<(SubnetId, NodeId), DiffValidator>,
    /// Added validators and delegators in schedule order
    added_stakers: BTreeMap<StakerKey, Staker>,
    /// Parent delegators hidden by this diff
    deleted_delegators: HashSet<TxId>,
}

impl DiffStakers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded state of `(subnet_id, node_id)` in this diff only.
    ///
    /// `Unmodified` means the caller must consult the parent.
    pub fn get_validator(&self, subnet_id: SubnetId, node_id: NodeId) -> DiffLookup<'_> {
        match self.validator_diffs.get(&(subnet_id, node_id)) {
            Some(entry) => entry.lookup(),
            None => DiffLookup::Unmodified,
        }
    }

    /// `ConflictingValidator` if the key already holds an added validator
    /// from another transaction.
    pub fn check_put_validator(&self, staker: &Staker) -> StakingResult<()> {
        let existing = self
            .validator_diffs
            .get(&staker.validator_key())
            .and_then(|entry| entry.added.as_ref());
        match existing {
            Some(existing) if existing.tx_id != staker.tx_id => {
                Err(StakingError::ConflictingValidator {
                    subnet_id: staker.subnet_id,
                    node_id: staker.node_id,
                    existing: existing.tx_id,
                    incoming: staker.tx_id,
                })
            }
            _ => Ok(()),
        }
    }

    pub fn put_validator(&mut self, staker: Staker) -> StakingResult<()> {
        self.check_put_validator(&staker)?;

        trace!(
            subnet = %staker.subnet_id,
            node = %staker.node_id,
            tx_id = %staker.tx_id,
            "diff put validator"
        );
        let entry = self.validator_diffs.entry(staker.validator_key()).or_default();
        if let Some(previous) = entry.added.replace(staker.clone()) {
            self.added_stakers.remove(&previous.key());
        }
        self.added_stakers.insert(staker.key(), staker);
        Ok(())
    }

    pub fn delete_validator(&mut self, staker: &Staker) {
        let key = staker.validator_key();
        let entry = self.validator_diffs.entry(key).or_default();
        if let Some(added) = entry.added.take() {
            self.added_stakers.remove(&added.key());
            debug!(
                subnet = %key.0,
                node = %key.1,
                tx_id = %added.tx_id,
                "validator added and deleted in the same diff"
            );
        } else if entry.deleted.is_none() {
            trace!(subnet = %key.0, node = %key.1, tx_id = %staker.tx_id, "diff delete validator");
            entry.deleted = Some(staker.clone());
        }
        self.prune(key);
    }

    /// Add the delegator, replacing any delegator this diff added with the
    /// same `tx_id`.
    pub fn put_delegator(&mut self, staker: Staker) {
        let key = staker.validator_key();
        let entry = self.validator_diffs.entry(key).or_default();

        // Re-adding exactly the delegator this diff removed restores the parent's copy.
        if entry.deleted_delegators.get(&staker.tx_id) == Some(&staker) {
            entry.deleted_delegators.remove(&staker.tx_id);
            self.deleted_delegators.remove(&staker.tx_id);
            self.prune(key);
            return;
        }

        trace!(subnet = %key.0, node = %key.1, tx_id = %staker.tx_id, "diff put delegator");
        if let Some(previous) = entry.added_delegator_keys.insert(staker.tx_id, staker.key()) {
            entry.added_delegators.remove(&previous);
            self.added_stakers.remove(&previous);
        }
        entry.added_delegators.insert(staker.key(), staker.clone());
        self.added_stakers.insert(staker.key(), staker);
    }

    /// Cancel the delegator if this diff added it, otherwise hide the
    /// parent's delegator with the same `tx_id`.
    pub fn delete_delegator(&mut self, staker: &Staker) {
        let key = staker.validator_key();
        let entry = self.validator_diffs.entry(key).or_default();
        if let Some(slot) = entry.added_delegator_keys.remove(&staker.tx_id) {
            entry.added_delegators.remove(&slot);
            self.added_stakers.remove(&slot);
            debug!(
                subnet = %key.0,
                node = %key.1,
                tx_id = %staker.tx_id,
                "delegator added and deleted in the same diff"
            );
        } else {
            trace!(subnet = %key.0, node = %key.1, tx_id = %staker.tx_id, "diff delete delegator");
            self.deleted_delegators.insert(staker.tx_id);
            entry.deleted_delegators.insert(staker.tx_id, staker.clone());
        }
        self.prune(key);
    }

    fn prune(&mut self, key: (SubnetId, NodeId)) {
        if self.validator_diffs.get(&key).is_some_and(DiffValidator::is_empty) {
            self.validator_diffs.remove(&key);
        }
    }

    /// Whether a parent staker is removed by this diff.
    ///
    /// A deleted validator key hides the parent's validator at that key,
    /// whichever transaction the deletion named.
    fn hides(&self, staker: &Staker) -> bool {
        if self.deleted_delegators.contains(&staker.tx_id) {
            return true;
        }
        let deleted = self
            .validator_diffs
            .get(&staker.validator_key())
            .and_then(|entry| entry.deleted.as_ref());
        match deleted {
            Some(deleted) => deleted.tx_id == staker.tx_id || staker.priority.is_validator(),
            None => false,
        }
    }

    /// Merge `parent` with this diff: parent stakers this diff deleted are
    /// skipped and added stakers are interleaved in schedule order.
    pub fn staker_iterator<'a>(&'a self, parent: StakerIterator<'a>) -> StakerIterator<'a> {
        let added = if self.added_stakers.is_empty() {
            StakerIterator::empty()
        } else {
            StakerIterator::new(self.added_stakers.values().cloned())
        };
        let parent = if self.validator_diffs.is_empty() {
            parent
        } else {
            parent.exclude(move |staker| self.hides(staker))
        };
        parent.merge(added)
    }

    /// Same merge as [`staker_iterator`](Self::staker_iterator), restricted to
    /// the delegators of one validator. `parent` must be the parent's
    /// delegator sequence for the same key.
    pub fn delegator_iterator<'a>(
        &'a self,
        parent: StakerIterator<'a>,
        subnet_id: SubnetId,
        node_id: NodeId,
    ) -> StakerIterator<'a> {
        let Some(entry) = self.validator_diffs.get(&(subnet_id, node_id)) else {
            return parent;
        };

        let parent = if entry.deleted_delegators.is_empty() {
            parent
        } else {
            let deleted = &entry.deleted_delegators;
            parent.exclude(move |staker| deleted.contains_key(&staker.tx_id))
        };
        let added = if entry.added_delegators.is_empty() {
            StakerIterator::empty()
        } else {
            StakerIterator::new(entry.added_delegators.values().cloned())
        };
        parent.merge(added)
    }

    /// Fold every recorded change into `parent`.
    ///
    /// Every validator addition is checked against `parent` first, so a
    /// conflict leaves `parent` untouched. Removals are written before
    /// additions within each key. Keys are disjoint, so the order across
    /// keys does not matter.
    pub fn apply<W: StakerWriter + ?Sized>(&self, parent: &mut W) -> StakingResult<()> {
        // A removal for the same key clears whatever the parent added there.
        for entry in self.validator_diffs.values() {
            if let (Some(added), None) = (&entry.added, &entry.deleted) {
                parent.check_put_validator(added)?;
            }
        }

        let mut validators = 0usize;
        let mut delegators = 0usize;

        for entry in self.validator_diffs.values() {
            if let Some(deleted) = &entry.deleted {
                parent.delete_validator(deleted);
                validators += 1;
            }
            if let Some(added) = &entry.added {
                parent.put_validator(added.clone())?;
                validators += 1;
            }
            for deleted in entry.deleted_delegators.values() {
                parent.delete_delegator(deleted);
                delegators += 1;
            }
            for added in entry.added_delegators.values() {
                parent.put_delegator(added.clone());
                delegators += 1;
            }
        }

        debug!(validators, delegators, "applied staker diff");
        Ok(())
    }

    /// Whether this diff records no net change
    pub fn is_empty(&self) -> bool {
        self.validator_diffs.is_empty()
    }
}

impl StakerWriter for DiffStakers {
    fn put_validator(&mut self, staker: Staker) -> StakingResult<()> {
        DiffStakers::put_validator(self, staker)
    }

    fn check_put_validator(&self, staker: &Staker) -> StakingResult<()> {
        DiffStakers::check_put_validator(self, staker)
    }

    fn delete_validator(&mut self, staker: &Staker) {
        DiffStakers::delete_validator(self, staker)
    }

    fn put_delegator(&mut self, staker: Staker) {
        DiffStakers::put_delegator(self, staker)
    }

    fn delete_delegator(&mut self, staker: &Staker) {
        DiffStakers::delete_delegator(self, staker)
    }
}

//! Flattened read view of a diff over its parent

use stakeset_core::{
    NodeId, Staker, StakerIterator, StakerReader, StakingError, StakingResult, SubnetId,
};

use crate::diff::{DiffLookup, DiffStakers};

/// Reads through `diff` first and falls back to `parent`.
///
/// The parent may itself be a `LayeredStakers`, so a chain of candidate
/// blocks reads as one staking set. Nothing is written through the view.
pub struct LayeredStakers<'a, P: StakerReader + ?Sized> {
    diff: &'a DiffStakers,
    parent: &'a P,
}

impl<'a, P: StakerReader + ?Sized> LayeredStakers<'a, P> {
    pub fn new(diff: &'a DiffStakers, parent: &'a P) -> Self {
        Self { diff, parent }
    }

    pub fn diff(&self) -> &'a DiffStakers {
        self.diff
    }
}

impl<P: StakerReader + ?Sized> StakerReader for LayeredStakers<'_, P> {
    fn get_validator(&self, subnet_id: SubnetId, node_id: NodeId) -> StakingResult<Staker> {
        match self.diff.get_validator(subnet_id, node_id) {
            DiffLookup::Added(staker) => Ok(staker.clone()),
            DiffLookup::Deleted => Err(StakingError::NotFound),
            DiffLookup::Unmodified => self.parent.get_validator(subnet_id, node_id),
        }
    }

    fn staker_iterator(&self) -> StakerIterator<'_> {
        self.diff.staker_iterator(self.parent.staker_iterator())
    }

    fn delegator_iterator(&self, subnet_id: SubnetId, node_id: NodeId) -> StakerIterator<'_> {
        self.diff.delegator_iterator(
            self.parent.delegator_iterator(subnet_id, node_id),
            subnet_id,
            node_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::BaseStakers;
    use crate::testing::{new_test_staker, staker_at};
    use stakeset_core::Priority;

    #[test]
    fn test_lookup_precedence() {
        let committed = new_test_staker();
        let removed = new_test_staker();
        let mut base = BaseStakers::new();
        base.put_validator(committed.clone());
        base.put_validator(removed.clone());

        let added = new_test_staker();
        let mut diff = DiffStakers::new();
        diff.put_validator(added.clone()).unwrap();
        diff.delete_validator(&removed);

        let view = LayeredStakers::new(&diff, &base);
        assert_eq!(view.get_validator(committed.subnet_id, committed.node_id).unwrap(), committed);
        assert_eq!(view.get_validator(added.subnet_id, added.node_id).unwrap(), added);
        assert!(view.get_validator(removed.subnet_id, removed.node_id).unwrap_err().is_not_found());

        // the base store is untouched
        assert!(base.get_validator(removed.subnet_id, removed.node_id).is_ok());
        assert!(base.get_validator(added.subnet_id, added.node_id).is_err());
    }

    #[test]
    fn test_nested_diffs() {
        let first = staker_at(100, Priority::PrimaryNetworkValidatorCurrent);
        let second = staker_at(200, Priority::PrimaryNetworkValidatorCurrent);
        let third = staker_at(150, Priority::PrimaryNetworkValidatorCurrent);

        let mut base = BaseStakers::new();
        base.put_validator(first.clone());
        base.put_validator(second.clone());

        let mut outer = DiffStakers::new();
        outer.delete_validator(&first);
        let outer_view = LayeredStakers::new(&outer, &base);

        let mut inner = DiffStakers::new();
        inner.put_validator(third.clone()).unwrap();
        let inner_view = LayeredStakers::new(&inner, &outer_view);

        let order: Vec<Staker> = inner_view.staker_iterator().collect();
        assert_eq!(order, vec![third.clone(), second.clone()]);
        assert!(inner_view.get_validator(first.subnet_id, first.node_id).is_err());
        assert_eq!(inner_view.get_validator(second.subnet_id, second.node_id).unwrap(), second);

        // competing sibling branch sees none of the inner changes
        let sibling = DiffStakers::new();
        let sibling_view = LayeredStakers::new(&sibling, &outer_view);
        let order: Vec<Staker> = sibling_view.staker_iterator().collect();
        assert_eq!(order, vec![second]);
    }

    #[test]
    fn test_delegators_through_view() {
        let validator = new_test_staker();
        let mut base_delegator = staker_at(10, Priority::PrimaryNetworkDelegatorCurrent);
        base_delegator.subnet_id = validator.subnet_id;
        base_delegator.node_id = validator.node_id;
        let mut diff_delegator = staker_at(20, Priority::PrimaryNetworkDelegatorCurrent);
        diff_delegator.subnet_id = validator.subnet_id;
        diff_delegator.node_id = validator.node_id;

        let mut base = BaseStakers::new();
        base.put_validator(validator.clone());
        base.put_delegator(base_delegator.clone());

        let mut diff = DiffStakers::new();
        diff.put_delegator(diff_delegator.clone());

        let view = LayeredStakers::new(&diff, &base);
        let delegators: Vec<Staker> = view
            .delegator_iterator(validator.subnet_id, validator.node_id)
            .collect();
        assert_eq!(delegators, vec![base_delegator, diff_delegator]);
    }
}

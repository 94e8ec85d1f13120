//! Core traits defining STAKESET interfaces
//!
//! Both the committed store and the diff overlay expose the same mutation
//! contract; readable layers expose the same lookup and iteration contract.

use crate::iterator::StakerIterator;
use crate::staker::Staker;
use crate::types::{NodeId, SubnetId};

/// Result type for STAKESET operations
pub type StakingResult<T> = Result<T, crate::error::StakingError>;

/// Read access to a flattened staking set
pub trait StakerReader {
    /// Validator for `(subnet_id, node_id)`, or `StakingError::NotFound`.
    fn get_validator(&self, subnet_id: SubnetId, node_id: NodeId) -> StakingResult<Staker>;

    /// Every validator and delegator in schedule order.
    fn staker_iterator(&self) -> StakerIterator<'_>;

    /// Delegators of one validator entry in schedule order.
    fn delegator_iterator(&self, subnet_id: SubnetId, node_id: NodeId) -> StakerIterator<'_>;
}

/// Mutation access shared by every store layer
pub trait StakerWriter {
    /// Insert or overwrite the validator for the staker's key.
    fn put_validator(&mut self, staker: Staker) -> StakingResult<()>;

    /// Error `put_validator` would return for `staker` in the current
    /// state, without writing anything.
    fn check_put_validator(&self, _staker: &Staker) -> StakingResult<()> {
        Ok(())
    }

    /// Remove the validator for the staker's key. Absent keys are a no-op.
    fn delete_validator(&mut self, staker: &Staker);

    fn put_delegator(&mut self, staker: Staker);

    /// Remove the delegator. Absent delegators are a no-op.
    fn delete_delegator(&mut self, staker: &Staker);
}

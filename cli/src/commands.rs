//! CLI Commands

use stakeset_core::{
    NodeId, ScheduleConfig, Staker, StakerReader, StakingError, StakingResult, SubnetId,
};
use stakeset_state::{BaseStakers, DiffStakers, LayeredStakers};

/// Run `f` against the committed set, or against `pending` layered over it.
pub fn with_view<T>(
    base: &BaseStakers,
    pending: Option<&DiffStakers>,
    f: impl FnOnce(&dyn StakerReader) -> T,
) -> T {
    match pending {
        Some(diff) => f(&LayeredStakers::new(diff, base)),
        None => f(base),
    }
}

/// Next stakers to transition, in processing order.
pub fn schedule(reader: &dyn StakerReader, config: &ScheduleConfig) -> Vec<Staker> {
    let mut iter = reader.staker_iterator();
    let stakers = iter
        .by_ref()
        .filter(|staker| config.include_delegators || staker.priority.is_validator())
        .take(config.limit)
        .collect();
    iter.release();
    stakers
}

/// Validator lookup; `Ok(None)` when the key has no validator.
pub fn lookup_validator(
    reader: &dyn StakerReader,
    subnet_id: SubnetId,
    node_id: NodeId,
) -> StakingResult<Option<Staker>> {
    match reader.get_validator(subnet_id, node_id) {
        Ok(staker) => Ok(Some(staker)),
        Err(StakingError::NotFound) => Ok(None),
        Err(err) => Err(err),
    }
}

pub fn delegators(reader: &dyn StakerReader, subnet_id: SubnetId, node_id: NodeId) -> Vec<Staker> {
    reader.delegator_iterator(subnet_id, node_id).collect()
}

/// Fold `pending` into `base`.
pub fn apply(base: &mut BaseStakers, pending: &DiffStakers) -> StakingResult<()> {
    pending.apply(base)
}

pub fn format_staker(staker: &Staker) -> String {
    format!(
        "{}  {:<40} subnet={} {} tx={} weight={}",
        staker.next_time,
        format!("{:?}", staker.priority),
        staker.subnet_id,
        staker.node_id,
        staker.tx_id,
        staker.weight,
    )
}

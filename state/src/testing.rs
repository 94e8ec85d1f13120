//! Test fixtures shared by the store tests

use stakeset_core::{Id, NodeId, Priority, Staker, StakerIterator, Timestamp};

/// Default staking period of generated stakers: 28 days
pub const DEFAULT_VALIDATOR_DURATION: u64 = 28 * 24 * 60 * 60;

pub fn new_test_staker() -> Staker {
    let start_time = Timestamp::now();
    let end_time = start_time.saturating_add_secs(DEFAULT_VALIDATOR_DURATION);
    Staker {
        tx_id: Id::generate(),
        node_id: NodeId::generate(),
        subnet_id: Id::generate(),
        weight: 1,
        start_time,
        end_time,
        potential_reward: 1,
        next_time: end_time,
        priority: Priority::PrimaryNetworkDelegatorCurrent,
    }
}

/// Staker with a fixed `next_time`, for ordering checks
pub fn staker_at(next_time: u64, priority: Priority) -> Staker {
    Staker {
        next_time: Timestamp::from_secs(next_time),
        priority,
        ..new_test_staker()
    }
}

#[track_caller]
pub fn assert_iterators_equal(mut expected: StakerIterator<'_>, mut actual: StakerIterator<'_>) {
    for expected_staker in expected.by_ref() {
        let actual_staker = actual.next();
        assert_eq!(Some(expected_staker), actual_staker);
    }
    assert_eq!(None, actual.next());

    expected.release();
    actual.release();
}

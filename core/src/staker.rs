//! Staker entity and its scheduling order

use crate::types::{NodeId, SubnetId, Timestamp, TxId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Tie-break rank for stakers sharing a `next_time`.
///
/// Declaration order is the processing order: pending stakers start before
/// current stakers stop, and within each phase delegators of a validator are
/// handled before the validator itself is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    PrimaryNetworkDelegatorApricotPending,
    PrimaryNetworkValidatorPending,
    PrimaryNetworkDelegatorBanffPending,
    SubnetPermissionlessValidatorPending,
    SubnetPermissionlessDelegatorPending,
    SubnetPermissionedValidatorPending,

    SubnetPermissionedValidatorCurrent,
    SubnetPermissionlessDelegatorCurrent,
    SubnetPermissionlessValidatorCurrent,
    PrimaryNetworkDelegatorCurrent,
    PrimaryNetworkValidatorCurrent,
}

impl Priority {
    pub fn is_pending(&self) -> bool {
        *self <= Priority::SubnetPermissionedValidatorPending
    }

    pub fn is_current(&self) -> bool {
        !self.is_pending()
    }

    pub fn is_delegator(&self) -> bool {
        matches!(
            self,
            Priority::PrimaryNetworkDelegatorApricotPending
                | Priority::PrimaryNetworkDelegatorBanffPending
                | Priority::SubnetPermissionlessDelegatorPending
                | Priority::SubnetPermissionlessDelegatorCurrent
                | Priority::PrimaryNetworkDelegatorCurrent
        )
    }

    pub fn is_validator(&self) -> bool {
        !self.is_delegator()
    }
}

/// Sort key of a staker: `(next_time, priority, tx_id)` ascending.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StakerKey {
    pub next_time: Timestamp,
    pub priority: Priority,
    pub tx_id: TxId,
}

/// Staking transaction fields needed to derive a [`Staker`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakerTx {
    pub node_id: NodeId,
    pub subnet_id: SubnetId,
    pub weight: u64,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub pending_priority: Priority,
    pub current_priority: Priority,
}

/// One staking commitment, either a validator or a delegator.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Staker {
    pub tx_id: TxId,
    pub node_id: NodeId,
    pub subnet_id: SubnetId,
    pub weight: u64,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub potential_reward: u64,

    /// Time of the next state transition: end of the period for current
    /// stakers, start of the period for pending ones.
    pub next_time: Timestamp,
    pub priority: Priority,
}

impl Staker {
    /// Staker that is currently staking and will be removed at `end_time`.
    pub fn new_current(tx_id: TxId, tx: &StakerTx, potential_reward: u64) -> Self {
        Self {
            tx_id,
            node_id: tx.node_id,
            subnet_id: tx.subnet_id,
            weight: tx.weight,
            start_time: tx.start_time,
            end_time: tx.end_time,
            potential_reward,
            next_time: tx.end_time,
            priority: tx.current_priority,
        }
    }

    /// Staker waiting to start at `start_time`.
    pub fn new_pending(tx_id: TxId, tx: &StakerTx) -> Self {
        Self {
            tx_id,
            node_id: tx.node_id,
            subnet_id: tx.subnet_id,
            weight: tx.weight,
            start_time: tx.start_time,
            end_time: tx.end_time,
            potential_reward: 0,
            next_time: tx.start_time,
            priority: tx.pending_priority,
        }
    }

    pub fn key(&self) -> StakerKey {
        StakerKey {
            next_time: self.next_time,
            priority: self.priority,
            tx_id: self.tx_id,
        }
    }

    /// `(subnet_id, node_id)` of the validator entry this staker belongs to
    pub fn validator_key(&self) -> (SubnetId, NodeId) {
        (self.subnet_id, self.node_id)
    }

    pub fn cmp_schedule(&self, other: &Staker) -> Ordering {
        self.key().cmp(&other.key())
    }

    /// Whether `self` transitions strictly before `other`
    pub fn less(&self, other: &Staker) -> bool {
        self.cmp_schedule(other) == Ordering::Less
    }
}

impl fmt::Debug for Staker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Staker")
            .field("tx_id", &self.tx_id)
            .field("node_id", &self.node_id)
            .field("subnet_id", &self.subnet_id)
            .field("weight", &self.weight)
            .field("next_time", &self.next_time.0)
            .field("priority", &self.priority)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Id, PRIMARY_NETWORK_ID};

    fn tx() -> StakerTx {
        StakerTx {
            node_id: NodeId::generate(),
            subnet_id: PRIMARY_NETWORK_ID,
            weight: 2_000,
            start_time: Timestamp::from_secs(100),
            end_time: Timestamp::from_secs(200),
            pending_priority: Priority::PrimaryNetworkValidatorPending,
            current_priority: Priority::PrimaryNetworkValidatorCurrent,
        }
    }

    #[test]
    fn test_current_and_pending_next_time() {
        let tx = tx();
        let current = Staker::new_current(Id::generate(), &tx, 7);
        assert_eq!(current.next_time, tx.end_time);
        assert_eq!(current.priority, Priority::PrimaryNetworkValidatorCurrent);
        assert_eq!(current.potential_reward, 7);

        let pending = Staker::new_pending(Id::generate(), &tx);
        assert_eq!(pending.next_time, tx.start_time);
        assert_eq!(pending.priority, Priority::PrimaryNetworkValidatorPending);
        assert_eq!(pending.potential_reward, 0);
    }

    #[test]
    fn test_order_time_then_priority_then_tx_id() {
        let tx = tx();
        let mut a = Staker::new_current(Id([1u8; 32]), &tx, 0);
        let mut b = Staker::new_current(Id([2u8; 32]), &tx, 0);

        // same time and priority: tx id decides
        assert!(a.less(&b));
        assert!(!b.less(&a));

        b.priority = Priority::PrimaryNetworkDelegatorCurrent;
        assert!(b.less(&a));

        a.next_time = Timestamp::from_secs(50);
        assert!(a.less(&b));
        assert!(!a.less(&a));
    }

    #[test]
    fn test_priority_ladder() {
        use Priority::*;

        assert!(PrimaryNetworkDelegatorApricotPending < PrimaryNetworkValidatorPending);
        assert!(SubnetPermissionedValidatorPending < SubnetPermissionedValidatorCurrent);
        assert!(PrimaryNetworkDelegatorCurrent < PrimaryNetworkValidatorCurrent);

        assert!(Priority::SubnetPermissionedValidatorPending.is_pending());
        assert!(Priority::SubnetPermissionedValidatorCurrent.is_current());
        assert!(Priority::PrimaryNetworkDelegatorCurrent.is_delegator());
        assert!(Priority::SubnetPermissionlessValidatorCurrent.is_validator());
    }

    #[test]
    fn test_staker_json() {
        let staker = Staker::new_current(Id::generate(), &tx(), 1);
        let json = serde_json::to_string(&staker).unwrap();
        assert!(json.contains("\"primary_network_validator_current\""));
        let back: Staker = serde_json::from_str(&json).unwrap();
        assert_eq!(back, staker);
    }
}

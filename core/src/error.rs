//! Error types for STAKESET

use crate::types::{NodeId, SubnetId, TxId};
use thiserror::Error;

/// Main error type for STAKESET
#[derive(Error, Debug)]
pub enum StakingError {
    // ============ Lookup Errors ============
    #[error("not found")]
    NotFound,

    // ============ Diff Errors ============
    #[error(
        "conflicting validator for subnet {subnet_id} node {node_id}: \
         {existing} already added, refusing {incoming}"
    )]
    ConflictingValidator {
        subnet_id: SubnetId,
        node_id: NodeId,
        existing: TxId,
        incoming: TxId,
    },

    // ============ Configuration Errors ============
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl StakingError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StakingError::NotFound)
    }
}

impl From<std::io::Error> for StakingError {
    fn from(err: std::io::Error) -> Self {
        StakingError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StakingError {
    fn from(err: serde_json::Error) -> Self {
        StakingError::Serialization(err.to_string())
    }
}

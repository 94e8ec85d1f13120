//! JSON inputs of the staking tool

use serde::{Deserialize, Serialize};
use stakeset_core::{Staker, StakingResult};
use stakeset_state::{BaseStakers, DiffStakers};
use std::path::Path;
use tracing::info;

/// Committed staking set as stored on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StateFile {
    pub validators: Vec<Staker>,
    pub delegators: Vec<Staker>,
}

impl StateFile {
    pub fn load<P: AsRef<Path>>(path: P) -> StakingResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let file: Self = serde_json::from_str(&content)?;
        info!(
            path = %path.as_ref().display(),
            validators = file.validators.len(),
            delegators = file.delegators.len(),
            "loaded staking state"
        );
        Ok(file)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> StakingResult<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn to_base(&self) -> BaseStakers {
        let mut base = BaseStakers::new();
        for validator in &self.validators {
            base.put_validator(validator.clone());
        }
        for delegator in &self.delegators {
            base.put_delegator(delegator.clone());
        }
        base
    }

    /// Snapshot of `base`, both lists in schedule order.
    pub fn from_base(base: &BaseStakers) -> Self {
        let mut file = Self::default();
        for staker in base.staker_iterator() {
            let is_validator = base
                .get_validator(staker.subnet_id, staker.node_id)
                .is_ok_and(|validator| validator.tx_id == staker.tx_id);
            if is_validator {
                file.validators.push(staker);
            } else {
                file.delegators.push(staker);
            }
        }
        file
    }
}

/// Pending changes of one candidate block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PendingFile {
    pub put_validators: Vec<Staker>,
    pub delete_validators: Vec<Staker>,
    pub put_delegators: Vec<Staker>,
    pub delete_delegators: Vec<Staker>,
}

impl PendingFile {
    pub fn load<P: AsRef<Path>>(path: P) -> StakingResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Record the changes in a fresh diff, in field order.
    pub fn to_diff(&self) -> StakingResult<DiffStakers> {
        let mut diff = DiffStakers::new();
        for staker in &self.put_validators {
            diff.put_validator(staker.clone())?;
        }
        for staker in &self.delete_validators {
            diff.delete_validator(staker);
        }
        for staker in &self.put_delegators {
            diff.put_delegator(staker.clone());
        }
        for staker in &self.delete_delegators {
            diff.delete_delegator(staker);
        }
        Ok(diff)
    }
}

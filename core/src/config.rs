//! Configuration types for STAKESET

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::StakingError;
use crate::traits::StakingResult;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StakesetConfig {
    /// Logging level
    pub log_level: String,

    /// Schedule output configuration
    pub schedule: ScheduleConfig,
}

impl Default for StakesetConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            schedule: ScheduleConfig::default(),
        }
    }
}

impl StakesetConfig {
    pub fn from_json(json: &str) -> StakingResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> StakingResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> StakingResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> StakingResult<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(StakingError::Config(format!(
                "unknown log level {:?}",
                self.log_level
            )));
        }
        if self.schedule.limit == 0 {
            return Err(StakingError::Config(
                "schedule.limit must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Schedule listing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Maximum number of stakers printed
    pub limit: usize,

    /// List delegators alongside validators
    pub include_delegators: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            limit: 20,
            include_delegators: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = StakesetConfig::from_json(r#"{ "schedule": { "limit": 5 } }"#).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.schedule.limit, 5);
        assert!(config.schedule.include_delegators);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            StakesetConfig::from_json(r#"{ "log_level": "loud" }"#),
            Err(StakingError::Config(_))
        ));
        assert!(matches!(
            StakesetConfig::from_json(r#"{ "schedule": { "limit": 0 } }"#),
            Err(StakingError::Config(_))
        ));
        assert!(matches!(
            StakesetConfig::from_json("not json"),
            Err(StakingError::Serialization(_))
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = StakesetConfig::default();
        let parsed = StakesetConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed.schedule.limit, config.schedule.limit);
    }
}

//! Walker configuration.

use super::error::ExecutionError;
use crate::transfer::{MemberAccessMode, TransferEngineBuilder};
use serde::{Deserialize, Serialize};

/// Limits and evaluation options for one symbolic execution.
///
/// Missing fields take their defaults when deserialized, so `{}` is a valid
/// configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Upper bound on how often any single block is entered
    pub max_block_visits: usize,

    /// Upper bound on program points evaluated across the whole run
    pub max_steps: usize,

    /// Member access evaluation; overrides the mode of the engine handed to
    /// the walker
    pub member_access: MemberAccessMode,
}

impl ExecutionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, ExecutionError> {
        serde_json::from_str(json).map_err(|e| ExecutionError::InvalidConfig(e.to_string()))
    }

    pub fn max_block_visits(mut self, visits: usize) -> Self {
        self.max_block_visits = visits;
        self
    }

    pub fn max_steps(mut self, steps: usize) -> Self {
        self.max_steps = steps;
        self
    }

    pub fn member_access(mut self, mode: MemberAccessMode) -> Self {
        self.member_access = mode;
        self
    }

    /// Engine builder preset with this configuration's evaluation options.
    pub fn engine_builder(&self) -> TransferEngineBuilder {
        TransferEngineBuilder::new().member_access(self.member_access)
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_block_visits: 1000,
            max_steps: 100_000,
            member_access: MemberAccessMode::Balanced,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_uses_defaults() {
        let config = ExecutionConfig::from_json("{}").unwrap();

        assert_eq!(config, ExecutionConfig::default());
        assert_eq!(config.max_block_visits, 1000);
        assert_eq!(config.max_steps, 100_000);
        assert_eq!(config.member_access, MemberAccessMode::Balanced);
    }

    #[test]
    fn json_overrides_fields() {
        let config =
            ExecutionConfig::from_json(r#"{"max_steps": 50, "member_access": "legacy"}"#).unwrap();

        assert_eq!(config.max_steps, 50);
        assert_eq!(config.max_block_visits, 1000);
        assert_eq!(config.member_access, MemberAccessMode::Legacy);
    }

    #[test]
    fn malformed_json_is_reported() {
        let result = ExecutionConfig::from_json(r#"{"max_steps": "many"}"#);

        assert!(matches!(result, Err(ExecutionError::InvalidConfig(_))));
    }

    #[test]
    fn engine_builder_carries_member_access() {
        let engine = ExecutionConfig::new()
            .member_access(MemberAccessMode::Legacy)
            .engine_builder()
            .build();

        assert_eq!(engine.member_access(), MemberAccessMode::Legacy);
    }
}

//! Serializable snapshots of analysis results.
//!
//! A snapshot freezes the execution history and exit states of one analysis
//! unit so a downstream check can run later, in another process, against the
//! exact states the walker produced.
//!
//! Values keep their identities across a round trip. Identities minted after
//! loading a snapshot in a fresh process may coincide with ones inside it, so
//! states from a loaded snapshot should be inspected, not extended.

use crate::core::{ExecutionHistory, ProgramState};
use crate::execution::ExecutionReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::SnapshotError;

/// Version identifier for snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable record of the states reached by one analysis unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: String,

    /// When snapshot was taken
    pub captured_at: DateTime<Utc>,

    /// Caller-chosen name, usually the analysed function
    pub label: String,

    /// Every state recorded during the walk
    pub history: ExecutionHistory,

    /// States that reached an exit block
    pub exit_states: Vec<ProgramState>,
}

impl StateSnapshot {
    pub fn new(
        label: impl Into<String>,
        history: ExecutionHistory,
        exit_states: Vec<ProgramState>,
    ) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            captured_at: Utc::now(),
            label: label.into(),
            history,
            exit_states,
        }
    }

    /// Snapshot the history and exit states of a finished walk.
    pub fn from_report(label: impl Into<String>, report: &ExecutionReport) -> Self {
        Self::new(label, report.history.clone(), report.exit_states.clone())
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    /// Deserialize from JSON, rejecting other format versions.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.check_version()
    }

    /// Serialize to a compact binary form.
    pub fn to_binary(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    /// Deserialize from the binary form, rejecting other format versions.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.check_version()
    }

    fn check_version(self) -> Result<Self, SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(self)
    }
}

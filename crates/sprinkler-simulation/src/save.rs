use serde::{Deserialize, Serialize};
use sprinkler_core::{EntityId, Timestep};

use crate::error::{SimError, SimResult};

/// One sprinkler in a world save: its id and durable record blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSprinkler {
    /// Entity id at save time.
    pub entity: EntityId,
    /// Serialized [`sprinkler_core::DurableRecord`].
    pub record: serde_json::Value,
}

/// World save file: clock position plus every sprinkler's durable record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    /// Tick counter at save time.
    pub tick: u64,
    /// World time at save time.
    pub now: Timestep,
    /// Saved sprinklers in id order.
    pub sprinklers: Vec<SavedSprinkler>,
}

impl SaveFile {
    /// Parse a save file from JSON.
    pub fn from_json(json: &str) -> SimResult<Self> {
        serde_json::from_str(json).map_err(|e| SimError::Core(e.into()))
    }

    /// Render the save file as pretty JSON.
    pub fn to_json(&self) -> SimResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SimError::Core(e.into()))
    }
}

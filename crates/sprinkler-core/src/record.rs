//! Persisted layouts for a sprinkler entity.
//!
//! Two independent paths exist. The transient record is written when an
//! entity is unloaded and read back when it is shown again in the same
//! session. The durable record goes into the world save file and is replayed
//! through full construction on load. Both travel as JSON blobs.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::geometry::{TileLocation, Vector3D};

/// Arguments needed to construct a sprinkler entity from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructPayload {
    /// Tile configuration code.
    pub tile: String,
    /// World cell of the sprinkler tile.
    pub location: TileLocation,
    /// Placement variant of the sprinkler tile.
    pub variant: u32,
    /// Entity position in the world.
    pub position: Vector3D,
}

/// State written on unload and read back on reload within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransientRecord {
    /// World cell of the sprinkler tile.
    pub location: TileLocation,
    /// Placement variant of the sprinkler tile.
    pub variant: u32,
    /// Tile position adjusted by the tile's vertical offset.
    pub bottom_offset: Vector3D,
    /// Tile configuration code.
    pub tile: String,
    /// Whether the entity is waiting for removal.
    pub done: bool,
    /// Last scheduler check. Absent in older saves, which reads as "never checked".
    #[serde(default)]
    pub last_check_tick: Option<i64>,
}

/// State written into the world save file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurableRecord {
    /// Replayed through construction on load.
    pub construct_data: ConstructPayload,
    /// Whether the entity is waiting for removal.
    pub done: bool,
    /// Tile position adjusted by the tile's vertical offset.
    pub bottom_offset: Vector3D,
}

/// Encode a record as a JSON blob.
pub fn to_blob<T: Serialize>(record: &T) -> CoreResult<serde_json::Value> {
    Ok(serde_json::to_value(record)?)
}

/// Decode a record from a JSON blob. Missing required fields fail the whole decode.
pub fn from_blob<T: DeserializeOwned>(blob: serde_json::Value) -> CoreResult<T> {
    Ok(serde_json::from_value(blob)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::CoreError;

    fn transient() -> TransientRecord {
        TransientRecord {
            location: TileLocation::new(3, 1, -4),
            variant: 1024,
            bottom_offset: Vector3D::new(3.0, 1.25, -4.0),
            tile: "sprinkler.basic".into(),
            done: false,
            last_check_tick: Some(7_500_000),
        }
    }

    #[test]
    fn transient_blob_round_trips() {
        let blob = to_blob(&transient()).unwrap();
        assert_eq!(blob["location"], json!([3, 1, -4]));
        let back: TransientRecord = from_blob(blob).unwrap();
        assert_eq!(back, transient());
    }

    #[test]
    fn missing_last_check_reads_as_never_checked() {
        let mut blob = to_blob(&transient()).unwrap();
        blob.as_object_mut().unwrap().remove("last_check_tick");
        let back: TransientRecord = from_blob(blob).unwrap();
        assert_eq!(back.last_check_tick, None);
        assert_eq!(back.variant, 1024);
    }

    #[test]
    fn missing_required_field_fails() {
        let mut blob = to_blob(&transient()).unwrap();
        blob.as_object_mut().unwrap().remove("done");
        let err = from_blob::<TransientRecord>(blob).unwrap_err();
        assert!(matches!(err, CoreError::Record(_)));
        assert!(err.to_string().contains("done"));
    }

    #[test]
    fn durable_requires_construct_data() {
        let blob = json!({ "done": false, "bottom_offset": [0.0, 0.0, 0.0] });
        assert!(from_blob::<DurableRecord>(blob).is_err());
    }
}

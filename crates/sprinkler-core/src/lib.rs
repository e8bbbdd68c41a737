//! Core types for sprinklers: footprints, tile configuration, and persisted records.
//!
//! This crate holds the pure data model that the simulation runtime schedules
//! over. Nothing here touches the clock or the random source; footprints are
//! built deterministically and records are plain serde structs that travel as
//! JSON blobs.

/// Sprinkler component configuration and the per-tile component registry.
pub mod component;
/// Entity identifiers allocated by the host world.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// Footprint shapes and the cell generator.
pub mod footprint;
/// Integer and floating-point world vectors.
pub mod geometry;
/// Persisted record layouts for the transient and durable save paths.
pub mod record;
/// Tiles and the tile configuration database.
pub mod tile;
/// Simulation time measured in microsecond timesteps.
pub mod timestep;

/// Re-export component configuration types.
pub use component::{ComponentSet, SprinklerComponent, TileConfiguration};
/// Re-export the entity identifier.
pub use entity::EntityId;
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export footprint types.
pub use footprint::{Footprint, FootprintShape, FootprintSpec};
/// Re-export vector types.
pub use geometry::{Offset, TileLocation, Vector3D};
/// Re-export record layouts.
pub use record::{ConstructPayload, DurableRecord, TransientRecord};
/// Re-export tile types.
pub use tile::{Tile, TileDatabase};
/// Re-export the timestep type.
pub use timestep::Timestep;

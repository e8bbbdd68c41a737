use sprinkler_core::{EntityId, Tile, TileLocation, Vector3D};

/// Behaviour object attached to a tile, as seen by a sprinkler.
pub trait TileStateLogic {
    /// The entity that owns this tile state.
    fn entity(&self) -> EntityId;

    /// Whether watering this tile has any effect (tilled dirt and similar).
    fn is_moisture_target(&self) -> bool;
}

/// Capabilities the host world exposes to sprinkler logic.
///
/// Lookups return `None` for cells that are unloaded or empty; callers treat
/// that as "nothing to do", never as an error.
pub trait UniverseFacade {
    /// The tile currently at `location`.
    fn read_tile(&self, location: TileLocation) -> Option<Tile>;

    /// Visual offset of the tile at `location`, if it has one.
    fn tile_offset(&self, location: TileLocation) -> Option<Vector3D>;

    /// The tile-state logic at `location`, if any.
    fn fetch_tile_logic(&self, location: TileLocation) -> Option<&dyn TileStateLogic>;

    /// Water the tile at `location` on behalf of `source`.
    fn apply_water(&mut self, source: EntityId, location: TileLocation);

    /// Play a named effect on `target`.
    fn trigger_effect(&mut self, target: EntityId, effect: &str);

    /// Schedule `id` for removal from the world.
    fn remove_entity(&mut self, id: EntityId);

    /// Reserve a fresh entity id.
    fn allocate_entity_id(&mut self) -> EntityId;
}

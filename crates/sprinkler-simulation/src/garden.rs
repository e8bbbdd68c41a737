use std::collections::HashMap;
use std::sync::Arc;

use sprinkler_core::{EntityId, Tile, TileConfiguration, TileLocation, Vector3D};

use crate::facade::{TileStateLogic, UniverseFacade};

/// Tile-state logic living in a garden cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileState {
    /// Tilled soil that accepts water.
    Plot {
        /// Owning entity.
        entity: EntityId,
        /// Number of times the plot has been watered.
        moisture: u32,
    },
    /// Anything else with a tile-state entity (fences, signs, ...).
    Decoration {
        /// Owning entity.
        entity: EntityId,
    },
}

impl TileStateLogic for TileState {
    fn entity(&self) -> EntityId {
        match self {
            Self::Plot { entity, .. } | Self::Decoration { entity } => *entity,
        }
    }

    fn is_moisture_target(&self) -> bool {
        matches!(self, Self::Plot { .. })
    }
}

/// In-memory host world: tiles, tile offsets, tile-state logic, and the
/// side effects sprinklers request.
#[derive(Debug, Default)]
pub struct Garden {
    tiles: HashMap<TileLocation, Tile>,
    offsets: HashMap<TileLocation, Vector3D>,
    states: HashMap<TileLocation, TileState>,
    effects: Vec<(EntityId, String)>,
    removals: Vec<EntityId>,
    next_id: u64,
}

impl Garden {
    /// Create an empty garden.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a tile at `location`, replacing whatever was there.
    pub fn place_tile(
        &mut self,
        location: TileLocation,
        configuration: Arc<TileConfiguration>,
        variant: u32,
    ) -> Tile {
        let tile = Tile::new(configuration, variant);
        self.tiles.insert(location, tile.clone());
        tile
    }

    /// Remove the tile at `location`.
    pub fn remove_tile(&mut self, location: TileLocation) -> Option<Tile> {
        self.tiles.remove(&location)
    }

    /// Make sure freshly allocated ids land above `id`.
    pub fn reserve_entity_ids(&mut self, id: EntityId) {
        self.next_id = self.next_id.max(id.0);
    }

    /// Give the tile at `location` a visual offset.
    pub fn set_tile_offset(&mut self, location: TileLocation, offset: Vector3D) {
        self.offsets.insert(location, offset);
    }

    /// Till a plot at `location`. Returns the plot's entity.
    pub fn add_plot(&mut self, location: TileLocation) -> EntityId {
        let entity = self.allocate_entity_id();
        self.states.insert(location, TileState::Plot { entity, moisture: 0 });
        entity
    }

    /// Place a non-waterable tile-state at `location`. Returns its entity.
    pub fn add_decoration(&mut self, location: TileLocation) -> EntityId {
        let entity = self.allocate_entity_id();
        self.states.insert(location, TileState::Decoration { entity });
        entity
    }

    /// How often the plot at `location` was watered, or `None` if there is no plot.
    pub fn moisture(&self, location: TileLocation) -> Option<u32> {
        match self.states.get(&location) {
            Some(TileState::Plot { moisture, .. }) => Some(*moisture),
            _ => None,
        }
    }

    /// Every plot and its watering count, sorted by location.
    pub fn plots(&self) -> Vec<(TileLocation, u32)> {
        let mut plots: Vec<_> = self
            .states
            .iter()
            .filter_map(|(loc, state)| match state {
                TileState::Plot { moisture, .. } => Some((*loc, *moisture)),
                TileState::Decoration { .. } => None,
            })
            .collect();
        plots.sort_by_key(|(loc, _)| (loc.x, loc.y, loc.z));
        plots
    }

    /// Effects triggered so far, in order.
    pub fn effects(&self) -> &[(EntityId, String)] {
        &self.effects
    }

    /// Entities whose removal was requested and not yet collected.
    pub fn pending_removals(&self) -> &[EntityId] {
        &self.removals
    }

    /// Collect and clear pending removals.
    pub fn take_removals(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.removals)
    }
}

impl UniverseFacade for Garden {
    fn read_tile(&self, location: TileLocation) -> Option<Tile> {
        self.tiles.get(&location).cloned()
    }

    fn tile_offset(&self, location: TileLocation) -> Option<Vector3D> {
        self.offsets.get(&location).copied()
    }

    fn fetch_tile_logic(&self, location: TileLocation) -> Option<&dyn TileStateLogic> {
        self.states
            .get(&location)
            .map(|state| state as &dyn TileStateLogic)
    }

    fn apply_water(&mut self, _source: EntityId, location: TileLocation) {
        if let Some(TileState::Plot { moisture, .. }) = self.states.get_mut(&location) {
            *moisture += 1;
        }
    }

    fn trigger_effect(&mut self, target: EntityId, effect: &str) {
        self.effects.push((target, effect.to_string()));
    }

    fn remove_entity(&mut self, id: EntityId) {
        if !self.removals.contains(&id) {
            self.removals.push(id);
        }
    }

    fn allocate_entity_id(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId(self.next_id)
    }
}

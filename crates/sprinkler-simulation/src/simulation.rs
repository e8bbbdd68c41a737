use log::{debug, info};
use sprinkler_core::{EntityId, Tile, TileDatabase, TileLocation, Timestep};

use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::context::SimContext;
use crate::error::{SimError, SimResult};
use crate::event::EventLog;
use crate::facade::UniverseFacade;
use crate::garden::Garden;
use crate::logic::SprinklerLogic;
use crate::random::{RandomSource, SeededRandom};
use crate::save::{SaveFile, SavedSprinkler};
use crate::sprinklers::SprinklerSystem;
use crate::system::System;

/// The top-level simulation orchestrator.
///
/// Owns the garden, clock, random source, event log, tile database, and
/// registered systems. A [`SprinklerSystem`] is always registered first.
/// Drives the tick loop and the unload, reload, save and load paths.
pub struct Simulation {
    garden: Garden,
    tiles: TileDatabase,
    clock: SimClock,
    rng: Box<dyn RandomSource>,
    events: EventLog,
    systems: Vec<Box<dyn System>>,
    initialized: bool,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("tick", &self.clock.tick())
            .field("now", &self.clock.now())
            .field("systems", &self.systems.len())
            .field("events", &self.events.len())
            .finish()
    }
}

impl Simulation {
    /// Create a new simulation with a seeded random source.
    pub fn new(garden: Garden, tiles: TileDatabase, config: SimConfig) -> Self {
        let rng = Box::new(SeededRandom::new(config.seed));
        Self::with_random(garden, tiles, config, rng)
    }

    /// Create a new simulation drawing from `rng`.
    pub fn with_random(
        garden: Garden,
        tiles: TileDatabase,
        config: SimConfig,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let clock = SimClock::new(config.start, config.step, config.day_length);
        let events = EventLog::new(config.max_events);
        Self {
            garden,
            tiles,
            clock,
            rng,
            events,
            systems: vec![Box::new(SprinklerSystem::new())],
            initialized: false,
        }
    }

    /// Register a system. Systems are ticked in registration order.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    /// Initialize all registered systems.
    pub fn init(&mut self) -> SimResult<()> {
        if self.initialized {
            return Ok(());
        }
        for i in 0..self.systems.len() {
            let mut system = std::mem::replace(&mut self.systems[i], Box::new(NoopSystem));
            let mut ctx = SimContext {
                universe: &mut self.garden,
                clock: &self.clock,
                events: &mut self.events,
                rng: self.rng.as_mut(),
            };
            system.init(&mut ctx)?;
            self.systems[i] = system;
        }
        self.initialized = true;
        Ok(())
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self) -> SimResult<()> {
        if !self.initialized {
            self.init()?;
        }

        self.clock.advance();

        for i in 0..self.systems.len() {
            let mut system = std::mem::replace(&mut self.systems[i], Box::new(NoopSystem));
            let mut ctx = SimContext {
                universe: &mut self.garden,
                clock: &self.clock,
                events: &mut self.events,
                rng: self.rng.as_mut(),
            };
            let result = system.tick(&mut ctx);
            self.systems[i] = system;
            result?;
        }

        let removed = self.garden.take_removals();
        if !removed.is_empty() {
            debug!("host removed {} entities at tick {}", removed.len(), self.clock.tick());
        }
        Ok(())
    }

    /// Advance the simulation by `n` ticks.
    pub fn run(&mut self, n: u64) -> SimResult<()> {
        for _ in 0..n {
            self.tick()?;
        }
        Ok(())
    }

    /// Let world time pass without ticking anything, as if the area was unloaded.
    pub fn skip(&mut self, duration: Timestep) {
        debug!("skipping {duration} of world time");
        self.clock.skip(duration);
    }

    /// Put a tile from the database into the garden.
    pub fn place_tile(
        &mut self,
        code: &str,
        location: TileLocation,
        variant: u32,
    ) -> SimResult<Tile> {
        let configuration = self.tiles.resolve(code)?;
        Ok(self.garden.place_tile(location, configuration, variant))
    }

    /// Place a sprinkler tile and spawn its entity.
    ///
    /// Fails without touching the garden when the tile has no sprinkler component.
    pub fn place_sprinkler(
        &mut self,
        code: &str,
        location: TileLocation,
        variant: u32,
    ) -> SimResult<EntityId> {
        self.tiles.resolve(code)?.sprinkler()?;
        let tile = self.place_tile(code, location, variant)?;
        let entity = self.garden.allocate_entity_id();
        let payload = SprinklerLogic::spawn_payload(&tile, location);
        let logic = SprinklerLogic::construct(entity, &payload, &self.tiles)?;
        info!("placed sprinkler {entity} ({code}) at {location}");
        sprinklers_mut(&mut self.systems)?.insert(logic);
        Ok(entity)
    }

    /// Unload a sprinkler into its transient stash.
    pub fn unload(&mut self, id: EntityId) -> SimResult<()> {
        sprinklers_mut(&mut self.systems)?.unload(id)
    }

    /// Reload a sprinkler from its transient stash.
    pub fn reload(&mut self, id: EntityId) -> SimResult<()> {
        sprinklers_mut(&mut self.systems)?.reload(id, &self.tiles)
    }

    /// Snapshot the clock and every sprinkler's durable record.
    pub fn save(&self) -> SimResult<SaveFile> {
        let sprinklers = self
            .sprinklers()?
            .persist_all(&self.tiles)?
            .into_iter()
            .map(|(entity, record)| SavedSprinkler { entity, record })
            .collect::<Vec<_>>();
        info!(
            "saved {} sprinklers at tick {}",
            sprinklers.len(),
            self.clock.tick()
        );
        Ok(SaveFile {
            tick: self.clock.tick(),
            now: self.clock.now(),
            sprinklers,
        })
    }

    /// Replace all sprinklers and the clock position with a save file's.
    ///
    /// The garden's tiles are left as they are. Returns the number of
    /// sprinklers loaded.
    pub fn load_save(&mut self, save: &SaveFile) -> SimResult<usize> {
        let records: Vec<_> = save
            .sprinklers
            .iter()
            .map(|saved| (saved.entity, saved.record.clone()))
            .collect();
        let loaded = sprinklers_mut(&mut self.systems)?.depersist_all(&records, &self.tiles)?;
        if let Some(highest) = records.iter().map(|(id, _)| *id).max() {
            self.garden.reserve_entity_ids(highest);
        }
        self.clock.resume_at(save.tick, save.now);
        info!("loaded {loaded} sprinklers, resuming at tick {}", save.tick);
        Ok(loaded)
    }

    /// The garden.
    pub fn garden(&self) -> &Garden {
        &self.garden
    }

    /// The garden, for placing plots and changing tiles between ticks.
    pub fn garden_mut(&mut self) -> &mut Garden {
        &mut self.garden
    }

    /// The tile database.
    pub fn tiles(&self) -> &TileDatabase {
        &self.tiles
    }

    /// The simulation clock.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Events recorded so far.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// The sprinkler system.
    pub fn sprinklers(&self) -> SimResult<&SprinklerSystem> {
        self.get_system::<SprinklerSystem>()
            .ok_or_else(|| SimError::SystemError("sprinkler system is not registered".into()))
    }

    /// Access a system by downcasting to a concrete type.
    pub fn get_system<T: System + 'static>(&self) -> Option<&T> {
        self.systems
            .iter()
            .find_map(|s| s.as_any().downcast_ref::<T>())
    }

    /// Current tick number.
    pub fn current_tick(&self) -> u64 {
        self.clock.tick()
    }
}

fn sprinklers_mut(systems: &mut [Box<dyn System>]) -> SimResult<&mut SprinklerSystem> {
    systems
        .iter_mut()
        .find_map(|s| s.as_any_mut().downcast_mut::<SprinklerSystem>())
        .ok_or_else(|| SimError::SystemError("sprinkler system is not registered".into()))
}

/// Placeholder system used during the swap-and-tick pattern.
#[derive(Debug)]
struct NoopSystem;

impl System for NoopSystem {
    fn name(&self) -> &str {
        "noop"
    }
    fn tick(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
        Ok(())
    }
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

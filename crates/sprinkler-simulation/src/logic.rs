//! Per-entity sprinkler state machine.
//!
//! A [`SprinklerLogic`] is attached to one sprinkler tile. The host drives it
//! through three phases per tick (`pre_update`, `update`, `post_update`) and
//! moves it through two persistence paths: [`SprinklerLogic::store`] /
//! [`SprinklerLogic::restore`] when an area unloads and reloads within a
//! session, and [`SprinklerLogic::persist`] / [`SprinklerLogic::depersist`]
//! for the world save file.
//!
//! The two paths differ on purpose: a transient restore keeps the last check
//! time, so a reloaded sprinkler catches up immediately, while a durable
//! restore replays construction and always gets the one-tick grace period.

use std::sync::Arc;

use log::{debug, warn};
use sprinkler_core::{
    ConstructPayload, CoreResult, DurableRecord, EntityId, Footprint, Offset, SprinklerComponent,
    Tile, TileConfiguration, TileDatabase, TileLocation, Timestep, TransientRecord, Vector3D,
};

use crate::context::SimContext;
use crate::dispatcher::{self, Dispatch};
use crate::event::{SimEvent, SimEventKind};
use crate::facade::UniverseFacade;
use crate::invoker::{self, WaterOutcome};
use crate::scheduler::{self, Cadence, SchedulerState};

/// Water particle emitter owned by a sprinkler. Rebuilt from configuration on
/// construction and restore, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSource {
    /// Particle effect code; empty when the sprinkler emits nothing.
    pub effect: String,
    /// Where the emitter sits in the world.
    pub anchor: Vector3D,
}

/// Scheduling and persistence state for one sprinkler entity.
#[derive(Debug, Clone)]
pub struct SprinklerLogic {
    entity: EntityId,
    position: Vector3D,
    location: TileLocation,
    variant: u32,
    configuration: Arc<TileConfiguration>,
    component: SprinklerComponent,
    bottom_offset: Vector3D,
    footprint: Footprint,
    state: SchedulerState,
    particles: ParticleSource,
    stored: Option<TransientRecord>,
}

impl SprinklerLogic {
    /// Construction arguments for a sprinkler spawned on `tile` at `location`.
    pub fn spawn_payload(tile: &Tile, location: TileLocation) -> ConstructPayload {
        ConstructPayload {
            tile: tile.code().to_string(),
            location,
            variant: tile.variant,
            position: location.tile_center(),
        }
    }

    /// Build a sprinkler from scratch.
    ///
    /// Fails when the tile code is unknown or the tile has no sprinkler
    /// component; such an entity must never be scheduled.
    pub fn construct(
        entity: EntityId,
        payload: &ConstructPayload,
        tiles: &TileDatabase,
    ) -> CoreResult<Self> {
        let configuration = tiles.resolve(&payload.tile)?;
        let component = configuration.sprinkler()?.clone();
        let footprint = Footprint::build(&component.footprint_spec(payload.variant));
        let state = SchedulerState::fresh(footprint.len());
        let particles = ParticleSource {
            effect: component.sprinkler_effect.clone(),
            anchor: payload.location.tile_center(),
        };
        debug!(
            "constructed sprinkler {entity} at {} with {} cells",
            payload.location,
            footprint.len()
        );
        Ok(Self {
            entity,
            position: payload.position,
            location: payload.location,
            variant: payload.variant,
            configuration,
            component,
            bottom_offset: payload.location.to_vector3d(),
            footprint,
            state,
            particles,
            stored: None,
        })
    }

    /// First phase: a never-checked schedule starts now, so this tick cannot water.
    pub fn pre_update(&mut self, now: Timestep) {
        self.state.prime(now);
    }

    /// Second phase: validate the tile, then run the day and interval schedules.
    pub fn update(&mut self, ctx: &mut SimContext<'_>) {
        if self.state.done {
            return;
        }
        // The tile can already be gone while its entity lingers.
        let Some(tile) = ctx.universe.read_tile(self.location) else {
            return;
        };
        if !tile.matches(&self.configuration, self.variant) {
            warn!(
                "sprinkler {} lost its tile at {}, scheduling removal",
                self.entity, self.location
            );
            self.state.done = true;
            return;
        }

        self.bottom_offset = self.location.to_vector3d();
        if let Some(offset) = ctx.universe.tile_offset(self.location) {
            self.bottom_offset.y += offset.y;
        }
        self.particles.anchor = self.particle_anchor();

        let now = ctx.now();
        let day = ctx.day();
        let tick = ctx.tick();
        let entity = self.entity;
        let origin = self.location + self.component.offset;
        let effect = self.component.watered_plot_effect.as_str();
        let cadence = Cadence::of(&self.component);

        let universe: &mut dyn UniverseFacade = &mut *ctx.universe;
        let events = &mut *ctx.events;
        let rng = &mut *ctx.rng;

        let mut act = |cell: Offset, silent: bool| {
            let target = origin.offset_by(cell);
            let WaterOutcome::Watered {
                plot,
                effect_triggered,
            } = invoker::water_cell(&mut *universe, entity, target, silent, effect)
            else {
                return;
            };
            events.push(SimEvent::new(
                tick,
                SimEventKind::Watered {
                    sprinkler: entity,
                    plot,
                    cell: target,
                    visible: !silent,
                },
                format!("sprinkler {entity} watered {target}"),
            ));
            if effect_triggered {
                events.push(SimEvent::new(
                    tick,
                    SimEventKind::EffectTriggered {
                        target: plot,
                        effect: effect.to_string(),
                    },
                    format!("{effect} on plot {plot}"),
                ));
            }
        };

        let rolled_over =
            dispatcher::rollover(day, now, &self.footprint, &mut self.state, &mut act);

        let (count, last_check) =
            scheduler::elapsed_intervals(now, self.state.last_check, cadence.interval);
        self.state.last_check = Some(last_check);
        let outcome = dispatcher::dispatch(
            count,
            now,
            &mut self.footprint,
            &mut self.state,
            &cadence,
            rng,
            &mut act,
        );

        if rolled_over {
            debug!("sprinkler {entity} watered its whole footprint for day {day}");
            events.push(SimEvent::new(
                tick,
                SimEventKind::PeriodRollover {
                    sprinkler: entity,
                    day,
                },
                format!("sprinkler {entity} started day {day}"),
            ));
        }
        if count > 1 {
            debug!(
                "sprinkler {entity} caught up {count} intervals over {} cells",
                outcome.cells()
            );
            events.push(SimEvent::new(
                tick,
                SimEventKind::CatchUp {
                    sprinkler: entity,
                    intervals: count,
                    cells: outcome.cells(),
                },
                match outcome {
                    Dispatch::FullPass { .. } => {
                        format!("sprinkler {entity} missed {count} intervals, watered everything")
                    }
                    _ => format!("sprinkler {entity} missed {count} intervals"),
                },
            ));
        }
    }

    /// Third phase: request removal once the sprinkler is done. Returns true if requested.
    pub fn post_update(&mut self, universe: &mut dyn UniverseFacade) -> bool {
        if self.state.done {
            universe.remove_entity(self.entity);
        }
        self.state.done
    }

    /// The transient record for the current state.
    pub fn transient_record(&self) -> TransientRecord {
        TransientRecord {
            location: self.location,
            variant: self.variant,
            bottom_offset: self.bottom_offset,
            tile: self.configuration.code.clone(),
            done: self.state.done,
            last_check_tick: self.state.last_check.map(Timestep::ticks),
        }
    }

    /// Write the transient record into the entity's stash and return it.
    pub fn store(&mut self) -> &TransientRecord {
        let record = self.transient_record();
        self.stored.insert(record)
    }

    /// Rebuild a sprinkler from a transient record.
    ///
    /// Configuration, footprint and particles are resolved again from the tile
    /// code. The footprint index restarts at "reshuffle next", while the last
    /// check time carries over from the record.
    pub fn restore(
        entity: EntityId,
        position: Vector3D,
        record: &TransientRecord,
        tiles: &TileDatabase,
    ) -> CoreResult<Self> {
        let payload = ConstructPayload {
            tile: record.tile.clone(),
            location: record.location,
            variant: record.variant,
            position,
        };
        let mut logic = Self::construct(entity, &payload, tiles)?;
        logic.bottom_offset = record.bottom_offset;
        logic.state.done = record.done;
        logic.state.last_check = record.last_check_tick.map(Timestep);
        logic.stored = Some(record.clone());
        Ok(logic)
    }

    /// The durable record for the world save file.
    pub fn persist(&self) -> DurableRecord {
        DurableRecord {
            construct_data: ConstructPayload {
                tile: self.configuration.code.clone(),
                location: self.location,
                variant: self.variant,
                position: self.position,
            },
            done: self.state.done,
            bottom_offset: self.bottom_offset,
        }
    }

    /// Rebuild a sprinkler from the world save file.
    ///
    /// Replays construction, so the schedule is back to never-checked, then
    /// applies the saved flags and refreshes the transient stash.
    pub fn depersist(
        entity: EntityId,
        record: &DurableRecord,
        tiles: &TileDatabase,
    ) -> CoreResult<Self> {
        let mut logic = Self::construct(entity, &record.construct_data, tiles)?;
        logic.state.done = record.done;
        logic.bottom_offset = record.bottom_offset;
        logic.store();
        Ok(logic)
    }

    /// The entity this logic drives.
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Entity position in the world.
    pub fn position(&self) -> Vector3D {
        self.position
    }

    /// World cell of the sprinkler tile.
    pub fn location(&self) -> TileLocation {
        self.location
    }

    /// Placement variant of the sprinkler tile.
    pub fn variant(&self) -> u32 {
        self.variant
    }

    /// Tile configuration code.
    pub fn tile_code(&self) -> &str {
        &self.configuration.code
    }

    /// The resolved sprinkler component.
    pub fn component(&self) -> &SprinklerComponent {
        &self.component
    }

    /// Tile position adjusted by the tile's vertical offset.
    pub fn bottom_offset(&self) -> Vector3D {
        self.bottom_offset
    }

    /// The footprint in its current order.
    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    /// Scheduling state.
    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    /// Water particle emitter.
    pub fn particles(&self) -> &ParticleSource {
        &self.particles
    }

    /// The last transient record written by [`SprinklerLogic::store`].
    pub fn stored(&self) -> Option<&TransientRecord> {
        self.stored.as_ref()
    }

    /// True once the sprinkler is waiting for removal.
    pub fn is_done(&self) -> bool {
        self.state.done
    }

    /// A done sprinkler lingers until the host removes it.
    pub fn is_lingering(&self) -> bool {
        self.state.done
    }

    /// Centre of the sprinkler's visible body, where particles are emitted.
    pub fn particle_anchor(&self) -> Vector3D {
        self.bottom_offset + Vector3D::new(0.5, 0.5, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use sprinkler_core::record::{from_blob, to_blob};
    use sprinkler_core::{CoreError, TileConfiguration};

    use super::*;
    use crate::clock::SimClock;
    use crate::event::EventLog;
    use crate::garden::Garden;
    use crate::random::ScriptedRandom;

    const SECOND: i64 = Timestep::TICKS_PER_SECOND;
    const INTERVAL: i64 = 5 * SECOND;
    const HOME: TileLocation = TileLocation::new(0, 0, 0);

    struct Harness {
        garden: Garden,
        clock: SimClock,
        events: EventLog,
        rng: ScriptedRandom,
        tiles: TileDatabase,
        sprinkler_tile: Arc<TileConfiguration>,
    }

    impl Harness {
        fn new(day_length: i64) -> Self {
            let mut tiles = TileDatabase::new();
            let sprinkler_tile = tiles
                .insert(TileConfiguration::new("sprinkler").with_sprinkler(
                    SprinklerComponent {
                        random_check_time: 0.0,
                        watered_plot_effect: "splash".into(),
                        sprinkler_effect: "mist".into(),
                        ..Default::default()
                    },
                ))
                .unwrap();
            tiles.insert(TileConfiguration::new("fence")).unwrap();

            let mut garden = Garden::new();
            garden.place_tile(HOME, Arc::clone(&sprinkler_tile), 0);
            for x in -2..=2 {
                for z in -2..=2 {
                    garden.add_plot(TileLocation::new(x, -1, z));
                }
            }

            Self {
                garden,
                clock: SimClock::new(Timestep::ZERO, Timestep(SECOND), Timestep(day_length)),
                events: EventLog::new(0),
                rng: ScriptedRandom::new(),
                tiles,
                sprinkler_tile,
            }
        }

        fn spawn(&mut self) -> SprinklerLogic {
            let tile = self.garden.read_tile(HOME).unwrap();
            let payload = SprinklerLogic::spawn_payload(&tile, HOME);
            let id = self.garden.allocate_entity_id();
            SprinklerLogic::construct(id, &payload, &self.tiles).unwrap()
        }

        /// Jump to `at` and run all three phases once. Returns whether removal was requested.
        fn step_to(&mut self, logic: &mut SprinklerLogic, at: i64) -> bool {
            let delta = at - self.clock.now().ticks();
            self.clock.skip(Timestep(delta));
            logic.pre_update(self.clock.now());
            let mut ctx = SimContext {
                universe: &mut self.garden,
                clock: &self.clock,
                events: &mut self.events,
                rng: &mut self.rng,
            };
            logic.update(&mut ctx);
            logic.post_update(&mut self.garden)
        }

        fn waterings(&self, logic: &SprinklerLogic) -> (usize, usize) {
            self.events.waterings_by(logic.entity())
        }
    }

    #[test]
    fn construct_builds_footprint_and_sentinels() {
        let mut h = Harness::new(i64::MAX);
        let logic = h.spawn();
        assert_eq!(logic.footprint().len(), 13);
        assert_eq!(logic.state().current_index, 13);
        assert_eq!(logic.state().last_check, None);
        assert_eq!(logic.position(), Vector3D::new(0.5, 0.5, 0.5));
        assert_eq!(logic.particles().effect, "mist");
        assert!(!logic.is_done());
    }

    #[test]
    fn construct_refuses_tile_without_component() {
        let h = Harness::new(i64::MAX);
        let payload = ConstructPayload {
            tile: "fence".into(),
            location: HOME,
            variant: 0,
            position: HOME.tile_center(),
        };
        let err = SprinklerLogic::construct(EntityId(1), &payload, &h.tiles).unwrap_err();
        assert!(matches!(err, CoreError::MissingComponent { .. }));

        let payload = ConstructPayload {
            tile: "missing".into(),
            ..payload
        };
        assert!(matches!(
            SprinklerLogic::construct(EntityId(1), &payload, &h.tiles),
            Err(CoreError::UnknownTile(_))
        ));
    }

    #[test]
    fn variant_bit_rotates_footprint() {
        let mut tiles = TileDatabase::new();
        tiles
            .insert(TileConfiguration::new("long").with_sprinkler(SprinklerComponent {
                distance: (3, 1),
                is_curved: false,
                ..Default::default()
            }))
            .unwrap();
        let mut payload = ConstructPayload {
            tile: "long".into(),
            location: HOME,
            variant: 0,
            position: HOME.tile_center(),
        };
        let plain = SprinklerLogic::construct(EntityId(1), &payload, &tiles).unwrap();
        payload.variant = 1024;
        let swapped = SprinklerLogic::construct(EntityId(1), &payload, &tiles).unwrap();
        assert_eq!(plain.footprint().extents(), (1, 3));
        assert_eq!(swapped.footprint().extents(), (3, 1));
    }

    #[test]
    fn first_tick_never_waters() {
        let mut h = Harness::new(i64::MAX);
        let mut logic = h.spawn();
        // Placed long after the world started.
        h.step_to(&mut logic, 1_000 * SECOND);
        assert_eq!(h.waterings(&logic), (0, 0));
        assert_eq!(logic.state().last_check, Some(Timestep(1_000 * SECOND)));
    }

    #[test]
    fn scenario_single_then_full_catch_up() {
        let mut h = Harness::new(i64::MAX);
        let mut logic = h.spawn();

        h.step_to(&mut logic, 0);
        assert_eq!(h.waterings(&logic), (0, 0));

        h.step_to(&mut logic, INTERVAL);
        assert_eq!(h.waterings(&logic), (1, 0));
        assert_eq!(h.garden.effects().len(), 1);
        assert_eq!(h.rng.shuffles(), 1);

        h.step_to(&mut logic, 20 * INTERVAL);
        assert_eq!(h.waterings(&logic), (1, 13));
        // No new visual effects during the full pass.
        assert_eq!(h.garden.effects().len(), 1);
        assert_eq!(logic.state().current_index, 0);
        assert_eq!(logic.state().last_check, Some(Timestep(20 * INTERVAL)));
        assert!(h.events.events().iter().any(|e| matches!(
            e.kind,
            SimEventKind::CatchUp {
                intervals: 19,
                cells: 13,
                ..
            }
        )));
    }

    #[test]
    fn short_backlog_shows_only_last_watering() {
        let mut h = Harness::new(i64::MAX);
        let mut logic = h.spawn();
        h.step_to(&mut logic, 0);
        h.step_to(&mut logic, 4 * INTERVAL);
        assert_eq!(h.waterings(&logic), (1, 3));
        assert_eq!(h.garden.effects().len(), 1);
        assert_eq!(logic.state().current_index, 3);
    }

    #[test]
    fn cells_without_plots_are_skipped() {
        let mut h = Harness::new(i64::MAX);
        let mut garden = Garden::new();
        garden.place_tile(HOME, Arc::clone(&h.sprinkler_tile), 0);
        h.garden = garden;
        let mut logic = h.spawn();
        h.step_to(&mut logic, 0);
        h.step_to(&mut logic, 3 * INTERVAL);
        assert_eq!(h.waterings(&logic), (0, 0));
        assert!(!logic.is_done());
        assert_eq!(logic.state().current_index, 2);
    }

    #[test]
    fn day_rollover_waters_everything_then_resets_schedule() {
        let day = 100 * SECOND;
        let mut h = Harness::new(day);
        let mut logic = h.spawn();

        h.step_to(&mut logic, 4 * SECOND);
        assert_eq!(logic.state().last_period, Some(0));

        h.step_to(&mut logic, day + 2 * SECOND);
        assert_eq!(h.waterings(&logic), (0, 13));
        assert_eq!(logic.state().last_period, Some(1));
        assert_eq!(logic.state().last_check, Some(Timestep(day + 2 * SECOND)));
        assert!(h.events.events().iter().any(|e| matches!(
            e.kind,
            SimEventKind::PeriodRollover { day: 1, .. }
        )));

        // The interval schedule restarted at the rollover.
        h.step_to(&mut logic, day + 2 * SECOND + INTERVAL - 1);
        assert_eq!(h.waterings(&logic), (0, 13));
        h.step_to(&mut logic, day + 2 * SECOND + INTERVAL);
        assert_eq!(h.waterings(&logic), (1, 13));
    }

    #[test]
    fn tile_offset_lifts_bottom_offset() {
        let mut h = Harness::new(i64::MAX);
        h.garden.set_tile_offset(HOME, Vector3D::new(0.0, 0.25, 0.0));
        let mut logic = h.spawn();
        h.step_to(&mut logic, 0);
        assert_eq!(logic.bottom_offset(), Vector3D::new(0.0, 0.25, 0.0));
        assert_eq!(logic.particle_anchor(), Vector3D::new(0.5, 0.75, 0.5));
        assert_eq!(logic.particles().anchor, logic.particle_anchor());
    }

    #[test]
    fn missing_tile_is_ignored() {
        let mut h = Harness::new(i64::MAX);
        let mut logic = h.spawn();
        h.garden.remove_tile(HOME);
        assert!(!h.step_to(&mut logic, INTERVAL));
        assert!(!logic.is_done());
    }

    #[test]
    fn replaced_tile_marks_done_and_removes_in_post_update() {
        let mut h = Harness::new(i64::MAX);
        let mut logic = h.spawn();
        assert!(!h.step_to(&mut logic, 0));
        assert!(h.garden.pending_removals().is_empty());

        let fence = h.tiles.resolve("fence").unwrap();
        h.garden.place_tile(HOME, fence, 0);
        assert!(h.step_to(&mut logic, INTERVAL));
        assert!(logic.is_done());
        assert!(logic.is_lingering());
        assert_eq!(h.garden.pending_removals(), &[logic.entity()]);
        assert_eq!(h.waterings(&logic), (0, 0));
    }

    #[test]
    fn changed_variant_marks_done() {
        let mut h = Harness::new(i64::MAX);
        let mut logic = h.spawn();
        h.step_to(&mut logic, 0);
        h.garden
            .place_tile(HOME, Arc::clone(&h.sprinkler_tile), 1024);
        h.step_to(&mut logic, INTERVAL);
        assert!(logic.is_done());
    }

    #[test]
    fn transient_round_trip_keeps_last_check() {
        let mut h = Harness::new(i64::MAX);
        let mut logic = h.spawn();
        h.step_to(&mut logic, 0);
        h.step_to(&mut logic, INTERVAL);

        let blob = to_blob(logic.store()).unwrap();
        let record: TransientRecord = from_blob(blob).unwrap();
        assert_eq!(record.last_check_tick, Some(INTERVAL));

        let mut restored =
            SprinklerLogic::restore(logic.entity(), logic.position(), &record, &h.tiles).unwrap();
        assert_eq!(restored.location(), logic.location());
        assert_eq!(restored.variant(), logic.variant());
        assert_eq!(restored.bottom_offset(), logic.bottom_offset());
        assert_eq!(restored.is_done(), logic.is_done());
        assert_eq!(restored.state().current_index, restored.footprint().len());
        assert_eq!(restored.stored(), Some(&record));

        // No grace period: the first tick after reload already waters.
        h.step_to(&mut restored, 2 * INTERVAL);
        assert_eq!(h.waterings(&restored), (2, 0));
    }

    #[test]
    fn transient_record_without_check_restores_grace() {
        let mut h = Harness::new(i64::MAX);
        let mut logic = h.spawn();
        h.step_to(&mut logic, 0);
        let mut record = logic.transient_record();
        record.last_check_tick = None;

        let mut restored =
            SprinklerLogic::restore(logic.entity(), logic.position(), &record, &h.tiles).unwrap();
        h.step_to(&mut restored, 10 * INTERVAL);
        assert_eq!(h.waterings(&restored), (0, 0));
    }

    #[test]
    fn durable_round_trip_resets_grace() {
        let mut h = Harness::new(i64::MAX);
        h.garden.set_tile_offset(HOME, Vector3D::new(0.0, 0.5, 0.0));
        let mut logic = h.spawn();
        h.step_to(&mut logic, 0);
        h.step_to(&mut logic, INTERVAL);

        let blob = to_blob(&logic.persist()).unwrap();
        let record: DurableRecord = from_blob(blob).unwrap();
        let mut restored = SprinklerLogic::depersist(logic.entity(), &record, &h.tiles).unwrap();

        assert_eq!(restored.location(), logic.location());
        assert_eq!(restored.variant(), logic.variant());
        assert_eq!(restored.position(), logic.position());
        assert_eq!(restored.bottom_offset(), Vector3D::new(0.0, 0.5, 0.0));
        assert_eq!(restored.is_done(), logic.is_done());
        assert_eq!(restored.state().last_check, None);
        assert_eq!(restored.state().current_index, 13);
        assert_eq!(restored.stored().unwrap().last_check_tick, None);

        let before = h.waterings(&restored);
        h.step_to(&mut restored, 10 * INTERVAL);
        assert_eq!(h.waterings(&restored), before);
    }

    #[test]
    fn done_flag_survives_both_paths() {
        let mut h = Harness::new(i64::MAX);
        let mut logic = h.spawn();
        h.step_to(&mut logic, 0);
        let fence = h.tiles.resolve("fence").unwrap();
        h.garden.place_tile(HOME, fence, 0);
        h.step_to(&mut logic, SECOND);
        assert!(logic.is_done());

        let transient = logic.transient_record();
        let restored =
            SprinklerLogic::restore(logic.entity(), logic.position(), &transient, &h.tiles)
                .unwrap();
        assert!(restored.is_done());

        let durable = SprinklerLogic::depersist(logic.entity(), &logic.persist(), &h.tiles).unwrap();
        assert!(durable.is_done());
    }
}

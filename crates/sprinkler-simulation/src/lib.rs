//! Tick-based sprinkler simulation.
//!
//! Each sprinkler entity waters one footprint cell per jittered interval.
//! When the entity misses intervals (unloaded area, skipped time) it catches
//! up on the next tick: a short backlog steps through the footprint silently
//! and shows only the last watering, while a backlog as long as the footprint
//! collapses into one silent sweep. A day rollover always sweeps the whole
//! footprint.
//!
//! The host world is reached only through [`facade::UniverseFacade`];
//! [`garden::Garden`] is the in-memory host used by the orchestrator, the
//! CLI and the tests.

/// Simulation clock for tracking ticks, world time and days.
pub mod clock;
/// Configuration types for simulation runs.
pub mod config;
/// Mutable context passed to systems each tick.
pub mod context;
/// Catch-up dispatcher: turns elapsed intervals into cell actions.
pub mod dispatcher;
/// Error types for the simulation crate.
pub mod error;
/// Simulation event types and the event log.
pub mod event;
/// Capability traits the host world implements.
pub mod facade;
/// In-memory host world with tiles, plots and effects.
pub mod garden;
/// Action invoker: waters a single cell.
pub mod invoker;
/// Per-entity sprinkler lifecycle and persistence adapter.
pub mod logic;
/// Injectable random sources.
pub mod random;
/// World save file layout.
pub mod save;
/// Jittered interval scheduler.
pub mod scheduler;
/// Top-level simulation orchestrator.
pub mod simulation;
/// The system that drives every sprinkler entity.
pub mod sprinklers;
/// The trait that all simulation systems implement.
pub mod system;

/// Re-export of [`clock::SimClock`].
pub use clock::SimClock;
/// Re-export of [`config::SimConfig`].
pub use config::SimConfig;
/// Re-export of [`context::SimContext`].
pub use context::SimContext;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of [`event::EventLog`], [`event::SimEvent`], and [`event::SimEventKind`].
pub use event::{EventLog, SimEvent, SimEventKind};
/// Re-exports of [`facade::TileStateLogic`] and [`facade::UniverseFacade`].
pub use facade::{TileStateLogic, UniverseFacade};
/// Re-export of [`garden::Garden`].
pub use garden::Garden;
/// Re-export of [`logic::SprinklerLogic`].
pub use logic::SprinklerLogic;
/// Re-exports of [`random::RandomSource`], [`random::ScriptedRandom`], and [`random::SeededRandom`].
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
/// Re-exports of [`save::SaveFile`] and [`save::SavedSprinkler`].
pub use save::{SaveFile, SavedSprinkler};
/// Re-export of [`simulation::Simulation`].
pub use simulation::Simulation;
/// Re-export of [`sprinklers::SprinklerSystem`].
pub use sprinklers::SprinklerSystem;
/// Re-export of [`system::System`].
pub use system::System;

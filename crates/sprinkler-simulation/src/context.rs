use sprinkler_core::Timestep;

use crate::clock::SimClock;
use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::facade::UniverseFacade;
use crate::random::RandomSource;

/// Mutable context passed to each system during a tick.
pub struct SimContext<'a> {
    /// The host world.
    pub universe: &'a mut dyn UniverseFacade,
    /// The simulation clock, already advanced for this tick.
    pub clock: &'a SimClock,
    /// Event sink.
    pub events: &'a mut EventLog,
    /// Shared random source.
    pub rng: &'a mut dyn RandomSource,
}

impl SimContext<'_> {
    /// Emit a simulation event at the current tick.
    pub fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        self.events
            .push(SimEvent::new(self.clock.tick(), kind, description));
    }

    /// Current tick number.
    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Current world time.
    pub fn now(&self) -> Timestep {
        self.clock.now()
    }

    /// Current day counter.
    pub fn day(&self) -> i64 {
        self.clock.day()
    }
}

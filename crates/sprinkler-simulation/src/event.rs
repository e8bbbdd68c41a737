use sprinkler_core::{EntityId, TileLocation};

/// What kind of simulation event occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEventKind {
    // Watering
    /// A sprinkler watered a plot.
    Watered {
        /// The sprinkler that did the watering.
        sprinkler: EntityId,
        /// The plot's tile-state entity.
        plot: EntityId,
        /// World cell that was watered.
        cell: TileLocation,
        /// False for catch-up waterings that suppress the visual effect.
        visible: bool,
    },
    /// A watered-plot effect was triggered on a plot.
    EffectTriggered {
        /// The plot entity the effect plays on.
        target: EntityId,
        /// Effect identifier.
        effect: String,
    },

    // Scheduling
    /// More than one interval elapsed since the last check.
    CatchUp {
        /// The sprinkler catching up.
        sprinkler: EntityId,
        /// Whole intervals that elapsed.
        intervals: u64,
        /// Cells acted on to cover them.
        cells: usize,
    },
    /// The day counter advanced and the whole footprint was watered.
    PeriodRollover {
        /// The sprinkler doing the pass.
        sprinkler: EntityId,
        /// The new day.
        day: i64,
    },

    // Lifecycle
    /// A sprinkler lost its tile and was removed.
    Removed {
        /// The removed sprinkler.
        sprinkler: EntityId,
    },
}

impl SimEventKind {
    /// Check whether a given entity is involved in this event.
    pub fn involves(&self, id: EntityId) -> bool {
        match self {
            Self::Watered {
                sprinkler, plot, ..
            } => *sprinkler == id || *plot == id,
            Self::EffectTriggered { target, .. } => *target == id,
            Self::CatchUp { sprinkler, .. }
            | Self::PeriodRollover { sprinkler, .. }
            | Self::Removed { sprinkler } => *sprinkler == id,
        }
    }
}

/// A record of something that happened during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    /// The simulation tick when this event occurred.
    pub tick: u64,
    /// The specific kind of event that occurred.
    pub kind: SimEventKind,
    /// A human-readable description of the event.
    pub description: String,
}

impl SimEvent {
    /// Create a new simulation event with the given tick, kind, and description.
    pub fn new(tick: u64, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            description: description.into(),
        }
    }
}

/// Accumulates events during a simulation run.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all recorded events.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Return all events involving the given entity.
    pub fn events_for_entity(&self, id: EntityId) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.kind.involves(id)).collect()
    }

    /// Count waterings by a sprinkler, split into `(visible, silent)`.
    pub fn waterings_by(&self, sprinkler: EntityId) -> (usize, usize) {
        self.events
            .iter()
            .fold((0, 0), |(visible, silent), e| match &e.kind {
                SimEventKind::Watered {
                    sprinkler: s,
                    visible: v,
                    ..
                } if *s == sprinkler => {
                    if *v {
                        (visible + 1, silent)
                    } else {
                        (visible, silent + 1)
                    }
                }
                _ => (visible, silent),
            })
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

use sprinkler_core::Timestep;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for deterministic simulation.
    pub seed: u64,
    /// World time that passes per simulation tick.
    pub step: Timestep,
    /// Length of one in-world day.
    pub day_length: Timestep,
    /// World time when the simulation begins.
    pub start: Timestep,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            step: Timestep::from_seconds(0.05),
            day_length: Timestep::from_seconds(24.0 * 60.0),
            start: Timestep::ZERO,
            max_events: 0,
        }
    }
}

impl SimConfig {
    /// Set the RNG seed for deterministic simulation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the world time that passes per tick.
    pub fn with_step(mut self, step: Timestep) -> Self {
        self.step = step;
        self
    }

    /// Set the length of one in-world day.
    pub fn with_day_length(mut self, day_length: Timestep) -> Self {
        self.day_length = day_length;
        self
    }

    /// Set the world time when the simulation begins.
    pub fn with_start(mut self, start: Timestep) -> Self {
        self.start = start;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }
}

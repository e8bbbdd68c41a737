use sprinkler_core::{SprinklerComponent, Timestep};

use crate::random::RandomSource;

/// Mutable scheduling state owned by one sprinkler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerState {
    /// When the interval schedule was last advanced. `None` means never checked.
    pub last_check: Option<Timestep>,
    /// Position in the footprint. Equal to the footprint length right after
    /// construction or restore, which forces a reshuffle on the next step.
    pub current_index: usize,
    /// Last day counter observed, for the once-per-day full pass.
    pub last_period: Option<i64>,
    /// Set when the sprinkler's tile is gone; the entity is removed in post-update.
    pub done: bool,
}

impl SchedulerState {
    /// State for a freshly built footprint of `footprint_len` cells.
    pub fn fresh(footprint_len: usize) -> Self {
        Self {
            last_check: None,
            current_index: footprint_len,
            last_period: None,
            done: false,
        }
    }

    /// Fill the never-checked sentinel so the first tick after placement or
    /// load cannot water anything.
    pub fn prime(&mut self, now: Timestep) {
        if self.last_check.is_none() {
            self.last_check = Some(now);
        }
    }
}

/// Timing parameters of a sprinkler, in timesteps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    /// Time between two waterings. Always positive.
    pub interval: Timestep,
    /// Amplitude of the per-watering jitter.
    pub jitter: Timestep,
}

impl Cadence {
    /// Timing taken from a validated sprinkler component.
    pub fn of(component: &SprinklerComponent) -> Self {
        Self {
            interval: component.check_interval(),
            jitter: component.jitter(),
        }
    }

    /// Next check time: `now + floor(jitter * U)` with `U` uniform in `[-1, 1)`.
    pub fn jittered(&self, now: Timestep, rng: &mut dyn RandomSource) -> Timestep {
        let u = rng.next_double(-1.0, 1.0);
        now + (self.jitter.ticks() as f64 * u).floor() as i64
    }
}

/// Whole intervals elapsed since `last_check`, and the check time to carry forward.
///
/// A never-checked schedule reports zero and starts at `now`. Otherwise the
/// check time is returned untouched; the dispatcher advances it as it consumes
/// intervals. A check time pushed into the future by jitter reports zero.
pub fn elapsed_intervals(
    now: Timestep,
    last_check: Option<Timestep>,
    interval: Timestep,
) -> (u64, Timestep) {
    let Some(last) = last_check else {
        return (0, now);
    };
    if interval.ticks() <= 0 {
        return (0, last);
    }
    let elapsed = now - last;
    if elapsed < interval.ticks() {
        return (0, last);
    }
    ((elapsed / interval.ticks()) as u64, last)
}

use sprinkler_core::Timestep;

/// Tracks simulation time: a monotonic tick counter, the world timestep, and the day counter.
///
/// Days are fixed-length windows of world time counted from timestep zero,
/// so skipping time forward can jump several days at once.
#[derive(Debug, Clone)]
pub struct SimClock {
    tick: u64,
    now: Timestep,
    step: Timestep,
    day_length: Timestep,
}

impl SimClock {
    /// Create a new clock at tick 0 and world time `start`.
    pub fn new(start: Timestep, step: Timestep, day_length: Timestep) -> Self {
        Self {
            tick: 0,
            now: start,
            step,
            day_length,
        }
    }

    /// Advance the clock by one tick. Returns the new tick number.
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.now = self.now + self.step;
        self.tick
    }

    /// Move world time forward without counting a tick, as if the area was unloaded.
    pub fn skip(&mut self, duration: Timestep) {
        self.now = Timestep(self.now.ticks().saturating_add(duration.ticks()));
    }

    /// Put the clock back at a saved position.
    pub fn resume_at(&mut self, tick: u64, now: Timestep) {
        self.tick = tick;
        self.now = now;
    }

    /// Return the current tick number.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Current world time.
    pub fn now(&self) -> Timestep {
        self.now
    }

    /// Current day counter.
    pub fn day(&self) -> i64 {
        if self.day_length.ticks() <= 0 {
            return 0;
        }
        self.now.ticks().div_euclid(self.day_length.ticks())
    }

    /// Return the configured world time per tick.
    pub fn step(&self) -> Timestep {
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> SimClock {
        SimClock::new(Timestep::ZERO, Timestep(10), Timestep(100))
    }

    #[test]
    fn clock_initial_state() {
        let clock = clock();
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.now(), Timestep::ZERO);
        assert_eq!(clock.day(), 0);
    }

    #[test]
    fn clock_advance_increments() {
        let mut clock = clock();
        clock.advance();
        clock.advance();
        clock.advance();
        assert_eq!(clock.tick(), 3);
        assert_eq!(clock.now(), Timestep(30));
    }

    #[test]
    fn skip_moves_time_not_ticks() {
        let mut clock = clock();
        clock.skip(Timestep(250));
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.now(), Timestep(250));
        assert_eq!(clock.day(), 2);
    }

    #[test]
    fn skip_saturates_instead_of_overflowing() {
        let mut clock = clock();
        clock.skip(Timestep(250));
        clock.skip(Timestep(i64::MAX));
        assert_eq!(clock.now(), Timestep(i64::MAX));
    }

    #[test]
    fn resume_restores_position() {
        let mut clock = clock();
        clock.resume_at(7, Timestep(420));
        assert_eq!(clock.tick(), 7);
        assert_eq!(clock.day(), 4);
        assert_eq!(clock.advance(), 8);
        assert_eq!(clock.now(), Timestep(430));
    }

    #[test]
    fn day_rolls_over_on_boundary() {
        let mut clock = clock();
        for _ in 0..9 {
            clock.advance();
        }
        assert_eq!(clock.day(), 0);
        clock.advance();
        assert_eq!(clock.day(), 1);
    }
}

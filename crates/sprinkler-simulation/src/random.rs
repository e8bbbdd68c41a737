use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sprinkler_core::Offset;

/// Source of randomness for scheduling jitter and footprint reshuffles.
///
/// Passed explicitly to the scheduler so runs stay reproducible and tests can
/// script exact draws.
pub trait RandomSource {
    /// A uniform draw from `[lo, hi)`.
    fn next_double(&mut self, lo: f64, hi: f64) -> f64;

    /// Permute `cells` uniformly in place.
    fn shuffle(&mut self, cells: &mut [Offset]);
}

/// Seeded [`StdRng`]-backed source.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Create a source from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_double(&mut self, lo: f64, hi: f64) -> f64 {
        if lo >= hi {
            return lo;
        }
        self.rng.random_range(lo..hi)
    }

    fn shuffle(&mut self, cells: &mut [Offset]) {
        cells.shuffle(&mut self.rng);
    }
}

/// Deterministic source that replays queued draws and never reorders cells.
///
/// Once the queue is empty every draw returns the midpoint of the range,
/// which is zero jitter for the scheduler's `[-1, 1)` draws.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    draws: VecDeque<f64>,
    shuffles: usize,
}

impl ScriptedRandom {
    /// A source that always draws the midpoint.
    pub fn new() -> Self {
        Self::default()
    }

    /// A source that returns `draws` in order before falling back to the midpoint.
    pub fn with_draws(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            shuffles: 0,
        }
    }

    /// How many times a shuffle was requested.
    pub fn shuffles(&self) -> usize {
        self.shuffles
    }
}

impl RandomSource for ScriptedRandom {
    fn next_double(&mut self, lo: f64, hi: f64) -> f64 {
        self.draws.pop_front().unwrap_or((lo + hi) / 2.0)
    }

    fn shuffle(&mut self, _cells: &mut [Offset]) {
        self.shuffles += 1;
    }
}

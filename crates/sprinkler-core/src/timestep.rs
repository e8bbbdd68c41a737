use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Simulation time in microseconds since the world started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestep(pub i64);

impl Timestep {
    /// Number of timestep units in one second.
    pub const TICKS_PER_SECOND: i64 = 1_000_000;

    /// The world's first timestep.
    pub const ZERO: Self = Self(0);

    /// Convert a duration in seconds to timestep units, truncating toward zero.
    pub fn from_seconds(seconds: f64) -> Self {
        Self((seconds * Self::TICKS_PER_SECOND as f64) as i64)
    }

    /// Raw microsecond value.
    pub fn ticks(self) -> i64 {
        self.0
    }

    /// This timestep expressed in seconds.
    pub fn as_seconds(self) -> f64 {
        self.0 as f64 / Self::TICKS_PER_SECOND as f64
    }
}

impl Add<i64> for Timestep {
    type Output = Self;

    fn add(self, rhs: i64) -> Self {
        Self(self.0 + rhs)
    }
}

impl Add for Timestep {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Timestep {
    type Output = i64;

    fn sub(self, rhs: Self) -> i64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Timestep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}s", self.as_seconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_convert_to_micros() {
        assert_eq!(Timestep::from_seconds(5.0), Timestep(5_000_000));
        assert_eq!(Timestep::from_seconds(2.5), Timestep(2_500_000));
    }

    #[test]
    fn difference_is_signed() {
        assert_eq!(Timestep(10) - Timestep(25), -15);
        assert_eq!(Timestep(10) + 5, Timestep(15));
    }
}

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// An integer world cell. Serialized as `[x, y, z]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 3]", into = "[i32; 3]")]
pub struct TileLocation {
    /// East-west axis.
    pub x: i32,
    /// Vertical axis.
    pub y: i32,
    /// North-south axis.
    pub z: i32,
}

impl TileLocation {
    /// Create a location from its three coordinates.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Shift this location horizontally by a footprint offset.
    pub fn offset_by(self, offset: Offset) -> Self {
        Self::new(self.x + offset.x, self.y, self.z + offset.z)
    }

    /// The minimum corner of this cell as a floating-point vector.
    pub fn to_vector3d(self) -> Vector3D {
        Vector3D::new(f64::from(self.x), f64::from(self.y), f64::from(self.z))
    }

    /// The centre of this cell.
    pub fn tile_center(self) -> Vector3D {
        self.to_vector3d() + Vector3D::new(0.5, 0.5, 0.5)
    }
}

impl Add for TileLocation {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl From<[i32; 3]> for TileLocation {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<TileLocation> for [i32; 3] {
    fn from(loc: TileLocation) -> Self {
        [loc.x, loc.y, loc.z]
    }
}

impl fmt::Display for TileLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A horizontal offset `(dx, dz)` relative to a footprint origin. Serialized as `[x, z]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Offset {
    /// Offset along the world x axis.
    pub x: i32,
    /// Offset along the world z axis.
    pub z: i32,
}

impl Offset {
    /// Create an offset.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl From<[i32; 2]> for Offset {
    fn from([x, z]: [i32; 2]) -> Self {
        Self::new(x, z)
    }
}

impl From<Offset> for [i32; 2] {
    fn from(offset: Offset) -> Self {
        [offset.x, offset.z]
    }
}

/// A floating-point world vector. Serialized as `[x, y, z]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vector3D {
    /// East-west component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
    /// North-south component.
    pub z: f64,
}

impl Vector3D {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a vector from its components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl Add for Vector3D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl From<[f64; 3]> for Vector3D {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Vector3D> for [f64; 3] {
    fn from(v: Vector3D) -> Self {
        [v.x, v.y, v.z]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_keeps_height() {
        let loc = TileLocation::new(4, 7, -2).offset_by(Offset::new(-1, 3));
        assert_eq!(loc, TileLocation::new(3, 7, 1));
    }

    #[test]
    fn tile_center_is_half_step_in() {
        let center = TileLocation::new(1, 0, -1).tile_center();
        assert_eq!(center, Vector3D::new(1.5, 0.5, -0.5));
    }

    #[test]
    fn location_serializes_as_triple() {
        let json = serde_json::to_string(&TileLocation::new(1, -2, 3)).unwrap();
        assert_eq!(json, "[1,-2,3]");
        let back: TileLocation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TileLocation::new(1, -2, 3));
    }
}

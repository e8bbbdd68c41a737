use serde::{Deserialize, Serialize};

use crate::geometry::Offset;

/// Placement variant bit that swaps which radius runs along which world axis.
pub const AXIS_SWAP_BIT: u32 = 10;

/// Outline of the area a sprinkler covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FootprintShape {
    /// Closed ellipse inscribed in the radius box.
    Ellipse,
    /// The full radius box.
    Rectangle,
}

/// Inputs that fully determine a footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FootprintSpec {
    /// Ellipse or rectangle.
    pub shape: FootprintShape,
    /// The configured `distance.x` radius.
    pub radius_primary: i32,
    /// The configured `distance.y` radius.
    pub radius_secondary: i32,
    /// When set, the primary radius runs along the world x axis.
    pub axis_swapped: bool,
}

impl FootprintSpec {
    /// Build a spec whose axis orientation comes from the tile's placement variant.
    pub fn for_variant(shape: FootprintShape, radii: (i32, i32), variant: u32) -> Self {
        Self {
            shape,
            radius_primary: radii.0,
            radius_secondary: radii.1,
            axis_swapped: axis_swapped(variant),
        }
    }

    /// Half-extents `(x, y)` along the world x and z axes.
    pub fn extents(&self) -> (i32, i32) {
        if self.axis_swapped {
            (self.radius_primary, self.radius_secondary)
        } else {
            (self.radius_secondary, self.radius_primary)
        }
    }
}

/// Whether a placement variant has the axis-swap bit set.
pub fn axis_swapped(variant: u32) -> bool {
    (variant >> AXIS_SWAP_BIT) & 1 == 1
}

/// Ordered list of cells a sprinkler waters, relative to its footprint origin.
///
/// Built once in row-major order (outer loop over x, inner over z). The
/// scheduler later permutes the cells in place through [`Footprint::offsets_mut`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footprint {
    cells: Vec<Offset>,
    extents: (i32, i32),
}

impl Footprint {
    /// Generate the footprint for a spec. Pure and deterministic.
    pub fn build(spec: &FootprintSpec) -> Self {
        let (x, y) = spec.extents();
        let mut cells = Vec::new();
        for i in -x..=x {
            for j in -y..=y {
                let keep = match spec.shape {
                    FootprintShape::Rectangle => true,
                    FootprintShape::Ellipse => in_ellipse(i, j, x, y),
                };
                if keep {
                    cells.push(Offset::new(i, j));
                }
            }
        }
        Self {
            cells,
            extents: (x, y),
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when there are no cells. Never the case for non-negative radii.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The cell at `index` in the current order.
    pub fn get(&self, index: usize) -> Option<Offset> {
        self.cells.get(index).copied()
    }

    /// Iterate cells in the current order.
    pub fn iter(&self) -> impl Iterator<Item = Offset> + '_ {
        self.cells.iter().copied()
    }

    /// The cells in the current order.
    pub fn offsets(&self) -> &[Offset] {
        &self.cells
    }

    /// Mutable access for in-place reordering.
    pub fn offsets_mut(&mut self) -> &mut [Offset] {
        &mut self.cells
    }

    /// Whether `offset` belongs to this footprint.
    pub fn contains(&self, offset: Offset) -> bool {
        self.cells.contains(&offset)
    }

    /// Half-extents `(x, y)` the footprint was swept over.
    pub fn extents(&self) -> (i32, i32) {
        self.extents
    }

    /// ASCII map of the footprint, one row per z offset from north to south.
    ///
    /// `#` marks a covered cell, `o` the origin and `.` an uncovered cell.
    pub fn render(&self) -> String {
        let (x, y) = self.extents;
        let mut rows = Vec::with_capacity((2 * y + 1) as usize);
        for j in -y..=y {
            let row: String = (-x..=x)
                .map(|i| {
                    let offset = Offset::new(i, j);
                    if !self.contains(offset) {
                        '.'
                    } else if i == 0 && j == 0 {
                        'o'
                    } else {
                        '#'
                    }
                })
                .collect();
            rows.push(row);
        }
        rows.join("\n")
    }
}

/// Closed ellipse test `i²·y² + j²·x² ≤ x²·y²`, exact in integers.
fn in_ellipse(i: i32, j: i32, x: i32, y: i32) -> bool {
    let (i, j, x, y) = (i64::from(i), i64::from(j), i64::from(x), i64::from(y));
    i * i * y * y + j * j * x * x <= x * x * y * y
}

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::footprint::{FootprintShape, FootprintSpec};
use crate::geometry::TileLocation;
use crate::timestep::Timestep;

/// The set of typed components attached to a tile configuration.
/// Each slot is resolved once by kind; unknown kinds in the source document are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentSet {
    /// Sprinkler behaviour, if this tile is a sprinkler.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprinkler: Option<SprinklerComponent>,
}

// ---------------------------------------------------------------------------
// Sprinkler
// ---------------------------------------------------------------------------

/// Static parameters of a sprinkler tile. Timing values are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SprinklerComponent {
    /// Footprint radii `(x, y)` before the axis swap.
    pub distance: (i32, i32),
    /// Footprint origin relative to the sprinkler's own cell.
    pub offset: TileLocation,
    /// Seconds between two waterings.
    pub check_time: f64,
    /// Maximum jitter applied to each scheduled watering, in seconds.
    pub random_check_time: f64,
    /// Particle effect emitted by the sprinkler itself.
    pub sprinkler_effect: String,
    /// Effect triggered on a plot when it is watered visibly.
    pub watered_plot_effect: String,
    /// Ellipse footprint when true, rectangle otherwise.
    pub is_curved: bool,
}

impl Default for SprinklerComponent {
    fn default() -> Self {
        Self {
            distance: (2, 2),
            offset: TileLocation::new(0, -1, 0),
            check_time: 5.0,
            random_check_time: 2.5,
            sprinkler_effect: String::new(),
            watered_plot_effect: String::new(),
            is_curved: true,
        }
    }
}

impl SprinklerComponent {
    /// Component kind name used in tile documents and error messages.
    pub const KIND: &'static str = "sprinkler";

    /// Reject values the scheduler cannot work with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.distance.0 < 0 || self.distance.1 < 0 {
            return Err(CoreError::InvalidConfig(format!(
                "sprinkler distance must be non-negative, got ({}, {})",
                self.distance.0, self.distance.1
            )));
        }
        if self.check_interval().ticks() <= 0 {
            return Err(CoreError::InvalidConfig(format!(
                "sprinkler checkTime must be positive, got {}",
                self.check_time
            )));
        }
        if self.jitter().ticks() < 0 {
            return Err(CoreError::InvalidConfig(format!(
                "sprinkler randomCheckTime must not be negative, got {}",
                self.random_check_time
            )));
        }
        Ok(())
    }

    /// Duration between two waterings.
    pub fn check_interval(&self) -> Timestep {
        Timestep::from_seconds(self.check_time)
    }

    /// Jitter amplitude applied to each scheduled watering.
    pub fn jitter(&self) -> Timestep {
        Timestep::from_seconds(self.random_check_time)
    }

    /// Footprint outline.
    pub fn shape(&self) -> FootprintShape {
        if self.is_curved {
            FootprintShape::Ellipse
        } else {
            FootprintShape::Rectangle
        }
    }

    /// Footprint spec for a tile placed with `variant`.
    pub fn footprint_spec(&self, variant: u32) -> FootprintSpec {
        FootprintSpec::for_variant(self.shape(), self.distance, variant)
    }
}

// ---------------------------------------------------------------------------
// Tile configuration
// ---------------------------------------------------------------------------

/// A named tile kind and its components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileConfiguration {
    /// Unique tile code, e.g. `"mods.sprinkler.basic"`.
    pub code: String,
    /// Components attached to this tile kind.
    #[serde(default)]
    pub components: ComponentSet,
}

impl TileConfiguration {
    /// A configuration with no components.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            components: ComponentSet::default(),
        }
    }

    /// Attach a sprinkler component.
    pub fn with_sprinkler(mut self, sprinkler: SprinklerComponent) -> Self {
        self.components.sprinkler = Some(sprinkler);
        self
    }

    /// The sprinkler component, or [`CoreError::MissingComponent`].
    pub fn sprinkler(&self) -> CoreResult<&SprinklerComponent> {
        self.components
            .sprinkler
            .as_ref()
            .ok_or_else(|| CoreError::MissingComponent {
                tile: self.code.clone(),
                kind: SprinklerComponent::KIND,
            })
    }

    /// Validate every attached component.
    pub fn validate(&self) -> CoreResult<()> {
        if let Some(sprinkler) = &self.components.sprinkler {
            sprinkler.validate()?;
        }
        Ok(())
    }
}

use log::trace;
use sprinkler_core::{EntityId, TileLocation};

use crate::facade::UniverseFacade;

/// Result of trying to water one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaterOutcome {
    /// Nothing waterable at the cell.
    Skipped,
    /// The plot was watered.
    Watered {
        /// The plot's tile-state entity.
        plot: EntityId,
        /// Whether the watered-plot effect was played.
        effect_triggered: bool,
    },
}

/// Water the tile at `target` for `sprinkler`.
///
/// Cells without a moisture target are skipped. A visible watering also plays
/// `effect` on the plot unless the effect name is empty.
pub fn water_cell(
    universe: &mut dyn UniverseFacade,
    sprinkler: EntityId,
    target: TileLocation,
    silent: bool,
    effect: &str,
) -> WaterOutcome {
    let plot = match universe.fetch_tile_logic(target) {
        Some(logic) if logic.is_moisture_target() => logic.entity(),
        _ => {
            trace!("{sprinkler}: nothing to water at {target}");
            return WaterOutcome::Skipped;
        }
    };

    universe.apply_water(sprinkler, target);
    let effect_triggered = !silent && !effect.is_empty();
    if effect_triggered {
        universe.trigger_effect(plot, effect);
    }
    trace!("{sprinkler}: watered {target} (silent: {silent})");
    WaterOutcome::Watered {
        plot,
        effect_triggered,
    }
}

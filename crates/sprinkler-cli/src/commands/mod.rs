pub mod footprint;
pub mod simulate;

use std::fs;
use std::path::Path;

use serde::Deserialize;
use sprinkler_core::TileDatabase;
use sprinkler_core::TileLocation;
use sprinkler_core::tile::TileDocument;

/// A sprinkler to place when a scenario starts.
#[derive(Debug, Deserialize)]
pub struct PlacedSprinkler {
    pub tile: String,
    pub location: TileLocation,
    #[serde(default)]
    pub variant: u32,
}

/// A garden scenario: the tile database, sprinklers and tilled plots.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub tiles: TileDocument,
    #[serde(default)]
    pub sprinklers: Vec<PlacedSprinkler>,
    #[serde(default)]
    pub plots: Vec<TileLocation>,
}

/// Load a tile database file.
fn load_tiles(path: &Path) -> Result<TileDatabase, String> {
    let json = read(path)?;
    TileDatabase::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))
}

/// Load a scenario file.
fn load_scenario(path: &Path) -> Result<Scenario, String> {
    let json = read(path)?;
    serde_json::from_str(&json).map_err(|e| format!("{}: {e}", path.display()))
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))
}

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::component::TileConfiguration;
use crate::error::{CoreError, CoreResult};

/// A tile as it currently sits in the world: a shared configuration plus its placement variant.
#[derive(Debug, Clone)]
pub struct Tile {
    /// Shared configuration for this tile kind.
    pub configuration: Arc<TileConfiguration>,
    /// Placement variant bits (rotation and similar).
    pub variant: u32,
}

impl Tile {
    /// Create a tile from a configuration and variant.
    pub fn new(configuration: Arc<TileConfiguration>, variant: u32) -> Self {
        Self {
            configuration,
            variant,
        }
    }

    /// The tile configuration code.
    pub fn code(&self) -> &str {
        &self.configuration.code
    }

    /// True when `configuration` is the very same shared configuration and the variant matches.
    pub fn matches(&self, configuration: &Arc<TileConfiguration>, variant: u32) -> bool {
        Arc::ptr_eq(&self.configuration, configuration) && self.variant == variant
    }
}

/// Serialized form of a tile database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TileDocument {
    /// Tile configurations in declaration order.
    pub tiles: Vec<TileConfiguration>,
}

/// Lookup from tile code to its shared configuration.
#[derive(Debug, Clone, Default)]
pub struct TileDatabase {
    tiles: HashMap<String, Arc<TileConfiguration>>,
}

impl TileDatabase {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON tile document.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let document: TileDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Validate a decoded document and index it by code.
    pub fn from_document(document: TileDocument) -> CoreResult<Self> {
        let mut db = Self::new();
        for config in document.tiles {
            if db.tiles.contains_key(&config.code) {
                return Err(CoreError::InvalidConfig(format!(
                    "duplicate tile code \"{}\"",
                    config.code
                )));
            }
            db.insert(config)?;
        }
        debug!("loaded {} tile configurations", db.len());
        Ok(db)
    }

    /// Validate and register a configuration, replacing any previous one with the same code.
    pub fn insert(&mut self, config: TileConfiguration) -> CoreResult<Arc<TileConfiguration>> {
        config.validate()?;
        let config = Arc::new(config);
        self.tiles.insert(config.code.clone(), Arc::clone(&config));
        Ok(config)
    }

    /// Look up a configuration by code.
    pub fn get(&self, code: &str) -> Option<Arc<TileConfiguration>> {
        self.tiles.get(code).cloned()
    }

    /// Look up a configuration by code, or [`CoreError::UnknownTile`].
    pub fn resolve(&self, code: &str) -> CoreResult<Arc<TileConfiguration>> {
        self.get(code)
            .ok_or_else(|| CoreError::UnknownTile(code.to_string()))
    }

    /// Number of registered configurations.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Registered codes, sorted.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.tiles.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

use std::collections::BTreeMap;

use log::{debug, info, warn};
use sprinkler_core::record::{from_blob, to_blob};
use sprinkler_core::{DurableRecord, EntityId, TileDatabase, TransientRecord, Vector3D};

use crate::context::SimContext;
use crate::error::{SimError, SimResult};
use crate::event::SimEventKind;
use crate::logic::SprinklerLogic;
use crate::system::System;

/// An unloaded sprinkler: its position and stashed transient blob.
#[derive(Debug, Clone)]
struct Dormant {
    position: Vector3D,
    blob: serde_json::Value,
}

/// Drives every loaded sprinkler through the pre-update, update and
/// post-update phases, and keeps the stashes of unloaded ones.
#[derive(Debug, Default)]
pub struct SprinklerSystem {
    active: BTreeMap<EntityId, SprinklerLogic>,
    dormant: BTreeMap<EntityId, Dormant>,
}

impl SprinklerSystem {
    /// Create an empty system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start driving `logic`. Replaces any sprinkler with the same id.
    pub fn insert(&mut self, logic: SprinklerLogic) {
        self.dormant.remove(&logic.entity());
        self.active.insert(logic.entity(), logic);
    }

    /// A loaded sprinkler.
    pub fn get(&self, id: EntityId) -> Option<&SprinklerLogic> {
        self.active.get(&id)
    }

    /// Loaded sprinklers in id order.
    pub fn iter(&self) -> impl Iterator<Item = &SprinklerLogic> {
        self.active.values()
    }

    /// Number of loaded sprinklers.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// True when no sprinkler is loaded.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// True if `id` is unloaded and waiting to be reloaded.
    pub fn is_dormant(&self, id: EntityId) -> bool {
        self.dormant.contains_key(&id)
    }

    /// Unload a sprinkler: store its transient record as a blob and stop driving it.
    pub fn unload(&mut self, id: EntityId) -> SimResult<()> {
        let mut logic = self.active.remove(&id).ok_or(SimError::EntityNotFound(id))?;
        let blob = to_blob(logic.store())?;
        debug!("unloaded sprinkler {id}");
        self.dormant.insert(
            id,
            Dormant {
                position: logic.position(),
                blob,
            },
        );
        Ok(())
    }

    /// Reload an unloaded sprinkler from its stashed blob.
    pub fn reload(&mut self, id: EntityId, tiles: &TileDatabase) -> SimResult<()> {
        let dormant = self.dormant.get(&id).ok_or(SimError::NotDormant(id))?;
        let logic = from_blob::<TransientRecord>(dormant.blob.clone())
            .and_then(|record| SprinklerLogic::restore(id, dormant.position, &record, tiles))
            .inspect_err(|e| warn!("sprinkler {id} could not be restored: {e}"))?;
        self.dormant.remove(&id);
        debug!("reloaded sprinkler {id}");
        self.active.insert(id, logic);
        Ok(())
    }

    /// Durable records for every sprinkler, loaded or not, as blobs in id order.
    ///
    /// An unloaded sprinkler whose stash no longer restores is left out of
    /// the result and stays dormant.
    pub fn persist_all(
        &self,
        tiles: &TileDatabase,
    ) -> SimResult<Vec<(EntityId, serde_json::Value)>> {
        let mut records = BTreeMap::new();
        for (id, logic) in &self.active {
            records.insert(*id, logic.persist());
        }
        for (id, dormant) in &self.dormant {
            let restored = from_blob::<TransientRecord>(dormant.blob.clone())
                .and_then(|record| SprinklerLogic::restore(*id, dormant.position, &record, tiles));
            match restored {
                Ok(logic) => {
                    records.insert(*id, logic.persist());
                }
                Err(e) => warn!("sprinkler {id} left out of the save: {e}"),
            }
        }
        records
            .into_iter()
            .map(|(id, record)| Ok((id, to_blob(&record)?)))
            .collect()
    }

    /// Replace every sprinkler with ones rebuilt from durable blobs.
    pub fn depersist_all(
        &mut self,
        records: &[(EntityId, serde_json::Value)],
        tiles: &TileDatabase,
    ) -> SimResult<usize> {
        let mut active = BTreeMap::new();
        for (id, blob) in records {
            let record: DurableRecord = from_blob(blob.clone())?;
            active.insert(*id, SprinklerLogic::depersist(*id, &record, tiles)?);
        }
        self.active = active;
        self.dormant.clear();
        Ok(self.active.len())
    }
}

impl System for SprinklerSystem {
    fn name(&self) -> &str {
        "sprinklers"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let now = ctx.now();
        for logic in self.active.values_mut() {
            logic.pre_update(now);
        }
        for logic in self.active.values_mut() {
            logic.update(ctx);
        }

        let mut finished = Vec::new();
        for logic in self.active.values_mut() {
            if logic.post_update(&mut *ctx.universe) {
                finished.push(logic.entity());
            }
        }
        for id in finished {
            if let Some(logic) = self.active.remove(&id) {
                info!("sprinkler {id} at {} removed", logic.location());
                ctx.emit(
                    SimEventKind::Removed { sprinkler: id },
                    format!("sprinkler {id} at {} removed", logic.location()),
                );
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

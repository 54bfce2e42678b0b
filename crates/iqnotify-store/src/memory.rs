//! In-memory presence store

use chrono::{DateTime, Utc};
use iqnotify_util::EntityId;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::{PresenceRecord, PresenceStore, StoreError, StoreResult};

/// Presence store backed by a map, for tests and hosts that push state in
#[derive(Debug, Default)]
pub struct MemoryPresenceStore {
    records: RwLock<HashMap<EntityId, PresenceRecord>>,
}

impl MemoryPresenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a state observed at `at`. The transition time only moves when
    /// the raw state actually changes.
    pub fn set_state(
        &self,
        entity: impl Into<EntityId>,
        raw_state: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        records
            .entry(entity.into())
            .and_modify(|record| {
                if record.raw_state != raw_state {
                    record.raw_state = raw_state.to_string();
                    record.last_changed = at;
                }
            })
            .or_insert_with(|| PresenceRecord::new(raw_state, at));
        Ok(())
    }

    /// Forget an entity
    pub fn remove(&self, entity: &EntityId) -> StoreResult<Option<PresenceRecord>> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        Ok(records.remove(entity))
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PresenceStore for MemoryPresenceStore {
    fn lookup(&self, entity: &EntityId) -> StoreResult<Option<PresenceRecord>> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get(entity).cloned())
    }

    fn is_healthy(&self) -> bool {
        !self.records.is_poisoned()
    }
}

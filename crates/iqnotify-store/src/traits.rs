//! Store trait definitions

use chrono::{DateTime, Utc};
use iqnotify_util::EntityId;

use crate::StoreResult;

/// Raw presence record as kept by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceRecord {
    /// Raw state value, e.g. `home`, `not_home`, `on`, `off`
    pub raw_state: String,

    /// When the state last changed. Reads never touch this.
    pub last_changed: DateTime<Utc>,
}

impl PresenceRecord {
    pub fn new(raw_state: impl Into<String>, last_changed: DateTime<Utc>) -> Self {
        Self {
            raw_state: raw_state.into(),
            last_changed,
        }
    }
}

/// Read-only view of presence state
pub trait PresenceStore: Send + Sync {
    /// Look up the current record for an entity. `Ok(None)` when the store
    /// has never seen it.
    fn lookup(&self, entity: &EntityId) -> StoreResult<Option<PresenceRecord>>;

    /// Check if store is healthy
    fn is_healthy(&self) -> bool {
        true
    }
}

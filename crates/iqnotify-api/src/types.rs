//! Shared types for presence facts, pairs and decisions

use chrono::{DateTime, Utc};
use iqnotify_util::{ChannelId, EntityId};
use serde::{Deserialize, Serialize};

use crate::PRESENT_STATES;

/// Presence classification of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceState {
    Present,
    Absent,
    /// The store has no record of the entity
    Unknown,
}

impl PresenceState {
    /// Classify a raw store value. Only the present sentinels map to
    /// `Present`; every other value, including unexpected ones, is `Absent`.
    pub fn from_raw(raw: &str) -> Self {
        if PRESENT_STATES.contains(&raw) {
            PresenceState::Present
        } else {
            PresenceState::Absent
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, PresenceState::Unknown)
    }
}

/// Presence of one entity at the time of the snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceFact {
    pub entity: EntityId,
    pub state: PresenceState,
    /// Last state transition. The UNIX epoch for unknown entities.
    pub last_changed: DateTime<Utc>,
}

impl PresenceFact {
    pub fn new(entity: EntityId, state: PresenceState, last_changed: DateTime<Utc>) -> Self {
        Self {
            entity,
            state,
            last_changed,
        }
    }

    pub fn present(entity: impl Into<EntityId>, last_changed: DateTime<Utc>) -> Self {
        Self::new(entity.into(), PresenceState::Present, last_changed)
    }

    pub fn unknown(entity: impl Into<EntityId>) -> Self {
        Self::new(entity.into(), PresenceState::Unknown, DateTime::<Utc>::default())
    }

    pub fn is_present(&self) -> bool {
        self.state == PresenceState::Present
    }

    pub fn is_absent(&self) -> bool {
        self.state == PresenceState::Absent
    }

    /// Whether the last transition happened at or after `threshold`
    pub fn changed_since(&self, threshold: DateTime<Utc>) -> bool {
        self.last_changed >= threshold
    }
}

/// Binding of a presence source to a notification channel
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    pub entity: EntityId,
    pub channel: ChannelId,
}

impl Pair {
    pub fn new(entity: impl Into<EntityId>, channel: impl Into<ChannelId>) -> Self {
        Self {
            entity: entity.into(),
            channel: channel.into(),
        }
    }
}

/// A configured pair together with the presence fact read for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairFact {
    pub pair: Pair,
    pub fact: PresenceFact,
}

impl PairFact {
    pub fn new(pair: Pair, fact: PresenceFact) -> Self {
        Self { pair, fact }
    }
}

/// Facts computed once over the whole snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateFacts {
    pub anyone_present: bool,
    pub anyone_recently_left: bool,
}

/// Outcome of evaluating one pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub pair: Pair,
    pub notify: bool,
}

//! Presence snapshot reader

use iqnotify_api::{Pair, PairFact, PresenceFact, PresenceState};
use iqnotify_util::EntityId;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::PresenceStore;

/// Read one presence fact per pair, in pair order.
///
/// Each distinct entity is looked up once, so every pair sharing an entity
/// sees the same fact. Entities the store does not know become `Unknown`.
/// A failing lookup is logged and also degrades to `Unknown`, so one bad
/// record never blocks the other pairs.
pub fn read_facts(store: &dyn PresenceStore, pairs: &[Pair]) -> Vec<PairFact> {
    let mut snapshot: HashMap<&EntityId, PresenceFact> = HashMap::new();

    pairs
        .iter()
        .map(|pair| {
            let fact = snapshot
                .entry(&pair.entity)
                .or_insert_with(|| lookup_fact(store, &pair.entity))
                .clone();
            PairFact::new(pair.clone(), fact)
        })
        .collect()
}

fn lookup_fact(store: &dyn PresenceStore, entity: &EntityId) -> PresenceFact {
    match store.lookup(entity) {
        Ok(Some(record)) => PresenceFact::new(
            entity.clone(),
            PresenceState::from_raw(&record.raw_state),
            record.last_changed,
        ),
        Ok(None) => {
            debug!(entity = %entity, "Entity not found in presence store");
            PresenceFact::unknown(entity.clone())
        }
        Err(e) => {
            warn!(entity = %entity, error = %e, "Presence lookup failed");
            PresenceFact::unknown(entity.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryPresenceStore, PresenceRecord, StoreError, StoreResult};
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingStore;

    /// Flips between home and away on every lookup.
    struct FlappingStore {
        lookups: AtomicUsize,
    }

    impl PresenceStore for FlappingStore {
        fn lookup(&self, _entity: &EntityId) -> StoreResult<Option<PresenceRecord>> {
            let n = self.lookups.fetch_add(1, Ordering::SeqCst);
            let raw_state = if n % 2 == 0 { "home" } else { "not_home" };
            Ok(Some(PresenceRecord {
                raw_state: raw_state.into(),
                last_changed: Utc.with_ymd_and_hms(2025, 6, 1, 8, n as u32, 0).unwrap(),
            }))
        }
    }

    impl PresenceStore for FailingStore {
        fn lookup(&self, _entity: &EntityId) -> StoreResult<Option<PresenceRecord>> {
            Err(StoreError::Database("disk I/O error".into()))
        }
    }

    #[test]
    fn facts_follow_pair_order_and_classification() {
        let store = MemoryPresenceStore::new();
        let t0 = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        store.set_state("device_tracker.alice", "home", t0).unwrap();
        store.set_state("binary_sensor.bob", "off", t0).unwrap();
        store.set_state("person.carol", "work", t0).unwrap();

        let pairs = vec![
            Pair::new("binary_sensor.bob", "telegram_bob"),
            Pair::new("device_tracker.alice", "mobile_app_alice"),
            Pair::new("person.carol", "email_carol"),
            Pair::new("person.ghost", "email_ghost"),
        ];

        let facts = read_facts(&store, &pairs);
        let states: Vec<_> = facts.iter().map(|f| f.fact.state).collect();
        assert_eq!(
            states,
            vec![
                PresenceState::Absent,
                PresenceState::Present,
                PresenceState::Absent,
                PresenceState::Unknown,
            ]
        );
        assert_eq!(facts[1].pair, pairs[1]);
        assert_eq!(facts[1].fact.last_changed, t0);
    }

    #[test]
    fn lookup_errors_degrade_to_unknown() {
        let pairs = vec![Pair::new("person.alice", "mobile_app_alice")];
        let facts = read_facts(&FailingStore, &pairs);
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].fact.state, PresenceState::Unknown);
    }

    #[test]
    fn reading_does_not_change_store() {
        let store = MemoryPresenceStore::new();
        let t0 = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        store.set_state("person.alice", "home", t0).unwrap();
        let pairs = vec![Pair::new("person.alice", "mobile_app_alice")];

        let first = read_facts(&store, &pairs);
        let second = read_facts(&store, &pairs);
        assert_eq!(first, second);
    }

    #[test]
    fn shared_entity_is_read_once_per_call() {
        let store = FlappingStore {
            lookups: AtomicUsize::new(0),
        };
        let pairs = vec![
            Pair::new("person.alice", "mobile_app_alice"),
            Pair::new("person.bob", "telegram_bob"),
            Pair::new("person.alice", "email_alice"),
        ];

        let facts = read_facts(&store, &pairs);
        assert_eq!(store.lookups.load(Ordering::SeqCst), 2);
        assert_eq!(facts.len(), 3);
        assert_eq!(facts[0].fact, facts[2].fact);
        assert_eq!(facts[0].pair.channel.as_str(), "mobile_app_alice");
        assert_eq!(facts[2].pair.channel.as_str(), "email_alice");
    }
}

//! Integration tests for iqnotify
//!
//! These tests wire config, the SQLite presence store, the notification
//! service and the mock dispatcher together.

use chrono::{DateTime, Duration, TimeZone, Utc};
use iqnotify_api::{Mode, ModeRequest, NotifyRequest, Pair, PresenceState};
use iqnotify_config::parse_config;
use iqnotify_core::{evaluate, NotifyService};
use iqnotify_dispatch::MockDispatcher;
use iqnotify_store::{read_facts, SqlitePresenceStore};
use iqnotify_util::{ChannelId, EntityId};
use std::sync::Arc;

const CONFIG: &str = r#"
    config_version = 1

    [service]
    time = 2

    [[pairs]]
    entity = "device_tracker.alice"
    service = "mobile_app_alice"

    [[pairs]]
    entity = "binary_sensor.bob_home"
    service = "telegram_bob"

    [[pairs]]
    entity = "person.carol"
    service = "email_carol"
"#;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 24, 19, 0, 0).unwrap()
}

fn seeded_store(dir: &tempfile::TempDir, states: &[(&str, &str, i64)]) -> SqlitePresenceStore {
    let path = dir.path().join("presence.db");
    {
        let writer = SqlitePresenceStore::open(&path).unwrap();
        for (entity, state, minutes_ago) in states {
            writer
                .set_state(
                    &EntityId::new(*entity),
                    state,
                    now() - Duration::minutes(*minutes_ago),
                )
                .unwrap();
        }
    }
    SqlitePresenceStore::open_read_only(&path).unwrap()
}

fn make_service(
    store: SqlitePresenceStore,
) -> (NotifyService, Arc<MockDispatcher>) {
    let config = parse_config(CONFIG).unwrap();
    let dispatcher = Arc::new(MockDispatcher::new());
    let service = NotifyService::new(config, Arc::new(store), dispatcher.clone());
    (service, dispatcher)
}

fn request(mode: &str) -> NotifyRequest {
    NotifyRequest::new("Dinner is ready")
        .with_data_json(&format!(r#"{{"mode": "{}"}}"#, mode))
        .unwrap()
}

#[test]
fn test_snapshot_from_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(&dir, &[("device_tracker.alice", "home", 5), ("binary_sensor.bob_home", "off", 1)]);
    let config = parse_config(CONFIG).unwrap();

    let facts = read_facts(&store, &config.pairs);
    let states: Vec<_> = facts.iter().map(|f| f.fact.state).collect();
    assert_eq!(
        states,
        vec![PresenceState::Present, PresenceState::Absent, PresenceState::Unknown]
    );
}

#[tokio::test]
async fn test_only_home_skips_unknown() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(&dir, &[("device_tracker.alice", "home", 5), ("binary_sensor.bob_home", "off", 1)]);
    let (service, dispatcher) = make_service(store);

    let report = service.send_message_at(request("only_home"), now()).await;

    let decided: Vec<_> = report
        .plan
        .decisions
        .iter()
        .map(|d| (d.pair.channel.as_str().to_string(), d.notify))
        .collect();
    assert_eq!(
        decided,
        vec![("mobile_app_alice".to_string(), true), ("telegram_bob".to_string(), false)]
    );
    assert_eq!(dispatcher.channels(), vec![ChannelId::new("mobile_app_alice")]);
}

#[tokio::test]
async fn test_nobody_home_falls_back_to_everyone() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(
        &dir,
        &[
            ("device_tracker.alice", "not_home", 40),
            ("binary_sensor.bob_home", "off", 90),
            ("person.carol", "work", 15),
        ],
    );
    let (service, dispatcher) = make_service(store);

    service.send_message_at(request("only_home_then_away"), now()).await;
    assert_eq!(dispatcher.channels().len(), 3);
}

#[tokio::test]
async fn test_just_left_then_away() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(
        &dir,
        &[
            ("device_tracker.alice", "home", 40),
            ("binary_sensor.bob_home", "off", 1),
            ("person.carol", "not_home", 10),
        ],
    );
    let (service, dispatcher) = make_service(store);

    service.send_message_at(request("just_left_then_away"), now()).await;
    assert_eq!(dispatcher.channels(), vec![ChannelId::new("telegram_bob")]);

    // With a wider window both absent people count as having just left
    dispatcher.clear();
    let wide = NotifyRequest::new("Lights left on")
        .with_data_json(r#"{"mode": "just_left_then_away", "time": 30}"#)
        .unwrap();
    service.send_message_at(wide, now()).await;
    assert_eq!(
        dispatcher.channels(),
        vec![ChannelId::new("telegram_bob"), ChannelId::new("email_carol")]
    );
}

#[tokio::test]
async fn test_bogus_mode_is_silent() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(&dir, &[("device_tracker.alice", "home", 5)]);
    let (service, dispatcher) = make_service(store);

    let report = service.send_message_at(request("bogus"), now()).await;
    assert_eq!(report.plan.mode, ModeRequest::Unrecognized("bogus".into()));
    assert!(dispatcher.deliveries().is_empty());
}

#[test]
fn test_direct_evaluation_matches_service() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(
        &dir,
        &[("device_tracker.alice", "home", 1), ("binary_sensor.bob_home", "on", 60)],
    );
    let config = parse_config(CONFIG).unwrap();
    let facts = read_facts(&store, &config.pairs);

    let decisions = evaluate(&facts, Mode::JustArrived, config.service.default_window, now());
    assert_eq!(decisions.len(), 2);
    assert_eq!(decisions[0].pair, Pair::new("device_tracker.alice", "mobile_app_alice"));
    assert!(decisions[0].notify);
    assert!(!decisions[1].notify);
}

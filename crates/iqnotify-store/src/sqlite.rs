//! SQLite-based presence store
//!
//! Reads the `presence_states` table of a recorder database. The recorder
//! (another process) owns the table; iqnotify opens it read-only in
//! production and only writes to it when seeding databases for tests or
//! local development.

use chrono::{DateTime, Utc};
use iqnotify_util::EntityId;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::{PresenceRecord, PresenceStore, StoreError, StoreResult};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS presence_states (
        entity_id TEXT PRIMARY KEY,
        state TEXT NOT NULL,
        last_changed TEXT NOT NULL
    );
"#;

/// SQLite-based presence store
pub struct SqlitePresenceStore {
    conn: Mutex<Connection>,
}

impl SqlitePresenceStore {
    /// Open or create a database at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Open an existing recorder database without write access
    pub fn open_read_only(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn init_schema(&self) -> StoreResult<()> {
        self.conn()?.execute_batch(SCHEMA)?;
        debug!("Presence schema initialized");
        Ok(())
    }

    /// Record a state observed at `at`. The transition time only moves when
    /// the raw state actually changes.
    pub fn set_state(&self, entity: &EntityId, raw_state: &str, at: DateTime<Utc>) -> StoreResult<()> {
        self.conn()?.execute(
            r#"
            INSERT INTO presence_states (entity_id, state, last_changed)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(entity_id) DO UPDATE SET
                last_changed = CASE
                    WHEN presence_states.state = excluded.state THEN presence_states.last_changed
                    ELSE excluded.last_changed
                END,
                state = excluded.state
            "#,
            params![entity.as_str(), raw_state, at.to_rfc3339()],
        )?;
        debug!(entity = %entity, state = raw_state, "Presence state recorded");
        Ok(())
    }
}

impl PresenceStore for SqlitePresenceStore {
    fn lookup(&self, entity: &EntityId) -> StoreResult<Option<PresenceRecord>> {
        let conn = self.conn()?;

        let row: Option<(String, String)> = conn
            .query_row(
                "SELECT state, last_changed FROM presence_states WHERE entity_id = ?",
                params![entity.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((state, last_changed)) = row else {
            return Ok(None);
        };

        let last_changed = DateTime::parse_from_rfc3339(&last_changed)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StoreError::Corrupt {
                entity: entity.to_string(),
                message: format!("bad last_changed '{}': {}", last_changed, e),
            })?;

        Ok(Some(PresenceRecord::new(state, last_changed)))
    }

    fn is_healthy(&self) -> bool {
        match self.conn() {
            Ok(conn) => conn
                .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .is_ok(),
            Err(_) => false,
        }
    }
}

//! SQLite-backed key-value persistence.
//!
//! All durable state lives in a single `kv` table keyed by string:
//! the habit collection (JSON array), the player display name, the snooze
//! penalty ledger, and the serialized alarm scheduler. A write fully
//! replaces the stored value; there are no partial diffs.

use rusqlite::{params, Connection};

use super::data_dir;
use crate::error::DatabaseError;

/// Keys used by the engine. Collected here so callers and tests agree.
pub mod keys {
    pub const HABITS: &str = "habits";
    pub const PLAYER_NAME: &str = "player_name";
    pub const SNOOZE_PENALTY: &str = "snooze_penalty";
    pub const ALARM_SCHEDULER: &str = "alarm_scheduler";
}

/// SQLite database holding the key-value store.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/habitquest/habitquest.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let path = data_dir()
            .map_err(|e| DatabaseError::DataDir(e.to_string()))?
            .join("habitquest.db");
        let conn = Connection::open(&path)
            .map_err(|source| DatabaseError::OpenFailed { path, source })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store, replacing any previous value.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key from the kv store. No-op if the key is absent.
    pub fn kv_delete(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_set_get_roundtrip() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.kv_get("missing").unwrap(), None);

        db.kv_set("player_name", "Ada").unwrap();
        assert_eq!(db.kv_get("player_name").unwrap().as_deref(), Some("Ada"));

        db.kv_set("player_name", "Grace").unwrap();
        assert_eq!(db.kv_get("player_name").unwrap().as_deref(), Some("Grace"));
    }

    #[test]
    fn kv_delete_is_idempotent() {
        let db = Database::open_memory().unwrap();
        db.kv_set("snooze_penalty", "15").unwrap();
        db.kv_delete("snooze_penalty").unwrap();
        assert_eq!(db.kv_get("snooze_penalty").unwrap(), None);
        db.kv_delete("snooze_penalty").unwrap();
    }

    #[test]
    fn migrate_is_idempotent() {
        let db = Database::open_memory().unwrap();
        db.migrate().unwrap();
        db.kv_set("habits", "[]").unwrap();
        db.migrate().unwrap();
        assert_eq!(db.kv_get("habits").unwrap().as_deref(), Some("[]"));
    }
}

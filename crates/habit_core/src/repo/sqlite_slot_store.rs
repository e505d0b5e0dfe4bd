//! SQLite-backed slot store.
//!
//! # Responsibility
//! - Keep slot documents in the `kv_slots` table of a migrated database.
//!
//! # Invariants
//! - Each write is a single upsert statement, so replacement is atomic.

use crate::db::{open_db, open_db_in_memory};
use crate::repo::slot_store::{validate_slot_key, SlotStore, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Slot store over a namespaced SQLite key-value table.
pub struct SqliteSlotStore {
    conn: Connection,
}

impl SqliteSlotStore {
    /// Opens (or creates) the database at `path` and applies migrations.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> StorageResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

impl SlotStore for SqliteSlotStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    fn read_slot(&self, key: &str) -> StorageResult<Option<String>> {
        validate_slot_key(key)?;
        let document = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(document)
    }

    fn write_slot(&self, key: &str, document: &str) -> StorageResult<()> {
        validate_slot_key(key)?;
        self.conn.execute(
            "INSERT INTO kv_slots (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, document],
        )?;
        Ok(())
    }
}

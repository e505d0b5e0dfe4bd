use habit_core::db::migrations::{latest_version, schema_version};
use habit_core::db::{open_db, open_db_in_memory, DbError};
use habit_core::{SlotStore, SqliteSlotStore, HABITS_SLOT};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "kv_slots");
}

#[test]
fn reopening_database_keeps_slots() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("habit.sqlite3");

    let store = SqliteSlotStore::open(&path).unwrap();
    store.write_slot(HABITS_SLOT, "[]").unwrap();
    drop(store);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    let reopened = SqliteSlotStore::from_connection(conn);
    assert_eq!(reopened.read_slot(HABITS_SLOT).unwrap().as_deref(), Some("[]"));
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}

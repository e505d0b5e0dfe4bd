//! Versioned schema steps for the slot database.
//!
//! # Invariants
//! - Step versions start at 1 and increase by one.
//! - Each step stamps `user_version` inside the same transaction as its DDL.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// `(version, ddl)` pairs in application order.
const STEPS: &[(u32, &str)] = &[(1, include_str!("0001_kv_slots.sql"))];

/// Schema version a fully migrated slot database reports.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |(version, _)| *version)
}

/// Reads the slot schema version stamped on `conn`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `SchemaTooNew` when the file was written by a newer build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending = STEPS.iter().filter(|(version, _)| *version > found);
    let tx = conn.transaction()?;
    let mut applied = 0usize;
    for (version, ddl) in pending {
        tx.execute_batch(ddl)?;
        tx.pragma_update(None, "user_version", version)?;
        applied += 1;
    }
    tx.commit()?;

    if applied > 0 {
        info!(
            "event=db_migrate module=db status=ok from_version={found} to_version={supported} steps={applied}"
        );
    }
    Ok(())
}

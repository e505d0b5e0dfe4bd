//! SQLite storage for the `kv_slots` table behind `SqliteSlotStore`.
//!
//! # Responsibility
//! - Hand out connections whose slot schema is current.
//! - Report schema or driver failures as `DbError`.
//!
//! # Invariants
//! - The slot schema version lives in `PRAGMA user_version`.
//! - A database stamped by a newer build is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure opening or migrating the slot database.
#[derive(Debug)]
pub enum DbError {
    /// Driver-level failure from rusqlite.
    Sqlite(rusqlite::Error),
    /// `user_version` is ahead of every migration this build ships.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "slot database error: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "slot database is at schema {found}; this build reads up to {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        if let Self::Sqlite(err) = self {
            return Some(err);
        }
        None
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

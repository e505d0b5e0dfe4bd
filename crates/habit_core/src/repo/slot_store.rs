//! Slot storage contract.
//!
//! # Responsibility
//! - Define the whole-document key-value contract shared by all backends.
//! - Provide the storage error type used by persistence paths.
//!
//! # Invariants
//! - A write replaces the previous document for the key in full.
//! - A reader never observes a partially written document.
//! - Reading a missing key is `Ok(None)`, not an error.

use crate::db::DbError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot holding the habit collection.
pub const HABITS_SLOT: &str = "habits";
/// Slot holding the user profile.
pub const PROFILE_SLOT: &str = "profile";

static SLOT_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_-]+$").expect("valid slot key regex"));

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence failure for slot reads and writes.
#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Db(DbError),
    Json(serde_json::Error),
    InvalidKey(String),
    /// Document parsed but violates record invariants.
    InvalidDocument(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "slot io error: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "slot json error: {err}"),
            Self::InvalidKey(key) => write!(f, "invalid slot key `{key}`"),
            Self::InvalidDocument(message) => write!(f, "invalid slot document: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::InvalidKey(_) | Self::InvalidDocument(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Whole-document key-value storage.
///
/// Implementations are moved onto the persistence worker thread, hence
/// the `Send` bound.
pub trait SlotStore: Send {
    /// Short backend name for log lines.
    fn backend(&self) -> &'static str;
    fn read_slot(&self, key: &str) -> StorageResult<Option<String>>;
    fn write_slot(&self, key: &str, document: &str) -> StorageResult<()>;
}

/// Rejects keys that cannot be mapped safely onto file names.
pub fn validate_slot_key(key: &str) -> StorageResult<()> {
    if SLOT_KEY_RE.is_match(key) {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_slot_key, StorageError};

    #[test]
    fn slot_keys_are_restricted_to_safe_names() {
        assert!(validate_slot_key("habits").is_ok());
        assert!(validate_slot_key("user_profile-2").is_ok());
        assert!(matches!(
            validate_slot_key("../habits"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(validate_slot_key("").is_err());
        assert!(validate_slot_key("Habits").is_err());
    }
}

//! File-backed slot store.
//!
//! # Responsibility
//! - Map each slot key onto `<data_dir>/<key>.json`.
//! - Replace documents atomically (temp file in the same directory, then rename).
//!
//! # Invariants
//! - A crash mid-write leaves either the old or the new document, never a
//!   truncated one.

use crate::repo::slot_store::{validate_slot_key, SlotStore, StorageResult};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const SLOT_FILE_EXTENSION: &str = "json";

/// Slot store writing one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    data_dir: PathBuf,
}

impl FileSlotStore {
    /// Creates a store rooted at `data_dir`. The directory is created lazily.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// File path backing `key`.
    pub fn slot_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_slot_key(key)?;
        Ok(self
            .data_dir
            .join(format!("{key}.{SLOT_FILE_EXTENSION}")))
    }
}

impl SlotStore for FileSlotStore {
    fn backend(&self) -> &'static str {
        "file"
    }

    fn read_slot(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.slot_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(document) => Ok(Some(document)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write_slot(&self, key: &str, document: &str) -> StorageResult<()> {
        let path = self.slot_path(key)?;
        std::fs::create_dir_all(&self.data_dir)?;

        let mut staged = NamedTempFile::new_in(&self.data_dir)?;
        staged.write_all(document.as_bytes())?;
        staged.as_file().sync_all()?;
        staged.persist(&path).map_err(|err| err.error)?;
        Ok(())
    }
}

//! Profile use-case store.
//!
//! # Responsibility
//! - Hold the current profile and persist it as one document per save.
//!
//! # Invariants
//! - `save` replaces the in-memory profile even when the write fails.
//! - Saves are synchronous so the UI can report failures on explicit save.

use crate::model::profile::Profile;
use crate::repo::profile_repo::{load_profile, save_profile};
use crate::repo::slot_store::{SlotStore, StorageResult};
use log::{error, info};

pub struct ProfileStore {
    slots: Box<dyn SlotStore>,
    profile: Profile,
}

impl ProfileStore {
    /// Loads the stored profile, or the default when none is readable.
    pub fn load(slots: Box<dyn SlotStore>) -> Self {
        let profile = load_profile(slots.as_ref());
        Self { slots, profile }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Replaces and persists the profile.
    ///
    /// # Errors
    /// - Storage failures; the in-memory profile keeps the new value.
    pub fn save(&mut self, profile: Profile) -> StorageResult<()> {
        self.profile = profile;
        match save_profile(self.slots.as_ref(), &self.profile) {
            Ok(()) => {
                info!(
                    "event=profile_save module=service status=ok backend={}",
                    self.slots.backend()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=profile_save module=service status=error backend={} error={err}",
                    self.slots.backend()
                );
                Err(err)
            }
        }
    }
}

//! Profile document codec.

use crate::model::profile::Profile;
use crate::repo::slot_store::{SlotStore, StorageResult, PROFILE_SLOT};
use log::{error, info, warn};

/// Reads the profile slot, falling back to the default profile.
pub fn load_profile(slots: &dyn SlotStore) -> Profile {
    let backend = slots.backend();
    match slots.read_slot(PROFILE_SLOT) {
        Ok(Some(document)) => match serde_json::from_str::<Profile>(&document) {
            Ok(profile) => {
                info!("event=profile_load module=repo status=ok backend={backend}");
                profile
            }
            Err(err) => {
                warn!(
                    "event=profile_load module=repo status=error backend={backend} error_code=malformed_document error={err}"
                );
                Profile::default()
            }
        },
        Ok(None) => {
            info!("event=profile_load module=repo status=empty backend={backend}");
            Profile::default()
        }
        Err(err) => {
            error!(
                "event=profile_load module=repo status=error backend={backend} error_code=read_failed error={err}"
            );
            Profile::default()
        }
    }
}

/// Writes the whole profile record.
pub fn save_profile(slots: &dyn SlotStore, profile: &Profile) -> StorageResult<()> {
    let document = serde_json::to_string(profile)?;
    slots.write_slot(PROFILE_SLOT, &document)
}

//! Habit collection document codec.
//!
//! # Responsibility
//! - Encode the full habit collection as one JSON array.
//! - Decode stored documents, rejecting records that break invariants.
//! - Degrade every load failure to an empty collection.
//!
//! # Invariants
//! - Loaded collections never contain duplicate ids.
//! - Collection order is preserved across save/load.

use crate::model::habit::{Habit, HabitId};
use crate::repo::slot_store::{SlotStore, StorageError, StorageResult, HABITS_SLOT};
use log::{error, info, warn};
use std::collections::HashSet;

/// Serializes the whole collection.
pub fn encode_habits(habits: &[Habit]) -> StorageResult<String> {
    Ok(serde_json::to_string(habits)?)
}

/// Parses a stored collection document.
///
/// # Errors
/// - `Json` when the document is not an array of habit records.
/// - `InvalidDocument` when a record violates habit invariants.
pub fn decode_habits(document: &str) -> StorageResult<Vec<Habit>> {
    let habits: Vec<Habit> = serde_json::from_str(document)?;
    for (index, habit) in habits.iter().enumerate() {
        habit
            .validate()
            .map_err(|err| StorageError::InvalidDocument(format!("record {index}: {err}")))?;
    }
    Ok(dedupe_by_id(habits))
}

/// Reads the habit slot; never fails.
///
/// Missing, unreadable and malformed documents all yield an empty list.
pub fn load_habits(slots: &dyn SlotStore) -> Vec<Habit> {
    let backend = slots.backend();
    let document = match slots.read_slot(HABITS_SLOT) {
        Ok(Some(document)) => document,
        Ok(None) => {
            info!("event=habits_load module=repo status=empty backend={backend}");
            return Vec::new();
        }
        Err(err) => {
            error!(
                "event=habits_load module=repo status=error backend={backend} error_code=read_failed error={err}"
            );
            return Vec::new();
        }
    };

    match decode_habits(&document) {
        Ok(habits) => {
            info!(
                "event=habits_load module=repo status=ok backend={backend} count={}",
                habits.len()
            );
            habits
        }
        Err(err) => {
            warn!(
                "event=habits_load module=repo status=error backend={backend} error_code=malformed_document error={err}"
            );
            Vec::new()
        }
    }
}

fn dedupe_by_id(habits: Vec<Habit>) -> Vec<Habit> {
    let mut seen: HashSet<HabitId> = HashSet::with_capacity(habits.len());
    let before = habits.len();
    let unique = habits
        .into_iter()
        .filter(|habit| seen.insert(habit.id.clone()))
        .collect::<Vec<_>>();
    if unique.len() != before {
        warn!(
            "event=habits_load module=repo status=deduped dropped={}",
            before - unique.len()
        );
    }
    unique
}

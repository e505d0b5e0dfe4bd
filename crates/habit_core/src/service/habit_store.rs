//! Habit Store: authoritative in-memory habit collection.
//!
//! # Responsibility
//! - Own the habit collection and apply create/update/delete/toggle use-cases.
//! - Schedule whole-collection persistence after every mutation.
//! - Notify subscribers of each applied change.
//!
//! # Invariants
//! - Validation happens before any mutation; rejected input changes nothing.
//! - Lookup misses and empty patches are silent no-ops (no write, no event).
//! - In-memory state is never rolled back because a write failed.
//! - Subscribers run after the mutation, before the mutating call returns.

use crate::model::habit::{
    now_epoch_ms, Habit, HabitDraft, HabitId, HabitInput, HabitPatch, HabitValidationError,
};
use crate::repo::habit_repo::{encode_habits, load_habits};
use crate::repo::slot_store::SlotStore;
use crate::service::persist_worker::PersistWorker;
use crate::service::statistics::HabitStatistics;
use log::{error, info};

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitChange {
    Created(HabitId),
    Updated(HabitId),
    Deleted(HabitId),
    CompletionToggled {
        id: HabitId,
        completed: bool,
        streak: u32,
    },
}

impl HabitChange {
    pub fn habit_id(&self) -> &HabitId {
        match self {
            Self::Created(id) | Self::Updated(id) | Self::Deleted(id) => id,
            Self::CompletionToggled { id, .. } => id,
        }
    }

    fn event_name(&self) -> &'static str {
        match self {
            Self::Created(_) => "habit_create",
            Self::Updated(_) => "habit_update",
            Self::Deleted(_) => "habit_delete",
            Self::CompletionToggled { .. } => "habit_toggle",
        }
    }
}

/// Handle returned by [`HabitStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Change callback. `Send` so the store can live behind a process-wide lock.
pub type HabitSubscriber = Box<dyn FnMut(&HabitChange) + Send>;

/// Owned habit collection with fire-and-forget persistence.
pub struct HabitStore {
    habits: Vec<Habit>,
    persistence: PersistWorker,
    subscribers: Vec<(SubscriptionId, HabitSubscriber)>,
    next_subscription: u64,
}

impl HabitStore {
    /// Loads the persisted collection and starts the persistence worker.
    ///
    /// Never fails: unreadable or malformed documents yield an empty store.
    pub fn load(slots: Box<dyn SlotStore>) -> Self {
        let habits = load_habits(slots.as_ref());
        Self {
            habits,
            persistence: PersistWorker::spawn(slots),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Current collection in creation order.
    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn get(&self, id: &HabitId) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == *id)
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    /// Derived summary of the current collection.
    pub fn statistics(&self) -> HabitStatistics {
        HabitStatistics::from_habits(&self.habits)
    }

    /// Creates a habit from raw form input.
    ///
    /// # Errors
    /// - Any `HabitValidationError` from input parsing; nothing is stored.
    pub fn create(&mut self, input: &HabitInput) -> Result<HabitId, HabitValidationError> {
        let draft = input.parse()?;
        self.create_draft(draft)
    }

    /// Creates a habit from a typed draft.
    pub fn create_draft(&mut self, draft: HabitDraft) -> Result<HabitId, HabitValidationError> {
        draft.validate()?;
        let draft = HabitDraft {
            name: draft.name.trim().to_string(),
            description: draft.description.trim().to_string(),
            ..draft
        };

        let habit = Habit::from_draft(draft, now_epoch_ms());
        let id = habit.id.clone();
        self.habits.push(habit);
        self.commit(HabitChange::Created(id.clone()));
        Ok(id)
    }

    /// Merges `patch` into the habit with `id`.
    ///
    /// Returns `Ok(false)` when the id is unknown or nothing changed.
    ///
    /// # Errors
    /// - `EmptyName` / `InvalidGoal` for invalid patch values; nothing is stored.
    pub fn update(
        &mut self,
        id: &HabitId,
        patch: &HabitPatch,
    ) -> Result<bool, HabitValidationError> {
        patch.validate()?;
        if patch.is_empty() {
            return Ok(false);
        }

        let Some(habit) = self.find_mut(id) else {
            return Ok(false);
        };
        if !habit.apply_patch(patch) {
            return Ok(false);
        }

        self.commit(HabitChange::Updated(id.clone()));
        Ok(true)
    }

    /// Applies the edit form, overwriting every editable field.
    pub fn update_from_input(
        &mut self,
        id: &HabitId,
        input: &HabitInput,
    ) -> Result<bool, HabitValidationError> {
        let patch = input.to_patch()?;
        self.update(id, &patch)
    }

    /// Removes the habit with `id`; returns whether anything was removed.
    pub fn delete(&mut self, id: &HabitId) -> bool {
        let Some(index) = self.habits.iter().position(|habit| habit.id == *id) else {
            return false;
        };
        self.habits.remove(index);
        self.commit(HabitChange::Deleted(id.clone()));
        true
    }

    /// Flips completion for `id`; returns whether the habit exists.
    pub fn toggle_completion(&mut self, id: &HabitId) -> bool {
        let Some(habit) = self.find_mut(id) else {
            return false;
        };
        habit.toggle_completion(now_epoch_ms());
        let change = HabitChange::CompletionToggled {
            id: id.clone(),
            completed: habit.completed,
            streak: habit.streak,
        };
        self.commit(change);
        true
    }

    /// Registers a change callback.
    pub fn subscribe(&mut self, subscriber: HabitSubscriber) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.subscribers.push((id, subscriber));
        id
    }

    /// Removes a callback; returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(registered, _)| *registered != id);
        self.subscribers.len() != before
    }

    /// Blocks until all scheduled writes have been attempted.
    pub fn flush(&self) {
        self.persistence.flush();
    }

    /// Number of snapshots that failed to persist this session.
    pub fn persist_failures(&self) -> usize {
        self.persistence.failures()
    }

    fn find_mut(&mut self, id: &HabitId) -> Option<&mut Habit> {
        self.habits.iter_mut().find(|habit| habit.id == *id)
    }

    fn commit(&mut self, change: HabitChange) {
        info!(
            "event={} module=service status=ok habit_id={} count={}",
            change.event_name(),
            change.habit_id(),
            self.habits.len()
        );

        match encode_habits(&self.habits) {
            Ok(document) => self.persistence.schedule(document),
            Err(err) => error!(
                "event=habits_persist module=service status=error error_code=encode_failed error={err}"
            ),
        }

        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&change);
        }
    }
}

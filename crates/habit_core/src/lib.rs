//! Core domain logic for the habit tracker.
//! This crate is the single source of truth for habit invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::habit::{
    Habit, HabitCategory, HabitDraft, HabitFrequency, HabitId, HabitInput, HabitPatch,
    HabitValidationError, ReminderTime,
};
pub use model::profile::Profile;
pub use repo::file_slot_store::FileSlotStore;
pub use repo::slot_store::{SlotStore, StorageError, StorageResult, HABITS_SLOT, PROFILE_SLOT};
pub use repo::sqlite_slot_store::SqliteSlotStore;
pub use service::habit_store::{HabitChange, HabitStore, HabitSubscriber, SubscriptionId};
pub use service::profile_store::ProfileStore;
pub use service::reminder_service::{
    reschedule_all, ReminderError, ReminderPlan, ReminderRequest, ReminderScheduler,
};
pub use service::statistics::{
    round_one_decimal, CategoryStats, FrequencyStats, HabitStatistics, TOP_PERFORMER_LIMIT,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

//! Reminder planning for habits with a reminder time.
//!
//! # Responsibility
//! - Turn the habit collection into daily repeating reminder requests.
//! - Drive a platform scheduler: clear everything, then schedule afresh.
//!
//! # Invariants
//! - `reschedule_all` always cancels before scheduling, so reminders are
//!   never duplicated across calls.
//! - Read-only with respect to habits.

use crate::model::habit::{Habit, HabitId};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

const REMINDER_TITLE: &str = "Habit Reminder";

/// One repeating daily reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRequest {
    pub habit_id: HabitId,
    pub title: String,
    pub body: String,
    pub hour: u8,
    pub minute: u8,
    pub repeats: bool,
}

impl ReminderRequest {
    /// Builds the request for `habit`, or `None` when it has no reminder.
    pub fn for_habit(habit: &Habit) -> Option<Self> {
        let time = habit.reminder_time?;
        Some(Self {
            habit_id: habit.id.clone(),
            title: REMINDER_TITLE.to_string(),
            body: format!("Don't forget to {}!", habit.name),
            hour: time.hour(),
            minute: time.minute(),
            repeats: true,
        })
    }
}

/// Platform scheduler failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderError(pub String);

impl Display for ReminderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "reminder scheduling failed: {}", self.0)
    }
}

impl Error for ReminderError {}

/// Platform notification scheduler seam.
pub trait ReminderScheduler {
    fn cancel_all(&mut self) -> Result<(), ReminderError>;
    fn schedule(&mut self, request: &ReminderRequest) -> Result<(), ReminderError>;
}

/// Cancels all reminders, then schedules one per habit with a reminder time.
///
/// Returns the number of scheduled reminders.
pub fn reschedule_all<S: ReminderScheduler + ?Sized>(
    scheduler: &mut S,
    habits: &[Habit],
) -> Result<usize, ReminderError> {
    scheduler.cancel_all()?;
    let mut scheduled = 0;
    for request in habits.iter().filter_map(ReminderRequest::for_habit) {
        scheduler.schedule(&request)?;
        scheduled += 1;
    }
    info!("event=reminders_reschedule module=service status=ok scheduled={scheduled}");
    Ok(scheduled)
}

/// Scheduler that records the plan instead of talking to a platform.
///
/// The bridge hands the recorded plan to the native notification API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderPlan {
    requests: Vec<ReminderRequest>,
}

impl ReminderPlan {
    /// Plan for the given collection.
    pub fn for_habits(habits: &[Habit]) -> Self {
        let mut plan = Self::default();
        // Recording never fails.
        let _ = reschedule_all(&mut plan, habits);
        plan
    }

    pub fn requests(&self) -> &[ReminderRequest] {
        &self.requests
    }

    pub fn into_requests(self) -> Vec<ReminderRequest> {
        self.requests
    }
}

impl ReminderScheduler for ReminderPlan {
    fn cancel_all(&mut self) -> Result<(), ReminderError> {
        self.requests.clear();
        Ok(())
    }

    fn schedule(&mut self, request: &ReminderRequest) -> Result<(), ReminderError> {
        self.requests.push(request.clone());
        Ok(())
    }
}

//! Habit domain model.
//!
//! # Responsibility
//! - Define the persisted `Habit` record and its enumerated attributes.
//! - Parse raw form input into typed drafts and patches.
//! - Provide the completion toggle and partial-update primitives.
//!
//! # Invariants
//! - `id` is stable and never reused for another habit.
//! - `name` is trimmed and non-empty.
//! - `goal >= 1`; `streak` never goes below zero.
//! - Every habit has exactly one category and one frequency.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier assigned at creation time.
///
/// Opaque on the wire: stored documents may carry any non-empty string,
/// while new habits get a UUID v4.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    /// Fresh random id for a new habit.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an existing id, trimming whitespace; `None` when blank.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for HabitId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

static REMINDER_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("valid reminder time regex"));

/// Life area a habit belongs to.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum HabitCategory {
    #[default]
    Health,
    Work,
    Learning,
    Personal,
    Social,
    Financial,
}

impl HabitCategory {
    /// All categories in display order.
    pub const ALL: [HabitCategory; 6] = [
        HabitCategory::Health,
        HabitCategory::Work,
        HabitCategory::Learning,
        HabitCategory::Personal,
        HabitCategory::Social,
        HabitCategory::Financial,
    ];

    /// Wire value (`health`, `work`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Work => "work",
            Self::Learning => "learning",
            Self::Personal => "personal",
            Self::Social => "social",
            Self::Financial => "financial",
        }
    }

    /// Human-readable label for UI lists.
    pub fn label(self) -> &'static str {
        match self {
            Self::Health => "Health",
            Self::Work => "Work",
            Self::Learning => "Learning",
            Self::Personal => "Personal",
            Self::Social => "Social",
            Self::Financial => "Financial",
        }
    }

    /// Case-insensitive parse of the wire value.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
    }
}

/// Period a habit's goal is measured against.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum HabitFrequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl HabitFrequency {
    /// All frequencies in display order.
    pub const ALL: [HabitFrequency; 3] = [
        HabitFrequency::Daily,
        HabitFrequency::Weekly,
        HabitFrequency::Monthly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|frequency| frequency.as_str() == normalized)
    }
}

/// Wall-clock time of day for a recurring reminder.
///
/// Serialized as zero-padded `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReminderTime {
    hour: u8,
    minute: u8,
}

impl ReminderTime {
    /// Builds a reminder time, rejecting out-of-range components.
    pub fn new(hour: u8, minute: u8) -> Result<Self, HabitValidationError> {
        if hour > 23 || minute > 59 {
            return Err(HabitValidationError::InvalidReminderTime(format!(
                "{hour}:{minute:02}"
            )));
        }
        Ok(Self { hour, minute })
    }

    /// Parses `H:MM` or `HH:MM`.
    pub fn parse(value: &str) -> Result<Self, HabitValidationError> {
        let trimmed = value.trim();
        let invalid = || HabitValidationError::InvalidReminderTime(trimmed.to_string());
        let captures = REMINDER_TIME_RE.captures(trimmed).ok_or_else(invalid)?;
        let hour = captures[1].parse::<u8>().map_err(|_| invalid())?;
        let minute = captures[2].parse::<u8>().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }
}

impl Display for ReminderTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl TryFrom<String> for ReminderTime {
    type Error = HabitValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ReminderTime> for String {
    fn from(value: ReminderTime) -> Self {
        value.to_string()
    }
}

/// Validation failures raised before any collection mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitValidationError {
    /// Name is empty after trimming.
    EmptyName,
    /// Category string is not one of the known values.
    UnknownCategory(String),
    /// Frequency string is not one of the known values.
    UnknownFrequency(String),
    /// Reminder time is not a valid `HH:MM` value.
    InvalidReminderTime(String),
    /// Goal must be at least 1.
    InvalidGoal(u32),
    /// Blank string cannot identify a habit.
    EmptyId,
}

impl Display for HabitValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Please enter a habit name"),
            Self::UnknownCategory(value) => write!(f, "unknown habit category `{value}`"),
            Self::UnknownFrequency(value) => write!(f, "unknown habit frequency `{value}`"),
            Self::InvalidReminderTime(value) => {
                write!(f, "invalid reminder time `{value}`; expected HH:MM")
            }
            Self::InvalidGoal(value) => write!(f, "goal must be at least 1, got {value}"),
            Self::EmptyId => write!(f, "habit id must not be empty"),
        }
    }
}

impl Error for HabitValidationError {}

/// Persisted habit record.
///
/// Field names follow the stored JSON document (`camelCase`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: HabitCategory,
    #[serde(default)]
    pub frequency: HabitFrequency,
    /// Empty strings in stored documents decode as no reminder.
    #[serde(default, deserialize_with = "deserialize_reminder_time")]
    pub reminder_time: Option<ReminderTime>,
    /// Target occurrences per period.
    #[serde(default = "default_goal")]
    pub goal: u32,
    /// Current-period completion flag.
    #[serde(default)]
    pub completed: bool,
    /// Consecutive completed periods under the toggle model.
    #[serde(default)]
    pub streak: u32,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Informational only.
    #[serde(default)]
    pub last_completed: Option<i64>,
}

impl Habit {
    /// Creates a habit from a validated draft with a fresh id.
    ///
    /// # Invariants
    /// - `completed` starts as `false` and `streak` as `0`.
    pub fn from_draft(draft: HabitDraft, created_at: i64) -> Self {
        Self {
            id: HabitId::generate(),
            name: draft.name,
            description: draft.description,
            category: draft.category,
            frequency: draft.frequency,
            reminder_time: draft.reminder_time,
            goal: draft.goal,
            completed: false,
            streak: 0,
            created_at,
            last_completed: None,
        }
    }

    /// Checks record-level invariants, used on load paths.
    pub fn validate(&self) -> Result<(), HabitValidationError> {
        if self.id.is_blank() {
            return Err(HabitValidationError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(HabitValidationError::EmptyName);
        }
        if self.goal == 0 {
            return Err(HabitValidationError::InvalidGoal(self.goal));
        }
        Ok(())
    }

    /// Flips completion and moves the streak one step.
    ///
    /// Un-completing decrements the streak, floored at zero.
    pub fn toggle_completion(&mut self, now_ms: i64) {
        if self.completed {
            self.completed = false;
            self.streak = self.streak.saturating_sub(1);
        } else {
            self.completed = true;
            self.streak = self.streak.saturating_add(1);
            self.last_completed = Some(now_ms);
        }
    }

    /// Merges a validated patch; returns whether any field changed.
    pub fn apply_patch(&mut self, patch: &HabitPatch) -> bool {
        let before = self.clone();

        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = &patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(frequency) = patch.frequency {
            self.frequency = frequency;
        }
        if let Some(reminder_time) = patch.reminder_time {
            self.reminder_time = reminder_time;
        }
        if let Some(goal) = patch.goal {
            self.goal = goal;
        }

        *self != before
    }
}

/// Typed, validated creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitDraft {
    pub name: String,
    pub description: String,
    pub category: HabitCategory,
    pub frequency: HabitFrequency,
    pub reminder_time: Option<ReminderTime>,
    pub goal: u32,
}

impl HabitDraft {
    /// Draft with default attributes for the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category: HabitCategory::default(),
            frequency: HabitFrequency::default(),
            reminder_time: None,
            goal: 1,
        }
    }

    pub fn validate(&self) -> Result<(), HabitValidationError> {
        if self.name.trim().is_empty() {
            return Err(HabitValidationError::EmptyName);
        }
        if self.goal == 0 {
            return Err(HabitValidationError::InvalidGoal(self.goal));
        }
        Ok(())
    }
}

/// Partial update. `None` leaves the field untouched.
///
/// `reminder_time: Some(None)` clears the reminder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<HabitCategory>,
    pub frequency: Option<HabitFrequency>,
    pub reminder_time: Option<Option<ReminderTime>>,
    pub goal: Option<u32>,
}

impl HabitPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> Result<(), HabitValidationError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(HabitValidationError::EmptyName);
            }
        }
        if let Some(goal) = self.goal {
            if goal == 0 {
                return Err(HabitValidationError::InvalidGoal(goal));
            }
        }
        Ok(())
    }
}

/// Raw form input exactly as the view layer collects it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitInput {
    pub name: String,
    pub description: String,
    /// Empty selects the default category.
    pub category: String,
    /// Empty selects the default frequency.
    pub frequency: String,
    /// `HH:MM`, or empty for no reminder.
    pub reminder_time: String,
    /// Falls back to 1 when unparsable or below 1.
    pub goal: String,
}

impl HabitInput {
    /// Validates and coerces raw strings into a typed draft.
    ///
    /// # Errors
    /// - `EmptyName` when the trimmed name is empty.
    /// - `UnknownCategory` / `UnknownFrequency` for out-of-set values.
    /// - `InvalidReminderTime` for malformed or out-of-range times.
    pub fn parse(&self) -> Result<HabitDraft, HabitValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(HabitValidationError::EmptyName);
        }

        let category = match self.category.trim() {
            "" => HabitCategory::default(),
            raw => HabitCategory::parse(raw)
                .ok_or_else(|| HabitValidationError::UnknownCategory(raw.to_string()))?,
        };
        let frequency = match self.frequency.trim() {
            "" => HabitFrequency::default(),
            raw => HabitFrequency::parse(raw)
                .ok_or_else(|| HabitValidationError::UnknownFrequency(raw.to_string()))?,
        };
        let reminder_time = match self.reminder_time.trim() {
            "" => None,
            raw => Some(ReminderTime::parse(raw)?),
        };

        Ok(HabitDraft {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            category,
            frequency,
            reminder_time,
            goal: coerce_goal(&self.goal),
        })
    }

    /// Parses the edit form into a patch that overwrites every field.
    pub fn to_patch(&self) -> Result<HabitPatch, HabitValidationError> {
        let draft = self.parse()?;
        Ok(HabitPatch {
            name: Some(draft.name),
            description: Some(draft.description),
            category: Some(draft.category),
            frequency: Some(draft.frequency),
            reminder_time: Some(draft.reminder_time),
            goal: Some(draft.goal),
        })
    }
}

fn coerce_goal(raw: &str) -> u32 {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|goal| *goal >= 1)
        .and_then(|goal| u32::try_from(goal).ok())
        .unwrap_or(1)
}

fn default_goal() -> u32 {
    1
}

fn deserialize_reminder_time<'de, D>(deserializer: D) -> Result<Option<ReminderTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => ReminderTime::parse(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

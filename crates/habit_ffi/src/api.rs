//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose habit and profile use-cases to Dart via FRB.
//! - Own the process-wide store handles behind locks.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Lookup misses are reported as successful no-ops.
//! - Validation failures carry the user-facing message.

use habit_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    round_one_decimal, CategoryStats, FileSlotStore, FrequencyStats, Habit, HabitId, HabitInput,
    HabitStatistics, HabitStore, Profile, ProfileStore, ReminderPlan, ReminderRequest,
    SlotStore, SqliteSlotStore,
};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

const DATA_DIR_ENV: &str = "HABIT_DATA_DIR";
const STORAGE_BACKEND_ENV: &str = "HABIT_STORAGE_BACKEND";
const DEFAULT_DATA_DIR_NAME: &str = "habit_data";
const SQLITE_FILE_NAME: &str = "habit.sqlite3";

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();
static HABIT_STORE: OnceLock<Mutex<HabitStore>> = OnceLock::new();
static PROFILE_STORE: OnceLock<Mutex<ProfileStore>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the application-private data directory and loads both stores.
///
/// # FFI contract
/// - Must run before any other store call to take effect; later calls with
///   the same directory are no-ops.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn habit_store_init(data_dir: String) -> String {
    let trimmed = data_dir.trim();
    if trimmed.is_empty() {
        return "data_dir cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = DATA_DIR.get_or_init(|| requested.clone());
    if *active != requested {
        return format!(
            "habit store already initialized at `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        );
    }

    habit_store();
    profile_store();
    String::new()
}

/// Blocks until pending habit writes are on disk.
///
/// Call when the app moves to the background.
#[flutter_rust_bridge::frb(sync)]
pub fn habit_store_flush() -> String {
    match with_habit_store(|store| store.flush()) {
        Ok(()) => String::new(),
        Err(err) => format!("habit_store_flush failed: {err}"),
    }
}

/// Habit row as rendered by the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitItem {
    pub habit_id: String,
    pub name: String,
    pub description: String,
    /// `health|work|learning|personal|social|financial`.
    pub category: String,
    /// `daily|weekly|monthly`.
    pub frequency: String,
    /// `HH:MM` when a reminder is set.
    pub reminder_time: Option<String>,
    pub goal: u32,
    pub completed: bool,
    pub streak: u32,
    pub created_at_ms: i64,
    pub last_completed_ms: Option<i64>,
}

/// Generic action envelope for habit mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitActionResponse {
    /// Whether the call was accepted. Lookup misses are accepted no-ops.
    pub ok: bool,
    /// Affected habit ID; `None` when nothing matched.
    pub habit_id: Option<String>,
    /// Human-readable message for inline validation or diagnostics.
    pub message: String,
}

impl HabitActionResponse {
    fn success(message: impl Into<String>, habit_id: &HabitId) -> Self {
        Self {
            ok: true,
            habit_id: Some(habit_id.to_string()),
            message: message.into(),
        }
    }

    fn unchanged() -> Self {
        Self {
            ok: true,
            habit_id: None,
            message: "Nothing changed.".to_string(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            habit_id: None,
            message: message.into(),
        }
    }
}

/// Category row for the statistics screen.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryItem {
    pub category: String,
    pub label: String,
    pub count: u32,
    pub completed_count: u32,
    /// Rounded to one decimal.
    pub average_streak: f64,
}

/// Frequency row for the statistics screen.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyItem {
    pub frequency: String,
    pub label: String,
    pub count: u32,
    /// Rounded to one decimal.
    pub percentage: f64,
}

/// Statistics screen payload. Rates are rounded to one decimal.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsView {
    pub total_habits: u32,
    pub completed_today: u32,
    pub pending_today: u32,
    pub completion_rate: f64,
    pub total_streak: u64,
    pub average_streak: f64,
    pub categories: Vec<CategoryItem>,
    pub frequencies: Vec<FrequencyItem>,
    pub top_performers: Vec<HabitItem>,
}

/// One native reminder to register after cancelling all existing ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderItem {
    pub habit_id: String,
    pub title: String,
    pub body: String,
    pub hour: u8,
    pub minute: u8,
    pub repeats: bool,
}

/// Profile screen payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub name: String,
    pub email: String,
    pub bio: String,
    pub profile_picture: Option<String>,
}

/// Lists habits in creation order.
#[flutter_rust_bridge::frb(sync)]
pub fn habit_list() -> Vec<HabitItem> {
    with_habit_store(|store| store.habits().iter().map(to_habit_item).collect())
        .unwrap_or_default()
}

/// Creates a habit from raw form strings.
///
/// # FFI contract
/// - Returns `ok=false` with the validation message for rejected input.
/// - Persistence runs in the background and never fails this call.
#[flutter_rust_bridge::frb(sync)]
pub fn habit_create(
    name: String,
    description: String,
    category: String,
    frequency: String,
    reminder_time: String,
    goal: String,
) -> HabitActionResponse {
    let input = HabitInput {
        name,
        description,
        category,
        frequency,
        reminder_time,
        goal,
    };
    match with_habit_store(|store| store.create(&input)) {
        Ok(Ok(habit_id)) => HabitActionResponse::success("Habit created.", &habit_id),
        Ok(Err(err)) => HabitActionResponse::failure(err.to_string()),
        Err(err) => HabitActionResponse::failure(format!("habit_create failed: {err}")),
    }
}

/// Applies the edit form to an existing habit.
#[flutter_rust_bridge::frb(sync)]
pub fn habit_update(
    habit_id: String,
    name: String,
    description: String,
    category: String,
    frequency: String,
    reminder_time: String,
    goal: String,
) -> HabitActionResponse {
    let input = HabitInput {
        name,
        description,
        category,
        frequency,
        reminder_time,
        goal,
    };
    if let Err(err) = input.parse() {
        return HabitActionResponse::failure(err.to_string());
    }
    let Some(id) = parse_habit_id(&habit_id) else {
        return HabitActionResponse::unchanged();
    };
    match with_habit_store(|store| store.update_from_input(&id, &input)) {
        Ok(Ok(true)) => HabitActionResponse::success("Habit updated.", &id),
        Ok(Ok(false)) => HabitActionResponse::unchanged(),
        Ok(Err(err)) => HabitActionResponse::failure(err.to_string()),
        Err(err) => HabitActionResponse::failure(format!("habit_update failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn habit_delete(habit_id: String) -> HabitActionResponse {
    let Some(id) = parse_habit_id(&habit_id) else {
        return HabitActionResponse::unchanged();
    };
    match with_habit_store(|store| store.delete(&id)) {
        Ok(true) => HabitActionResponse::success("Habit deleted.", &id),
        Ok(false) => HabitActionResponse::unchanged(),
        Err(err) => HabitActionResponse::failure(format!("habit_delete failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn habit_toggle(habit_id: String) -> HabitActionResponse {
    let Some(id) = parse_habit_id(&habit_id) else {
        return HabitActionResponse::unchanged();
    };
    let toggled = with_habit_store(|store| {
        store.toggle_completion(&id);
        store.get(&id).map(|habit| habit.completed)
    });
    match toggled {
        Ok(Some(true)) => HabitActionResponse::success("Habit completed.", &id),
        Ok(Some(false)) => HabitActionResponse::success("Habit reopened.", &id),
        Ok(None) => HabitActionResponse::unchanged(),
        Err(err) => HabitActionResponse::failure(format!("habit_toggle failed: {err}")),
    }
}

/// Recomputes statistics for the current collection.
#[flutter_rust_bridge::frb(sync)]
pub fn habit_statistics() -> StatisticsView {
    let stats = with_habit_store(|store| store.statistics())
        .unwrap_or_else(|_| HabitStatistics::from_habits(&[]));
    to_statistics_view(&stats)
}

/// Reminder plan for the native scheduler.
///
/// Dart must cancel every scheduled notification before registering these.
#[flutter_rust_bridge::frb(sync)]
pub fn habit_reminder_plan() -> Vec<ReminderItem> {
    with_habit_store(|store| ReminderPlan::for_habits(store.habits()).into_requests())
        .unwrap_or_default()
        .iter()
        .map(to_reminder_item)
        .collect()
}

#[flutter_rust_bridge::frb(sync)]
pub fn profile_get() -> ProfileView {
    let profile = with_profile_store(|store| store.profile().clone()).unwrap_or_default();
    ProfileView {
        name: profile.name,
        email: profile.email,
        bio: profile.bio,
        profile_picture: profile.profile_picture,
    }
}

/// Saves the profile.
///
/// Returns empty string on success and error message on failure, so the
/// UI can alert on explicit saves.
#[flutter_rust_bridge::frb(sync)]
pub fn profile_save(
    name: String,
    email: String,
    bio: String,
    profile_picture: Option<String>,
) -> String {
    let profile = Profile {
        name: name.trim().to_string(),
        email: email.trim().to_string(),
        bio,
        profile_picture,
    };
    match with_profile_store(|store| store.save(profile)) {
        Ok(Ok(())) => String::new(),
        Ok(Err(err)) => format!("profile_save failed: {err}"),
        Err(err) => format!("profile_save failed: {err}"),
    }
}

fn resolve_data_dir() -> &'static Path {
    DATA_DIR.get_or_init(|| {
        if let Ok(raw) = std::env::var(DATA_DIR_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }
        std::env::temp_dir().join(DEFAULT_DATA_DIR_NAME)
    })
}

fn open_slots() -> Box<dyn SlotStore> {
    let data_dir = resolve_data_dir();
    let backend = std::env::var(STORAGE_BACKEND_ENV).unwrap_or_default();
    if backend.trim().eq_ignore_ascii_case("sqlite") {
        let opened = std::fs::create_dir_all(data_dir)
            .map_err(|err| err.to_string())
            .and_then(|()| {
                SqliteSlotStore::open(data_dir.join(SQLITE_FILE_NAME))
                    .map_err(|err| err.to_string())
            });
        match opened {
            Ok(slots) => return Box::new(slots),
            Err(err) => warn!(
                "event=slots_open module=ffi status=error backend=sqlite fallback=file error={err}"
            ),
        }
    }
    Box::new(FileSlotStore::new(data_dir))
}

fn habit_store() -> &'static Mutex<HabitStore> {
    HABIT_STORE.get_or_init(|| {
        let store = HabitStore::load(open_slots());
        info!(
            "event=habit_store_init module=ffi status=ok count={}",
            store.len()
        );
        Mutex::new(store)
    })
}

fn profile_store() -> &'static Mutex<ProfileStore> {
    PROFILE_STORE.get_or_init(|| Mutex::new(ProfileStore::load(open_slots())))
}

fn with_habit_store<T>(f: impl FnOnce(&mut HabitStore) -> T) -> Result<T, String> {
    let mut guard = habit_store()
        .lock()
        .map_err(|_| "habit store lock poisoned".to_string())?;
    Ok(f(&mut guard))
}

fn with_profile_store<T>(f: impl FnOnce(&mut ProfileStore) -> T) -> Result<T, String> {
    let mut guard = profile_store()
        .lock()
        .map_err(|_| "profile store lock poisoned".to_string())?;
    Ok(f(&mut guard))
}

fn parse_habit_id(raw: &str) -> Option<HabitId> {
    HabitId::parse(raw)
}

fn to_habit_item(habit: &Habit) -> HabitItem {
    HabitItem {
        habit_id: habit.id.to_string(),
        name: habit.name.clone(),
        description: habit.description.clone(),
        category: habit.category.as_str().to_string(),
        frequency: habit.frequency.as_str().to_string(),
        reminder_time: habit.reminder_time.map(|time| time.to_string()),
        goal: habit.goal,
        completed: habit.completed,
        streak: habit.streak,
        created_at_ms: habit.created_at,
        last_completed_ms: habit.last_completed,
    }
}

fn to_category_item(stats: &CategoryStats) -> CategoryItem {
    CategoryItem {
        category: stats.category.as_str().to_string(),
        label: stats.category.label().to_string(),
        count: saturating_u32(stats.count),
        completed_count: saturating_u32(stats.completed_count),
        average_streak: round_one_decimal(stats.average_streak()),
    }
}

fn to_frequency_item(stats: &FrequencyStats) -> FrequencyItem {
    FrequencyItem {
        frequency: stats.frequency.as_str().to_string(),
        label: stats.frequency.label().to_string(),
        count: saturating_u32(stats.count),
        percentage: round_one_decimal(stats.percentage),
    }
}

fn to_statistics_view(stats: &HabitStatistics) -> StatisticsView {
    let (completed, pending) = stats.completion_split();
    StatisticsView {
        total_habits: saturating_u32(stats.total_habits),
        completed_today: saturating_u32(completed),
        pending_today: saturating_u32(pending),
        completion_rate: round_one_decimal(stats.completion_rate),
        total_streak: stats.total_streak,
        average_streak: round_one_decimal(stats.average_streak),
        categories: stats.categories.iter().map(to_category_item).collect(),
        frequencies: stats.frequencies.iter().map(to_frequency_item).collect(),
        top_performers: stats.top_performers.iter().map(to_habit_item).collect(),
    }
}

fn to_reminder_item(request: &ReminderRequest) -> ReminderItem {
    ReminderItem {
        habit_id: request.habit_id.to_string(),
        title: request.title.clone(),
        body: request.body.clone(),
        hour: request.hour,
        minute: request.minute,
        repeats: request.repeats,
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, habit_create, habit_delete, habit_list, habit_reminder_plan,
        habit_statistics, habit_store_flush, habit_toggle, habit_update, init_logging, ping,
        habit_store_init, profile_get, profile_save, HabitActionResponse,
    };
    use std::sync::OnceLock;
    use std::time::{SystemTime, UNIX_EPOCH};
    use tempfile::TempDir;

    static SCRATCH_DIR: OnceLock<TempDir> = OnceLock::new();

    /// Pins the process-wide stores to a per-run scratch directory.
    fn use_scratch_data_dir() {
        let dir = SCRATCH_DIR.get_or_init(|| tempfile::tempdir().expect("create scratch dir"));
        let error = habit_store_init(dir.path().to_string_lossy().into_owned());
        assert!(error.is_empty(), "{error}");
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn create_rejects_blank_name_with_user_message() {
        use_scratch_data_dir();
        let response = create("   ", "", "");
        assert!(!response.ok);
        assert_eq!(response.message, "Please enter a habit name");
    }

    #[test]
    fn create_toggle_update_delete_flow() {
        use_scratch_data_dir();
        let name = unique_token("ffi-flow");
        let created = create(&name, "learning", "07:30");
        assert!(created.ok, "{}", created.message);
        let habit_id = created.habit_id.expect("create should return habit_id");

        let listed = habit_list()
            .into_iter()
            .find(|item| item.habit_id == habit_id)
            .expect("created habit should be listed");
        assert_eq!(listed.category, "learning");
        assert_eq!(listed.reminder_time.as_deref(), Some("07:30"));
        assert_eq!(listed.streak, 0);

        let toggled = habit_toggle(habit_id.clone());
        assert_eq!(toggled.message, "Habit completed.");
        let stats = habit_statistics();
        assert!(stats.total_habits >= 1);
        assert!(stats.total_streak >= 1);

        assert!(habit_reminder_plan()
            .iter()
            .any(|item| item.habit_id == habit_id && (item.hour, item.minute) == (7, 30)));

        let updated = habit_update(
            habit_id.clone(),
            format!("{name} renamed"),
            String::new(),
            "work".to_string(),
            "weekly".to_string(),
            String::new(),
            "2".to_string(),
        );
        assert!(updated.ok, "{}", updated.message);

        assert!(habit_store_flush().is_empty());

        let deleted = habit_delete(habit_id.clone());
        assert_eq!(deleted.habit_id.as_deref(), Some(habit_id.as_str()));
        assert!(!habit_list().iter().any(|item| item.habit_id == habit_id));

        let after_delete = habit_toggle(habit_id);
        assert!(after_delete.ok);
        assert_eq!(after_delete.habit_id, None);
    }

    #[test]
    fn unknown_or_blank_ids_are_no_ops() {
        use_scratch_data_dir();
        let response = habit_delete("not-a-uuid".to_string());
        assert!(response.ok);
        assert_eq!(response.habit_id, None);

        let response = habit_toggle("   ".to_string());
        assert!(response.ok);
        assert_eq!(response.habit_id, None);
    }

    #[test]
    fn update_validates_form_before_id_lookup() {
        use_scratch_data_dir();
        let response = habit_update(
            "   ".to_string(),
            "  ".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            "1".to_string(),
        );
        assert!(!response.ok);
        assert_eq!(response.message, "Please enter a habit name");

        let response = habit_update(
            "missing-id".to_string(),
            "Read".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            "1".to_string(),
        );
        assert!(response.ok);
        assert_eq!(response.message, "Nothing changed.");
    }

    #[test]
    fn profile_save_round_trips() {
        use_scratch_data_dir();
        let name = unique_token("profile");
        let error = profile_save(
            name.clone(),
            " me@example.com ".to_string(),
            "bio".to_string(),
            None,
        );
        assert!(error.is_empty(), "{error}");

        let profile = profile_get();
        assert_eq!(profile.name, name);
        assert_eq!(profile.email, "me@example.com");
    }

    fn create(name: &str, category: &str, reminder_time: &str) -> HabitActionResponse {
        habit_create(
            name.to_string(),
            String::new(),
            category.to_string(),
            String::new(),
            reminder_time.to_string(),
            "1".to_string(),
        )
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}

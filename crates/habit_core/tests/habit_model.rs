use habit_core::{
    Habit, HabitCategory, HabitDraft, HabitFrequency, HabitInput, HabitPatch,
    HabitId, HabitValidationError, ReminderTime,
};

fn form(name: &str) -> HabitInput {
    HabitInput {
        name: name.to_string(),
        ..HabitInput::default()
    }
}

#[test]
fn input_parse_trims_and_applies_defaults() {
    let draft = form("  Meditate  ").parse().unwrap();

    assert_eq!(draft.name, "Meditate");
    assert_eq!(draft.description, "");
    assert_eq!(draft.category, HabitCategory::Health);
    assert_eq!(draft.frequency, HabitFrequency::Daily);
    assert_eq!(draft.reminder_time, None);
    assert_eq!(draft.goal, 1);
}

#[test]
fn input_parse_reads_every_field() {
    let input = HabitInput {
        name: "Budget review".to_string(),
        description: " weekly numbers ".to_string(),
        category: "Financial".to_string(),
        frequency: "weekly".to_string(),
        reminder_time: "18:30".to_string(),
        goal: "2".to_string(),
    };
    let draft = input.parse().unwrap();

    assert_eq!(draft.description, "weekly numbers");
    assert_eq!(draft.category, HabitCategory::Financial);
    assert_eq!(draft.frequency, HabitFrequency::Weekly);
    assert_eq!(draft.reminder_time, Some(ReminderTime::new(18, 30).unwrap()));
    assert_eq!(draft.goal, 2);
}

#[test]
fn input_parse_rejects_blank_name_and_unknown_enums() {
    assert_eq!(form("   ").parse().unwrap_err(), HabitValidationError::EmptyName);

    let mut input = form("Walk");
    input.category = "hobbies".to_string();
    assert_eq!(
        input.parse().unwrap_err(),
        HabitValidationError::UnknownCategory("hobbies".to_string())
    );

    let mut input = form("Walk");
    input.frequency = "hourly".to_string();
    assert_eq!(
        input.parse().unwrap_err(),
        HabitValidationError::UnknownFrequency("hourly".to_string())
    );

    let mut input = form("Walk");
    input.reminder_time = "25:00".to_string();
    assert!(matches!(
        input.parse().unwrap_err(),
        HabitValidationError::InvalidReminderTime(_)
    ));
}

#[test]
fn unparsable_goal_falls_back_to_one() {
    let mut input = form("Stretch");
    input.goal = "many".to_string();
    assert_eq!(input.parse().unwrap().goal, 1);
}

#[test]
fn new_habit_starts_incomplete_with_zero_streak() {
    let habit = Habit::from_draft(HabitDraft::new("Journal"), 1_700_000_000_000);

    assert!(uuid::Uuid::parse_str(habit.id.as_str()).is_ok());
    assert!(!habit.completed);
    assert_eq!(habit.streak, 0);
    assert_eq!(habit.created_at, 1_700_000_000_000);
    assert_eq!(habit.last_completed, None);
}

#[test]
fn toggle_twice_from_zero_never_goes_negative() {
    let mut habit = Habit::from_draft(HabitDraft::new("Journal"), 0);

    habit.toggle_completion(10);
    assert!(habit.completed);
    assert_eq!(habit.streak, 1);
    assert_eq!(habit.last_completed, Some(10));

    habit.toggle_completion(20);
    assert!(!habit.completed);
    assert_eq!(habit.streak, 0);

    habit.completed = true;
    habit.toggle_completion(30);
    assert_eq!(habit.streak, 0);
}

#[test]
fn patch_validation_and_change_detection() {
    let mut habit = Habit::from_draft(HabitDraft::new("Read"), 0);

    assert!(HabitPatch::default().is_empty());
    assert_eq!(
        HabitPatch {
            name: Some(" ".to_string()),
            ..HabitPatch::default()
        }
        .validate()
        .unwrap_err(),
        HabitValidationError::EmptyName
    );
    assert_eq!(
        HabitPatch {
            goal: Some(0),
            ..HabitPatch::default()
        }
        .validate()
        .unwrap_err(),
        HabitValidationError::InvalidGoal(0)
    );

    let same_name = HabitPatch {
        name: Some("Read".to_string()),
        ..HabitPatch::default()
    };
    assert!(!habit.apply_patch(&same_name));

    let clear_and_move = HabitPatch {
        category: Some(HabitCategory::Learning),
        reminder_time: Some(None),
        ..HabitPatch::default()
    };
    assert!(habit.apply_patch(&clear_and_move));
    assert_eq!(habit.category, HabitCategory::Learning);
}

#[test]
fn habit_serialization_uses_expected_wire_fields() {
    let id = HabitId::parse("11111111-2222-4333-8444-555555555555").unwrap();
    let mut habit = Habit::from_draft(
        HabitDraft {
            reminder_time: Some(ReminderTime::new(7, 5).unwrap()),
            category: HabitCategory::Social,
            frequency: HabitFrequency::Monthly,
            goal: 3,
            ..HabitDraft::new("Call family")
        },
        1_700_000_000_000,
    );
    habit.id = id.clone();
    habit.streak = 4;

    let json = serde_json::to_value(&habit).unwrap();
    assert_eq!(json["id"], id.as_str());
    assert_eq!(json["name"], "Call family");
    assert_eq!(json["category"], "social");
    assert_eq!(json["frequency"], "monthly");
    assert_eq!(json["reminderTime"], "07:05");
    assert_eq!(json["goal"], 3);
    assert_eq!(json["completed"], false);
    assert_eq!(json["streak"], 4);
    assert_eq!(json["createdAt"], 1_700_000_000_000_i64);
    assert!(json["lastCompleted"].is_null());

    let decoded: Habit = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, habit);
}

#[test]
fn deserialize_rejects_out_of_set_category() {
    let value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "name": "Paint",
        "category": "art",
        "createdAt": 0
    });
    assert!(serde_json::from_value::<Habit>(value).is_err());
}

#[test]
fn deserialize_accepts_timestamp_id_and_blank_reminder() {
    let value = serde_json::json!({
        "id": "1700000000000",
        "name": "Stretch",
        "reminderTime": "",
        "createdAt": 1_700_000_000_000_i64
    });
    let habit: Habit = serde_json::from_value(value).unwrap();
    assert_eq!(habit.id.as_str(), "1700000000000");
    assert_eq!(habit.reminder_time, None);
    assert!(habit.validate().is_ok());
}

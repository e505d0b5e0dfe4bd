use habit_core::{
    reschedule_all, Habit, HabitDraft, ReminderError, ReminderPlan, ReminderRequest,
    ReminderScheduler, ReminderTime,
};

#[derive(Default)]
struct FakePlatform {
    active: Vec<ReminderRequest>,
    cancel_calls: usize,
    fail_on_schedule: bool,
}

impl ReminderScheduler for FakePlatform {
    fn cancel_all(&mut self) -> Result<(), ReminderError> {
        self.cancel_calls += 1;
        self.active.clear();
        Ok(())
    }

    fn schedule(&mut self, request: &ReminderRequest) -> Result<(), ReminderError> {
        if self.fail_on_schedule {
            return Err(ReminderError("permission denied".to_string()));
        }
        self.active.push(request.clone());
        Ok(())
    }
}

fn habit_with_reminder(name: &str, reminder: Option<&str>) -> Habit {
    Habit::from_draft(
        HabitDraft {
            reminder_time: reminder.map(|value| ReminderTime::parse(value).unwrap()),
            ..HabitDraft::new(name)
        },
        0,
    )
}

#[test]
fn reschedule_skips_habits_without_reminder_time() {
    let habits = vec![
        habit_with_reminder("drink water", Some("9:00")),
        habit_with_reminder("read", None),
        habit_with_reminder("stretch", Some("21:15")),
    ];
    let mut platform = FakePlatform::default();

    assert_eq!(reschedule_all(&mut platform, &habits).unwrap(), 2);
    assert_eq!(platform.active.len(), 2);

    let first = &platform.active[0];
    assert_eq!(first.habit_id, habits[0].id);
    assert_eq!(first.title, "Habit Reminder");
    assert_eq!(first.body, "Don't forget to drink water!");
    assert_eq!((first.hour, first.minute), (9, 0));
    assert!(first.repeats);
    assert_eq!((platform.active[1].hour, platform.active[1].minute), (21, 15));
}

#[test]
fn repeated_reschedule_does_not_duplicate() {
    let habits = vec![habit_with_reminder("journal", Some("22:00"))];
    let mut platform = FakePlatform::default();

    reschedule_all(&mut platform, &habits).unwrap();
    reschedule_all(&mut platform, &habits).unwrap();

    assert_eq!(platform.cancel_calls, 2);
    assert_eq!(platform.active.len(), 1);
}

#[test]
fn scheduler_errors_propagate() {
    let habits = vec![habit_with_reminder("journal", Some("22:00"))];
    let mut platform = FakePlatform {
        fail_on_schedule: true,
        ..FakePlatform::default()
    };

    let err = reschedule_all(&mut platform, &habits).unwrap_err();
    assert!(err.to_string().contains("permission denied"));
}

#[test]
fn plan_records_requests_in_collection_order() {
    let habits = vec![
        habit_with_reminder("b", Some("08:00")),
        habit_with_reminder("a", Some("07:00")),
    ];
    let plan = ReminderPlan::for_habits(&habits);
    let bodies = plan
        .requests()
        .iter()
        .map(|request| request.body.as_str())
        .collect::<Vec<_>>();
    assert_eq!(bodies, vec!["Don't forget to b!", "Don't forget to a!"]);
    assert_eq!(ReminderPlan::for_habits(&[]).into_requests(), Vec::new());
}

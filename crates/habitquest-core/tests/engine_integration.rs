//! End-to-end engine test over the public API.
//!
//! Runs the full flow -- seed, mutate, derive stats, arm and fire alarms,
//! snooze, reset -- against an on-disk database in a temporary home
//! directory. Kept as a single test function because it overrides HOME for
//! the whole process.

use std::cell::RefCell;

use chrono::{Duration, Utc};
use habitquest_core::{
    AlarmScheduler, Category, Event, HabitStore, NewHabit, Notification, Notifier, NotifyAction,
    SNOOZE_PENALTY_XP,
};

#[derive(Default)]
struct RecordingNotifier {
    presented: RefCell<Vec<Notification>>,
}

impl Notifier for RecordingNotifier {
    fn request_permission(&self) -> Result<bool, Box<dyn std::error::Error>> {
        Ok(true)
    }

    fn present(&self, notification: &Notification) -> Result<(), Box<dyn std::error::Error>> {
        self.presented.borrow_mut().push(notification.clone());
        Ok(())
    }

    fn cancel_all_pending(&self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }
}

#[test]
fn full_engine_lifecycle() {
    let home = tempfile::tempdir().unwrap();
    std::env::set_var("HOME", home.path());
    std::env::set_var("HABITQUEST_ENV", "dev");

    // First run seeds the default collection.
    let mut store = HabitStore::open().unwrap();
    assert_eq!(store.habits().len(), 10);

    // A fresh habit with an alarm.
    let event = store
        .add_habit(NewHabit {
            name: "Evening Run".into(),
            icon: "🏃".into(),
            category: Category::Strength,
            xp_reward: 10,
            goal_value: 30,
            alarm_time: chrono::NaiveTime::from_hms_opt(19, 0, 0),
            hardcore_alarm: false,
        })
        .unwrap();
    let Event::HabitAdded { habit, .. } = event else {
        panic!("expected HabitAdded");
    };
    let id = habit.id;

    // Complete five days and check the derived numbers.
    let mut day = chrono::Local::now().date_naive();
    for _ in 0..5 {
        store.toggle_date(id, day).unwrap();
        day = day.pred_opt().unwrap();
    }
    let progression = store.progression();
    assert_eq!(progression.completed_days(id), 5);
    assert_eq!(progression.total_xp(), 50);
    assert_eq!(progression.player_level(), 1);
    assert!(progression.streak() >= 5);
    assert_eq!(progression.xp_multiplier(), 1.5);

    // Arm everything: the seeded set has six alarm-bearing habits plus ours.
    let mut scheduler = AlarmScheduler::new();
    let now = Utc::now();
    let armed = scheduler.schedule_all(&store, now);
    assert_eq!(armed, 7);
    assert_eq!(scheduler.pending().len(), 7);

    // A day later every alarm has fired once and re-armed.
    let notifier = RecordingNotifier::default();
    let events = scheduler.tick(&store, &notifier, now + Duration::hours(25));
    assert_eq!(events.len(), 7);
    assert_eq!(scheduler.pending().len(), 7);
    assert_eq!(notifier.presented.borrow().len(), 7);

    // Snoozing our habit costs XP and schedules a retry.
    let event = scheduler
        .handle_action(&mut store, &notifier, id, NotifyAction::Snooze, now)
        .unwrap();
    assert!(matches!(event, Some(Event::AlarmSnoozed { .. })));
    assert_eq!(store.snooze_penalty(), SNOOZE_PENALTY_XP);
    assert_eq!(store.progression().total_xp(), 50 - u64::from(SNOOZE_PENALTY_XP));

    // State survives a reopen.
    let json = serde_json::to_string(&scheduler).unwrap();
    drop(store);
    let mut store = HabitStore::open().unwrap();
    let mut scheduler: AlarmScheduler = serde_json::from_str(&json).unwrap();
    assert_eq!(store.habits().len(), 11);
    assert_eq!(store.snooze_penalty(), SNOOZE_PENALTY_XP);
    assert_eq!(store.progression().completed_days(id), 5);
    assert_eq!(scheduler.pending().len(), 8);

    // Reset wipes it all.
    store.reset_all().unwrap();
    scheduler.clear();
    assert!(store.habits().is_empty());
    assert_eq!(store.progression().total_xp(), 0);
    assert_eq!(store.player_name(), "Player_One");
}

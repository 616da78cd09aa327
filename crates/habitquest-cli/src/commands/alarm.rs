use clap::Subcommand;
use chrono::Utc;
use habitquest_core::storage::database::keys;
use habitquest_core::storage::Database;
use habitquest_core::{AlarmScheduler, HabitStore, Notifier, NotifyAction};
use uuid::Uuid;

use crate::notify::TerminalNotifier;

#[derive(Subcommand)]
pub enum AlarmAction {
    /// List pending wake-ups as JSON
    List,
    /// Cancel everything and re-arm one wake-up per eligible habit
    Schedule,
    /// Poll for due alarms, presenting notifications as they fire
    Watch {
        /// Seconds between polls
        #[arg(long, default_value_t = 30)]
        interval: u64,
        /// Run a single poll and exit
        #[arg(long)]
        once: bool,
    },
    /// Reply "complete" to a fired notification
    Complete { id: Uuid },
    /// Reply "snooze" to a fired notification
    Snooze { id: Uuid },
    /// Ask the notification bridge for presentation permission
    Permission,
}

pub(crate) fn load_scheduler(db: &Database) -> AlarmScheduler {
    if let Ok(Some(json)) = db.kv_get(keys::ALARM_SCHEDULER) {
        if let Ok(scheduler) = serde_json::from_str::<AlarmScheduler>(&json) {
            return scheduler;
        }
    }
    AlarmScheduler::new()
}

pub(crate) fn save_scheduler(
    db: &Database,
    scheduler: &AlarmScheduler,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(scheduler)?;
    db.kv_set(keys::ALARM_SCHEDULER, &json)?;
    Ok(())
}

pub fn run(action: AlarmAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = HabitStore::open()?;
    let mut scheduler = load_scheduler(store.database());
    let notifier = TerminalNotifier;

    match action {
        AlarmAction::List => {
            println!("{}", serde_json::to_string_pretty(&scheduler.pending())?);
        }
        AlarmAction::Schedule => {
            if let Err(e) = notifier.cancel_all_pending() {
                eprintln!("Warning: failed to cancel queued notifications: {e}");
            }
            let count = scheduler.schedule_all(&store, Utc::now());
            save_scheduler(store.database(), &scheduler)?;
            eprintln!("Armed {count} alarm(s)");
            println!("{}", serde_json::to_string_pretty(&scheduler.pending())?);
        }
        AlarmAction::Watch { interval, once } => loop {
            let events = scheduler.tick(&store, &notifier, Utc::now());
            for event in &events {
                println!("{}", serde_json::to_string_pretty(event)?);
            }
            save_scheduler(store.database(), &scheduler)?;
            if once {
                break;
            }
            std::thread::sleep(std::time::Duration::from_secs(interval));
            store.reload()?;
        },
        AlarmAction::Complete { id } => {
            let event =
                scheduler.handle_action(&mut store, &notifier, id, NotifyAction::Complete, Utc::now())?;
            save_scheduler(store.database(), &scheduler)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        AlarmAction::Snooze { id } => {
            let event =
                scheduler.handle_action(&mut store, &notifier, id, NotifyAction::Snooze, Utc::now())?;
            save_scheduler(store.database(), &scheduler)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        AlarmAction::Permission => {
            let granted = notifier.request_permission()?;
            if granted {
                eprintln!("Notification permission granted");
            } else {
                eprintln!("Notification permission denied; alarms will fire silently");
            }
        }
    }

    Ok(())
}

use chrono::{NaiveTime, Utc};
use clap::Subcommand;
use habitquest_core::{Category, Config, Event, HabitStore, NewHabit};
use uuid::Uuid;

use super::alarm::{load_scheduler, save_scheduler};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Add a new habit
    Add {
        name: String,
        /// Icon glyph shown next to the habit
        #[arg(long, default_value = "⭐")]
        icon: String,
        /// strength, intelligence, or discipline
        #[arg(long, default_value = "discipline")]
        category: Category,
        /// XP granted per completed day
        #[arg(long, default_value_t = 10)]
        xp: u32,
        /// Goal length in days (defaults to game.default_goal_days)
        #[arg(long)]
        goal: Option<u32>,
        /// Daily alarm time, HH:MM
        #[arg(long)]
        alarm: Option<String>,
        /// Disallow snoozing this habit's alarm
        #[arg(long)]
        hardcore: bool,
    },
    /// List habits as JSON
    List,
    /// Delete a habit and cancel its alarms
    Delete { id: Uuid },
    /// Toggle completion for today, or for a day of the display month
    Toggle {
        id: Uuid,
        #[arg(long)]
        day: Option<u32>,
    },
    /// Include a habit in alarm scheduling again
    Activate { id: Uuid },
    /// Exclude a habit from alarm scheduling
    Deactivate { id: Uuid },
    /// Change or clear a habit's alarm
    SetAlarm {
        id: Uuid,
        /// New alarm time, HH:MM (omit together with --hardcore to clear)
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        hardcore: bool,
    },
}

fn parse_alarm(s: &str) -> Result<NaiveTime, Box<dyn std::error::Error>> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| format!("invalid alarm time '{s}', expected HH:MM").into())
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = HabitStore::open()?;
    let mut scheduler = load_scheduler(store.database());

    match action {
        HabitAction::Add {
            name,
            icon,
            category,
            xp,
            goal,
            alarm,
            hardcore,
        } => {
            let goal = goal.unwrap_or_else(|| Config::load_or_default().game.default_goal_days);
            let alarm_time = alarm.as_deref().map(parse_alarm).transpose()?;
            let event = store.add_habit(NewHabit {
                name,
                icon,
                category,
                xp_reward: xp,
                goal_value: goal,
                alarm_time,
                hardcore_alarm: hardcore,
            })?;
            if let Event::HabitAdded { ref habit, .. } = event {
                scheduler.schedule_habit(habit, Utc::now());
                save_scheduler(store.database(), &scheduler)?;
            }
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        HabitAction::List => {
            println!("{}", serde_json::to_string_pretty(store.habits())?);
        }
        HabitAction::Delete { id } => {
            let event = store.delete_habit(id)?;
            scheduler.cancel(id);
            save_scheduler(store.database(), &scheduler)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        HabitAction::Toggle { id, day } => {
            let event = match day {
                Some(day) => store.toggle_day(id, day)?,
                None => store.toggle_today(id)?,
            };
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        HabitAction::Activate { id } => {
            let event = store.set_active(id, true)?;
            reschedule(&mut scheduler, &store, id)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        HabitAction::Deactivate { id } => {
            let event = store.set_active(id, false)?;
            reschedule(&mut scheduler, &store, id)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        HabitAction::SetAlarm { id, time, hardcore } => {
            let alarm_time = time.as_deref().map(parse_alarm).transpose()?;
            let event = store.set_alarm(id, alarm_time, hardcore)?;
            reschedule(&mut scheduler, &store, id)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
    }

    Ok(())
}

/// Re-evaluate one habit's wake-ups after an edit: drop everything pending
/// for the id, then re-arm if it is still eligible.
fn reschedule(
    scheduler: &mut habitquest_core::AlarmScheduler,
    store: &HabitStore,
    id: Uuid,
) -> Result<(), Box<dyn std::error::Error>> {
    scheduler.cancel(id);
    if let Some(habit) = store.habit(id) {
        scheduler.schedule_habit(habit, Utc::now());
    }
    save_scheduler(store.database(), scheduler)
}

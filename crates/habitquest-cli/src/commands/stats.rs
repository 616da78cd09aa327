use clap::Subcommand;
use habitquest_core::HabitStore;
use serde::Serialize;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Full player snapshot (level, XP, streak, multiplier, breakdowns)
    Show,
    /// XP totals per stat category
    Categories,
    /// One habit's goal progress
    Habit { id: Uuid },
}

#[derive(Serialize)]
struct HabitProgress {
    habit_id: Uuid,
    completed_days: u32,
    goal_value: u32,
    progress_pct: f64,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = HabitStore::open()?;
    let progression = store.progression();

    match action {
        StatsAction::Show => {
            println!(
                "{}",
                serde_json::to_string_pretty(&progression.snapshot_event())?
            );
        }
        StatsAction::Categories => {
            println!(
                "{}",
                serde_json::to_string_pretty(&progression.category_stats())?
            );
        }
        StatsAction::Habit { id } => {
            let progress = HabitProgress {
                habit_id: id,
                completed_days: progression.completed_days(id),
                goal_value: store.habit(id).map(|h| h.goal_value).unwrap_or(0),
                progress_pct: progression.progress(id),
            };
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
    }

    Ok(())
}

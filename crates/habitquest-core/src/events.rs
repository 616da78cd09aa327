use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::habit::Habit;
use crate::progression::PlayerStats;

/// Every state change in the system produces an Event.
/// The UI collaborator consumes these as its "re-render" signal; the CLI
/// prints them as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    HabitAdded {
        habit: Habit,
        at: DateTime<Utc>,
    },
    HabitUpdated {
        habit: Habit,
        at: DateTime<Utc>,
    },
    HabitDeleted {
        habit_id: Uuid,
        at: DateTime<Utc>,
    },
    DayToggled {
        habit_id: Uuid,
        date: NaiveDate,
        checked: bool,
        at: DateTime<Utc>,
    },
    PlayerRenamed {
        name: String,
        at: DateTime<Utc>,
    },
    /// A daily or snoozed wake-up reached its fire instant and a
    /// notification was presented.
    AlarmFired {
        habit_id: Uuid,
        habit_name: String,
        hardcore: bool,
        at: DateTime<Utc>,
    },
    /// A snooze was accepted: penalty applied, one-off retry scheduled.
    AlarmSnoozed {
        habit_id: Uuid,
        retry_at: DateTime<Utc>,
        penalty_xp: u32,
        at: DateTime<Utc>,
    },
    /// A snooze was refused (hardcore habit): penalty applied, nothing
    /// scheduled.
    SnoozeDenied {
        habit_id: Uuid,
        penalty_xp: u32,
        at: DateTime<Utc>,
    },
    DataReset {
        at: DateTime<Utc>,
    },
    StatsSnapshot {
        stats: PlayerStats,
        at: DateTime<Utc>,
    },
}

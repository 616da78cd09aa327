//! Durable habit collection and penalty ledger.
//!
//! [`HabitStore`] owns the habit collection, the snooze-penalty ledger, the
//! player display name, and the display month used by day-of-month
//! operations. Every mutation persists write-through to the key-value store
//! before returning, so a crash never observes a half-applied change.
//!
//! Reads follow a total-function policy: a lookup that finds nothing
//! returns a neutral default (0, false) instead of an error, so rendering
//! code never needs null-checks.

use chrono::{Datelike, Local, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use super::{default_habits, Habit, NewHabit};
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::storage::database::keys;
use crate::storage::Database;

/// Display name used when the player has not chosen one.
pub const DEFAULT_PLAYER_NAME: &str = "Player_One";

/// Durable store for habits, the penalty ledger, and player identity.
pub struct HabitStore {
    db: Database,
    habits: Vec<Habit>,
    snooze_penalty: u32,
    player_name: Option<String>,
    /// (year, month 1-12) that day-of-month operations resolve against.
    display_month: (i32, u32),
}

impl HabitStore {
    /// Open the store on the default database, loading persisted state and
    /// seeding the default habit set if the collection is empty.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or the seed cannot
    /// be persisted.
    pub fn open() -> Result<Self> {
        let db = Database::open()?;
        Self::with_database(db)
    }

    /// Open the store on an already-open database.
    pub fn with_database(db: Database) -> Result<Self> {
        let today = Local::now().date_naive();
        let mut store = Self {
            db,
            habits: Vec::new(),
            snooze_penalty: 0,
            player_name: None,
            display_month: (today.year(), today.month()),
        };
        store.reload()?;
        if store.habits.is_empty() {
            store.seed_defaults()?;
        }
        Ok(store)
    }

    /// Re-read all persisted state, discarding in-memory copies.
    ///
    /// A corrupt habits snapshot is warned about and treated as empty
    /// rather than aborting the process.
    pub fn reload(&mut self) -> Result<()> {
        self.habits = match self.db.kv_get(keys::HABITS)? {
            Some(json) => match serde_json::from_str(&json) {
                Ok(habits) => habits,
                Err(e) => {
                    eprintln!("Warning: discarding unreadable habits snapshot: {e}");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        self.snooze_penalty = self
            .db
            .kv_get(keys::SNOOZE_PENALTY)?
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        self.player_name = self.db.kv_get(keys::PLAYER_NAME)?;
        Ok(())
    }

    fn seed_defaults(&mut self) -> Result<()> {
        for input in default_habits() {
            self.habits.push(Habit::new(input)?);
        }
        self.persist_habits()
    }

    fn persist_habits(&self) -> Result<()> {
        let json = serde_json::to_string(&self.habits)?;
        self.db.kv_set(keys::HABITS, &json)?;
        Ok(())
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn habit(&self, id: Uuid) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub fn is_date_checked(&self, id: Uuid, date: NaiveDate) -> bool {
        self.habit(id)
            .and_then(|h| h.daily_logs.get(&date).copied())
            .unwrap_or(false)
    }

    /// Whether `day` of the display month is checked. False for unknown
    /// habits and out-of-range days.
    pub fn is_day_checked(&self, id: Uuid, day: u32) -> bool {
        match self.resolve_day(day) {
            Ok(date) => self.is_date_checked(id, date),
            Err(_) => false,
        }
    }

    pub fn is_today_checked(&self, id: Uuid) -> bool {
        self.is_date_checked(id, Local::now().date_naive())
    }

    pub fn player_name(&self) -> String {
        self.player_name
            .clone()
            .unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string())
    }

    pub fn snooze_penalty(&self) -> u32 {
        self.snooze_penalty
    }

    pub fn display_month(&self) -> (i32, u32) {
        self.display_month
    }

    /// Number of days in the display month.
    pub fn days_in_month(&self) -> u32 {
        let (year, month) = self.display_month;
        days_in_month(year, month)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    // ── Mutations (each persists before returning) ───────────────────

    /// Add a habit from validated input. The returned event carries the
    /// stored record, fresh id included.
    pub fn add_habit(&mut self, input: NewHabit) -> Result<Event> {
        let habit = Habit::new(input)?;
        self.habits.push(habit.clone());
        self.persist_habits()?;
        Ok(Event::HabitAdded {
            habit,
            at: Utc::now(),
        })
    }

    /// Remove the habit with the given id. `Ok(None)` if it was absent.
    /// Callers owning a scheduler should cancel the habit's alarm as well.
    pub fn delete_habit(&mut self, id: Uuid) -> Result<Option<Event>> {
        let before = self.habits.len();
        self.habits.retain(|h| h.id != id);
        if self.habits.len() == before {
            return Ok(None);
        }
        self.persist_habits()?;
        Ok(Some(Event::HabitDeleted {
            habit_id: id,
            at: Utc::now(),
        }))
    }

    /// Flip the completion log for `date`. `Ok(None)` if the habit does
    /// not exist; otherwise the event carries the new state.
    pub fn toggle_date(&mut self, id: Uuid, date: NaiveDate) -> Result<Option<Event>> {
        let Some(habit) = self.habits.iter_mut().find(|h| h.id == id) else {
            return Ok(None);
        };
        let entry = habit.daily_logs.entry(date).or_insert(false);
        *entry = !*entry;
        let checked = *entry;
        self.persist_habits()?;
        Ok(Some(Event::DayToggled {
            habit_id: id,
            date,
            checked,
            at: Utc::now(),
        }))
    }

    /// Flip `day` of the display month.
    ///
    /// # Errors
    /// Rejects a day that does not exist in the display month.
    pub fn toggle_day(&mut self, id: Uuid, day: u32) -> Result<Option<Event>> {
        let date = self.resolve_day(day)?;
        self.toggle_date(id, date)
    }

    pub fn toggle_today(&mut self, id: Uuid) -> Result<Option<Event>> {
        self.toggle_date(id, Local::now().date_naive())
    }

    pub fn set_active(&mut self, id: Uuid, is_active: bool) -> Result<Option<Event>> {
        self.update_habit(id, |h| h.is_active = is_active)
    }

    pub fn set_alarm(
        &mut self,
        id: Uuid,
        alarm_time: Option<NaiveTime>,
        hardcore: bool,
    ) -> Result<Option<Event>> {
        self.update_habit(id, |h| {
            h.alarm_time = alarm_time;
            h.hardcore_alarm = hardcore;
        })
    }

    fn update_habit(
        &mut self,
        id: Uuid,
        apply: impl FnOnce(&mut Habit),
    ) -> Result<Option<Event>> {
        let Some(habit) = self.habits.iter_mut().find(|h| h.id == id) else {
            return Ok(None);
        };
        apply(habit);
        let habit = habit.clone();
        self.persist_habits()?;
        Ok(Some(Event::HabitUpdated {
            habit,
            at: Utc::now(),
        }))
    }

    /// Set the player display name. An empty name reverts to the default.
    pub fn set_player_name(&mut self, name: &str) -> Result<Event> {
        let name = name.trim();
        let name = if name.is_empty() {
            DEFAULT_PLAYER_NAME
        } else {
            name
        };
        self.db.kv_set(keys::PLAYER_NAME, name)?;
        self.player_name = Some(name.to_string());
        Ok(Event::PlayerRenamed {
            name: name.to_string(),
            at: Utc::now(),
        })
    }

    /// Add to the snooze-penalty ledger, returning the new total.
    pub fn add_snooze_penalty(&mut self, amount: u32) -> Result<u32> {
        self.snooze_penalty = self.snooze_penalty.saturating_add(amount);
        self.db
            .kv_set(keys::SNOOZE_PENALTY, &self.snooze_penalty.to_string())?;
        Ok(self.snooze_penalty)
    }

    /// Clear the habit collection, the player name, and the penalty
    /// ledger. Irreversible.
    pub fn reset_all(&mut self) -> Result<Event> {
        self.habits.clear();
        self.snooze_penalty = 0;
        self.player_name = None;
        self.db.kv_delete(keys::HABITS)?;
        self.db.kv_delete(keys::PLAYER_NAME)?;
        self.db.kv_delete(keys::SNOOZE_PENALTY)?;
        Ok(Event::DataReset { at: Utc::now() })
    }

    /// Change the month that day-of-month operations resolve against.
    pub fn set_display_month(&mut self, year: i32, month: u32) -> Result<()> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(ValidationError::InvalidDate {
                year,
                month,
                day: 1,
            }
            .into());
        }
        self.display_month = (year, month);
        Ok(())
    }

    fn resolve_day(&self, day: u32) -> Result<NaiveDate, ValidationError> {
        let (year, month) = self.display_month;
        NaiveDate::from_ymd_opt(year, month, day).ok_or(ValidationError::InvalidDate {
            year,
            month,
            day,
        })
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match (first, next) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        // Unreachable through a validated display month.
        _ => 0,
    }
}

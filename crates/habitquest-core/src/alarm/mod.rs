//! Alarm scheduling and the snooze-penalty state machine.
//!
//! The scheduler is wall-clock based with no internal threads: the host
//! calls [`AlarmScheduler::tick`] periodically and pending wake-ups fire
//! when their instant has passed. Each eligible habit (alarm time set,
//! active) holds exactly one armed entry; firing immediately re-arms for
//! the next day before returning, so the invariant survives every tick.
//! Snooze retries are independent one-shots and never displace the daily
//! entry.
//!
//! State is serializable: a process-per-command host persists the
//! scheduler between runs and replays queued notification actions against
//! reloaded store state.

pub mod notify;

pub use notify::{Notification, Notifier, NotifyAction, Urgency};

use std::collections::HashMap;

use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::events::Event;
use crate::habit::{Habit, HabitStore};

/// XP deducted from the ledger per applied (or refused) snooze.
pub const SNOOZE_PENALTY_XP: u32 = 5;

/// Delay before a snoozed alarm fires again.
pub const SNOOZE_DELAY_MIN: i64 = 10;

/// Kind of pending wake-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmKind {
    /// The repeating daily occurrence.
    Daily,
    /// A one-shot snooze retry.
    Snooze,
}

/// A pending wake-up, as reported to the UI collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingAlarm {
    pub habit_id: Uuid,
    pub fire_at: DateTime<Utc>,
    pub kind: AlarmKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnoozeEntry {
    habit_id: Uuid,
    fire_at: DateTime<Utc>,
}

/// Per-habit alarm state machine. See the module docs for the model.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AlarmScheduler {
    /// One armed daily wake-up per eligible habit.
    armed: HashMap<Uuid, DateTime<Utc>>,
    /// Independent snooze one-shots.
    #[serde(default)]
    snoozed: Vec<SnoozeEntry>,
}

impl AlarmScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Arming ───────────────────────────────────────────────────────

    /// Re-evaluate one habit: arm it for the next occurrence of its alarm
    /// time, or go idle if it is no longer eligible. Returns the armed
    /// instant, if any.
    pub fn schedule_habit(&mut self, habit: &Habit, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if !habit.alarm_eligible() {
            self.armed.remove(&habit.id);
            return None;
        }
        let alarm_time = habit.alarm_time?;
        match next_occurrence(alarm_time, now) {
            Some(fire_at) => {
                self.armed.insert(habit.id, fire_at);
                Some(fire_at)
            }
            None => {
                // Local-time gap (DST transition); skip this habit without
                // aborting the rest.
                eprintln!(
                    "Warning: could not resolve next occurrence of {alarm_time} for '{}'",
                    habit.name
                );
                self.armed.remove(&habit.id);
                None
            }
        }
    }

    /// Cancel every pending wake-up for a habit, daily and snoozed alike.
    pub fn cancel(&mut self, habit_id: Uuid) {
        self.armed.remove(&habit_id);
        self.snoozed.retain(|s| s.habit_id != habit_id);
    }

    /// Cancel everything, then re-arm one wake-up per eligible habit.
    /// Called after any bulk change (collection reload, reset). Idempotent.
    /// Returns the number of habits armed.
    pub fn schedule_all(&mut self, store: &HabitStore, now: DateTime<Utc>) -> usize {
        self.armed.clear();
        self.snoozed.clear();
        store
            .habits()
            .iter()
            .filter(|h| self.schedule_habit(h, now).is_some())
            .count()
    }

    /// Drop all pending wake-ups without re-arming.
    pub fn clear(&mut self) {
        self.armed.clear();
        self.snoozed.clear();
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// The armed daily instant for a habit, if any.
    pub fn armed_for(&self, habit_id: Uuid) -> Option<DateTime<Utc>> {
        self.armed.get(&habit_id).copied()
    }

    /// All pending wake-ups, soonest first.
    pub fn pending(&self) -> Vec<PendingAlarm> {
        let mut pending: Vec<PendingAlarm> = self
            .armed
            .iter()
            .map(|(&habit_id, &fire_at)| PendingAlarm {
                habit_id,
                fire_at,
                kind: AlarmKind::Daily,
            })
            .chain(self.snoozed.iter().map(|s| PendingAlarm {
                habit_id: s.habit_id,
                fire_at: s.fire_at,
                kind: AlarmKind::Snooze,
            }))
            .collect();
        pending.sort_by_key(|p| p.fire_at);
        pending
    }

    // ── Firing ───────────────────────────────────────────────────────

    /// Fire every wake-up whose instant has passed, presenting each through
    /// the bridge and re-arming daily entries for the following day.
    ///
    /// Presentation failures are warned about and never abort the tick;
    /// wake-ups for habits that vanished or became ineligible since arming
    /// are dropped silently.
    pub fn tick(
        &mut self,
        store: &HabitStore,
        notifier: &dyn Notifier,
        now: DateTime<Utc>,
    ) -> Vec<Event> {
        let mut events = Vec::new();

        let due: Vec<Uuid> = self
            .armed
            .iter()
            .filter(|(_, &fire_at)| fire_at <= now)
            .map(|(&id, _)| id)
            .collect();
        for habit_id in due {
            match store.habit(habit_id) {
                Some(habit) if habit.alarm_eligible() => {
                    self.present(notifier, &Notification::quest(habit));
                    // Re-arm before returning: daily-repeat semantics do not
                    // depend on the user acting on the notification.
                    self.schedule_habit(habit, now);
                    events.push(Event::AlarmFired {
                        habit_id,
                        habit_name: habit.name.clone(),
                        hardcore: habit.hardcore_alarm,
                        at: now,
                    });
                }
                _ => {
                    self.armed.remove(&habit_id);
                }
            }
        }

        let (due_snoozes, rest): (Vec<SnoozeEntry>, Vec<SnoozeEntry>) = self
            .snoozed
            .drain(..)
            .partition(|s| s.fire_at <= now);
        self.snoozed = rest;
        for entry in due_snoozes {
            if let Some(habit) = store.habit(entry.habit_id) {
                self.present(notifier, &Notification::quest(habit));
                events.push(Event::AlarmFired {
                    habit_id: habit.id,
                    habit_name: habit.name.clone(),
                    hardcore: habit.hardcore_alarm,
                    at: now,
                });
            }
        }

        events
    }

    /// Handle a user action delivered back through the bridge. Tolerates
    /// replayed/stale actions: an unknown habit id is a no-op.
    pub fn handle_action(
        &mut self,
        store: &mut HabitStore,
        notifier: &dyn Notifier,
        habit_id: Uuid,
        action: NotifyAction,
        now: DateTime<Utc>,
    ) -> Result<Option<Event>> {
        match action {
            NotifyAction::Complete => {
                let today = now.with_timezone(&Local).date_naive();
                store.toggle_date(habit_id, today)
            }
            NotifyAction::Snooze => {
                let Some(habit) = store.habit(habit_id).cloned() else {
                    return Ok(None);
                };
                store.add_snooze_penalty(SNOOZE_PENALTY_XP)?;
                if habit.hardcore_alarm {
                    self.present(notifier, &Notification::snooze_denied(&habit, SNOOZE_PENALTY_XP));
                    Ok(Some(Event::SnoozeDenied {
                        habit_id,
                        penalty_xp: SNOOZE_PENALTY_XP,
                        at: now,
                    }))
                } else {
                    let retry_at = now + Duration::minutes(SNOOZE_DELAY_MIN);
                    self.snoozed.push(SnoozeEntry { habit_id, fire_at: retry_at });
                    Ok(Some(Event::AlarmSnoozed {
                        habit_id,
                        retry_at,
                        penalty_xp: SNOOZE_PENALTY_XP,
                        at: now,
                    }))
                }
            }
        }
    }

    fn present(&self, notifier: &dyn Notifier, notification: &Notification) {
        if let Err(e) = notifier.present(notification) {
            eprintln!("Warning: failed to present notification: {e}");
        }
    }
}

/// Next occurrence of `alarm` strictly after `now`, evaluated in the local
/// timezone: today's occurrence if it is still ahead, otherwise tomorrow's.
fn next_occurrence(alarm: NaiveTime, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    next_occurrence_in(&Local, alarm, now)
}

fn next_occurrence_in<Tz: TimeZone>(
    tz: &Tz,
    alarm: NaiveTime,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let today = now.with_timezone(tz).date_naive();
    for day in [today, today.succ_opt()?] {
        if let Some(candidate) = tz
            .from_local_datetime(&day.and_time(alarm))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
        {
            if candidate > now {
                return Some(candidate);
            }
        }
    }
    None
}

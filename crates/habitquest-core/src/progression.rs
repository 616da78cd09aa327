//! Progression math: XP, levels, streaks, category breakdowns.
//!
//! Everything here is a pure read over [`HabitStore`] state, recomputed on
//! demand. The level curve is quadratic: level L spans the XP band
//! `[(L-1)^2 * 100, L^2 * 100)`, so `level = floor(sqrt(xp / 100)) + 1`.
//!
//! The streak multiplier is informational only: it is reported for display
//! and never folded into the XP total.

use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::events::Event;
use crate::habit::{Category, Habit, HabitStore};

/// Fixed XP width factor of a level band.
const LEVEL_BAND_XP: u64 = 100;

/// Streak length at which the display multiplier kicks in.
const MULTIPLIER_STREAK: u32 = 3;

/// Per-category XP totals, for radar-style breakdowns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub strength: u64,
    pub intelligence: u64,
    pub discipline: u64,
}

impl CategoryStats {
    pub fn get(&self, category: Category) -> u64 {
        match category {
            Category::Strength => self.strength,
            Category::Intelligence => self.intelligence,
            Category::Discipline => self.discipline,
        }
    }

    fn add(&mut self, category: Category, xp: u64) {
        match category {
            Category::Strength => self.strength += xp,
            Category::Intelligence => self.intelligence += xp,
            Category::Discipline => self.discipline += xp,
        }
    }
}

/// Serializable aggregate of every game-facing number, consumed by the UI
/// collaborator as a single render payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player_name: String,
    pub level: u32,
    pub total_xp: u64,
    /// XP at which the next level is reached.
    pub xp_for_next_level: u64,
    /// Percent of the way through the current level band, floored.
    pub level_progress_pct: u32,
    pub streak: u32,
    /// Display-only multiplier; not applied to `total_xp`.
    pub xp_multiplier: f64,
    pub total_completed: u64,
    pub total_quests: usize,
    pub snooze_penalty: u32,
    pub categories: CategoryStats,
}

/// Progression calculator over a borrowed store.
pub struct Progression<'a> {
    store: &'a HabitStore,
}

impl HabitStore {
    /// Derived game stats for the current collection.
    pub fn progression(&self) -> Progression<'_> {
        Progression { store: self }
    }
}

impl<'a> Progression<'a> {
    /// Count of completed days for a habit; 0 for unknown ids.
    pub fn completed_days(&self, id: Uuid) -> u32 {
        self.store.habit(id).map(Habit::completed_days).unwrap_or(0)
    }

    /// Goal progress in percent, clamped to [0, 100].
    pub fn progress(&self, id: Uuid) -> f64 {
        let Some(habit) = self.store.habit(id) else {
            return 0.0;
        };
        progress_pct(habit.completed_days(), habit.goal_value)
    }

    /// Aggregate XP across all habits minus the snooze penalty, floored at
    /// zero.
    pub fn total_xp(&self) -> u64 {
        let earned: u64 = self
            .store
            .habits()
            .iter()
            .map(|h| u64::from(h.completed_days()) * u64::from(h.xp_reward))
            .sum();
        earned.saturating_sub(u64::from(self.store.snooze_penalty()))
    }

    /// Current level. Level 1 is the floor for zero XP.
    pub fn player_level(&self) -> u32 {
        level_for_xp(self.total_xp())
    }

    /// XP at which `level + 1` is reached (the upper boundary of `level`'s
    /// band).
    pub fn xp_for_level(&self, level: u32) -> u64 {
        xp_for_level(level)
    }

    /// Percent of the way through the current level band, floored to an
    /// integer in [0, 100].
    pub fn level_progress_percent(&self) -> u32 {
        level_progress_pct(self.total_xp())
    }

    /// Best current streak across all habits, ending today (local time).
    ///
    /// Each habit contributes its own run of consecutive completed days
    /// walking backward from today; habits are not required to be completed
    /// together.
    pub fn streak(&self) -> u32 {
        self.streak_on(Local::now().date_naive())
    }

    /// Streak as of an explicit "today", for deterministic evaluation.
    pub fn streak_on(&self, today: NaiveDate) -> u32 {
        self.store
            .habits()
            .iter()
            .map(|h| habit_streak(h, today))
            .max()
            .unwrap_or(0)
    }

    /// 1.5 once the streak reaches 3, otherwise 1.0. Display-only.
    pub fn xp_multiplier(&self) -> f64 {
        self.multiplier_for(self.streak())
    }

    pub fn multiplier_for(&self, streak: u32) -> f64 {
        if streak >= MULTIPLIER_STREAK {
            1.5
        } else {
            1.0
        }
    }

    /// XP earned per category (penalty not applied; the ledger is global,
    /// not per-category).
    pub fn category_stats(&self) -> CategoryStats {
        let mut stats = CategoryStats::default();
        for habit in self.store.habits() {
            let xp = u64::from(habit.completed_days()) * u64::from(habit.xp_reward);
            stats.add(habit.category, xp);
        }
        stats
    }

    /// Sum of completed days across all habits.
    pub fn total_completed(&self) -> u64 {
        self.store
            .habits()
            .iter()
            .map(|h| u64::from(h.completed_days()))
            .sum()
    }

    /// Full render payload as of an explicit "today".
    pub fn snapshot_on(&self, today: NaiveDate) -> PlayerStats {
        let total_xp = self.total_xp();
        let level = level_for_xp(total_xp);
        let streak = self.streak_on(today);
        PlayerStats {
            player_name: self.store.player_name(),
            level,
            total_xp,
            xp_for_next_level: xp_for_level(level),
            level_progress_pct: level_progress_pct(total_xp),
            streak,
            xp_multiplier: self.multiplier_for(streak),
            total_completed: self.total_completed(),
            total_quests: self.store.habits().len(),
            snooze_penalty: self.store.snooze_penalty(),
            categories: self.category_stats(),
        }
    }

    /// Full render payload for today, wrapped as a re-render event.
    pub fn snapshot_event(&self) -> Event {
        Event::StatsSnapshot {
            stats: self.snapshot_on(Local::now().date_naive()),
            at: Utc::now(),
        }
    }
}

/// Consecutive completed days for one habit, walking back from `today`.
/// Stops at the first missing or false day.
fn habit_streak(habit: &Habit, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today;
    while habit.daily_logs.get(&day).copied().unwrap_or(false) {
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}

fn progress_pct(completed: u32, goal: u32) -> f64 {
    if goal == 0 {
        return 0.0;
    }
    (f64::from(completed) / f64::from(goal) * 100.0).min(100.0)
}

fn level_for_xp(xp: u64) -> u32 {
    ((xp / LEVEL_BAND_XP) as f64).sqrt().floor() as u32 + 1
}

fn xp_for_level(level: u32) -> u64 {
    u64::from(level).pow(2) * LEVEL_BAND_XP
}

fn level_progress_pct(xp: u64) -> u32 {
    let level = level_for_xp(xp);
    let lower = xp_for_level(level - 1);
    let upper = xp_for_level(level);
    let band = upper - lower;
    if band == 0 {
        return 0;
    }
    (((xp - lower) * 100) / band).min(100) as u32
}

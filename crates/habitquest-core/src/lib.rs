//! # HabitQuest Core Library
//!
//! This library provides the core business logic for HabitQuest, a habit
//! tracker played as an RPG stat game. It implements a CLI-first philosophy
//! where all operations are available via a standalone CLI binary, with any
//! graphical dashboard being a thin rendering layer over the same core
//! library.
//!
//! ## Architecture
//!
//! - **Habit Store**: CRUD over the habit collection, the snooze-penalty
//!   ledger, and player identity, persisted write-through to a key-value
//!   store
//! - **Progression**: XP, level, streak, and category math derived on
//!   demand from store state
//! - **Alarm Scheduler**: a wall-clock state machine that keeps one pending
//!   wake-up per alarm-bearing habit; the caller invokes `tick()`
//!   periodically
//! - **Notification Bridge**: trait seam to the host notification facility
//!
//! ## Key Components
//!
//! - [`HabitStore`]: durable habit collection
//! - [`Progression`]: derived game stats
//! - [`AlarmScheduler`]: alarm/snooze state machine
//! - [`Notifier`]: host notification capability

pub mod alarm;
pub mod error;
pub mod events;
pub mod habit;
pub mod progression;
pub mod storage;

pub use alarm::{
    AlarmKind, AlarmScheduler, Notification, Notifier, NotifyAction, PendingAlarm, Urgency,
    SNOOZE_DELAY_MIN, SNOOZE_PENALTY_XP,
};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use habit::{default_habits, Category, Habit, HabitStore, NewHabit, DEFAULT_GOAL_DAYS};
pub use progression::{CategoryStats, PlayerStats, Progression};
pub use storage::{Config, Database};

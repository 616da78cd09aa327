//! Habit data model.
//!
//! A [`Habit`] is a trackable recurring task with a sparse per-day
//! completion log. Habits belong to one of three fixed stat categories and
//! optionally carry a daily wall-clock alarm; "hardcore" alarms refuse
//! snoozing.

pub mod store;

pub use store::HabitStore;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Stat category a habit counts toward.
///
/// The set is fixed: breakdowns (radar charts, category totals) iterate
/// [`Category::ALL`], so a new category means a new variant here, never an
/// inferred key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Strength,
    Intelligence,
    Discipline,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Strength,
        Category::Intelligence,
        Category::Discipline,
    ];

    /// Human-readable display name.
    pub fn display_name(self) -> &'static str {
        match self {
            Category::Strength => "Strength",
            Category::Intelligence => "Intelligence",
            Category::Discipline => "Discipline",
        }
    }

    /// Icon glyph shown next to the category.
    pub fn icon(self) -> &'static str {
        match self {
            Category::Strength => "💪",
            Category::Intelligence => "🧠",
            Category::Discipline => "🎯",
        }
    }

    /// Accent color (hex) used by chart-style renderings.
    pub fn accent_color(self) -> &'static str {
        match self {
            Category::Strength => "#FF006E",
            Category::Intelligence => "#3A86FF",
            Category::Discipline => "#06FFA5",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strength" => Ok(Category::Strength),
            "intelligence" => Ok(Category::Intelligence),
            "discipline" => Ok(Category::Discipline),
            other => Err(ValidationError::InvalidValue {
                field: "category",
                message: format!("unknown category '{other}'"),
            }),
        }
    }
}

/// A trackable habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Assigned at creation, immutable, unique within the collection.
    pub id: Uuid,
    pub name: String,
    pub icon: String,
    pub category: Category,
    /// XP granted per completed day. Always positive.
    pub xp_reward: u32,
    /// Target count of completed days. Always positive.
    pub goal_value: u32,
    /// Wall-clock alarm time; `None` means no alarm.
    #[serde(default)]
    pub alarm_time: Option<NaiveTime>,
    /// When true, snoozing is refused and a penalty is forced instead.
    #[serde(default)]
    pub hardcore_alarm: bool,
    /// Sparse completion log. A missing day is "not completed", never
    /// "unknown".
    #[serde(default)]
    pub daily_logs: BTreeMap<NaiveDate, bool>,
    /// Inactive habits are excluded from alarm scheduling.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Habit {
    /// Whether this habit should have a daily wake-up armed.
    pub fn alarm_eligible(&self) -> bool {
        self.alarm_time.is_some() && self.is_active
    }

    /// Count of completed days in the log.
    pub fn completed_days(&self) -> u32 {
        self.daily_logs.values().filter(|&&v| v).count() as u32
    }
}

/// Input for creating a habit. Validated by [`Habit::new`] before any state
/// is touched.
#[derive(Debug, Clone)]
pub struct NewHabit {
    pub name: String,
    pub icon: String,
    pub category: Category,
    pub xp_reward: u32,
    pub goal_value: u32,
    pub alarm_time: Option<NaiveTime>,
    pub hardcore_alarm: bool,
}

impl Habit {
    /// Construct a habit from validated input with a fresh unique id.
    ///
    /// # Errors
    /// Rejects an empty name and zero `xp_reward`/`goal_value` rather than
    /// clamping, keeping positivity a construction-time invariant.
    pub fn new(input: NewHabit) -> Result<Self, ValidationError> {
        if input.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        if input.xp_reward == 0 {
            return Err(ValidationError::InvalidValue {
                field: "xp_reward",
                message: "must be positive".into(),
            });
        }
        if input.goal_value == 0 {
            return Err(ValidationError::InvalidValue {
                field: "goal_value",
                message: "must be positive".into(),
            });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            icon: input.icon,
            category: input.category,
            xp_reward: input.xp_reward,
            goal_value: input.goal_value,
            alarm_time: input.alarm_time,
            hardcore_alarm: input.hardcore_alarm,
            daily_logs: BTreeMap::new(),
            is_active: true,
        })
    }
}

/// Goal length applied to the seeded defaults.
pub const DEFAULT_GOAL_DAYS: u32 = 30;

/// The default habit set used to populate an empty collection on first run.
pub fn default_habits() -> Vec<NewHabit> {
    fn alarm(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }
    fn habit(
        name: &str,
        icon: &str,
        category: Category,
        xp: u32,
        alarm_time: Option<NaiveTime>,
        hardcore: bool,
    ) -> NewHabit {
        NewHabit {
            name: name.to_string(),
            icon: icon.to_string(),
            category,
            xp_reward: xp,
            goal_value: DEFAULT_GOAL_DAYS,
            alarm_time,
            hardcore_alarm: hardcore,
        }
    }

    vec![
        habit("Wake up 6AM", "🌅", Category::Discipline, 15, alarm(6, 0), true),
        habit("No Snoozing", "⏰", Category::Discipline, 10, alarm(6, 0), true),
        habit("3L Water", "💧", Category::Strength, 10, None, false),
        habit("Gym", "🏋️", Category::Strength, 20, alarm(7, 0), false),
        habit("Stretching", "🧘", Category::Strength, 10, None, false),
        habit("Read 10 Pages", "📚", Category::Intelligence, 15, alarm(21, 0), false),
        habit("Meditation", "🧘", Category::Discipline, 15, alarm(6, 30), false),
        habit("Study 1 Hour", "💻", Category::Intelligence, 20, None, false),
        habit("Skincare", "✨", Category::Discipline, 10, alarm(22, 0), false),
        habit("Track Expenses", "💰", Category::Intelligence, 10, None, false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_habit_rejects_empty_name() {
        let input = NewHabit {
            name: "  ".into(),
            icon: "🏋️".into(),
            category: Category::Strength,
            xp_reward: 10,
            goal_value: 30,
            alarm_time: None,
            hardcore_alarm: false,
        };
        assert!(Habit::new(input).is_err());
    }

    #[test]
    fn new_habit_rejects_zero_values() {
        let base = NewHabit {
            name: "Gym".into(),
            icon: "🏋️".into(),
            category: Category::Strength,
            xp_reward: 0,
            goal_value: 30,
            alarm_time: None,
            hardcore_alarm: false,
        };
        assert!(Habit::new(base.clone()).is_err());
        let mut zero_goal = base;
        zero_goal.xp_reward = 10;
        zero_goal.goal_value = 0;
        assert!(Habit::new(zero_goal).is_err());
    }

    #[test]
    fn default_set_spans_all_categories() {
        let defaults = default_habits();
        assert_eq!(defaults.len(), 10);
        for category in Category::ALL {
            assert!(defaults.iter().any(|h| h.category == category));
        }
        assert!(defaults.iter().all(|h| h.goal_value == DEFAULT_GOAL_DAYS));
        // Hardcore entries must also carry an alarm, or the flag is inert.
        assert!(defaults
            .iter()
            .filter(|h| h.hardcore_alarm)
            .all(|h| h.alarm_time.is_some()));
    }

    #[test]
    fn category_parse_roundtrip() {
        for category in Category::ALL {
            let parsed: Category = category
                .display_name()
                .to_ascii_lowercase()
                .parse()
                .unwrap();
            assert_eq!(parsed, category);
        }
        assert!("charisma".parse::<Category>().is_err());
    }

    #[test]
    fn habit_serde_roundtrip() {
        let mut habit = Habit::new(NewHabit {
            name: "Gym".into(),
            icon: "🏋️".into(),
            category: Category::Strength,
            xp_reward: 20,
            goal_value: 30,
            alarm_time: NaiveTime::from_hms_opt(7, 0, 0),
            hardcore_alarm: false,
        })
        .unwrap();
        habit
            .daily_logs
            .insert(NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(), true);

        let json = serde_json::to_string(&habit).unwrap();
        let parsed: Habit = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, habit);
    }
}

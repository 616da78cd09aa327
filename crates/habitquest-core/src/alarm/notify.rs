//! Notification bridge.
//!
//! The scheduler drives an OS/host notification facility through the
//! [`Notifier`] trait and receives user actions (complete/snooze) back
//! asynchronously. Implementations vary -- a desktop notification daemon, a
//! terminal printer, a recording stub in tests -- but all satisfy the same
//! three-method contract.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::habit::Habit;

/// Action buttons offered on a fired notification, and the replies the
/// bridge delivers back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyAction {
    Complete,
    Snooze,
}

impl NotifyAction {
    /// Button label shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            NotifyAction::Complete => "Complete",
            NotifyAction::Snooze => "Snooze (-5 XP)",
        }
    }
}

/// Presentation urgency. Hardcore alarms escalate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Normal,
    Critical,
}

/// A notification payload handed to the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Habit the notification is about, if any; echoed back with actions.
    pub habit_id: Option<Uuid>,
    pub title: String,
    pub body: String,
    pub actions: Vec<NotifyAction>,
    pub urgency: Urgency,
}

impl Notification {
    /// The daily quest alert for a fired alarm.
    pub fn quest(habit: &Habit) -> Self {
        let mut body = format!("Time to complete: {}", habit.name);
        if habit.hardcore_alarm {
            body.push_str("\n💀 HARDCORE MODE - No snoozing!");
        }
        Self {
            habit_id: Some(habit.id),
            title: format!("⚔️ Quest: {}", habit.name),
            body,
            actions: vec![NotifyAction::Complete, NotifyAction::Snooze],
            urgency: if habit.hardcore_alarm {
                Urgency::Critical
            } else {
                Urgency::Normal
            },
        }
    }

    /// The denial alert produced when a hardcore habit is snoozed.
    pub fn snooze_denied(habit: &Habit, penalty_xp: u32) -> Self {
        Self {
            habit_id: Some(habit.id),
            title: "💀 HARDCORE MODE".to_string(),
            body: format!(
                "Snooze denied for \"{}\"! -{penalty_xp} XP penalty applied.",
                habit.name
            ),
            actions: Vec::new(),
            urgency: Urgency::Normal,
        }
    }
}

/// Host notification facility. The scheduler schedules internally whether
/// or not permission is held; presentation is attempted at fire time and
/// may silently not reach the user.
pub trait Notifier {
    /// Ask the host for permission to present notifications.
    fn request_permission(&self) -> Result<bool, Box<dyn std::error::Error>>;

    /// Present a notification now.
    fn present(&self, notification: &Notification) -> Result<(), Box<dyn std::error::Error>>;

    /// Drop anything the host still has queued for presentation.
    fn cancel_all_pending(&self) -> Result<(), Box<dyn std::error::Error>>;
}

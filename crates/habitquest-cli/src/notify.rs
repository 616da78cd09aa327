//! Terminal notification bridge.
//!
//! Stands in for an OS notification daemon: alerts are printed to stdout
//! and "permission" is always granted. Actions are delivered back through
//! the `alarm complete` / `alarm snooze` commands rather than buttons.

use habitquest_core::{Notification, Notifier, Urgency};

pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn request_permission(&self) -> Result<bool, Box<dyn std::error::Error>> {
        Ok(true)
    }

    fn present(&self, notification: &Notification) -> Result<(), Box<dyn std::error::Error>> {
        let badge = match notification.urgency {
            Urgency::Critical => "🔔 [CRITICAL]",
            Urgency::Normal => "🔔",
        };
        println!("{badge} {}", notification.title);
        for line in notification.body.lines() {
            println!("   {line}");
        }
        if !notification.actions.is_empty() {
            let labels: Vec<&str> = notification.actions.iter().map(|a| a.label()).collect();
            println!("   Actions: {}", labels.join(" | "));
        }
        Ok(())
    }

    fn cancel_all_pending(&self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }
}

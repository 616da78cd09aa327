//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against the dev data directory
//! and verify outputs. Mutating flows live in a single test so parallel
//! test processes do not stomp each other's writes.

use std::process::Command;
use std::sync::Mutex;

/// Serializes CLI invocations: every command is a load-mutate-save cycle
/// over the shared dev database, so concurrent processes could clobber
/// each other's writes.
static CLI_LOCK: Mutex<()> = Mutex::new(());

/// Run a CLI command and return output.
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let _guard = CLI_LOCK.lock().unwrap();
    let output = Command::new("cargo")
        .args(["run", "-p", "habitquest-cli", "--"])
        .args(args)
        .env("HABITQUEST_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_habit_list() {
    let (stdout, _, code) = run_cli(&["habit", "list"]);
    assert_eq!(code, 0, "habit list failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("list output is JSON");
    assert!(parsed.is_array());
}

#[test]
fn test_stats_show() {
    let (stdout, _, code) = run_cli(&["stats", "show"]);
    assert_eq!(code, 0, "stats show failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("stats output is JSON");
    assert_eq!(parsed["type"], "StatsSnapshot");
    assert!(parsed["stats"]["level"].as_u64().unwrap() >= 1);
}

#[test]
fn test_stats_categories() {
    let (stdout, _, code) = run_cli(&["stats", "categories"]);
    assert_eq!(code, 0, "stats categories failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(parsed.get("strength").is_some());
}

#[test]
fn test_config_get() {
    let (stdout, _, code) = run_cli(&["config", "get", "game.default_goal_days"]);
    assert_eq!(code, 0, "config get failed");
    assert!(!stdout.trim().is_empty());
}

#[test]
fn test_config_get_unknown_key_fails() {
    let (_, _, code) = run_cli(&["config", "get", "game.nonexistent"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_list() {
    let (stdout, _, code) = run_cli(&["config", "list"]);
    assert_eq!(code, 0, "config list failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(parsed["notifications"]["enabled"].is_boolean());
}

#[test]
fn test_alarm_list() {
    let (stdout, _, code) = run_cli(&["alarm", "list"]);
    assert_eq!(code, 0, "alarm list failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(parsed.is_array());
}

#[test]
fn test_alarm_watch_once() {
    let (_, _, code) = run_cli(&["alarm", "watch", "--once"]);
    assert_eq!(code, 0, "alarm watch --once failed");
}

#[test]
fn test_alarm_permission() {
    let (_, stderr, code) = run_cli(&["alarm", "permission"]);
    assert_eq!(code, 0, "alarm permission failed");
    assert!(stderr.contains("permission"));
}

#[test]
fn test_player_show() {
    let (stdout, _, code) = run_cli(&["player", "show"]);
    assert_eq!(code, 0, "player show failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(parsed["player_name"].is_string());
}

#[test]
fn test_reset_requires_confirmation() {
    let (_, stderr, code) = run_cli(&["reset"]);
    assert_ne!(code, 0, "reset without --yes must fail");
    assert!(stderr.contains("--yes"));
}

#[test]
fn test_habit_lifecycle() {
    // Add a hardcore alarm habit.
    let (stdout, _, code) = run_cli(&[
        "habit", "add", "E2E Wakeup", "--category", "discipline", "--xp", "15", "--goal", "30",
        "--alarm", "06:00", "--hardcore",
    ]);
    assert_eq!(code, 0, "habit add failed");
    let added: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(added["type"], "HabitAdded");
    let id = added["habit"]["id"].as_str().expect("habit id").to_string();

    // It shows up in the list and is armed after scheduling.
    let (stdout, _, code) = run_cli(&["habit", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains(&id));

    let (stdout, _, code) = run_cli(&["alarm", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains(&id), "new habit should be armed");

    // Toggle today, then verify the progress read.
    let (stdout, _, code) = run_cli(&["habit", "toggle", &id]);
    assert_eq!(code, 0, "habit toggle failed");
    let toggled: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(toggled["type"], "DayToggled");
    assert_eq!(toggled["checked"], true);

    let (stdout, _, code) = run_cli(&["stats", "habit", &id]);
    assert_eq!(code, 0, "stats habit failed");
    let progress: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(progress["completed_days"], 1);

    // Hardcore snooze is denied with a penalty, and schedules nothing new.
    let (stdout, _, code) = run_cli(&["alarm", "snooze", &id]);
    assert_eq!(code, 0, "alarm snooze failed");
    assert!(stdout.contains("SnoozeDenied"));
    assert!(stdout.contains("HARDCORE"), "denial notification expected");

    // Delete the habit; its alarm goes with it.
    let (stdout, _, code) = run_cli(&["habit", "delete", &id]);
    assert_eq!(code, 0, "habit delete failed");
    assert!(stdout.contains("HabitDeleted"));

    let (stdout, _, code) = run_cli(&["alarm", "list"]);
    assert_eq!(code, 0);
    assert!(!stdout.contains(&id), "deleted habit must not stay armed");
}

#[test]
fn test_toggle_unknown_habit_is_noop() {
    let (stdout, _, code) = run_cli(&[
        "habit",
        "toggle",
        "00000000-0000-0000-0000-000000000000",
    ]);
    assert_eq!(code, 0, "toggling an unknown habit must not fail");
    assert_eq!(stdout.trim(), "null");
}

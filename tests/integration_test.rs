use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

fn weeklog_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_weeklog"))
}

fn run(tmp: &TempDir, args: &[&str]) -> std::process::Output {
    weeklog_cmd()
        .current_dir(tmp.path())
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_init_creates_database() {
    let tmp = TempDir::new().unwrap();

    let output = run(&tmp, &["init"]);
    assert!(output.status.success());
    assert!(tmp.path().join("db.json").exists());

    let raw = std::fs::read_to_string(tmp.path().join("db.json")).unwrap();
    let doc: Value = serde_json::from_str(&raw).unwrap();
    assert!(doc["logs"].as_array().unwrap().is_empty());
}

#[test]
fn test_init_twice_fails() {
    let tmp = TempDir::new().unwrap();

    run(&tmp, &["init"]);
    let output = run(&tmp, &["init"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("already exists"));
}

#[test]
fn test_add_without_init_fails() {
    let tmp = TempDir::new().unwrap();

    let output = run(&tmp, &["add", "Test"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("weeklog init"));
}

#[test]
fn test_add_then_list_round_trip() {
    let tmp = TempDir::new().unwrap();
    run(&tmp, &["init"]);

    let output = run(
        &tmp,
        &[
            "add",
            "Shipped the importer",
            "-d",
            "two weeks of work",
            "--tag",
            "rust,backend",
            "--json",
        ],
    );
    assert!(output.status.success());
    let created: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(!created["id"].as_str().unwrap().is_empty());
    assert!(!created["timestamp"].as_str().unwrap().is_empty());
    assert_eq!(created["title"], "Shipped the importer");
    assert_eq!(created["description"], "two weeks of work");
    assert_eq!(created["tags"][0], "rust");
    assert_eq!(created["tags"][1], "backend");

    // A fresh entry lands in the current week, so the default window shows it.
    let output = run(&tmp, &["list"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Shipped the importer"));
    assert!(stdout.contains("rust, backend"));
}

#[test]
fn test_list_search_and_tag_filters() {
    let tmp = TempDir::new().unwrap();
    run(&tmp, &["init"]);
    run(&tmp, &["add", "Fixed the parser", "--tag", "rust"]);
    run(&tmp, &["add", "Wrote the docs", "--tag", "writing"]);

    let output = run(&tmp, &["list", "--search", "parser"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Fixed the parser"));
    assert!(!stdout.contains("Wrote the docs"));

    let output = run(&tmp, &["list", "--tag", "writing"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Wrote the docs"));
    assert!(!stdout.contains("Fixed the parser"));

    let output = run(&tmp, &["list", "--tag", "golang"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No entries matched"));
}

#[test]
fn test_get_update_delete_workflow() {
    let tmp = TempDir::new().unwrap();
    run(&tmp, &["init"]);

    let output = run(&tmp, &["add", "Original title", "--json"]);
    let created: Value = serde_json::from_slice(&output.stdout).unwrap();
    let id = created["id"].as_str().unwrap();
    let prefix = &id[..7];

    let output = run(&tmp, &["get", prefix]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Original title"));

    let output = run(
        &tmp,
        &["update", prefix, "--title", "Renamed title", "--json"],
    );
    assert!(output.status.success());
    let updated: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(updated["title"], "Renamed title");
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["timestamp"], created["timestamp"]);

    // Non-interactive delete refuses without --force.
    let output = run(&tmp, &["delete", prefix]);
    assert!(!output.status.success());

    let output = run(&tmp, &["delete", prefix, "--force"]);
    assert!(output.status.success());

    let output = run(&tmp, &["get", prefix]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Entry not found"));
}

#[test]
fn test_list_all_bypasses_window() {
    let tmp = TempDir::new().unwrap();
    run(&tmp, &["init"]);
    run(&tmp, &["add", "Anything"]);

    let output = run(&tmp, &["list", "--all", "--json"]);
    assert!(output.status.success());
    let entries: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 1);
}

#[test]
fn test_heatmap_counts_today() {
    let tmp = TempDir::new().unwrap();
    run(&tmp, &["init"]);
    run(&tmp, &["add", "One"]);
    run(&tmp, &["add", "Two"]);

    let output = run(&tmp, &["heatmap", "--json"]);
    assert!(output.status.success());
    let counts: Value = serde_json::from_slice(&output.stdout).unwrap();
    let total: u64 = counts
        .as_object()
        .unwrap()
        .values()
        .map(|v| v.as_u64().unwrap())
        .sum();
    assert_eq!(total, 2);
}

#[test]
fn test_post_show_prompt_lists_week_activities() {
    let tmp = TempDir::new().unwrap();
    run(&tmp, &["init"]);
    run(&tmp, &["add", "Shipped the importer", "-d", "big refactor"]);

    let output = run(
        &tmp,
        &["post", "--platform", "twitter", "--show-prompt"],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("- Shipped the importer: big refactor"));
    assert!(stdout.contains("Twitter/X"));
    assert!(stdout.contains("Suggested Hashtags:"));
}

#[test]
fn test_invalid_sort_key_is_rejected() {
    let tmp = TempDir::new().unwrap();
    run(&tmp, &["init"]);

    let output = run(&tmp, &["list", "--sort", "created"]);
    assert!(!output.status.success());
}

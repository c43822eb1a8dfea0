//! CLI integration tests
//!
//! These tests verify that the CLI works correctly with various options.

mod common;

use assert_cmd::Command;
use common::Project;
use predicates::prelude::*;

fn searchdeadres() -> Command {
    let mut cmd = Command::cargo_bin("searchdeadres").expect("binary built");
    cmd.env("NO_COLOR", "1");
    cmd
}

fn sample_project() -> Project {
    let project = Project::new();
    project.src_file("com/example/Main.kt", "setContentView(R.layout.activity_main)");
    project.res_file("layout/activity_main.xml", "<TextView android:text=\"@string/title\" />\n");
    project.res_file("layout/unused_screen.xml", "<FrameLayout />\n");
    project.values(
        "values/strings.xml",
        &[
            r#"<string name="title">Title</string>"#,
            r#"<string name="unused_text">Unused</string>"#,
        ],
    );
    project
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    searchdeadres()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("searchdeadres"))
        .stdout(predicate::str::contains("--prune"))
        .stdout(predicate::str::contains("--cascade"))
        .stdout(predicate::str::contains("--exclude-name"));
}

#[test]
fn test_cli_version() {
    searchdeadres()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("searchdeadres"));
}

#[test]
fn test_cli_invalid_format() {
    searchdeadres()
        .args(["--format", "sarif"])
        .assert()
        .failure();
}

// ============================================================================
// Analysis Tests
// ============================================================================

#[test]
fn test_cli_preview_lists_without_removing() {
    let project = sample_project();

    searchdeadres()
        .arg(project.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 unused resources"))
        .stdout(predicate::str::contains("unused_screen"))
        .stdout(predicate::str::contains("unused_text"));

    assert!(project.res().join("layout/unused_screen.xml").exists());
}

#[test]
fn test_cli_json_output() {
    let project = sample_project();

    let output = searchdeadres()
        .arg(project.root())
        .args(["--format", "json", "--quiet"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["mode"], "preview");
    assert_eq!(json["summary"]["removed"], 2);
    assert_eq!(json["summary"]["by_type"]["layout"], 1);
}

#[test]
fn test_cli_json_to_file() {
    let project = sample_project();
    let report = project.root().join("report.json");

    searchdeadres()
        .arg(project.root())
        .args(["--format", "json", "--output"])
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["removed"].as_array().unwrap().len(), 2);
}

#[test]
fn test_cli_explicit_roots() {
    let project = sample_project();

    searchdeadres()
        .current_dir(project.root())
        .arg("--res")
        .arg(project.res())
        .arg("--src")
        .arg(project.src())
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 unused resources"));
}

#[test]
fn test_cli_exclude_name_and_type() {
    let project = sample_project();

    searchdeadres()
        .arg(project.root())
        .args(["--exclude-name", "unused_.*"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No unused resources found"));

    searchdeadres()
        .arg(project.root())
        .args(["--exclude-type", "layout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 unused resources"))
        .stdout(predicate::str::contains("unused_text"));
}

#[test]
fn test_cli_unknown_type_fails() {
    let project = sample_project();

    searchdeadres()
        .arg(project.root())
        .args(["--target-type", "font"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown resource type"));
}

#[test]
fn test_cli_config_file() {
    let project = sample_project();
    project.file(".deadres.yml", "exclude_names:\n  - \"unused_screen\"\n");

    searchdeadres()
        .arg(project.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 unused resources"));
}

// ============================================================================
// Prune Tests
// ============================================================================

#[test]
fn test_cli_dry_run_does_not_mutate() {
    let project = sample_project();

    searchdeadres()
        .arg(project.root())
        .args(["--prune", "--dry-run"])
        .assert()
        .success();

    assert!(project.res().join("layout/unused_screen.xml").exists());
}

#[test]
fn test_cli_prune() {
    let project = sample_project();
    let undo = project.root().join("undo.sh");

    searchdeadres()
        .arg(project.root())
        .arg("--prune")
        .arg("--undo-script")
        .arg(&undo)
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 2 unused resources"));

    assert!(!project.res().join("layout/unused_screen.xml").exists());
    assert!(project.res().join("layout/activity_main.xml").exists());
    let strings = project.read(&project.res().join("values/strings.xml"));
    assert!(strings.contains("title"));
    assert!(!strings.contains("unused_text"));
    assert!(undo.exists());
}

#[test]
fn test_cli_prune_item_alias_with_reason() {
    let project = sample_project();
    project.values(
        "values/refs.xml",
        &[r#"<item name="placeholder" type="drawable">@drawable/missing</item>"#],
    );

    let output = searchdeadres()
        .arg(project.root())
        .args(["--prune", "--format", "json", "--quiet"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["removed"], 3);
    assert_eq!(json["summary"]["failures"], 0);
    let alias = json["removed"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == "placeholder")
        .unwrap();
    assert_eq!(alias["reason"], "unreferenced; file emptied");
    assert!(!project.res().join("values/refs.xml").exists());
}

#[test]
fn test_cli_no_resources() {
    let project = Project::new();
    std::fs::remove_dir_all(project.res()).unwrap();

    searchdeadres()
        .arg(project.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("No resource directories found"));
}

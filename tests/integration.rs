// Integration tests for the lovemirror CLI surface.
//
// These tests use assert_cmd to invoke the binary and verify
// exit codes, stdout/stderr output, and argument validation.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to build a Command for the lovemirror binary.
fn lovemirror() -> Command {
    Command::cargo_bin("lovemirror").expect("binary should exist")
}

#[test]
fn cli_version_flag() {
    lovemirror()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lovemirror"));
}

#[test]
fn cli_help_flag() {
    lovemirror()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Relationship self-assessment"));
}

#[test]
fn score_requires_type_and_responses() {
    lovemirror()
        .arg("score")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn questions_requires_type_or_gender() {
    lovemirror()
        .arg("questions")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn unknown_assessment_type_is_rejected_by_parser() {
    lovemirror()
        .args(["questions", "--type", "sugar-daddy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn compatibility_rejects_both_targets() {
    lovemirror()
        .args(["compatibility", "--code", "abc", "--relationship", "r1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn verbose_and_quiet_conflict() {
    lovemirror()
        .args(["-v", "-q", "questions", "--type", "wife-material"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn missing_data_dir_is_a_runtime_failure() {
    let dir = TempDir::new().expect("temp dir should be created");
    lovemirror()
        .arg("--data")
        .arg(dir.path().join("absent"))
        .args(["questions", "--type", "wife-material"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("path does not exist"));
}

#[test]
fn questions_lists_sixty_items() {
    let dir = TempDir::new().expect("temp dir should be created");
    let output = lovemirror()
        .arg("--data")
        .arg(dir.path())
        .args(["questions", "--type", "high-value-man", "--format", "json"])
        .output()
        .expect("command should run");
    assert!(output.status.success());

    let sheet: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be json");
    let total: usize = sheet["groups"]
        .as_array()
        .expect("groups should be an array")
        .iter()
        .map(|group| group["questions"].as_array().map_or(0, Vec::len))
        .sum();
    assert_eq!(total, 60);
    assert_eq!(sheet["groups"].as_array().map(Vec::len), Some(6));
}

#[test]
fn questions_resolve_from_profile() {
    let dir = TempDir::new().expect("temp dir should be created");
    lovemirror()
        .arg("--data")
        .arg(dir.path())
        .args([
            "questions",
            "--gender",
            "female",
            "--region",
            "africa",
            "--cultural-context",
            "african",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Questions: bridal-price"))
        .stdout(predicate::str::contains("## Badges"));

    lovemirror()
        .arg("--data")
        .arg(dir.path())
        .args(["questions", "--gender", "other"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no assessment type available"));
}

//! End-to-end CLI tests against temp chain files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn chain_file(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(body.as_bytes()).expect("write chain");
    file
}

fn perron() -> Command {
    Command::cargo_bin("perron").expect("binary built")
}

const SYMMETRIC: &str = r#"{
  "states": ["a", "b"],
  "edges": [
    {"from": "a", "to": "a", "weight": 0.6},
    {"from": "a", "to": "b", "weight": 0.4},
    {"from": "b", "to": "a", "weight": 0.4},
    {"from": "b", "to": "b", "weight": 0.6}
  ]
}"#;

const BAD_ROW: &str = r#"{
  "states": ["a", "b"],
  "edges": [
    {"from": "a", "to": "a", "weight": 0.5},
    {"from": "a", "to": "b", "weight": 0.4},
    {"from": "b", "to": "a", "weight": 0.5},
    {"from": "b", "to": "b", "weight": 0.5}
  ]
}"#;

#[test]
fn analyze_emits_full_json_record() {
    let file = chain_file(SYMMETRIC);

    let output = perron()
        .args(["--json", "analyze"])
        .arg(file.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let record: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(record["valid"], true);
    assert_eq!(record["unique_steady_state"], true);
    assert_eq!(record["state_count"], 2);
    assert_eq!(record["steady_state"][0], 0.5);
    assert_eq!(record["steady_state"][1], 0.5);
}

#[test]
fn analyze_human_output_names_the_steady_state() {
    let file = chain_file(SYMMETRIC);

    perron()
        .arg("analyze")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("unique steady state"))
        .stdout(predicate::str::contains("0.5"));
}

#[test]
fn validate_accepts_stochastic_chain() {
    let file = chain_file(SYMMETRIC);

    perron()
        .arg("validate")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("VALID"));
}

#[test]
fn validate_flags_bad_row_and_fails() {
    let file = chain_file(BAD_ROW);

    perron()
        .arg("validate")
        .arg(file.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("INVALID"))
        .stdout(predicate::str::contains("a"));
}

#[test]
fn steps_propagates_distribution() {
    let file = chain_file(SYMMETRIC);

    let output = perron()
        .args(["--json", "steps", "--steps", "8", "--initial", "1.0,0.0"])
        .arg(file.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let body: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    let p0 = body["distribution"][0].as_f64().expect("number");
    assert!((p0 - 0.5).abs() < 0.01, "converging toward 0.5, got {p0}");
}

#[test]
fn missing_state_is_a_hard_error() {
    let file = chain_file(
        r#"{"states": ["a"], "edges": [{"from": "a", "to": "ghost", "weight": 1.0}]}"#,
    );

    perron()
        .arg("analyze")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}

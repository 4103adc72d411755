#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn destiny(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("destiny").unwrap();
    cmd.current_dir(dir.path()).env("DESTINY_ROOT", dir.path());
    cmd
}

fn read_responses(dir: &TempDir) -> serde_json::Value {
    let raw = std::fs::read_to_string(dir.path().join("data/responses.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

// ---------------------------------------------------------------------------
// destiny ritual
// ---------------------------------------------------------------------------

#[test]
fn ritual_from_stdin_stores_record() {
    let dir = TempDir::new().unwrap();
    destiny(&dir)
        .arg("ritual")
        .write_stdin("Test\n2024-02-30\n09:15\nyang\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Lucky Number"))
        .stdout(predicate::str::contains("2024.02.29 09:15"));

    let stored = read_responses(&dir);
    let stored = stored.as_array().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["name"], "Test");
    assert_eq!(stored[0]["day"], 29);
    assert_eq!(stored[0]["gender"], "yang");
    assert!(stored[0]["id"].is_string());
    assert!(stored[0]["createdAt"].is_string());
}

#[test]
fn ritual_json_output_is_parseable() {
    let dir = TempDir::new().unwrap();
    let output = destiny(&dir)
        .args(["ritual", "--seed", "11", "--json"])
        .write_stdin("Mira\n\n\nyin\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["data"]["name"], "Mira");
    assert_eq!(json["data"]["gender"], "yin");
    let n = json["outcome"]["luckyNumber"].as_u64().unwrap();
    assert!((1..=99).contains(&n));
    assert!(json["shareText"].as_str().unwrap().contains("K-Destiny"));
}

#[test]
fn ritual_writes_csv_when_configured() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("destiny.yaml"),
        "sinks: [responses, results]\n",
    )
    .unwrap();

    destiny(&dir)
        .arg("ritual")
        .write_stdin("Test\n1990-06-15\n23:45\nyin\n")
        .assert()
        .success();

    let csv = std::fs::read_to_string(dir.path().join("data/user_results.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("timestamp,name,"));
    assert!(lines[1].contains(",Test,1990,6,15,23,45,yin,"));
}

#[test]
fn ritual_eof_before_completion_fails_without_storing() {
    let dir = TempDir::new().unwrap();
    destiny(&dir)
        .arg("ritual")
        .write_stdin("\nTest\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("a name of 1 to 50 characters"))
        .stderr(predicate::str::contains("input ended"));

    assert!(!dir.path().join("data/responses.json").exists());
}

#[test]
fn ritual_back_from_first_step_exits_cleanly() {
    let dir = TempDir::new().unwrap();
    destiny(&dir)
        .arg("ritual")
        .write_stdin("<\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Back at the start"));

    assert!(!dir.path().join("data/responses.json").exists());
}

// ---------------------------------------------------------------------------
// destiny draw
// ---------------------------------------------------------------------------

#[test]
fn draw_with_seed_is_reproducible() {
    let dir = TempDir::new().unwrap();
    let first = destiny(&dir)
        .args(["draw", "--seed", "42", "--json"])
        .output()
        .unwrap();
    let second = destiny(&dir)
        .args(["draw", "--seed", "42", "--json"])
        .output()
        .unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    let json: serde_json::Value = serde_json::from_slice(&first.stdout).unwrap();
    assert!(json["outcome"]["character"]["id"].is_string());
}

#[test]
fn draw_does_not_store_anything() {
    let dir = TempDir::new().unwrap();
    destiny(&dir)
        .arg("draw")
        .assert()
        .success()
        .stdout(predicate::str::contains("Lucky Color"));
    assert!(!dir.path().join("data").exists());
}

// ---------------------------------------------------------------------------
// destiny characters / responses
// ---------------------------------------------------------------------------

#[test]
fn characters_lists_all_five() {
    let dir = TempDir::new().unwrap();
    destiny(&dir)
        .arg("characters")
        .assert()
        .success()
        .stdout(predicate::str::contains("rumi"))
        .stdout(predicate::str::contains("abby"));

    let output = destiny(&dir)
        .args(["characters", "--json"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 5);
}

#[test]
fn responses_empty_then_listed() {
    let dir = TempDir::new().unwrap();
    destiny(&dir)
        .arg("responses")
        .assert()
        .success()
        .stdout(predicate::str::contains("No responses yet."));

    destiny(&dir)
        .arg("ritual")
        .write_stdin("Zoey\n\n\nyang\n")
        .assert()
        .success();

    destiny(&dir)
        .arg("responses")
        .assert()
        .success()
        .stdout(predicate::str::contains("Zoey"))
        .stdout(predicate::str::contains("2000.01.01"));
}

#[test]
fn invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("destiny.yaml"), "sinks: [nowhere]\n").unwrap();
    destiny(&dir)
        .arg("responses")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_config_path_command() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("chatdeck")
        .env("CHATDECK_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_creates_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    cargo_bin_cmd!("chatdeck")
        .env("CHATDECK_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config at"));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("user_name ="));
    assert!(contents.contains("[logging]"));
}

#[test]
fn test_config_init_fails_if_exists() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "# existing config").unwrap();

    cargo_bin_cmd!("chatdeck")
        .env("CHATDECK_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_values_are_used() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "user_name = \"Ada\"\n").unwrap();

    cargo_bin_cmd!("chatdeck")
        .env("CHATDECK_HOME", dir.path())
        .arg("prompts")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hi there, Ada"));
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "reply_latency_ms = \"soon\"").unwrap();

    cargo_bin_cmd!("chatdeck")
        .env("CHATDECK_HOME", dir.path())
        .arg("prompts")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

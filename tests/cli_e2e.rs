//! End-to-end CLI tests for the prusa-scout binary.
//!
//! None of these reach the network: every case exits during argument or
//! config handling.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn scout() -> Command {
    let mut cmd = Command::cargo_bin("prusa-scout").unwrap();
    // Keep a developer's own config file out of the way
    cmd.env_remove("XDG_CONFIG_HOME").env("HOME", "/nonexistent");
    cmd
}

#[test]
fn test_binary_help_displays_usage() {
    scout()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Prusa"))
        .stdout(predicate::str::contains("--zip-code"))
        .stdout(predicate::str::contains("--max-pages"));
}

#[test]
fn test_binary_version_displays_version() {
    scout()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("prusa-scout"));
}

#[test]
fn test_binary_invalid_flag_returns_error() {
    scout()
        .arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_binary_rejects_out_of_range_pages() {
    scout()
        .args(["--max-pages", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--max-pages"));
}

#[test]
fn test_binary_rejects_verbose_with_quiet() {
    scout().args(["-v", "-q"]).assert().failure();
}

#[test]
fn test_binary_reports_bad_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("config.toml");
    std::fs::write(&config, "concurrency = 4\n").unwrap();

    scout()
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_binary_reports_missing_config_file() {
    scout()
        .args(["--config", "/nonexistent/prusa-scout.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn test_binary_rejects_bad_default_config() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("prusa-scout");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "max_pages = 500\n").unwrap();

    scout()
        .env("XDG_CONFIG_HOME", temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_pages"));
}

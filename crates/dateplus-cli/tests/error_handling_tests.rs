//! Tests for error reporting and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;

fn dateplus() -> Command {
    let mut cmd = Command::cargo_bin("dateplus").unwrap();
    cmd.env_remove("RUST_LOG").env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_invalid_calendar_date_lists_errors() {
    dateplus()
        .args(["parse", "2011-02-30", "--tz", "UTC"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Invalid date '2011-02-30'"))
        .stderr(predicate::str::contains("The date is invalid."));
}

#[test]
fn test_garbage_input_lists_parser_errors() {
    dateplus()
        .args(["parse", "banana", "--tz", "UTC"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unexpected text"));
}

#[test]
fn test_unknown_zone_is_a_date_error() {
    dateplus()
        .args(["parse", "2020-06-15", "--tz", "Mars/Olympus"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown or bad timezone (Mars/Olympus)"));
}

#[test]
fn test_format_mismatch_suggests_fix() {
    dateplus()
        .args(["from-format", "Y", "11", "--tz", "UTC"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("does not match the input value"))
        .stderr(predicate::str::contains("Suggestions:"));
}

#[test]
fn test_invalid_parts() {
    dateplus()
        .args(["from-parts", "--year", "2021", "--month", "2", "--day", "29"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("The array contains invalid values"));
}

#[test]
fn test_non_numeric_timestamp() {
    dateplus()
        .args(["timestamp", "soon"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("must be numeric"));
}

#[test]
fn test_zero_occurrence() {
    dateplus()
        .args(["nth-weekday", "0", "monday"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Occurrence must be at least 1"));
}

#[test]
fn test_month_out_of_range() {
    dateplus()
        .args(["nth-weekday", "1", "monday", "--month", "13"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Month must be between 1 and 12"));
}

#[test]
fn test_json_errors_go_to_stdout() {
    let assert = dateplus()
        .args(["--output-format", "json", "parse", "2011-02-30", "--tz", "UTC"])
        .assert()
        .code(2);

    let json: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(json["ok"], false);
    assert_eq!(json["errors"][0], "The date is invalid.");
}

#[test]
fn test_missing_config_file_exits_4() {
    dateplus()
        .args(["--config", "/definitely/not/here/dateplus.toml", "parse", "now"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_unknown_config_key_exits_4() {
    dateplus()
        .args(["config", "get", "defaults.language"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_usage_error_exits_2() {
    dateplus()
        .args(["nth-weekday", "1", "funday"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not a weekday name"));
}

#[test]
fn test_verbose_and_quiet_conflict() {
    dateplus()
        .args(["-q", "-v", "parse", "now"])
        .assert()
        .code(2);
}

//! Integration tests for the `dockvet` binary.
//!
//! These exercise argument handling, configuration loading, exit codes and
//! the `history` command end to end. None of them needs a Docker daemon.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn dockvet(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dockvet"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("DOCKVET_GENERAL_LOG_LEVEL")
        .env_remove("DOCKVET_GENERAL_LOG_FORMAT")
        .env_remove("DOCKVET_STORE_VULN_DB_PATH")
        .env_remove("DOCKVET_STORE_HISTORY_PATH")
        .env_remove("DOCKVET_DOCKER_SOCKET")
        .output()
        .expect("should run dockvet binary")
}

fn write_config(dir: &Path) -> std::path::PathBuf {
    let config_path = dir.join("dockvet.toml");
    let config = format!(
        r#"
[general]
log_level = "info"
log_format = "json"

[store]
vuln_db_path = "{}"
history_path = "{}"
"#,
        dir.join("vuln-db.json").display(),
        dir.join("history.jsonl").display()
    );
    fs::write(&config_path, config).expect("should write config");
    config_path
}

#[test]
fn test_history_empty_prints_empty_list() {
    // Given: a config whose history file does not exist yet
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = write_config(temp_dir.path());

    // When: querying history
    let output = dockvet(&["-c", config_path.to_str().unwrap(), "history", "centos:8"]);

    // Then: stdout is exactly one empty JSON list
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).expect("valid UTF-8");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("stdout should be JSON");
    assert_eq!(parsed, serde_json::json!([]));
}

#[test]
fn test_history_returns_stored_reports_for_image() {
    // Given: a history file with reports for two images and one corrupt line
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = write_config(temp_dir.path());
    let lines = [
        r#"{"id":"a","report":{"image_name":"centos:8","timestamp":1600000000.25,"evaluated_packages_info":[{"product":"bash","version":"5.0.17","status":"OK"}],"total_products":1,"vuln_products":0,"ok_products":1}}"#,
        r#"{"id":"b","report":{"image_name":"ubuntu:20.04","timestamp":1600000100.0,"evaluated_packages_info":[],"total_products":0,"vuln_products":0,"ok_products":0}}"#,
        "not json",
        r#"{"id":"c","report":{"image_name":"centos:8","timestamp":1600000200.5,"evaluated_packages_info":[{"product":"openssl","version":"1.1.1k","status":"VULN"}],"total_products":1,"vuln_products":1,"ok_products":0}}"#,
    ];
    fs::write(temp_dir.path().join("history.jsonl"), lines.join("\n")).expect("write history");

    // When
    let output = dockvet(&["-c", config_path.to_str().unwrap(), "history", "centos:8"]);

    // Then: two reports in insertion order, numeric timestamps, no ids
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let list = parsed.as_array().expect("history is a list");
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["timestamp"].as_f64(), Some(1_600_000_000.25));
    assert_eq!(list[1]["evaluated_packages_info"][0]["status"], "VULN");
    assert!(list[0].get("id").is_none());

    // Logs (including the skipped-line warning) stay on stderr
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("skipping unparseable history line"));
}

#[test]
fn test_history_text_output() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = write_config(temp_dir.path());

    let output = dockvet(&[
        "-c",
        config_path.to_str().unwrap(),
        "--output",
        "text",
        "history",
        "alpine:3.12",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("alpine:3.12"));
    assert!(stdout.contains("No stored scans."));
}

#[test]
fn test_missing_explicit_config_exits_2() {
    let output = dockvet(&["-c", "/nonexistent/dockvet.toml", "history", "centos:8"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty(), "nothing should be written to stdout");
    assert!(String::from_utf8_lossy(&output.stderr).contains("config"));
}

#[test]
fn test_invalid_config_value_exits_2() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("dockvet.toml");
    fs::write(&config_path, "[general]\nlog_level = \"loud\"\n").expect("write config");

    let output = dockvet(&["-c", config_path.to_str().unwrap(), "history", "x"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_history_ignores_corrupt_vuln_db() {
    // Given: an unreadable vulnerability DB next to a valid history file
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = write_config(temp_dir.path());
    fs::write(temp_dir.path().join("vuln-db.json"), "{not json").expect("write db");
    fs::write(
        temp_dir.path().join("history.jsonl"),
        r#"{"id":"a","report":{"image_name":"centos:8","timestamp":1600000000.0,"evaluated_packages_info":[],"total_products":0,"vuln_products":0,"ok_products":0}}"#,
    )
    .expect("write history");

    // When
    let output = dockvet(&["-c", config_path.to_str().unwrap(), "history", "centos:8"]);

    // Then: history is still served
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(parsed.as_array().map(Vec::len), Some(1));
}

#[test]
fn test_scan_with_corrupt_vuln_db_exits_5() {
    // The DB is loaded before the container runtime is contacted
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = write_config(temp_dir.path());
    fs::write(temp_dir.path().join("vuln-db.json"), "{ not a list").expect("write db");

    let output = dockvet(&["-c", config_path.to_str().unwrap(), "scan", "--image", "centos:8"]);
    assert_eq!(output.status.code(), Some(5));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_scan_with_unreachable_docker_exits_3() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = write_config(temp_dir.path());
    let socket = temp_dir.path().join("no-docker.sock");
    let mut config = fs::read_to_string(&config_path).expect("read config");
    config.push_str(&format!("\n[docker]\nsocket = \"{}\"\n", socket.display()));
    fs::write(&config_path, config).expect("write config");

    let output = dockvet(&["-c", config_path.to_str().unwrap(), "scan", "--image", "centos:8"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("docker"));
}

#[test]
fn test_scan_without_target_is_usage_error() {
    let output = dockvet(&["scan"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_scan_with_both_targets_is_usage_error() {
    let output = dockvet(&["scan", "--image", "centos:8", "--container-id", "abc123"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot be used with"));
}

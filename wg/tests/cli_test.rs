//! CLI tests for the wg binary

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Write a config that keeps the store inside `dir` and points at `base_url`
fn write_config(dir: &Path, base_url: &str) -> std::path::PathBuf {
    let config_path = dir.join("wanderguide.yml");
    let config = format!(
        "api:\n  base-url: {}\n  timeout-ms: 2000\nstorage:\n  path: {}\n",
        base_url,
        dir.join("store.json").display()
    );
    fs::write(&config_path, config).expect("Failed to write config");
    config_path
}

/// Command isolated from the user's data and environment
fn wg(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("wg").expect("wg binary should build");
    cmd.env("XDG_DATA_HOME", dir.join("data"))
        .env("HOME", dir)
        .env_remove("WANDERGUIDE_API_URL")
        .env_remove("WANDERGUIDE_TIMEOUT_MS");
    cmd
}

// =============================================================================
// Help
// =============================================================================

#[test]
fn test_help_lists_commands() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    wg(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("flights"))
        .stdout(predicate::str::contains("WANDERGUIDE_API_URL"));
}

#[test]
fn test_unknown_sort_is_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    wg(temp_dir.path())
        .args(["flights", "NYC", "PAR", "--depart", "2025-06-01", "--sort", "cheapest"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cheapest"));
}

// =============================================================================
// Local state
// =============================================================================

#[test]
fn test_token_set_and_clear() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(temp_dir.path(), "http://127.0.0.1:9/api");
    let store_path = temp_dir.path().join("store.json");

    wg(temp_dir.path())
        .arg("-c")
        .arg(&config)
        .args(["token", "set", "secret-token"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Token saved."));

    let saved = fs::read_to_string(&store_path).expect("store should be written");
    assert!(saved.contains("\"auth_token\""));
    assert!(saved.contains("secret-token"));

    wg(temp_dir.path())
        .arg("-c")
        .arg(&config)
        .args(["token", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Token cleared."));

    let cleared = fs::read_to_string(&store_path).expect("store should still exist");
    assert!(!cleared.contains("secret-token"));
}

#[test]
fn test_blank_token_is_refused() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(temp_dir.path(), "http://127.0.0.1:9/api");

    wg(temp_dir.path())
        .arg("-c")
        .arg(&config)
        .args(["token", "set", "   "])
        .assert()
        .failure();
}

#[test]
fn test_show_without_plan() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(temp_dir.path(), "http://127.0.0.1:9/api");

    wg(temp_dir.path())
        .arg("-c")
        .arg(&config)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved trip plan"));
}

#[test]
fn test_show_saved_plan_as_json() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(temp_dir.path(), "http://127.0.0.1:9/api");
    let store = serde_json::json!({
        "currentItinerary": {
            "overview": "Four days in Lisbon",
            "total_estimated_cost": 900,
            "itinerary": [
                {"day": 1, "title": "Alfama", "morning": "Tram 28", "afternoon": "Castle", "evening": "Fado"}
            ]
        }
    });
    fs::write(temp_dir.path().join("store.json"), store.to_string()).expect("Failed to seed store");

    wg(temp_dir.path())
        .arg("-c")
        .arg(&config)
        .args(["show", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Four days in Lisbon"))
        .stdout(predicate::str::contains("Alfama"));
}

// =============================================================================
// Backend failures
// =============================================================================

#[test]
fn test_lookup_against_missing_backend_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let base_url = format!("http://{}/api", listener.local_addr().expect("addr"));
    drop(listener);
    let config = write_config(temp_dir.path(), &base_url);

    wg(temp_dir.path())
        .arg("-c")
        .arg(&config)
        .args(["weather", "Lisbon"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Connection Error"));
}

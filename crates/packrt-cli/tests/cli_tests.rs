use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn packrt_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("packrt"))
}

// ============================================================================
// DEMO BUNDLES
// ============================================================================

#[test]
fn test_default_bundle_logs_in_order() {
    packrt_cmd()
        .assert()
        .success()
        .stdout("in funcA\nin funcB\n");
}

#[test]
fn test_circular_bundle() {
    packrt_cmd()
        .arg("--bundle")
        .arg("circular")
        .assert()
        .success()
        .stdout(predicate::str::contains("isOdd(7) = true"));
}

#[test]
fn test_list_bundles() {
    packrt_cmd()
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("two-module"))
        .stdout(predicate::str::contains("circular"));
}

#[test]
fn test_unknown_bundle_fails() {
    packrt_cmd()
        .arg("--bundle")
        .arg("nope")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown bundle"));
}

#[test]
fn test_rust_log_debug_traces_instantiation() {
    packrt_cmd()
        .env("RUST_LOG", "debug")
        .assert()
        .success()
        .stdout("in funcA\nin funcB\n")
        .stderr(predicate::str::contains("instantiating module"));
}

#[test]
fn test_default_log_level_is_quiet() {
    packrt_cmd()
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr("");
}

// ============================================================================
// BOOTSTRAP OPTIONS
// ============================================================================

#[test]
fn test_expose_prints_entry_exports() {
    packrt_cmd()
        .arg("--expose")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"funcB\": \"[Function]\""));
}

#[test]
fn test_entry_override_runs_only_dependency() {
    packrt_cmd()
        .arg("--entry")
        .arg("./src/a.js")
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_unresolved_entry_fails() {
    packrt_cmd()
        .arg("--entry")
        .arg("./src/missing.js")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Module not found: ./src/missing.js"));
}

#[test]
fn test_deny_circular_fails() {
    packrt_cmd()
        .args(["--bundle", "circular", "--circular", "deny"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Circular import"));
}

#[test]
fn test_invalid_circular_policy() {
    packrt_cmd()
        .args(["--circular", "sometimes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown circular import policy"));
}

// ============================================================================
// CONFIGURATION FILES
// ============================================================================

#[test]
fn test_init_writes_config() {
    let temp_dir = TempDir::new().unwrap();

    packrt_cmd()
        .current_dir(temp_dir.path())
        .arg("--init")
        .assert()
        .success();

    let content = fs::read_to_string(temp_dir.path().join("packrt.json")).unwrap();
    assert!(content.contains("./src/index.js"));
}

#[test]
fn test_config_file_expose() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("packrt.json");
    fs::write(
        &config,
        r#"{ "entry": "./src/main.js", "bootstrap": "expose" }"#,
    )
    .unwrap();

    packrt_cmd()
        .args(["--bundle", "circular", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"sevenIsEven\": false"));
}

#[test]
fn test_missing_config_file() {
    packrt_cmd()
        .arg("--config")
        .arg("/nonexistent/packrt.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load"));
}

//! Smoke tests for the promptforge binary
//!
//! Each test runs in a scratch directory with HOME and XDG_CONFIG_HOME
//! pointed at it, so no real config file or stored secret is picked up.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn promptforge_in(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("promptforge"));
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .env_remove("OPENAI_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    promptforge_in(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("promptforge"));
}

#[test]
fn ask_with_blank_input_exits_cleanly() {
    let dir = TempDir::new().unwrap();
    promptforge_in(&dir)
        .env("OPENAI_API_KEY", "dummy")
        .arg("ask")
        .write_stdin("\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Enter your problem or question: "))
        .stdout(predicate::str::contains("No problem provided. Exiting."));
}

#[test]
fn missing_credential_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    promptforge_in(&dir)
        .args(["--api-key-env", "PROMPTFORGE_TEST_UNSET_KEY", "ask"])
        .env_remove("PROMPTFORGE_TEST_UNSET_KEY")
        .write_stdin("How do I sort a list?\n")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Enter your problem").not())
        .stderr(predicate::str::contains("PROMPTFORGE_TEST_UNSET_KEY"));
}

#[test]
fn credential_from_user_secrets_file() {
    let dir = TempDir::new().unwrap();
    let secrets_dir = dir.path().join("promptforge");
    std::fs::create_dir_all(&secrets_dir).unwrap();
    std::fs::write(
        secrets_dir.join("secrets.toml"),
        "[openai]\napi_key = \"from-secrets\"\n",
    )
    .unwrap();

    // Linux resolves the config dir from XDG_CONFIG_HOME; elsewhere skip.
    if cfg!(target_os = "linux") {
        promptforge_in(&dir)
            .arg("ask")
            .write_stdin("\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("No problem provided. Exiting."));
    }
}

#[test]
fn invalid_temperature_is_rejected() {
    let dir = TempDir::new().unwrap();
    promptforge_in(&dir)
        .args(["--temperature", "3.5", "config"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("temperature"));
}

#[test]
fn config_reports_sources() {
    let dir = TempDir::new().unwrap();
    let config_dir = dir.path().join(".promptforge");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "[llm]\nmodel = \"gpt-4o-mini\"\n",
    )
    .unwrap();

    let output = promptforge_in(&dir)
        .args(["--max-tokens", "512", "config", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["llm.model"]["value"], "gpt-4o-mini");
    assert_eq!(value["llm.model"]["source"], "config");
    assert_eq!(value["llm.max_tokens"]["value"], "512");
    assert_eq!(value["llm.max_tokens"]["source"], "cli");
    assert_eq!(value["llm.temperature"]["source"], "default");
}

#[test]
fn unreachable_endpoint_aborts_with_llm_exit_code() {
    let dir = TempDir::new().unwrap();
    promptforge_in(&dir)
        .env("OPENAI_API_KEY", "dummy")
        .args([
            "--base-url",
            "http://127.0.0.1:9/v1/chat/completions",
            "--timeout-secs",
            "5",
            "ask",
            "--problem",
            "How do I sort a list?",
            "--no-wait",
        ])
        .assert()
        .code(70)
        .stdout(predicate::str::contains("Error: Stage 'analyze' failed: API Error:"));
}

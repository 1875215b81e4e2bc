use assert_cmd::Command;
use predicates::prelude::*;

mod common;

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("healthchat")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("categories"));
}

#[test]
fn test_categories_prints_every_category() {
    let (_dir, config_path) = common::temp_config_file("provider:\n  type: ollama\n");

    Command::cargo_bin("healthchat")
        .unwrap()
        .args(["--config", config_path.to_str().unwrap(), "categories"])
        .env_remove("HEALTHCHAT_PROVIDER")
        .assert()
        .success()
        .stdout(predicate::str::contains("nutrition"))
        .stdout(predicate::str::contains("mental_health"))
        .stdout(predicate::str::contains("Medication"));
}

#[test]
fn test_invalid_provider_in_config_fails() {
    let (_dir, config_path) = common::temp_config_file("provider:\n  type: copilot\n");

    Command::cargo_bin("healthchat")
        .unwrap()
        .args(["--config", config_path.to_str().unwrap(), "categories"])
        .env_remove("HEALTHCHAT_PROVIDER")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid provider type"));
}

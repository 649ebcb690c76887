//! Command-line behaviour of the `variant-select` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

use variant_select::test_utils::ScenarioFixture;

fn variant_select() -> Command {
    let mut cmd = Command::cargo_bin("variant-select").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG").env_remove("VARIANT_SELECT_CONFIG");
    cmd
}

fn write(temp: &TempDir, fixture: ScenarioFixture) -> std::path::PathBuf {
    fixture.write_to(temp.path()).unwrap()
}

fn select(scenario: &Path, attributes: &[&str]) -> Command {
    let mut cmd = variant_select();
    cmd.arg("select").arg("--scenario").arg(scenario).args(["--component", "org.example:lib:1.0"]);
    for attribute in attributes {
        cmd.args(["-a", attribute]);
    }
    cmd
}

#[test]
fn test_select_prints_chosen_variant() {
    let temp = TempDir::new().unwrap();
    let scenario = write(&temp, ScenarioFixture::java_library());

    select(&scenario, &["org.gradle.usage=java-api", "org.gradle.jvm.version=17"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Selected org.example:lib:1.0(apiElements)"))
        .stdout(predicate::str::contains("org.gradle.status = release"))
        .stdout(predicate::str::contains("artifact lib-1.0.jar"));
}

#[test]
fn test_select_runtime_lists_dependencies() {
    let temp = TempDir::new().unwrap();
    let scenario = write(&temp, ScenarioFixture::java_library());

    select(&scenario, &["org.gradle.usage=java-runtime"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(runtimeElements)"))
        .stdout(predicate::str::contains("dependency org.slf4j:slf4j-api:2.0.9"));
}

#[test]
fn test_ambiguous_selection_fails_with_report() {
    let temp = TempDir::new().unwrap();
    let scenario = write(&temp, ScenarioFixture::ambiguous());

    select(&scenario, &["org.gradle.usage=java-api"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Cannot choose between 2 variants"))
        .stderr(predicate::str::contains("library"))
        .stderr(predicate::str::contains("platform"))
        .stderr(predicate::str::contains("org.gradle.category"));
}

#[test]
fn test_no_match_in_json_prints_failure_report() {
    let temp = TempDir::new().unwrap();
    let scenario = write(&temp, ScenarioFixture::ambiguous());

    let output = select(&scenario, &["org.gradle.usage=java-runtime"])
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(report["error"].as_str().unwrap().starts_with("No variant matches"));
    assert_eq!(report["failure"]["candidates"].as_array().unwrap().len(), 2);
}

#[test]
fn test_select_json_output() {
    let temp = TempDir::new().unwrap();
    let scenario = write(&temp, ScenarioFixture::java_library());

    let output = select(&scenario, &["org.gradle.usage=java-api", "org.gradle.jvm.version=8"])
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let selected: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(selected["name"], "platformElements");
    assert_eq!(selected["component_id"], "org.example:lib:1.0");
    assert_eq!(selected["attributes"]["org.gradle.category"], "platform");
}

#[test]
fn test_config_flag_replaces_scenario_config() {
    let temp = TempDir::new().unwrap();
    let scenario = write(&temp, ScenarioFixture::ambiguous());
    let config = temp.path().join("engine.toml");
    std::fs::write(
        &config,
        "[schema.attributes.\"org.gradle.category\"]\nprefer = [\"platform\"]\n",
    )
    .unwrap();

    select(&scenario, &["org.gradle.usage=java-api"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("(platform)"));
}

#[test]
fn test_realize_prints_every_variant() {
    let temp = TempDir::new().unwrap();
    let scenario = write(&temp, ScenarioFixture::java_library());

    variant_select()
        .arg("realize")
        .arg("--scenario")
        .arg(&scenario)
        .args(["--component", "org.example:lib:1.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("org.example:lib:1.0(apiElements)"))
        .stdout(predicate::str::contains("org.example:lib:1.0(runtimeElements)"))
        .stdout(predicate::str::contains("org.example:lib:1.0(platformElements)"));
}

#[test]
fn test_unknown_component_and_variant_errors() {
    let temp = TempDir::new().unwrap();
    let scenario = write(&temp, ScenarioFixture::java_library());

    variant_select()
        .arg("realize")
        .arg("--scenario")
        .arg(&scenario)
        .args(["--component", "org.example:other:1.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No descriptor available for component org.example:other:1.0"));
}

#[test]
fn test_bad_attribute_argument() {
    let temp = TempDir::new().unwrap();
    let scenario = write(&temp, ScenarioFixture::java_library());

    select(&scenario, &["org.gradle.usage"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be written as key=value"));
}

#[test]
fn test_missing_scenario_file() {
    let temp = TempDir::new().unwrap();

    select(&temp.path().join("nope.toml"), &["org.gradle.usage=java-api"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.toml"));
}

#[test]
fn test_verbose_and_quiet_conflict() {
    variant_select()
        .args(["--verbose", "--quiet", "realize", "--scenario", "x.toml", "--component", "a:b:c"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

//! CLI tests for fleetinv
//!
//! Runs the binary the way Ansible does and checks:
//! - `--list` and `--host` output
//! - Option overrides
//! - Error handling: non-zero exit and nothing on stdout

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};

// Helper to get an isolated command for testing
fn fleetinv_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fleetinv").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env_remove("RUST_LOG")
        .env_remove("FLEETINV_CONFIG")
        .env_remove("FLEETINV_BASE_URL")
        .env_remove("FLEETINV_ALIAS_STRATEGY")
        .env_remove("FLEETINV_PYTHON_INTERPRETER");
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_help() {
    let home = tempdir().unwrap();
    fleetinv_cmd(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--list"))
        .stdout(predicate::str::contains("--host"));
}

#[test]
fn test_list_from_file() {
    let home = tempdir().unwrap();
    let output = fleetinv_cmd(&home)
        .arg("--list")
        .arg("--file")
        .arg(common::fixture_path("nodes.json"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let value = stdout_json(&output);
    assert_eq!(
        value["sys7"]["hosts"],
        json!(["node1.prov.example.org", "node2.cp.example.org"])
    );
    assert_eq!(value["sys7-worker"]["hosts"], json!(["node1.prov.example.org"]));
    assert_eq!(value["sys7-storage"]["hosts"], json!(["node2.cp.example.org"]));
    assert_eq!(
        value["_meta"]["hostvars"]["node2.cp.example.org"]["kube_control_plane_ips"],
        json!(["10.5.0.12"])
    );
}

#[test]
fn test_list_is_default_mode() {
    let home = tempdir().unwrap();
    let output = fleetinv_cmd(&home)
        .arg("--file")
        .arg(common::fixture_path("nodes.json"))
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(stdout_json(&output)["_meta"]["hostvars"].is_object());
}

#[test]
fn test_host_lookup() {
    let home = tempdir().unwrap();
    let output = fleetinv_cmd(&home)
        .args(["--strategy", "gateway", "--host", "node1"])
        .arg("--file")
        .arg(common::fixture_path("nodes.json"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let value = stdout_json(&output);
    assert_eq!(value["inventory_id"], json!("inv-0001"));
    assert_eq!(value["ansible_host"], json!("node1.prov.example.org"));
    assert_eq!(value["ansible_port"], json!(22));
}

#[test]
fn test_unknown_host_prints_empty_object() {
    let home = tempdir().unwrap();
    fleetinv_cmd(&home)
        .args(["--host", "nosuchhost"])
        .arg("--file")
        .arg(common::fixture_path("nodes.json"))
        .assert()
        .success()
        .stdout("{}\n");
}

#[test]
fn test_python_interpreter_option() {
    let home = tempdir().unwrap();
    let output = fleetinv_cmd(&home)
        .args(["--python-interpreter", "/opt/ansible/bin/python"])
        .args(["--host", "node1.prov.example.org"])
        .arg("--file")
        .arg(common::fixture_path("nodes.json"))
        .output()
        .unwrap();

    assert_eq!(
        stdout_json(&output)["ansible_python_interpreter"],
        json!("/opt/ansible/bin/python")
    );
}

#[test]
fn test_config_file_selects_source() {
    let home = tempdir().unwrap();
    let config = home.path().join("custom.toml");
    std::fs::write(
        &config,
        format!(
            "[source]\nfile = {:?}\n\n[projection]\ntag_groups = true\n",
            common::fixture_path("nodes.json").display().to_string()
        ),
    )
    .unwrap();

    let output = fleetinv_cmd(&home)
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output)["tag_gpu"]["hosts"],
        json!(["node1.prov.example.org"])
    );
}

#[test]
fn test_pretty_output() {
    let home = tempdir().unwrap();
    fleetinv_cmd(&home)
        .arg("--pretty")
        .arg("--file")
        .arg(common::fixture_path("nodes.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\n  \"sys7\": {"));
}

#[test]
fn test_list_and_host_conflict() {
    let home = tempdir().unwrap();
    fleetinv_cmd(&home)
        .args(["--list", "--host", "node1"])
        .assert()
        .failure();
}

#[test]
fn test_missing_file_fails_without_stdout() {
    let home = tempdir().unwrap();
    fleetinv_cmd(&home)
        .args(["--file", "/nonexistent/nodes.json"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_missing_source_is_config_error() {
    let home = tempdir().unwrap();
    fleetinv_cmd(&home)
        .arg("--list")
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("base_url"));
}

#[test]
fn test_missing_config_file_is_config_error() {
    let home = tempdir().unwrap();
    fleetinv_cmd(&home)
        .args(["--config", "/nonexistent/fleetinv.toml"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_invalid_env_strategy_is_reported() {
    let home = tempdir().unwrap();
    fleetinv_cmd(&home)
        .env("FLEETINV_ALIAS_STRATEGY", "dns")
        .arg("--file")
        .arg(common::fixture_path("nodes.json"))
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("FLEETINV_ALIAS_STRATEGY"));
}

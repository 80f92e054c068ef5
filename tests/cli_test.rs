// file: tests/cli_test.rs
// version: 1.0.0
// guid: f3a1c7e9-2b4d-4f86-9c0e-6d8b5a2e1f47

//! End-to-end tests of the koreonctl binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const VALID_CREATE: &str = r#"
[koreon]
cluster-name = "cli"
install-dir = "/var/lib/koreon"

[kubernetes]
version = "1.24.3"

[node-pool.master]
ip = ["10.0.0.1"]

[node-pool.node]
ip = ["10.0.0.2"]

[private-registry]
registry-version = "2.7.0"
"#;

fn work_dir(content: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("koreon.toml"), content).unwrap();
    dir
}

fn koreonctl(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("koreonctl").unwrap();
    cmd.env_remove("KOREONCTL_CONFIG")
        .env_remove("KOREONCTL_CATALOG")
        .env_remove("KOREONCTL_IMAGE")
        .arg("--quiet")
        .arg("--work-dir")
        .arg(dir.path());
    cmd
}

#[test]
fn test_validate_valid_document() {
    let dir = work_dir(VALID_CREATE);

    koreonctl(&dir)
        .args(["validate", "--context", "create"])
        .assert()
        .success()
        .stdout(predicate::str::contains("configuration is valid for create"));
}

#[test]
fn test_validate_reports_every_violation() {
    let dir = work_dir("[koreon]\ninstall-dir = \"relative\"\n");

    koreonctl(&dir)
        .args(["validate", "--context", "create"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("koreon.install-dir"))
        .stderr(predicate::str::contains("node-pool.master.ip"))
        .stderr(predicate::str::contains("node-pool.node.ip"));
}

#[test]
fn test_validate_json_output() {
    let dir = work_dir(VALID_CREATE);

    let output = koreonctl(&dir)
        .args(["validate", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["context"], "create");
    assert_eq!(report["config"]["koreon"]["helm-version"], "3.10.3");
    assert_eq!(
        report["config"]["support-version"]["image-version"]["calico"],
        "3.23.5"
    );
}

#[test]
fn test_missing_document() {
    let dir = TempDir::new().unwrap();

    koreonctl(&dir)
        .arg("validate")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Run koreonctl init first"));
}

#[test]
fn test_config_name_from_environment() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("cluster.toml"), VALID_CREATE).unwrap();

    koreonctl(&dir)
        .env("KOREONCTL_CONFIG", "cluster.toml")
        .arg("validate")
        .assert()
        .success();
}

#[test]
fn test_declined_destroy_changes_nothing() {
    let dir = work_dir(VALID_CREATE);

    koreonctl(&dir)
        .args(["destroy", "cluster"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Is this ok [y/n]: "))
        .stdout(predicate::str::contains("nothing to change"));
}

#[test]
fn test_declined_create_never_checks_credentials() {
    let dir = work_dir(VALID_CREATE);

    koreonctl(&dir)
        .arg("create")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to change"));
}

#[test]
fn test_plan_prints_invocation() {
    let dir = work_dir(VALID_CREATE);

    koreonctl(&dir)
        .args(["plan", "destroy", "registry", "-p", "/keys/id_rsa", "-u", "ops"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("docker run --rm --privileged -it --pull always"))
        .stdout(predicate::str::contains("--tags reset-registry"))
        .stdout(predicate::str::contains("--private-key /home/id_rsa --user ops"));
}

#[test]
fn test_plan_without_user_fails() {
    let dir = work_dir(VALID_CREATE);

    koreonctl(&dir)
        .args(["plan", "create", "-p", "/keys/id_rsa"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ssh login user"));
}

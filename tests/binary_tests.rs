//! Integration tests for the sql-user-provisioner binary.

use std::io::Write;

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("sql-user-provisioner");
    cmd.env_remove("PROVISIONER_CASE_SENSITIVITY")
        .env_remove("PROVISIONER_DROP_CASCADE")
        .env_remove("PROVISIONER_LOG");
    cmd
}

fn json_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", content).unwrap();
    file
}

#[test]
fn test_create_success() {
    let desired = json_file(r#"{"userName": "user1", "profile": "batch"}"#);

    cmd()
        .args(["create", "-i", desired.path().to_str().unwrap(), "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("create user \"USER1\""))
        .stdout(predicate::str::contains("profile \"BATCH\";"));
}

#[test]
fn test_create_from_stdin() {
    cmd()
        .args(["create", "-i", "-", "--no-color"])
        .write_stdin(r#"{"userName": "piped", "password": "Secret"}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "create user \"PIPED\" identified by \"Secret\""
        ));
}

#[test]
fn test_create_validation_error() {
    let desired = json_file(r#"{"userName": "app", "defaultQuota": "10m"}"#);

    cmd()
        .args(["create", "-i", desired.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_alter_nothing_to_do() {
    let desired = json_file(r#"{"userName": "app"}"#);
    let existing = json_file(r#"{"userName": "APP"}"#);

    cmd()
        .args([
            "alter",
            "-i",
            desired.path().to_str().unwrap(),
            "-e",
            existing.path().to_str().unwrap(),
            "--no-color"
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to alter for APP"));
}

#[test]
fn test_alter_profile() {
    let desired = json_file(r#"{"userName": "app", "profile": "batch"}"#);
    let existing = json_file(r#"{"userName": "APP", "defaultTablespace": "USERS"}"#);

    cmd()
        .args([
            "alter",
            "-i",
            desired.path().to_str().unwrap(),
            "-e",
            existing.path().to_str().unwrap(),
            "--no-color"
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("alter user \"APP\""))
        .stdout(predicate::str::contains("profile \"BATCH\""));
}

#[test]
fn test_drop_cascade() {
    cmd()
        .args(["drop", "-u", "app", "--cascade", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("drop user \"APP\" cascade;"));
}

#[test]
fn test_reconcile_roles() {
    cmd()
        .args([
            "reconcile",
            "-u",
            "app",
            "-c",
            "role",
            "--current",
            "a,b",
            "--desired",
            "b,c",
            "--no-color"
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("grant \"C\" to \"APP\";"))
        .stdout(predicate::str::contains("revoke \"A\" from \"APP\";"))
        .stdout(predicate::str::contains("\"B\"").not());
}

#[test]
fn test_reconcile_privileges_json() {
    cmd()
        .args([
            "reconcile",
            "-u",
            "app",
            "-c",
            "privilege",
            "--desired",
            "create session",
            "-f",
            "json"
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"toGrant\""))
        .stdout(predicate::str::contains("grant CREATE SESSION to \\\"APP\\\""));
}

#[test]
fn test_search_with_filter() {
    let filter = json_file(
        r#"{"type": "compare", "op": "startsWith", "attribute": "name", "value": "app_"}"#
    );

    cmd()
        .args([
            "search",
            "-q",
            filter.path().to_str().unwrap(),
            "-a",
            "name,defaultTablespaceQuota",
            "--no-color"
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("DBA_TS_QUOTAS"))
        .stdout(predicate::str::contains("DBA_USERS.USERNAME LIKE ?"))
        .stdout(predicate::str::contains("?1 = 'APP\\_%'"));
}

#[test]
fn test_search_without_filter() {
    cmd()
        .args(["search", "-f", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("joinLevel: users"));
}

#[test]
fn test_search_unsupported_attribute() {
    let filter =
        json_file(r#"{"type": "compare", "op": "equals", "attribute": "roles", "value": "DBA"}"#);

    cmd()
        .args(["search", "-q", filter.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_batch_with_failure() {
    let requests = json_file(
        r#"[
            {"action": "create", "desired": {"userName": "one"}},
            {"action": "create", "desired": {"userName": "two", "tempQuota": "5m"}},
            {"action": "alter", "desired": {"userName": "three", "enabled": false},
             "existing": {"userName": "THREE"}}
        ]"#
    );

    cmd()
        .args(["batch", "-i", requests.path().to_str().unwrap(), "--no-color"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("-- [0] ONE"))
        .stdout(predicate::str::contains("-- [1] TWO"))
        .stdout(predicate::str::contains("account lock"))
        .stdout(predicate::str::contains("1 of 3 requests failed"));
}

#[test]
fn test_batch_all_succeed() {
    let requests = json_file(r#"[{"action": "create", "desired": {"userName": "one"}}]"#);

    cmd()
        .args(["batch", "-i", requests.path().to_str().unwrap(), "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"failed\": 0"));
}

#[test]
fn test_case_sensitivity_flag() {
    cmd()
        .args([
            "drop",
            "-u",
            "app",
            "--case-sensitivity",
            "normalizers={USER={upper=false}},formatters={USER={quotes=}}"
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("drop user app;"));
}

#[test]
fn test_case_sensitivity_from_env() {
    cmd()
        .env("PROVISIONER_CASE_SENSITIVITY", "formatters={USER={quotes=}}")
        .args(["drop", "-u", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("drop user APP;"));
}

#[test]
fn test_invalid_case_sensitivity() {
    cmd()
        .args(["drop", "-u", "app", "--case-sensitivity", "normalizers={USER="])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_file_not_found() {
    cmd()
        .args(["create", "-i", "/nonexistent/desired.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_malformed_request() {
    let desired = json_file(r#"{"userName": "app", "shoeSize": 9}"#);

    cmd()
        .args(["create", "-i", desired.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("reconcile"));
}

#[test]
fn test_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sql-user-provisioner"));
}

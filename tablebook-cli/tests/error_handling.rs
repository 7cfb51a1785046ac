//! Exit-code tests for argument and configuration errors.

mod common;

use common::TestEnv;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_invalid_arguments_exit_code() {
    let env = TestEnv::new();
    env.command()
        .args(["available", "--date", "2025-13-01", "--time", "18:00", "--guests", "2"])
        .assert()
        .code(4);

    env.command()
        .args(["available", "--date", "today", "--time", "25:00", "--guests", "2"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("invalid time"));

    env.command()
        .args(["available", "--date", "today", "--time", "18:00", "--guests", "0"])
        .assert()
        .code(4);
}

#[test]
fn test_help_succeeds() {
    let env = TestEnv::new();
    env.command_bare()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("available"));
}

#[test]
fn test_bad_project_config_exit_code() {
    let env = TestEnv::new();
    fs::create_dir_all(&env.data_dir).unwrap();
    fs::write(env.data_dir.join("config.yaml"), "no_such_field: true\n").unwrap();

    env.command().arg("list").assert().code(7);
}

#[test]
fn test_validate_reports_out_of_range_values() {
    let env = TestEnv::new();
    fs::create_dir_all(&env.data_dir).unwrap();
    let path = env.data_dir.join("candidate.yaml");
    fs::write(&path, "reserve_lead_minutes: 0\n").unwrap();

    env.command().arg("validate").arg(&path).assert().code(1);
}

#[test]
fn test_validate_discovered_layers_and_show() {
    let env = TestEnv::new();
    fs::create_dir_all(&env.data_dir).unwrap();
    fs::write(env.data_dir.join("config.yaml"), "auto_confirm: false\n").unwrap();

    env.command()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("ok\tUser"));

    env.command()
        .args(["validate", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"auto_confirm\": false"));
}

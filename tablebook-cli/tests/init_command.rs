//! Integration tests for the `init` command.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_init_fresh_initialization() {
    let env = TestEnv::new();
    assert!(!env.data_dir.exists());

    env.command_bare()
        .arg("init")
        .arg("--data-dir")
        .arg(&env.data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized tablebook"))
        .stdout(predicate::str::contains("Created database"));

    assert!(env.data_dir.join("tablebook.db").exists());
}

#[test]
fn test_init_existing_database_requires_overwrite() {
    let env = TestEnv::new();
    env.init().assert().success();

    env.init()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--overwrite"));

    env.init()
        .arg("--overwrite")
        .assert()
        .success()
        .stdout(predicate::str::contains("Recreated database"));
}

#[test]
fn test_init_with_config_writes_valid_template() {
    let env = TestEnv::new();
    env.init()
        .arg("--with-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created default configuration file"));

    let config_path = env.data_dir.join("config.yaml");
    assert!(config_path.exists());

    env.command()
        .arg("validate")
        .arg(&config_path)
        .assert()
        .success();
}

#[test]
fn test_init_dry_run_creates_nothing() {
    let env = TestEnv::new();
    env.init()
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Would initialize tablebook"));

    assert!(!env.data_dir.exists());
}

#[test]
fn test_disable_autoinit_without_database() {
    let env = TestEnv::new();
    env.command()
        .args(["--disable-autoinit", "list"])
        .assert()
        .code(3);
}

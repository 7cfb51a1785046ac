//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builder helpers for common patterns
//! - Floor and booking fixtures

use assert_cmd::Command;
use chrono::{Datelike, Days, Local, NaiveDate, Weekday};
use std::path::PathBuf;
use tempfile::TempDir;

/// Test environment with isolated data directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the tablebook data directory
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    ///
    /// The data directory is not created; tablebook creates it on first use.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("tablebook-data");
        Self { temp_dir, data_dir }
    }

    /// Get a bare command builder without pre-configured flags.
    ///
    /// The working directory is the temporary directory so that no project
    /// configuration above the test's checkout is picked up.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("tablebook").expect("Failed to find tablebook binary");
        cmd.current_dir(self.temp_dir.path());
        cmd.env_remove("TABLEBOOK_DATA_DIR");
        cmd
    }

    /// Get a command builder with the data directory pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// Get an `init` command targeting this environment's data directory.
    pub fn init(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("init").arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// Add a table with the given number and capacity.
    pub fn add_table(&self, number: u32, capacity: u32) {
        self.command()
            .args(["tables", "add", &number.to_string(), &capacity.to_string()])
            .assert()
            .success();
    }

    /// Add tables #1..#6 with capacities 2, 2, 4, 4, 4, 8.
    pub fn seed_tables(&self) {
        for (number, capacity) in [(1, 2), (2, 2), (3, 4), (4, 4), (5, 4), (6, 8)] {
            self.add_table(number, capacity);
        }
    }

    /// Book a table and return the reservation code.
    pub fn book(&self, table: u32, date: NaiveDate, time: &str, guests: u32) -> String {
        let output = self
            .command()
            .arg("--quiet")
            .args(["book", "--table", &table.to_string()])
            .args(["--date", &date.to_string(), "--time", time])
            .args(["--guests", &guests.to_string()])
            .args(["--name", "Ada Lovelace", "--email", "ada@example.com"])
            .output()
            .expect("Failed to run book command");

        assert!(
            output.status.success(),
            "Book failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout)
            .expect("Invalid UTF-8 in output")
            .trim()
            .to_string()
    }
}

/// A Tuesday at least two weeks from today, so every slot is still
/// bookable and reservations are never held against the current floor.
pub fn future_tuesday() -> NaiveDate {
    let mut date = Local::now().date_naive() + Days::new(14);
    while date.weekday() != Weekday::Tue {
        date = date + Days::new(1);
    }
    date
}

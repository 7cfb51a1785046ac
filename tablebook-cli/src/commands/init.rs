//! Init command implementation.
//!
//! This module implements the `init` command for explicitly initializing
//! the tablebook data directory and database.

use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::Parser;
use std::path::{Path, PathBuf};
use tablebook::config::USER_CONFIG_FILE;
use tablebook::database::{default_data_dir, DATABASE_FILE_NAME};
use tablebook::operations::{init_database, InitOptions};

/// Initialize the tablebook data directory and database.
#[derive(Parser)]
#[command(about = "Initialize the tablebook data directory and database")]
pub struct InitCommand {
    /// Data directory to initialize
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// Overwrite existing database
    #[arg(long)]
    overwrite: bool,

    /// Create default configuration file
    #[arg(long)]
    with_config: bool,

    /// Preview actions without executing
    #[arg(long)]
    dry_run: bool,
}

impl InitCommand {
    /// Execute the init command.
    ///
    /// `--data-dir` here names where to create the data directory, not where
    /// to find it.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let data_dir = self
            .data_dir
            .clone()
            .or_else(|| global.data_dir.clone())
            .or_else(|| default_data_dir().ok())
            .ok_or_else(|| {
                CliError::Config(
                    "Could not determine data directory (home directory not found)".to_string(),
                )
            })?;

        if self.dry_run {
            println!("Would initialize tablebook in: {}", data_dir.display());
            for step in self.planned_steps(&data_dir) {
                println!("  - {step}");
            }
            return Ok(());
        }

        let options = InitOptions::new(data_dir)
            .with_overwrite(self.overwrite)
            .with_create_config(self.with_config);
        let result = init_database(&options)?;

        println!("Initialized tablebook in: {}", result.data_dir.display());
        let mut report = Vec::new();
        if result.data_dir_created {
            report.push("Created data directory");
        }
        if result.database_created {
            report.push(if self.overwrite { "Recreated database" } else { "Created database" });
        }
        if result.config_created {
            report.push("Created default configuration file");
        } else if self.with_config {
            report.push("Configuration file already exists (not overwritten)");
        }
        for line in report {
            println!("  - {line}");
        }
        Ok(())
    }

    /// What a real run would do, without touching the file system.
    fn planned_steps(&self, data_dir: &Path) -> Vec<String> {
        let db_path = data_dir.join(DATABASE_FILE_NAME);
        let config_path = data_dir.join(USER_CONFIG_FILE);
        let mut steps = Vec::new();

        if !data_dir.exists() {
            steps.push(format!("Create data directory: {}", data_dir.display()));
        }
        steps.push(match (db_path.exists(), self.overwrite) {
            (false, _) => format!("Create database: {}", db_path.display()),
            (true, true) => format!("Replace existing database: {}", db_path.display()),
            (true, false) => format!(
                "ERROR: Database already exists (use --overwrite to replace): {}",
                db_path.display()
            ),
        });
        if self.with_config {
            steps.push(if config_path.exists() {
                format!("Keep existing configuration file: {}", config_path.display())
            } else {
                format!("Create configuration file: {}", config_path.display())
            });
        }
        steps
    }
}

//! Validate command implementation.
//!
//! Checks one configuration file, or every file that would be layered for
//! the current directory when no path is given.

use crate::error::CliError;
use crate::utils::{load_configuration, resolve_data_dir, write_json, GlobalOptions};
use clap::Args;
use std::path::{Path, PathBuf};
use tablebook::config::{ConfigLoader, ConfigValidator};

/// Validate configuration files.
#[derive(Args)]
pub struct ValidateCommand {
    /// Configuration file to validate (defaults to every discovered layer)
    #[arg(value_name = "CONFIG_PATH")]
    pub config_path: Option<PathBuf>,

    /// Print the effective configuration as JSON after validating
    #[arg(long, conflicts_with = "config_path")]
    pub show: bool,
}

impl ValidateCommand {
    /// Execute the validate command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if let Some(path) = self.config_path {
            check_file(&path)?;
            if !global.quiet {
                println!("Configuration is valid");
            }
            return Ok(());
        }

        let working_dir = std::env::current_dir()?;
        let data_dir = resolve_data_dir(global)?;
        let sources = ConfigLoader::load_all(&working_dir, Some(&data_dir))
            .map_err(|e| CliError::Config(e.to_string()))?;

        let mut failures = 0;
        for source in &sources {
            match ConfigValidator::validate(&source.config) {
                Ok(()) if !global.quiet => {
                    println!("ok\t{:?}\t{}", source.layer, source.path.display());
                }
                Ok(()) => {}
                Err(e) => {
                    failures += 1;
                    eprintln!("{}: {e}", source.path.display());
                }
            }
        }
        if failures > 0 {
            return Err(CliError::SemanticFailure(format!(
                "{failures} configuration file(s) failed validation"
            )));
        }

        // Environment variables are only checked as part of the merge.
        let effective = load_configuration(global)?;
        if self.show {
            write_json(&effective)?;
        } else if sources.is_empty() && !global.quiet {
            println!("No configuration files found; using built-in defaults");
        }
        Ok(())
    }
}

fn check_file(path: &Path) -> Result<(), CliError> {
    if !path.exists() {
        return Err(CliError::InvalidArguments(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let config = ConfigLoader::load_file(path).map_err(|e| {
        eprintln!("Parse error: {e}");
        CliError::SemanticFailure("Configuration file is invalid".to_string())
    })?;

    ConfigValidator::validate(&config).map_err(|e| {
        eprintln!("Validation error: {e}");
        CliError::SemanticFailure("Configuration validation failed".to_string())
    })
}

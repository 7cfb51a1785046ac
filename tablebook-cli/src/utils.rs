//! Utility functions for CLI operations.
//!
//! This module provides helpers shared across CLI commands: argument
//! parsing, configuration loading, database management and output.

use crate::error::CliError;
use chrono::{Days, NaiveDate};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tablebook::config::OutputFormat;
use tablebook::database::DATABASE_FILE_NAME;
use tablebook::operations::{ExecutionResult, OperationPlan, PlanExecutor};
use tablebook::{
    Clock, Config, ConfigBuilder, Database, DatabaseConfig, Reservation, SystemClock, Table,
};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
#[allow(dead_code)] // `verbose` is consumed by the logger in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds).
    pub busy_timeout: Option<u64>,

    /// Disable automatic database initialization.
    pub disable_autoinit: bool,
}

/// Parses a date argument: `today`, `tomorrow`, or `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    let today = SystemClock.today();
    match s.trim().to_ascii_lowercase().as_str() {
        "today" => Ok(today),
        "tomorrow" => today
            .checked_add_days(Days::new(1))
            .ok_or_else(|| "date out of range".to_string()),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .map_err(|_| format!("invalid date '{s}' (expected YYYY-MM-DD, today or tomorrow)")),
    }
}

/// Parses a `FromStr` argument, keeping only the error message.
pub fn parse_with<T>(s: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    s.parse().map_err(|e: T::Err| e.to_string())
}

/// Resolve the data directory: global option, then `TABLEBOOK_DATA_DIR`,
/// then `~/.tablebook`.
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match global.data_dir {
        Some(ref dir) => Ok(dir.clone()),
        None => {
            tablebook::database::resolve_data_dir().map_err(|e| CliError::Config(e.to_string()))
        }
    }
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Environment variables (highest priority)
/// 2. Project configuration files
/// 3. The user configuration in the data directory
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let data_dir = resolve_data_dir(global)?;
    ConfigBuilder::new()
        .with_data_dir(&data_dir)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Open database with configuration.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the database doesn't exist and auto-init is disabled.
pub fn open_database(global: &GlobalOptions, config: &Config) -> Result<Database, CliError> {
    let db_path = resolve_data_dir(global)?.join(DATABASE_FILE_NAME);

    let autoinit_disabled = global.disable_autoinit || config.disable_autoinit == Some(true);
    if !db_path.exists() && autoinit_disabled {
        return Err(CliError::NoDataDirectory);
    }

    let busy_timeout = global
        .busy_timeout
        .map_or_else(|| config.lock_wait(), Duration::from_secs);
    log::debug!("Opening database at {}", db_path.display());
    let db_config = DatabaseConfig::new(db_path).with_busy_timeout(busy_timeout);

    Database::open(db_config).map_err(CliError::from)
}

/// Print a plan's warnings to stderr unless quiet.
pub fn print_warnings(warnings: &[String], global: &GlobalOptions) {
    if global.quiet {
        return;
    }
    for warning in warnings {
        eprintln!("Warning: {warning}");
    }
}

/// Print what a plan would do, for `--dry-run`.
pub fn print_plan(plan: &OperationPlan) {
    println!("Dry run: {}", plan.description);
    for action in &plan.actions {
        println!("  - {}", action.description());
    }
}

/// Execute a plan, or print it in dry-run mode.
///
/// Returns `None` in dry-run mode.
pub fn run_plan(
    db: &mut Database,
    plan: &OperationPlan,
    dry_run: bool,
    global: &GlobalOptions,
) -> Result<Option<ExecutionResult>, CliError> {
    print_warnings(&plan.warnings, global);
    if dry_run {
        print_plan(plan);
        return Ok(None);
    }
    let result = PlanExecutor::new(db).execute(plan)?;
    Ok(Some(result))
}

/// Resolve the effective output format: explicit flag, then configuration.
pub fn output_format(explicit: Option<OutputFormat>, config: &Config) -> OutputFormat {
    explicit.or(config.output_format).unwrap_or_default()
}

/// Write a value as pretty JSON followed by a newline.
pub fn write_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value)
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    writeln!(handle)?;
    Ok(())
}

/// Convert csv::Error to CliError.
pub fn csv_error(e: csv::Error) -> CliError {
    CliError::Io(std::io::Error::other(e))
}

/// One-line summary of a reservation.
pub fn reservation_line(reservation: &Reservation, table_number: Option<u32>) -> String {
    let table = table_number.map_or_else(
        || format!("table id {}", reservation.table_id),
        |n| format!("table {n}"),
    );
    format!(
        "{} {} {} {} guest(s) at {} for {} [{}]",
        reservation.code,
        reservation.date,
        reservation.time,
        reservation.guests,
        table,
        reservation.customer.name,
        reservation.status
    )
}

/// Look up a table's display number.
pub fn table_number_of(tables: &[Table], reservation: &Reservation) -> Option<u32> {
    tables
        .iter()
        .find(|t| t.id == reservation.table_id)
        .map(|t| t.number)
}

/// Resolve a table by display number.
pub fn find_table(db: &Database, number: u32) -> Result<Table, CliError> {
    Database::get_table_by_number(db.connection(), number)?.ok_or_else(|| {
        CliError::Library(tablebook::Error::NotFound {
            resource: format!("table {number}"),
        })
    })
}

/// Resolve a reservation by code (`RES-0001`) or numeric id.
pub fn find_reservation(db: &Database, reference: &str) -> Result<Reservation, CliError> {
    let conn = db.connection();
    let found = match reference.trim().parse::<i64>() {
        Ok(id) => Database::get_reservation(conn, tablebook::ReservationId(id))?,
        Err(_) => Database::get_reservation_by_code(conn, &reference.trim().to_ascii_uppercase())?,
    };
    found.ok_or_else(|| {
        CliError::Library(tablebook::Error::NotFound {
            resource: format!("reservation {reference}"),
        })
    })
}

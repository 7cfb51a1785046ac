//! Data directory initialization.
//!
//! Creates the data directory and an empty database, and optionally writes a
//! commented configuration template next to it.

use std::fs;
use std::path::PathBuf;

use crate::config::USER_CONFIG_FILE;
use crate::database::DATABASE_FILE_NAME;
use crate::error::{Error, Result};
use crate::{Database, DatabaseConfig};

/// Options for [`init_database`].
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Data directory to initialize.
    pub data_dir: PathBuf,
    /// Replace an existing database.
    pub overwrite: bool,
    /// Write a configuration template if none exists.
    pub create_config: bool,
}

impl InitOptions {
    /// Creates options for `data_dir` with overwrite and config creation off.
    #[must_use]
    pub const fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            overwrite: false,
            create_config: false,
        }
    }

    /// Sets whether an existing database is replaced.
    #[must_use]
    pub const fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets whether a configuration template is written.
    #[must_use]
    pub const fn with_create_config(mut self, create_config: bool) -> Self {
        self.create_config = create_config;
        self
    }
}

/// What [`init_database`] did.
#[derive(Debug)]
pub struct InitResult {
    /// The data directory was created.
    pub data_dir_created: bool,
    /// The database was created or recreated.
    pub database_created: bool,
    /// A configuration template was written.
    pub config_created: bool,
    /// The initialized data directory.
    pub data_dir: PathBuf,
}

const CONFIG_TEMPLATE: &str = r"# tablebook configuration

# New bookings start CONFIRMED instead of PENDING (default: true)
# auto_confirm: true

# Loyalty points earned per guest on completion (default: 10)
# loyalty_points_per_guest: 10

# Minimum notice for a customer cancellation, in hours (default: 2)
# cancellation_notice_hours: 2

# Treat bookings closer than this many minutes as conflicting.
# Unset means only the exact same slot conflicts.
# seating_window_minutes: 90

# Hold a table as RESERVED when its booking starts within this many minutes
# (default: 120)
# reserve_lead_minutes: 120

# Maximum lock wait time in seconds (default: 5)
# maximum_lock_wait_seconds: 5

# Output format for listings: table, json or csv (default: table)
# output_format: table
";

/// Initializes the data directory and database.
///
/// # Errors
///
/// Returns an error if the directory, database or template cannot be
/// created, or if a database already exists and `overwrite` is off.
///
/// # Examples
///
/// ```no_run
/// use tablebook::operations::{init_database, InitOptions};
/// use std::path::PathBuf;
///
/// let options = InitOptions::new(PathBuf::from("/tmp/tablebook")).with_create_config(true);
/// let result = init_database(&options).unwrap();
/// assert!(result.database_created);
/// ```
pub fn init_database(options: &InitOptions) -> Result<InitResult> {
    let mut result = InitResult {
        data_dir_created: false,
        database_created: false,
        config_created: false,
        data_dir: options.data_dir.clone(),
    };

    if !options.data_dir.exists() {
        fs::create_dir_all(&options.data_dir)?;
        result.data_dir_created = true;
    }

    let db_path = options.data_dir.join(DATABASE_FILE_NAME);
    if db_path.exists() {
        if !options.overwrite {
            return Err(Error::validation(
                "database",
                format!(
                    "database already exists at {}; use --overwrite to replace it",
                    db_path.display()
                ),
            ));
        }
        fs::remove_file(&db_path)?;
        log::info!("Removed existing database at {}", db_path.display());
    }

    Database::open(DatabaseConfig::new(&db_path))?;
    result.database_created = true;

    if options.create_config {
        let config_path = options.data_dir.join(USER_CONFIG_FILE);
        if !config_path.exists() {
            fs::write(&config_path, CONFIG_TEMPLATE)?;
            result.config_created = true;
        }
    }

    Ok(result)
}

//! Database connection management.
//!
//! This module provides the main database connection type with the PRAGMA
//! settings the store relies on.

use rusqlite::{Connection, OpenFlags, Transaction, TransactionBehavior};

use crate::error::{Error, Result};

use super::config::DatabaseConfig;

/// A `SQLite` connection to the tablebook store.
///
/// # Examples
///
/// ```no_run
/// use tablebook::database::{Database, DatabaseConfig};
///
/// let db = Database::open(DatabaseConfig::new("/tmp/tablebook.db")).unwrap();
/// ```
#[derive(Debug)]
pub struct Database {
    pub(super) conn: Connection,
    config: DatabaseConfig,
}

impl Database {
    /// Opens a database connection with the given configuration.
    ///
    /// Creates the parent directory when auto-creating, enables WAL and
    /// foreign keys, applies the busy timeout, and initializes or verifies
    /// the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or created, the schema
    /// version is unsupported, or any PRAGMA fails.
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        if !config.auto_create && !config.path.exists() {
            return Err(Error::DataDirectoryNotFound {
                path: config
                    .path
                    .parent()
                    .map_or_else(|| config.path.clone(), std::path::Path::to_path_buf),
            });
        }
        if config.auto_create && !config.path.exists() {
            if let Some(parent) = config.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let flags = if config.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else if config.auto_create {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };

        let conn = Connection::open_with_flags(&config.path, flags)?;
        // Set first so that the PRAGMAs below also wait on other writers.
        conn.busy_timeout(config.busy_timeout)?;

        // PRAGMA journal_mode returns a row, so it goes through query_row.
        if !config.read_only {
            let _: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        }
        conn.execute_batch("PRAGMA synchronous = NORMAL; PRAGMA foreign_keys = ON")?;

        super::migrations::check_schema_compatibility(&conn)?;
        log::debug!("opened database {}", config.path.display());

        Ok(Self { conn, config })
    }

    /// Returns the configuration this database was opened with.
    #[must_use]
    pub const fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Returns a reference to the underlying `SQLite` connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns a mutable reference to the underlying `SQLite` connection.
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Starts an IMMEDIATE transaction, taking the write lock up front.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockTimeout`] if the write lock could not be taken
    /// within the busy timeout.
    pub fn begin_write(&mut self) -> Result<Transaction<'_>> {
        let seconds = self.config.busy_timeout.as_secs();
        self.conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(ref f, _)
                    if matches!(
                        f.code,
                        rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
                    ) =>
                {
                    Error::LockTimeout { seconds }
                }
                other => Error::Database(other),
            })
    }
}

/// Returns `true` if `err` is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(f, _)
            if f.code == rusqlite::ErrorCode::ConstraintViolation
                && f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

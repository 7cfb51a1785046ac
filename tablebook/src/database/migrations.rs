//! Database schema management and migrations.
//!
//! This module handles database schema initialization and version checking.

use rusqlite::Connection;

use crate::error::{Error, Result};

use super::schema::{
    CREATE_ACTIVE_SLOT_INDEX, CREATE_DATE_INDEX, CREATE_METADATA_TABLE,
    CREATE_RESERVATIONS_TABLE, CREATE_STATUS_INDEX, CREATE_TABLES_TABLE, CURRENT_SCHEMA_VERSION,
    INSERT_SCHEMA_VERSION, SELECT_SCHEMA_VERSION,
};

/// Initializes the database schema.
///
/// Creates all tables, indices, and metadata for a fresh database.
///
/// # Errors
///
/// Returns an error if any SQL statement fails to execute.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use tablebook::database::migrations::{get_schema_version, initialize_schema};
///
/// let conn = Connection::open_in_memory().unwrap();
/// initialize_schema(&conn).unwrap();
/// assert_eq!(get_schema_version(&conn).unwrap(), 1);
/// ```
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;
    conn.execute(CREATE_TABLES_TABLE, [])?;
    conn.execute(CREATE_RESERVATIONS_TABLE, [])?;

    conn.execute(CREATE_ACTIVE_SLOT_INDEX, [])?;
    conn.execute(CREATE_DATE_INDEX, [])?;
    conn.execute(CREATE_STATUS_INDEX, [])?;

    conn.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION.to_string()])?;
    log::debug!("initialized schema version {CURRENT_SCHEMA_VERSION}");

    Ok(())
}

/// Gets the current schema version from the database.
///
/// Returns `Ok(0)` when the database has not been initialized.
///
/// # Errors
///
/// Returns an error if the query fails for any other reason, or the stored
/// version is not a number.
pub fn get_schema_version(conn: &Connection) -> Result<u32> {
    let metadata_exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'metadata'",
        [],
        |row| row.get(0),
    )?;
    if !metadata_exists {
        return Ok(0);
    }

    match conn.query_row(SELECT_SCHEMA_VERSION, [], |row| row.get::<_, String>(0)) {
        Ok(value) => value.parse::<u32>().map_err(|_| Error::DatabaseCorruption {
            details: format!("schema version '{value}' is not a number"),
        }),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

/// Checks schema compatibility and initializes if needed.
///
/// # Errors
///
/// Returns [`Error::UnsupportedSchemaVersion`] if the database was written
/// by a different schema version, or any database error.
pub fn check_schema_compatibility(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        initialize_schema(conn)?;
    } else if version != CURRENT_SCHEMA_VERSION {
        return Err(Error::UnsupportedSchemaVersion {
            expected: CURRENT_SCHEMA_VERSION,
            found: version,
        });
    }

    Ok(())
}

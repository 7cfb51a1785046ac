//! Database layer: the system of record for tables and reservations.
//!
//! A SQLite store is the sole arbiter of whether a `(date, time, table)`
//! slot is taken. Reads are advisory; the write that claims a slot runs in
//! an IMMEDIATE transaction and is guarded by a partial unique index, so a
//! lost race surfaces as [`crate::Error::SlotTaken`].
//!
//! # Examples
//!
//! ```no_run
//! use tablebook::database::{Database, DatabaseConfig};
//!
//! let db = Database::open(DatabaseConfig::new("/tmp/tablebook.db")).unwrap();
//! for table in Database::list_tables(db.connection()).unwrap() {
//!     println!("table {} seats {}", table.number, table.capacity);
//! }
//! ```

mod config;
mod connection;
pub mod migrations;
mod reservations;
mod rows;
mod schema;
mod tables;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::{
    default_data_dir, resolve_data_dir, resolve_database_path, DatabaseConfig, DATABASE_FILE_NAME,
    DATA_DIR_ENV,
};
pub use connection::Database;
pub use reservations::{ReservationQuery, ScheduleUpdate, StatusUpdate};

pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};

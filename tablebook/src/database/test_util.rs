//! Shared test utilities for database unit tests.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use tempfile::tempdir;

use crate::database::{Database, DatabaseConfig};
use crate::reservation::{Customer, NewReservation, PreOrderItem};
use crate::table::{NewTable, Table, TableId};

/// Creates a temporary test database that will be cleaned up automatically.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(DatabaseConfig::new(path)).unwrap();

    // Keep the directory alive for the lifetime of the test process.
    std::mem::forget(dir);

    db
}

/// A fixed "now" for tests: 2025-06-01 09:00.
#[must_use]
pub fn test_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

/// Inserts an AVAILABLE table in the CENTER zone.
///
/// # Panics
///
/// Panics if the insert fails.
pub fn insert_test_table(conn: &Connection, number: u32, capacity: u32) -> Table {
    let new = NewTable::builder(number, capacity).build().unwrap();
    Database::insert_table(conn, &new, test_now()).unwrap()
}

/// Builds a booking request for a fixed customer with one pre-order item.
///
/// # Panics
///
/// Panics if `time` does not parse.
#[must_use]
pub fn test_request(table_id: TableId, date: NaiveDate, time: &str, guests: u32) -> NewReservation {
    let customer = Customer::new("Ada Lovelace", "ada@example.com", Some("555-0100")).unwrap();
    NewReservation::builder(customer, date, time.parse().unwrap(), table_id, guests)
        .pre_order(vec![PreOrderItem {
            drink: Some("Lemonade".into()),
            food: Some("Risotto".into()),
        }])
        .build()
        .unwrap()
}

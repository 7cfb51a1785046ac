//! Common test utilities for integration tests.

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use tablebook::config::{Config, ConfigBuilder};
use tablebook::{
    Customer, Database, DatabaseConfig, FixedClock, NewReservation, NewTable, Table, TableId,
};

/// A database in a temporary directory. The directory lives as long as the
/// returned guard.
pub fn open_database() -> (TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(DatabaseConfig::new(dir.path().join("tablebook.db"))).unwrap();
    (dir, db)
}

/// Built-in defaults only; no files or environment.
#[allow(dead_code)]
pub fn default_config() -> Config {
    ConfigBuilder::new().skip_files().skip_env().build().unwrap()
}

/// 2025-06-10, a Tuesday.
pub fn tuesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
}

/// A clock stopped at 09:00 on the Sunday before [`tuesday`].
pub fn morning_clock() -> FixedClock {
    FixedClock::new(at(NaiveDate::from_ymd_opt(2025, 6, 8).unwrap(), 9, 0))
}

/// A date and time of day.
pub fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, minute, 0).unwrap()
}

/// Tables #1 to #6 with capacities 2, 2, 4, 4, 4 and 8.
pub fn seed_tables(db: &Database) -> Vec<Table> {
    [(1, 2), (2, 2), (3, 4), (4, 4), (5, 4), (6, 8)]
        .into_iter()
        .map(|(number, capacity)| {
            let table = NewTable::builder(number, capacity).build().unwrap();
            Database::insert_table(db.connection(), &table, at(tuesday(), 8, 0)).unwrap()
        })
        .collect()
}

/// Finds a seeded table by its display number.
#[allow(dead_code)]
pub fn table_number(tables: &[Table], number: u32) -> TableId {
    tables.iter().find(|t| t.number == number).unwrap().id
}

/// A booking request for Ada Lovelace.
pub fn request(table_id: TableId, date: NaiveDate, time: &str, guests: u32) -> NewReservation {
    let customer = Customer::new("Ada Lovelace", "ada@example.com", Some("555-0100")).unwrap();
    NewReservation::builder(customer, date, time.parse().unwrap(), table_id, guests)
        .special_requests(Some("Window seat if possible".into()))
        .build()
        .unwrap()
}

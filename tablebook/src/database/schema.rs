//! Database schema definitions and SQL constants.
//!
//! This module contains the table definitions, indices, and shared SQL
//! fragments for the tablebook store.

/// Current schema version for the database.
///
/// This version is stored in the metadata table and is used to ensure
/// compatibility between the database and the application.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// SQL statement to create the metadata table.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the dining tables table.
///
/// Positions are optional; a table without one is drawn at its zone's
/// default grid slot.
pub const CREATE_TABLES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS dining_tables (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        table_number INTEGER NOT NULL UNIQUE CHECK (table_number >= 1),
        capacity INTEGER NOT NULL CHECK (capacity >= 1),
        zone TEXT NOT NULL,
        shape TEXT NOT NULL,
        status TEXT NOT NULL,
        position_x REAL,
        position_y REAL,
        description TEXT,
        created_at TEXT NOT NULL
    )";

/// SQL statement to create the reservations table.
///
/// `code` is filled in from the row id inside the inserting transaction, so
/// it is nullable only for the duration of that transaction.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        code TEXT UNIQUE,
        customer_name TEXT NOT NULL,
        customer_email TEXT NOT NULL,
        customer_phone TEXT,
        reservation_date TEXT NOT NULL,
        reservation_time TEXT NOT NULL,
        guests INTEGER NOT NULL CHECK (guests >= 1),
        table_id INTEGER NOT NULL REFERENCES dining_tables(id),
        status TEXT NOT NULL,
        special_requests TEXT,
        dietary_notes TEXT,
        pre_order TEXT NOT NULL DEFAULT '[]',
        loyalty_points INTEGER,
        cancellation_reason TEXT,
        cancelled_at TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )";

/// Partial unique index: at most one live reservation per table and slot.
///
/// This is what makes a slot claim atomic. Cancelled and no-show
/// reservations release their slot.
pub const CREATE_ACTIVE_SLOT_INDEX: &str = r"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_reservations_active_slot
    ON reservations(table_id, reservation_date, reservation_time)
    WHERE status NOT IN ('CANCELLED', 'NO_SHOW')";

/// Index for date-range listings.
pub const CREATE_DATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_date ON reservations(reservation_date, reservation_time)";

/// Index for status filters.
pub const CREATE_STATUS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_status ON reservations(status)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// Column list shared by every table query. Order matters for row mapping.
pub const TABLE_COLUMNS: &str = "id, table_number, capacity, zone, shape, status, \
     position_x, position_y, description, created_at";

/// Column list shared by every reservation query. Order matters for row
/// mapping.
pub const RESERVATION_COLUMNS: &str = "id, code, customer_name, customer_email, customer_phone, \
     reservation_date, reservation_time, guests, table_id, status, special_requests, \
     dietary_notes, pre_order, loyalty_points, cancellation_reason, cancelled_at, \
     created_at, updated_at";

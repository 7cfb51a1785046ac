//! Table storage operations.
//!
//! Like the reservation operations, these are associated functions taking a
//! `&Connection` so they run equally on a plain connection or inside a
//! transaction.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Error, Result};
use crate::floorplan::{Position, Zone};
use crate::table::{NewTable, Table, TableId, TableStatus};

use super::connection::{is_unique_violation, Database};
use super::rows::{format_timestamp, row_to_table};
use super::schema::TABLE_COLUMNS;

const INSERT_TABLE: &str = r"
    INSERT INTO dining_tables
    (table_number, capacity, zone, shape, status, position_x, position_y, description, created_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const UPDATE_TABLE_STATUS: &str = "UPDATE dining_tables SET status = ? WHERE id = ?";

const UPDATE_TABLE_POSITION: &str =
    "UPDATE dining_tables SET position_x = ?, position_y = ?, zone = ? WHERE id = ?";

const DELETE_TABLE: &str = "DELETE FROM dining_tables WHERE id = ?";

const COUNT_TABLE_RESERVATIONS: &str = "SELECT COUNT(*) FROM reservations WHERE table_id = ?";

impl Database {
    /// Inserts a table and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateTableNumber`] if the number is taken, or
    /// any database error.
    pub fn insert_table(conn: &Connection, table: &NewTable, now: NaiveDateTime) -> Result<Table> {
        let result = conn.execute(
            INSERT_TABLE,
            params![
                table.number,
                table.capacity,
                table.zone.as_str(),
                table.shape.as_str(),
                table.status.as_str(),
                table.position.map(|p| p.x),
                table.position.map(|p| p.y),
                table.description,
                format_timestamp(now),
            ],
        );
        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(Error::DuplicateTableNumber {
                    number: table.number,
                });
            }
            Err(e) => return Err(e.into()),
        }

        let id = TableId(conn.last_insert_rowid());
        Self::get_table(conn, id)?.ok_or_else(|| Error::NotFound {
            resource: format!("table id {id}"),
        })
    }

    /// Looks up a table by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_table(conn: &Connection, id: TableId) -> Result<Option<Table>> {
        let sql = format!("SELECT {TABLE_COLUMNS} FROM dining_tables WHERE id = ?");
        Ok(conn.query_row(&sql, [id.0], row_to_table).optional()?)
    }

    /// Looks up a table by its display number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_table_by_number(conn: &Connection, number: u32) -> Result<Option<Table>> {
        let sql = format!("SELECT {TABLE_COLUMNS} FROM dining_tables WHERE table_number = ?");
        Ok(conn.query_row(&sql, [number], row_to_table).optional()?)
    }

    /// Lists all tables ordered by table number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_tables(conn: &Connection) -> Result<Vec<Table>> {
        let sql = format!("SELECT {TABLE_COLUMNS} FROM dining_tables ORDER BY table_number");
        let mut stmt = conn.prepare(&sql)?;
        let tables = stmt
            .query_map([], row_to_table)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tables)
    }

    /// Sets a table's status. Returns `false` if no such table exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn set_table_status(conn: &Connection, id: TableId, status: TableStatus) -> Result<bool> {
        Ok(conn.execute(UPDATE_TABLE_STATUS, params![status.as_str(), id.0])? > 0)
    }

    /// Stores a table's position together with its derived zone in a single
    /// statement. Returns `false` if no such table exists.
    ///
    /// # Errors
    ///
    /// Returns a validation error for off-canvas positions, or any database
    /// error.
    pub fn set_table_position(
        conn: &Connection,
        id: TableId,
        position: Position,
        zone: Zone,
    ) -> Result<bool> {
        let position = position.validate()?;
        let rows = conn.execute(
            UPDATE_TABLE_POSITION,
            params![position.x, position.y, zone.as_str(), id.0],
        )?;
        Ok(rows > 0)
    }

    /// Counts reservations of any status that reference a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_table_reservations(conn: &Connection, id: TableId) -> Result<usize> {
        let count: i64 = conn.query_row(COUNT_TABLE_RESERVATIONS, [id.0], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Deletes a table. Returns `false` if no such table exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails, including a foreign-key
    /// failure when reservations still reference the table.
    pub fn delete_table(conn: &Connection, id: TableId) -> Result<bool> {
        Ok(conn.execute(DELETE_TABLE, [id.0])? > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, test_now};

    #[test]
    fn test_insert_and_get_table() {
        let db = create_test_database();
        let conn = db.connection();
        let new = NewTable::builder(5, 4).zone(Zone::Window).build().unwrap();

        let table = Database::insert_table(conn, &new, test_now()).unwrap();
        assert_eq!(table.number, 5);
        assert_eq!(table.capacity, 4);
        assert_eq!(table.zone, Zone::Window);
        assert_eq!(table.status, TableStatus::Available);
        assert_eq!(table.position, None);
        assert_eq!(table.created_at, test_now());

        let by_number = Database::get_table_by_number(conn, 5).unwrap().unwrap();
        assert_eq!(by_number, table);
    }

    #[test]
    fn test_duplicate_table_number() {
        let db = create_test_database();
        let conn = db.connection();
        let new = NewTable::builder(5, 4).build().unwrap();
        Database::insert_table(conn, &new, test_now()).unwrap();

        let err = Database::insert_table(conn, &new, test_now()).unwrap_err();
        assert!(matches!(err, Error::DuplicateTableNumber { number: 5 }));
    }

    #[test]
    fn test_list_tables_sorted_by_number() {
        let db = create_test_database();
        let conn = db.connection();
        for number in [7, 2, 5] {
            let new = NewTable::builder(number, 2).build().unwrap();
            Database::insert_table(conn, &new, test_now()).unwrap();
        }

        let numbers: Vec<u32> = Database::list_tables(conn)
            .unwrap()
            .iter()
            .map(|t| t.number)
            .collect();
        assert_eq!(numbers, vec![2, 5, 7]);
    }

    #[test]
    fn test_set_status_and_position() {
        let db = create_test_database();
        let conn = db.connection();
        let new = NewTable::builder(3, 2).build().unwrap();
        let table = Database::insert_table(conn, &new, test_now()).unwrap();

        assert!(Database::set_table_status(conn, table.id, TableStatus::Maintenance).unwrap());
        assert!(Database::set_table_position(
            conn,
            table.id,
            Position::new(100.0, 350.0),
            Zone::Patio
        )
        .unwrap());

        let stored = Database::get_table(conn, table.id).unwrap().unwrap();
        assert_eq!(stored.status, TableStatus::Maintenance);
        assert_eq!(stored.position, Some(Position::new(100.0, 350.0)));
        assert_eq!(stored.zone, Zone::Patio);

        assert!(!Database::set_table_status(conn, TableId(999), TableStatus::Available).unwrap());
    }

    #[test]
    fn test_off_canvas_position_rejected() {
        let db = create_test_database();
        let conn = db.connection();
        let new = NewTable::builder(3, 2).build().unwrap();
        let table = Database::insert_table(conn, &new, test_now()).unwrap();

        let result =
            Database::set_table_position(conn, table.id, Position::new(900.0, 10.0), Zone::Center);
        assert!(result.is_err());
        let stored = Database::get_table(conn, table.id).unwrap().unwrap();
        assert_eq!(stored.position, None);
    }

    #[test]
    fn test_delete_table() {
        let db = create_test_database();
        let conn = db.connection();
        let new = NewTable::builder(3, 2).build().unwrap();
        let table = Database::insert_table(conn, &new, test_now()).unwrap();

        assert_eq!(Database::count_table_reservations(conn, table.id).unwrap(), 0);
        assert!(Database::delete_table(conn, table.id).unwrap());
        assert!(!Database::delete_table(conn, table.id).unwrap());
        assert!(Database::get_table(conn, table.id).unwrap().is_none());
    }
}

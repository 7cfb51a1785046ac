//! Reservation storage operations.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use crate::error::{Error, Result};
use crate::reservation::{NewReservation, Reservation, ReservationId, ReservationStatus};
use crate::schedule::SlotTime;
use crate::table::TableId;

use super::connection::{is_unique_violation, Database};
use super::rows::{format_date, format_timestamp, row_to_reservation};
use super::schema::RESERVATION_COLUMNS;

const INSERT_RESERVATION: &str = r"
    INSERT INTO reservations
    (customer_name, customer_email, customer_phone, reservation_date, reservation_time,
     guests, table_id, status, special_requests, dietary_notes, pre_order,
     created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const ASSIGN_CODE: &str = "UPDATE reservations SET code = ? WHERE id = ?";

const UPDATE_SCHEDULE: &str = r"
    UPDATE reservations
    SET reservation_date = ?, reservation_time = ?, table_id = ?, guests = ?,
        special_requests = ?, dietary_notes = ?, updated_at = ?
    WHERE id = ? AND status = 'CONFIRMED'
";

const UPDATE_STATUS: &str = r"
    UPDATE reservations
    SET status = ?, loyalty_points = COALESCE(?, loyalty_points),
        cancellation_reason = COALESCE(?, cancellation_reason),
        cancelled_at = COALESCE(?, cancelled_at), updated_at = ?
    WHERE id = ? AND status = ?
";

/// Filter for listing reservations. Unset fields match everything.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tablebook::database::ReservationQuery;
/// use tablebook::ReservationStatus;
///
/// let day = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
/// let query = ReservationQuery::on(day).with_status(Some(ReservationStatus::Confirmed));
/// assert_eq!(query.from, Some(day));
/// assert_eq!(query.to, Some(day));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationQuery {
    /// First date, inclusive.
    pub from: Option<NaiveDate>,
    /// Last date, inclusive.
    pub to: Option<NaiveDate>,
    /// Only this status.
    pub status: Option<ReservationStatus>,
    /// Only this table.
    pub table_id: Option<TableId>,
}

impl ReservationQuery {
    /// Matches every reservation.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches a single date.
    #[must_use]
    pub fn on(date: NaiveDate) -> Self {
        Self::between(date, date)
    }

    /// Matches an inclusive date range.
    #[must_use]
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Self::default()
        }
    }

    /// Restricts to one status.
    #[must_use]
    pub const fn with_status(mut self, status: Option<ReservationStatus>) -> Self {
        self.status = status;
        self
    }

    /// Restricts to one table.
    #[must_use]
    pub const fn with_table(mut self, table_id: Option<TableId>) -> Self {
        self.table_id = table_id;
        self
    }

    fn to_sql(&self) -> (String, Vec<Value>) {
        let mut clauses = Vec::new();
        let mut values = Vec::new();
        if let Some(from) = self.from {
            clauses.push("reservation_date >= ?");
            values.push(Value::Text(format_date(from)));
        }
        if let Some(to) = self.to {
            clauses.push("reservation_date <= ?");
            values.push(Value::Text(format_date(to)));
        }
        if let Some(status) = self.status {
            clauses.push("status = ?");
            values.push(Value::Text(status.as_str().to_string()));
        }
        if let Some(table_id) = self.table_id {
            clauses.push("table_id = ?");
            values.push(Value::Integer(table_id.0));
        }

        let mut sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY reservation_date, reservation_time, id");
        (sql, values)
    }
}

/// New schedule and notes for a confirmed reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleUpdate {
    /// New date.
    pub date: NaiveDate,
    /// New time.
    pub time: SlotTime,
    /// New table.
    pub table_id: TableId,
    /// New party size.
    pub guests: u32,
    /// New special requests.
    pub special_requests: Option<String>,
    /// New dietary notes.
    pub dietary_notes: Option<String>,
}

/// A guarded status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    /// Status the reservation must currently have.
    pub from: ReservationStatus,
    /// Status to set.
    pub to: ReservationStatus,
    /// Loyalty points to record.
    pub loyalty_points: Option<u32>,
    /// Cancellation reason to record.
    pub cancellation_reason: Option<String>,
    /// Cancellation time to record.
    pub cancelled_at: Option<NaiveDateTime>,
}

fn slot_taken(conn: &Connection, table_id: TableId, date: NaiveDate, time: SlotTime) -> Error {
    let table_number = Database::get_table(conn, table_id)
        .ok()
        .flatten()
        .map_or(0, |t| t.number);
    Error::SlotTaken {
        table_number,
        date,
        time,
    }
}

impl Database {
    /// Inserts a reservation, assigns its code, and returns the stored row.
    ///
    /// Run this inside a transaction so the code assignment is atomic with
    /// the insert.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SlotTaken`] if another live reservation already
    /// holds the table at that date and time, or any database error.
    pub fn insert_reservation(
        conn: &Connection,
        request: &NewReservation,
        status: ReservationStatus,
        now: NaiveDateTime,
    ) -> Result<Reservation> {
        let pre_order = serde_json::to_string(&request.pre_order)?;
        let stamp = format_timestamp(now);
        let result = conn.execute(
            INSERT_RESERVATION,
            params![
                request.customer.name,
                request.customer.email,
                request.customer.phone,
                format_date(request.date),
                request.time.to_string(),
                request.guests,
                request.table_id.0,
                status.as_str(),
                request.special_requests,
                request.dietary_notes,
                pre_order,
                stamp,
                stamp,
            ],
        );
        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(slot_taken(conn, request.table_id, request.date, request.time));
            }
            Err(e) => return Err(e.into()),
        }

        let id = ReservationId(conn.last_insert_rowid());
        conn.execute(ASSIGN_CODE, params![id.code(), id.0])?;

        Self::get_reservation(conn, id)?.ok_or_else(|| Error::NotFound {
            resource: format!("reservation {}", id.code()),
        })
    }

    /// Looks up a reservation by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_reservation(conn: &Connection, id: ReservationId) -> Result<Option<Reservation>> {
        let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = ?");
        Ok(conn.query_row(&sql, [id.0], row_to_reservation).optional()?)
    }

    /// Looks up a reservation by its code (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_reservation_by_code(conn: &Connection, code: &str) -> Result<Option<Reservation>> {
        let sql =
            format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE code = ? COLLATE NOCASE");
        Ok(conn
            .query_row(&sql, [code.trim()], row_to_reservation)
            .optional()?)
    }

    /// Lists reservations matching `query`, ordered by date, time, and id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_reservations(
        conn: &Connection,
        query: &ReservationQuery,
    ) -> Result<Vec<Reservation>> {
        let (sql, values) = query.to_sql();
        let mut stmt = conn.prepare(&sql)?;
        let reservations = stmt
            .query_map(params_from_iter(values), row_to_reservation)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reservations)
    }

    /// Rewrites the schedule of a CONFIRMED reservation. Returns `false` if
    /// the reservation does not exist or is no longer CONFIRMED.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SlotTaken`] if the new slot is held by another live
    /// reservation, or any database error.
    pub fn update_reservation_schedule(
        conn: &Connection,
        id: ReservationId,
        update: &ScheduleUpdate,
        now: NaiveDateTime,
    ) -> Result<bool> {
        let result = conn.execute(
            UPDATE_SCHEDULE,
            params![
                format_date(update.date),
                update.time.to_string(),
                update.table_id.0,
                update.guests,
                update.special_requests,
                update.dietary_notes,
                format_timestamp(now),
                id.0,
            ],
        );
        match result {
            Ok(rows) => Ok(rows > 0),
            Err(e) if is_unique_violation(&e) => {
                Err(slot_taken(conn, update.table_id, update.date, update.time))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Applies a status change if the reservation still has the expected
    /// status. Returns `false` if it does not, so a change is never applied
    /// twice.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_reservation_status(
        conn: &Connection,
        id: ReservationId,
        update: &StatusUpdate,
        now: NaiveDateTime,
    ) -> Result<bool> {
        let rows = conn.execute(
            UPDATE_STATUS,
            params![
                update.to.as_str(),
                update.loyalty_points,
                update.cancellation_reason,
                update.cancelled_at.map(format_timestamp),
                format_timestamp(now),
                id.0,
                update.from.as_str(),
            ],
        )?;
        Ok(rows > 0)
    }
}

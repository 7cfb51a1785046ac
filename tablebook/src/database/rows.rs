//! Conversions between stored rows and domain types.
//!
//! Dates are stored as `YYYY-MM-DD`, times of day as `HH:MM`, and
//! timestamps as `YYYY-MM-DD HH:MM:SS`, so lexical order matches
//! chronological order.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Row;

use crate::floorplan::Position;
use crate::reservation::{Customer, PreOrderItem, Reservation, ReservationId};
use crate::schedule::SlotTime;
use crate::table::{Table, TableId};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn conversion_error<E>(err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::ToSqlConversionFailure(Box::new(err))
}

/// Formats a timestamp for storage.
pub(super) fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(value: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(conversion_error)
}

/// Formats a date for storage.
pub(super) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date(value: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(conversion_error)
}

fn parse_enum<T>(value: &str) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = crate::Error>,
{
    value.parse().map_err(conversion_error)
}

/// Maps a row selected with [`super::schema::TABLE_COLUMNS`].
pub(super) fn row_to_table(row: &Row<'_>) -> rusqlite::Result<Table> {
    let zone: String = row.get(3)?;
    let shape: String = row.get(4)?;
    let status: String = row.get(5)?;
    let x: Option<f64> = row.get(6)?;
    let y: Option<f64> = row.get(7)?;
    let created_at: String = row.get(9)?;

    Ok(Table {
        id: TableId(row.get(0)?),
        number: row.get(1)?,
        capacity: row.get(2)?,
        zone: parse_enum(&zone)?,
        shape: parse_enum(&shape)?,
        status: parse_enum(&status)?,
        position: x.zip(y).map(|(x, y)| Position::new(x, y)),
        description: row.get(8)?,
        created_at: parse_timestamp(&created_at)?,
    })
}

/// Maps a row selected with [`super::schema::RESERVATION_COLUMNS`].
pub(super) fn row_to_reservation(row: &Row<'_>) -> rusqlite::Result<Reservation> {
    let id = ReservationId(row.get(0)?);
    let code: Option<String> = row.get(1)?;
    let date: String = row.get(5)?;
    let time: String = row.get(6)?;
    let status: String = row.get(9)?;
    let pre_order: String = row.get(12)?;
    let cancelled_at: Option<String> = row.get(15)?;
    let created_at: String = row.get(16)?;
    let updated_at: String = row.get(17)?;

    let pre_order: Vec<PreOrderItem> = serde_json::from_str(&pre_order).map_err(conversion_error)?;

    Ok(Reservation {
        id,
        code: code.unwrap_or_else(|| id.code()),
        customer: Customer {
            name: row.get(2)?,
            email: row.get(3)?,
            phone: row.get(4)?,
        },
        date: parse_date(&date)?,
        time: time.parse::<SlotTime>().map_err(conversion_error)?,
        guests: row.get(7)?,
        table_id: TableId(row.get(8)?),
        status: parse_enum(&status)?,
        special_requests: row.get(10)?,
        dietary_notes: row.get(11)?,
        pre_order,
        loyalty_points: row.get(13)?,
        cancellation_reason: row.get(14)?,
        cancelled_at: cancelled_at.as_deref().map(parse_timestamp).transpose()?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_format_sorts_chronologically() {
        let early = NaiveDate::from_ymd_opt(2025, 6, 9)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let late = NaiveDate::from_ymd_opt(2025, 6, 10)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(format_timestamp(early) < format_timestamp(late));
        assert_eq!(parse_timestamp(&format_timestamp(late)).unwrap(), late);
    }

    #[test]
    fn test_date_format() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(format_date(date), "2025-06-01");
        assert_eq!(parse_date("2025-06-01").unwrap(), date);
        assert!(parse_date("06/01/2025").is_err());
    }
}

//! Daily reservation statistics.
//!
//! A report covers one calendar date and compares it with the day before.
//! Table counts reflect the current floor, not the reported date.

use chrono::{Days, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;

use crate::database::{Database, ReservationQuery};
use crate::error::Result;
use crate::reservation::{Reservation, ReservationStatus};
use crate::table::{Table, TableStatus};

/// Reservations of one day, by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// PENDING reservations.
    pub pending: u32,
    /// CONFIRMED reservations.
    pub confirmed: u32,
    /// COMPLETED reservations.
    pub completed: u32,
    /// CANCELLED reservations.
    pub cancelled: u32,
    /// `NO_SHOW` reservations.
    pub no_show: u32,
}

impl StatusCounts {
    fn record(&mut self, status: ReservationStatus) {
        let slot = match status {
            ReservationStatus::Pending => &mut self.pending,
            ReservationStatus::Confirmed => &mut self.confirmed,
            ReservationStatus::Completed => &mut self.completed,
            ReservationStatus::Cancelled => &mut self.cancelled,
            ReservationStatus::NoShow => &mut self.no_show,
        };
        *slot += 1;
    }

    /// Sum over all statuses.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.pending + self.confirmed + self.completed + self.cancelled + self.no_show
    }
}

/// Tables by current status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    /// AVAILABLE tables.
    pub available: u32,
    /// RESERVED tables.
    pub reserved: u32,
    /// OCCUPIED tables.
    pub occupied: u32,
    /// MAINTENANCE tables.
    pub maintenance: u32,
}

impl TableCounts {
    fn record(&mut self, status: TableStatus) {
        let slot = match status {
            TableStatus::Available => &mut self.available,
            TableStatus::Reserved => &mut self.reserved,
            TableStatus::Occupied => &mut self.occupied,
            TableStatus::Maintenance => &mut self.maintenance,
        };
        *slot += 1;
    }

    /// Number of tables.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.available + self.reserved + self.occupied + self.maintenance
    }

    /// Tables currently RESERVED or OCCUPIED.
    #[must_use]
    pub const fn occupying(&self) -> u32 {
        self.reserved + self.occupied
    }
}

/// Statistics for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStats {
    /// The reported date.
    pub date: NaiveDate,
    /// Reservations on `date`, by status.
    pub reservations: StatusCounts,
    /// Guests of reservations that still hold their slot.
    pub guests_expected: u32,
    /// Guests of completed reservations.
    pub guests_served: u32,
    /// Current tables, by status.
    pub tables: TableCounts,
    /// Share of tables reserved or occupied, in percent.
    pub occupancy_rate: f64,
    /// Change in reservation count against the previous day, in percent.
    pub reservation_trend: f64,
    /// Change in expected guests against the previous day, in percent.
    pub guest_trend: f64,
}

impl DailyStats {
    /// Loads the statistics for `date` from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn load(conn: &Connection, date: NaiveDate) -> Result<Self> {
        let previous_day = date.checked_sub_days(Days::new(1)).unwrap_or(date);
        let reservations = Database::list_reservations(conn, &ReservationQuery::on(date))?;
        let previous = if previous_day == date {
            Vec::new()
        } else {
            Database::list_reservations(conn, &ReservationQuery::on(previous_day))?
        };
        let tables = Database::list_tables(conn)?;
        log::debug!(
            "Daily stats for {date}: {} reservation(s), {} the day before",
            reservations.len(),
            previous.len()
        );
        Ok(Self::compute(date, &reservations, &previous, &tables))
    }

    /// Computes the statistics from already loaded records.
    ///
    /// `reservations` are the day's reservations, `previous` those of the
    /// day before.
    #[must_use]
    pub fn compute(
        date: NaiveDate,
        reservations: &[Reservation],
        previous: &[Reservation],
        tables: &[Table],
    ) -> Self {
        let mut counts = StatusCounts::default();
        for reservation in reservations {
            counts.record(reservation.status);
        }
        let mut table_counts = TableCounts::default();
        for table in tables {
            table_counts.record(table.status);
        }

        let guests_expected = expected_guests(reservations);
        let guests_served = reservations
            .iter()
            .filter(|r| r.status == ReservationStatus::Completed)
            .map(|r| r.guests)
            .sum();

        Self {
            date,
            reservations: counts,
            guests_expected,
            guests_served,
            tables: table_counts,
            occupancy_rate: occupancy_rate(table_counts.occupying(), table_counts.total()),
            reservation_trend: trend(count(reservations), count(previous)),
            guest_trend: trend(guests_expected, expected_guests(previous)),
        }
    }
}

fn count(reservations: &[Reservation]) -> u32 {
    u32::try_from(reservations.len()).unwrap_or(u32::MAX)
}

fn expected_guests(reservations: &[Reservation]) -> u32 {
    reservations
        .iter()
        .filter(|r| r.status.holds_slot())
        .map(|r| r.guests)
        .sum()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Percentage of `occupying` tables among `total`, rounded to one decimal.
/// An empty floor has a rate of zero.
///
/// # Examples
///
/// ```
/// use tablebook::operations::reports::occupancy_rate;
///
/// assert_eq!(occupancy_rate(1, 3), 33.3);
/// assert_eq!(occupancy_rate(0, 0), 0.0);
/// ```
#[must_use]
pub fn occupancy_rate(occupying: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(f64::from(occupying) / f64::from(total) * 100.0)
}

/// Day-over-day change in percent, rounded to one decimal.
///
/// Growth from zero counts as 100%; zero against zero is 0%.
///
/// # Examples
///
/// ```
/// use tablebook::operations::reports::trend;
///
/// assert_eq!(trend(15, 10), 50.0);
/// assert_eq!(trend(5, 0), 100.0);
/// assert_eq!(trend(0, 4), -100.0);
/// ```
#[must_use]
pub fn trend(current: u32, previous: u32) -> f64 {
    if previous == 0 {
        return if current > 0 { 100.0 } else { 0.0 };
    }
    round1((f64::from(current) - f64::from(previous)) / f64::from(previous) * 100.0)
}

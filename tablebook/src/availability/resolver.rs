//! Eligible-table resolution.

use chrono::{Duration, NaiveDate};
use rusqlite::Connection;

use crate::database::{Database, ReservationQuery};
use crate::error::Result;
use crate::reservation::{Reservation, ReservationId};
use crate::schedule::{Clock, SlotGenerator, SlotTime, SystemClock};
use crate::table::{Table, TableStatus};

use super::ConflictChecker;

/// An availability question: which tables can seat `party_size` guests at
/// `(date, time)`?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityQuery {
    /// Requested date.
    pub date: NaiveDate,
    /// Requested time.
    pub time: SlotTime,
    /// Party size.
    pub party_size: u32,
    /// A reservation whose own booking should not count as a conflict.
    pub exclude: Option<ReservationId>,
}

impl AvailabilityQuery {
    /// Creates a query.
    #[must_use]
    pub const fn new(date: NaiveDate, time: SlotTime, party_size: u32) -> Self {
        Self {
            date,
            time,
            party_size,
            exclude: None,
        }
    }

    /// Ignores the given reservation's booking when checking conflicts.
    #[must_use]
    pub const fn excluding(mut self, id: ReservationId) -> Self {
        self.exclude = Some(id);
        self
    }
}

/// Resolves which tables are free for a slot.
///
/// A table is eligible when the slot is bookable for the date, the table
/// seats the party, it is not under maintenance, and no live reservation
/// conflicts. Results are ordered by table number; an empty list is a
/// normal answer.
///
/// # Examples
///
/// ```no_run
/// use chrono::NaiveDate;
/// use tablebook::availability::{AvailabilityQuery, AvailabilityResolver, ConflictChecker};
/// use tablebook::{Database, DatabaseConfig, SlotGenerator};
///
/// let db = Database::open(DatabaseConfig::new("/tmp/tablebook.db")).unwrap();
/// let resolver = AvailabilityResolver::new(SlotGenerator::default(), ConflictChecker::default());
/// let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
/// let query = AvailabilityQuery::new(date, "18:00".parse().unwrap(), 4);
/// for table in resolver.available_tables(db.connection(), &query).unwrap() {
///     println!("table {}", table.number);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AvailabilityResolver<C = SystemClock> {
    slots: SlotGenerator<C>,
    checker: ConflictChecker,
}

impl<C: Clock> AvailabilityResolver<C> {
    /// Creates a resolver.
    #[must_use]
    pub const fn new(slots: SlotGenerator<C>, checker: ConflictChecker) -> Self {
        Self { slots, checker }
    }

    /// The slot generator used for bookability checks.
    pub const fn slots(&self) -> &SlotGenerator<C> {
        &self.slots
    }

    /// The conflict checker in use.
    pub const fn checker(&self) -> &ConflictChecker {
        &self.checker
    }

    /// Filters `tables` against a snapshot of `reservations`, without
    /// checking whether the slot itself is bookable.
    #[must_use]
    pub fn filter_tables(
        &self,
        tables: &[Table],
        reservations: &[Reservation],
        query: &AvailabilityQuery,
    ) -> Vec<Table> {
        let blocked =
            self.checker
                .blocked_tables(reservations, query.date, query.time, query.exclude);
        let mut eligible: Vec<Table> = tables
            .iter()
            .filter(|t| t.seats(query.party_size))
            .filter(|t| t.status != TableStatus::Maintenance)
            .filter(|t| !blocked.contains(&t.id))
            .cloned()
            .collect();
        eligible.sort_by_key(|t| t.number);
        eligible
    }

    /// Loads tables and nearby reservations and filters them, without
    /// checking whether the slot itself is bookable.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn eligible_tables(
        &self,
        conn: &Connection,
        query: &AvailabilityQuery,
    ) -> Result<Vec<Table>> {
        let tables = Database::list_tables(conn)?;
        let margin = Duration::days(self.checker.policy().day_margin());
        let nearby = ReservationQuery::between(query.date - margin, query.date + margin);
        let reservations = Database::list_reservations(conn, &nearby)?;

        let eligible = self.filter_tables(&tables, &reservations, query);
        log::debug!(
            "{} of {} table(s) free for {} on {} at {}",
            eligible.len(),
            tables.len(),
            query.party_size,
            query.date,
            query.time
        );
        Ok(eligible)
    }

    /// Lists the tables that can take the booking. Returns an empty list if
    /// the slot is not bookable for the date.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn available_tables(
        &self,
        conn: &Connection,
        query: &AvailabilityQuery,
    ) -> Result<Vec<Table>> {
        if !self.slots.is_bookable(query.date, query.time) {
            log::debug!("{} at {} is not a bookable slot", query.date, query.time);
            return Ok(Vec::new());
        }
        self.eligible_tables(conn, query)
    }
}

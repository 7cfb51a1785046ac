//! Search over reservations and tables.
//!
//! [`SearchCache`] keeps one snapshot per entity kind. A snapshot is loaded
//! from the store on first use and reused until it is invalidated; matching
//! is a pure, case-insensitive substring filter over the snapshot.

use rusqlite::Connection;
use serde::Serialize;

use crate::database::{Database, ReservationQuery};
use crate::error::Result;
use crate::reservation::Reservation;
use crate::table::Table;

/// Kinds of cached entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// All reservations.
    Reservations,
    /// All tables.
    Tables,
}

/// Matches of one search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResults {
    /// Reservations whose customer name, email or code matches.
    pub reservations: Vec<Reservation>,
    /// Tables whose number, zone or description matches.
    pub tables: Vec<Table>,
}

impl SearchResults {
    /// Returns `true` if nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty() && self.tables.is_empty()
    }
}

/// Read-through snapshot cache.
///
/// Writers must call [`SearchCache::invalidate`] for every kind they
/// change; the cache never checks the store for freshness on its own.
///
/// # Examples
///
/// ```no_run
/// use tablebook::database::{Database, DatabaseConfig};
/// use tablebook::operations::search::{EntityKind, SearchCache};
///
/// let db = Database::open(DatabaseConfig::new("/tmp/tablebook.db")).unwrap();
/// let mut cache = SearchCache::new();
///
/// let hits = cache.search(db.connection(), "lovelace").unwrap();
/// println!("{} reservation(s)", hits.reservations.len());
///
/// // After booking, drop the stale snapshot.
/// cache.invalidate(EntityKind::Reservations);
/// ```
#[derive(Debug, Default)]
pub struct SearchCache {
    reservations: Option<Vec<Reservation>>,
    tables: Option<Vec<Table>>,
}

impl SearchCache {
    /// Creates an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reservations: None,
            tables: None,
        }
    }

    /// Drops the snapshot of `kind`.
    pub fn invalidate(&mut self, kind: EntityKind) {
        match kind {
            EntityKind::Reservations => self.reservations = None,
            EntityKind::Tables => self.tables = None,
        }
    }

    /// Drops every snapshot.
    pub fn invalidate_all(&mut self) {
        self.reservations = None;
        self.tables = None;
    }

    /// Returns `true` if a snapshot of `kind` is held.
    #[must_use]
    pub const fn is_cached(&self, kind: EntityKind) -> bool {
        match kind {
            EntityKind::Reservations => self.reservations.is_some(),
            EntityKind::Tables => self.tables.is_some(),
        }
    }

    /// The reservation snapshot, loading it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn reservations(&mut self, conn: &Connection) -> Result<&[Reservation]> {
        if self.reservations.is_none() {
            log::debug!("Loading reservation snapshot");
            self.reservations = Some(Database::list_reservations(conn, &ReservationQuery::all())?);
        }
        Ok(self.reservations.as_deref().unwrap_or_default())
    }

    /// The table snapshot, loading it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn tables(&mut self, conn: &Connection) -> Result<&[Table]> {
        if self.tables.is_none() {
            log::debug!("Loading table snapshot");
            self.tables = Some(Database::list_tables(conn)?);
        }
        Ok(self.tables.as_deref().unwrap_or_default())
    }

    /// Searches both snapshots for `term`. A blank term matches everything.
    ///
    /// # Errors
    ///
    /// Returns an error if a snapshot has to be loaded and the store cannot
    /// be read.
    pub fn search(&mut self, conn: &Connection, term: &str) -> Result<SearchResults> {
        let needle = term.trim().to_lowercase();
        let reservations = self
            .reservations(conn)?
            .iter()
            .filter(|r| matches_reservation(r, &needle))
            .cloned()
            .collect();
        let tables = self
            .tables(conn)?
            .iter()
            .filter(|t| matches_table(t, &needle))
            .cloned()
            .collect();
        Ok(SearchResults {
            reservations,
            tables,
        })
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Returns `true` if the customer name, email or reservation code contains
/// `needle`, which must already be lowercase.
#[must_use]
pub fn matches_reservation(reservation: &Reservation, needle: &str) -> bool {
    contains(&reservation.customer.name, needle)
        || contains(&reservation.customer.email, needle)
        || contains(&reservation.code, needle)
}

/// Returns `true` if the table number, zone or description contains
/// `needle`, which must already be lowercase.
#[must_use]
pub fn matches_table(table: &Table, needle: &str) -> bool {
    table.number.to_string().contains(needle)
        || contains(table.zone.as_str(), needle)
        || table
            .description
            .as_deref()
            .is_some_and(|d| contains(d, needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{
        create_test_database, insert_test_table, test_now, test_request,
    };
    use crate::reservation::ReservationStatus;
    use chrono::NaiveDate;

    fn seeded() -> Database {
        let db = create_test_database();
        let conn = db.connection();
        let table = insert_test_table(conn, 12, 4);
        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let request = test_request(table.id, date, "18:00", 2);
        Database::insert_reservation(conn, &request, ReservationStatus::Confirmed, test_now())
            .unwrap();
        db
    }

    #[test]
    fn test_matches_name_email_and_code() {
        let db = seeded();
        let mut cache = SearchCache::new();
        for term in ["LOVELACE", "example.com", "res-0001"] {
            let hits = cache.search(db.connection(), term).unwrap();
            assert_eq!(hits.reservations.len(), 1, "{term}");
        }
        assert!(cache.search(db.connection(), "babbage").unwrap().reservations.is_empty());
    }

    #[test]
    fn test_matches_tables_by_number_and_zone() {
        let db = seeded();
        let mut cache = SearchCache::new();
        assert_eq!(cache.search(db.connection(), "12").unwrap().tables.len(), 1);
        assert_eq!(cache.search(db.connection(), "center").unwrap().tables.len(), 1);
        assert!(cache.search(db.connection(), "patio").unwrap().tables.is_empty());
    }

    #[test]
    fn test_snapshot_is_reused_until_invalidated() {
        let db = seeded();
        let conn = db.connection();
        let mut cache = SearchCache::new();
        assert!(!cache.is_cached(EntityKind::Tables));
        assert_eq!(cache.search(conn, "").unwrap().tables.len(), 1);
        assert!(cache.is_cached(EntityKind::Tables));

        insert_test_table(conn, 13, 2);
        assert_eq!(cache.search(conn, "").unwrap().tables.len(), 1);

        cache.invalidate(EntityKind::Tables);
        assert!(cache.is_cached(EntityKind::Reservations));
        assert_eq!(cache.search(conn, "").unwrap().tables.len(), 2);

        cache.invalidate_all();
        assert!(!cache.is_cached(EntityKind::Reservations));
    }
}

//! Idle-table sweep.
//!
//! Tables are marked RESERVED or OCCUPIED by staff and by booking events, but
//! nothing marks them free again when a party leaves or never shows up. The
//! sweep returns such tables to AVAILABLE when no active reservation on them
//! starts within the lead window around now.
//!
//! All releases of one sweep are applied in a single transaction.

use chrono::{Duration, NaiveDateTime};
use rusqlite::Connection;

use crate::database::{Database, ReservationQuery};
use crate::error::Result;
use crate::reservation::Reservation;
use crate::schedule::Clock;
use crate::table::{Table, TableStatus};

use super::executor::PlanExecutor;
use super::plan::{OperationPlan, PlanAction};

/// Result of a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    /// Tables that were (or in dry-run mode would be) released, as they were
    /// before the sweep.
    pub released: Vec<Table>,
    /// Whether the sweep only reported.
    pub dry_run: bool,
}

/// Floor maintenance operations.
pub struct CleanupOperations;

impl CleanupOperations {
    /// Returns RESERVED and OCCUPIED tables with no PENDING or CONFIRMED
    /// reservation starting within `lead` of now to AVAILABLE.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tablebook::database::{Database, DatabaseConfig};
    /// use tablebook::operations::CleanupOperations;
    /// use tablebook::SystemClock;
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/tablebook.db")).unwrap();
    /// let lead = chrono::Duration::minutes(120);
    ///
    /// let preview = CleanupOperations::release_idle_tables(&mut db, &SystemClock, lead, true).unwrap();
    /// println!("Would release {} table(s)", preview.released.len());
    /// ```
    pub fn release_idle_tables<C: Clock>(
        db: &mut Database,
        clock: &C,
        lead: Duration,
        dry_run: bool,
    ) -> Result<SweepResult> {
        let now = clock.now();
        if dry_run {
            let idle = find_idle_tables(db.connection(), now, lead)?;
            log::debug!("Dry run: {} idle table(s)", idle.len());
            return Ok(SweepResult { released: idle, dry_run });
        }

        // Read under the write lock so a booking committed in between cannot
        // have its fresh hold released.
        let tx = db.begin_write()?;
        let idle = find_idle_tables(&tx, now, lead)?;
        let mut plan = OperationPlan::new(format!("Release {} idle table(s)", idle.len()));
        for table in &idle {
            plan = plan.add_action(PlanAction::SetTableStatus {
                id: table.id,
                number: table.number,
                status: TableStatus::Available,
            });
        }

        if !plan.is_empty() {
            PlanExecutor::apply(&tx, &plan)?;
            tx.commit()?;
            log::info!("{}", plan.description);
        }

        Ok(SweepResult {
            released: idle,
            dry_run,
        })
    }
}

fn find_idle_tables(conn: &Connection, now: NaiveDateTime, lead: Duration) -> Result<Vec<Table>> {
    let tables = Database::list_tables(conn)?;
    let upcoming = Database::list_reservations(conn, &ReservationQuery::on(now.date()))?;
    Ok(tables
        .into_iter()
        .filter(|table| table.status.is_occupying())
        .filter(|table| !has_booking_near(table, &upcoming, now, lead))
        .collect())
}

fn has_booking_near(
    table: &Table,
    reservations: &[Reservation],
    now: NaiveDateTime,
    lead: Duration,
) -> bool {
    reservations.iter().any(|r| {
        r.table_id == table.id
            && r.status.is_active()
            && (r.starts_at() - now).abs() <= lead
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, insert_test_table, test_request};
    use crate::database::DatabaseConfig;
    use crate::error::Error;
    use crate::reservation::ReservationStatus;
    use crate::schedule::FixedClock;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 10)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn sweep(db: &mut Database, clock: &FixedClock, dry_run: bool) -> Result<SweepResult> {
        CleanupOperations::release_idle_tables(db, clock, Duration::minutes(120), dry_run)
    }

    fn setup() -> (Database, Table, Table, Table) {
        let db = create_test_database();
        let conn = db.connection();
        let held = insert_test_table(conn, 1, 4);
        let idle = insert_test_table(conn, 2, 4);
        let free = insert_test_table(conn, 3, 4);
        Database::set_table_status(conn, held.id, TableStatus::Reserved).unwrap();
        Database::set_table_status(conn, idle.id, TableStatus::Occupied).unwrap();

        let date = at(0, 0).date();
        let dinner = test_request(held.id, date, "19:00", 2);
        Database::insert_reservation(conn, &dinner, ReservationStatus::Confirmed, at(9, 0))
            .unwrap();
        // Cancelled bookings do not keep a table busy.
        let called_off = test_request(idle.id, date, "18:30", 2);
        Database::insert_reservation(conn, &called_off, ReservationStatus::Cancelled, at(9, 0))
            .unwrap();
        (db, held, idle, free)
    }

    #[test]
    fn test_releases_only_idle_tables() {
        let (mut db, held, idle, free) = setup();
        let clock = FixedClock::new(at(18, 0));

        let result = sweep(&mut db, &clock, false).unwrap();
        assert_eq!(result.released.len(), 1);
        assert_eq!(result.released[0].id, idle.id);

        let conn = db.connection();
        let status = |id| Database::get_table(conn, id).unwrap().unwrap().status;
        assert_eq!(status(held.id), TableStatus::Reserved);
        assert_eq!(status(idle.id), TableStatus::Available);
        assert_eq!(status(free.id), TableStatus::Available);
    }

    #[test]
    fn test_booking_outside_lead_does_not_hold() {
        let (mut db, held, _, _) = setup();
        let clock = FixedClock::new(at(12, 0));

        let result = sweep(&mut db, &clock, false).unwrap();
        assert_eq!(result.released.len(), 2);
        assert!(result.released.iter().any(|t| t.id == held.id));
    }

    #[test]
    fn test_dry_run_changes_nothing() {
        let (mut db, _, idle, _) = setup();
        let clock = FixedClock::new(at(18, 0));

        let result = sweep(&mut db, &clock, true).unwrap();
        assert!(result.dry_run);
        assert_eq!(result.released.len(), 1);
        let table = Database::get_table(db.connection(), idle.id).unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Occupied);
    }

    #[test]
    fn test_sweep_waits_for_pending_booking() {
        let dir = tempdir().unwrap();
        let config = DatabaseConfig::new(dir.path().join("sweep.db"))
            .with_busy_timeout(std::time::Duration::from_millis(50));
        let mut booking = Database::open(config.clone()).unwrap();
        let mut sweeper = Database::open(config).unwrap();

        let table = insert_test_table(booking.connection(), 4, 4);
        Database::set_table_status(booking.connection(), table.id, TableStatus::Occupied).unwrap();
        let clock = FixedClock::new(at(18, 0));

        // While a booking for 18:30 is being written, the sweep cannot read.
        let tx = booking.begin_write().unwrap();
        let request = test_request(table.id, at(0, 0).date(), "18:30", 2);
        Database::insert_reservation(&tx, &request, ReservationStatus::Confirmed, at(17, 55))
            .unwrap();
        let err = sweep(&mut sweeper, &clock, false).unwrap_err();
        assert!(matches!(err, Error::LockTimeout { .. }));
        tx.commit().unwrap();

        let result = sweep(&mut sweeper, &clock, false).unwrap();
        assert!(result.released.is_empty());
        let stored = Database::get_table(sweeper.connection(), table.id).unwrap().unwrap();
        assert_eq!(stored.status, TableStatus::Occupied);
    }
}

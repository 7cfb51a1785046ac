//! Modification of confirmed reservations.

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::availability::{AvailabilityQuery, AvailabilityResolver, ConflictChecker};
use crate::config::Config;
use crate::database::{Database, ScheduleUpdate};
use crate::error::{Error, Result, TableUnavailableReason};
use crate::reservation::lifecycle::check_modifiable;
use crate::reservation::{normalize_note, Reservation, ReservationId};
use crate::schedule::{Clock, SlotGenerator, SlotTime, SystemClock};
use crate::table::{Table, TableId, TableStatus};

use super::book::{check_bookable, check_party_fits};
use super::plan::{OperationPlan, PlanAction};

/// Requested changes to a reservation. Unset fields keep their current
/// value; a note set to blank text clears it.
#[derive(Debug, Clone)]
pub struct ModifyOptions {
    /// Reservation to modify.
    pub id: ReservationId,
    /// New date.
    pub date: Option<NaiveDate>,
    /// New time.
    pub time: Option<SlotTime>,
    /// Explicit table choice.
    pub table_id: Option<TableId>,
    /// New party size.
    pub guests: Option<u32>,
    /// New special requests.
    pub special_requests: Option<String>,
    /// New dietary notes.
    pub dietary_notes: Option<String>,
}

impl ModifyOptions {
    /// Creates options that change nothing yet.
    #[must_use]
    pub const fn new(id: ReservationId) -> Self {
        Self {
            id,
            date: None,
            time: None,
            table_id: None,
            guests: None,
            special_requests: None,
            dietary_notes: None,
        }
    }

    /// Sets the new date.
    #[must_use]
    pub const fn with_date(mut self, date: Option<NaiveDate>) -> Self {
        self.date = date;
        self
    }

    /// Sets the new time.
    #[must_use]
    pub const fn with_time(mut self, time: Option<SlotTime>) -> Self {
        self.time = time;
        self
    }

    /// Requests a specific table.
    #[must_use]
    pub const fn with_table(mut self, table_id: Option<TableId>) -> Self {
        self.table_id = table_id;
        self
    }

    /// Sets the new party size.
    #[must_use]
    pub const fn with_guests(mut self, guests: Option<u32>) -> Self {
        self.guests = guests;
        self
    }

    /// Replaces the special requests.
    #[must_use]
    pub fn with_special_requests(mut self, text: Option<String>) -> Self {
        self.special_requests = text;
        self
    }

    /// Replaces the dietary notes.
    #[must_use]
    pub fn with_dietary_notes(mut self, text: Option<String>) -> Self {
        self.dietary_notes = text;
        self
    }
}

/// Plans an in-place change to a CONFIRMED reservation.
///
/// Availability is re-resolved with the reservation's own booking excluded.
/// The table is chosen in this order: the explicitly requested table (the
/// change fails if it is not eligible), the current table if still
/// eligible, then the lowest-numbered eligible table.
pub struct ModifyPlan<'a, C = SystemClock> {
    options: ModifyOptions,
    config: &'a Config,
    clock: C,
}

impl<'a> ModifyPlan<'a> {
    /// Creates a modification planner using the system clock.
    #[must_use]
    pub const fn new(options: ModifyOptions, config: &'a Config) -> Self {
        Self {
            options,
            config,
            clock: SystemClock,
        }
    }
}

impl<'a, C: Clock> ModifyPlan<'a, C> {
    /// Replaces the clock used for "today" and "now".
    #[must_use]
    pub fn with_clock<D: Clock>(self, clock: D) -> ModifyPlan<'a, D> {
        ModifyPlan {
            options: self.options,
            config: self.config,
            clock,
        }
    }

    /// Builds the plan for this modification.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the reservation or requested table does not
    ///   exist
    /// - a validation error if the reservation is not CONFIRMED, the party
    ///   is empty or exceeds every table, or a changed date and time is not
    ///   bookable
    /// - [`Error::TableUnavailable`] if the requested table is not eligible
    /// - [`Error::NoTablesAvailable`] if no table is eligible
    pub fn build_plan(&self, conn: &Connection) -> Result<OperationPlan> {
        let current =
            Database::get_reservation(conn, self.options.id)?.ok_or_else(|| Error::NotFound {
                resource: format!("reservation {}", self.options.id.code()),
            })?;
        check_modifiable(&current)?;

        let date = self.options.date.unwrap_or(current.date);
        let time = self.options.time.unwrap_or(current.time);
        let guests = self.options.guests.unwrap_or(current.guests);
        if guests == 0 {
            return Err(Error::validation("guests", "party size must be at least 1"));
        }
        if current.pre_order.len() > guests as usize {
            return Err(Error::validation(
                "guests",
                format!(
                    "the reservation has {} pre-order selections; \
                     the party cannot shrink below that",
                    current.pre_order.len()
                ),
            ));
        }

        let tables = Database::list_tables(conn)?;
        check_party_fits(&tables, guests)?;

        let slots = SlotGenerator::new(&self.clock);
        if (date, time) != (current.date, current.time) {
            check_bookable(&slots, date, time)?;
        }

        let resolver = AvailabilityResolver::new(
            slots,
            ConflictChecker::new(self.config.conflict_policy()),
        );
        let query = AvailabilityQuery::new(date, time, guests).excluding(current.id);
        let eligible = resolver.eligible_tables(conn, &query)?;
        let table = self.choose_table(&current, &tables, &eligible, &query)?;

        let update = ScheduleUpdate {
            date,
            time,
            table_id: table.id,
            guests,
            special_requests: replace_note(
                self.options.special_requests.as_deref(),
                current.special_requests.as_deref(),
            ),
            dietary_notes: replace_note(
                self.options.dietary_notes.as_deref(),
                current.dietary_notes.as_deref(),
            ),
        };

        let mut plan = OperationPlan::new(format!("Modify reservation {}", current.code))
            .with_conflict_policy(self.config.conflict_policy());
        if table.id != current.table_id {
            plan = plan.add_warning(format!(
                "reservation {} moves to table {}",
                current.code, table.number
            ));
        }
        log::debug!(
            "Planned modification of {} to table {} on {date} at {time}",
            current.code,
            table.number
        );
        Ok(plan.add_action(PlanAction::UpdateSchedule {
            id: current.id,
            code: current.code.clone(),
            update,
            at: self.clock.now(),
        }))
    }

    fn choose_table<'t>(
        &self,
        current: &Reservation,
        tables: &'t [Table],
        eligible: &[Table],
        query: &AvailabilityQuery,
    ) -> Result<&'t Table> {
        let find = |id: TableId| tables.iter().find(|t| t.id == id);
        let is_eligible = |id: TableId| eligible.iter().any(|t| t.id == id);

        if let Some(requested) = self.options.table_id {
            let table = find(requested).ok_or_else(|| Error::NotFound {
                resource: format!("table with id {requested}"),
            })?;
            if is_eligible(table.id) {
                return Ok(table);
            }
            let reason = if !table.seats(query.party_size) {
                TableUnavailableReason::Capacity
            } else if table.status == TableStatus::Maintenance {
                TableUnavailableReason::Maintenance
            } else {
                TableUnavailableReason::Booked
            };
            return Err(Error::TableUnavailable {
                table_number: table.number,
                reason,
            });
        }

        if is_eligible(current.table_id) {
            if let Some(table) = find(current.table_id) {
                return Ok(table);
            }
        }

        eligible
            .first()
            .and_then(|t| find(t.id))
            .ok_or(Error::NoTablesAvailable {
                date: query.date,
                time: query.time,
                party_size: query.party_size,
            })
    }
}

/// A new note replaces the old one; blank text clears it.
fn replace_note(new: Option<&str>, old: Option<&str>) -> Option<String> {
    match new {
        Some(text) => normalize_note(Some(text.to_string())),
        None => old.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{
        create_test_database, insert_test_table, test_now, test_request,
    };
    use crate::error::ErrorKind;
    use crate::operations::PlanExecutor;
    use crate::reservation::ReservationStatus;
    use crate::schedule::FixedClock;

    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    fn book(db: &Database, table: TableId, time: &str, guests: u32) -> Reservation {
        Database::insert_reservation(
            db.connection(),
            &test_request(table, tuesday(), time, guests),
            ReservationStatus::Confirmed,
            test_now(),
        )
        .unwrap()
    }

    fn modify(db: &mut Database, options: ModifyOptions) -> Result<Reservation> {
        let config = Config::defaults();
        let plan = ModifyPlan::new(options, &config)
            .with_clock(FixedClock::new(test_now()))
            .build_plan(db.connection())?;
        let result = PlanExecutor::new(db).execute(&plan)?;
        Ok(result.reservation.unwrap())
    }

    #[test]
    fn test_keeps_current_table_when_still_eligible() {
        let mut db = create_test_database();
        let five = insert_test_table(db.connection(), 5, 4);
        insert_test_table(db.connection(), 1, 4);
        let booked = book(&db, five.id, "18:00", 4);

        let changed = modify(
            &mut db,
            ModifyOptions::new(booked.id).with_time(Some("19:00".parse().unwrap())),
        )
        .unwrap();
        assert_eq!(changed.table_id, five.id);
        assert_eq!(changed.time.to_string(), "19:00");
        assert_eq!(changed.code, booked.code);
    }

    #[test]
    fn test_own_booking_is_not_a_conflict() {
        let mut db = create_test_database();
        let five = insert_test_table(db.connection(), 5, 6);
        let booked = book(&db, five.id, "18:00", 2);

        let changed = modify(&mut db, ModifyOptions::new(booked.id).with_guests(Some(6))).unwrap();
        assert_eq!(changed.guests, 6);
        assert_eq!(changed.table_id, five.id);
    }

    #[test]
    fn test_falls_back_to_lowest_numbered_eligible_table() {
        let mut db = create_test_database();
        let small = insert_test_table(db.connection(), 1, 2);
        insert_test_table(db.connection(), 7, 6);
        insert_test_table(db.connection(), 4, 6);
        let booked = book(&db, small.id, "18:00", 2);

        let changed = modify(&mut db, ModifyOptions::new(booked.id).with_guests(Some(5))).unwrap();
        let table = Database::get_table(db.connection(), changed.table_id).unwrap().unwrap();
        assert_eq!(table.number, 4);
    }

    #[test]
    fn test_explicit_table_must_be_eligible() {
        let mut db = create_test_database();
        let one = insert_test_table(db.connection(), 1, 4);
        let two = insert_test_table(db.connection(), 2, 4);
        let booked = book(&db, one.id, "18:00", 2);
        book(&db, two.id, "18:00", 2);

        let options = ModifyOptions::new(booked.id).with_table(Some(two.id));
        let err = modify(&mut db, options).unwrap_err();
        assert!(matches!(
            err,
            Error::TableUnavailable {
                table_number: 2,
                reason: TableUnavailableReason::Booked
            }
        ));
    }

    #[test]
    fn test_no_eligible_table() {
        let mut db = create_test_database();
        let one = insert_test_table(db.connection(), 1, 4);
        let two = insert_test_table(db.connection(), 2, 4);
        let booked = book(&db, one.id, "18:00", 2);
        book(&db, two.id, "19:00", 2);
        book(&db, one.id, "19:00", 2);

        let err = modify(
            &mut db,
            ModifyOptions::new(booked.id).with_time(Some("19:00".parse().unwrap())),
        )
        .unwrap_err();
        assert!(matches!(err, Error::NoTablesAvailable { party_size: 2, .. }));
    }

    #[test]
    fn test_move_into_seating_window_claimed_meanwhile() {
        let mut db = create_test_database();
        let one = insert_test_table(db.connection(), 1, 4);
        let two = insert_test_table(db.connection(), 2, 4);
        let booked = book(&db, two.id, "18:00", 2);
        let config = Config {
            seating_window_minutes: Some(120),
            ..Config::defaults()
        };

        let plan = ModifyPlan::new(
            ModifyOptions::new(booked.id)
                .with_table(Some(one.id))
                .with_time(Some("20:00".parse().unwrap())),
            &config,
        )
        .with_clock(FixedClock::new(test_now()))
        .build_plan(db.connection())
        .unwrap();

        // Another booking lands on table 1 before the plan commits.
        book(&db, one.id, "19:30", 2);

        let err = PlanExecutor::new(&mut db).execute(&plan).unwrap_err();
        assert!(matches!(err, Error::SlotTaken { table_number: 1, .. }));
        let reloaded = Database::get_reservation(db.connection(), booked.id).unwrap().unwrap();
        assert_eq!(reloaded, booked);
    }

    #[test]
    fn test_failed_modification_leaves_reservation_unchanged() {
        let mut db = create_test_database();
        let five = insert_test_table(db.connection(), 5, 4);
        let booked = book(&db, five.id, "18:00", 4);

        let err = modify(
            &mut db,
            ModifyOptions::new(booked.id)
                .with_time(Some("22:30".parse().unwrap()))
                .with_special_requests(Some("Birthday".into())),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let reloaded = Database::get_reservation(db.connection(), booked.id).unwrap().unwrap();
        assert_eq!(reloaded, booked);
    }

    #[test]
    fn test_only_confirmed_reservations_change() {
        let mut db = create_test_database();
        let table = insert_test_table(db.connection(), 1, 4);
        let pending = Database::insert_reservation(
            db.connection(),
            &test_request(table.id, tuesday(), "18:00", 2),
            ReservationStatus::Pending,
            test_now(),
        )
        .unwrap();

        let err = modify(&mut db, ModifyOptions::new(pending.id).with_guests(Some(3))).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "status"));
    }

    #[test]
    fn test_notes_replace_and_clear() {
        let mut db = create_test_database();
        let table = insert_test_table(db.connection(), 1, 4);
        let booked = book(&db, table.id, "18:00", 2);

        let changed = modify(
            &mut db,
            ModifyOptions::new(booked.id)
                .with_special_requests(Some("  Window seat ".into()))
                .with_dietary_notes(Some(String::new())),
        )
        .unwrap();
        assert_eq!(changed.special_requests.as_deref(), Some("Window seat"));
        assert_eq!(changed.dietary_notes, None);
    }

    #[test]
    fn test_missing_reservation() {
        let mut db = create_test_database();
        let err = modify(&mut db, ModifyOptions::new(ReservationId(42))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}

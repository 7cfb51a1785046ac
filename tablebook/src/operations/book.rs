//! Booking: creating a reservation for a chosen table.

use chrono::{Duration, NaiveDateTime};
use rusqlite::Connection;

use crate::availability::ConflictChecker;
use crate::config::Config;
use crate::database::{Database, ReservationQuery};
use crate::error::{Error, Result, TableUnavailableReason};
use crate::reservation::{NewReservation, ReservationStatus};
use crate::schedule::{Clock, SlotGenerator, SlotTime, SystemClock};
use crate::table::{Table, TableStatus};

use super::plan::{OperationPlan, PlanAction};

/// Options for a booking.
#[derive(Debug, Clone)]
pub struct BookOptions {
    /// The validated booking request.
    pub request: NewReservation,
}

impl BookOptions {
    /// Creates booking options for `request`.
    #[must_use]
    pub const fn new(request: NewReservation) -> Self {
        Self { request }
    }
}

/// Plans a new reservation.
///
/// The checks here are advisory: the store re-checks the slot when the
/// plan is executed and reports [`Error::SlotTaken`] if another booking got
/// there first.
///
/// # Examples
///
/// ```no_run
/// use chrono::NaiveDate;
/// use tablebook::config::ConfigBuilder;
/// use tablebook::operations::{BookOptions, BookPlan, PlanExecutor};
/// use tablebook::{Customer, Database, DatabaseConfig, NewReservation, TableId};
///
/// let config = ConfigBuilder::new().build().unwrap();
/// let mut db = Database::open(DatabaseConfig::new("/tmp/tablebook.db")).unwrap();
///
/// let customer = Customer::new("Ada Lovelace", "ada@example.com", None).unwrap();
/// let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
/// let request = NewReservation::builder(customer, date, "18:00".parse().unwrap(), TableId(5), 4)
///     .build()
///     .unwrap();
///
/// let plan = BookPlan::new(BookOptions::new(request), &config)
///     .build_plan(db.connection())
///     .unwrap();
/// let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
/// println!("booked {}", result.reservation.unwrap().code);
/// ```
pub struct BookPlan<'a, C = SystemClock> {
    options: BookOptions,
    config: &'a Config,
    clock: C,
}

impl<'a> BookPlan<'a> {
    /// Creates a booking planner using the system clock.
    #[must_use]
    pub const fn new(options: BookOptions, config: &'a Config) -> Self {
        Self {
            options,
            config,
            clock: SystemClock,
        }
    }
}

impl<'a, C: Clock> BookPlan<'a, C> {
    /// Replaces the clock used for "today" and "now".
    #[must_use]
    pub fn with_clock<D: Clock>(self, clock: D) -> BookPlan<'a, D> {
        BookPlan {
            options: self.options,
            config: self.config,
            clock,
        }
    }

    /// Builds the plan for this booking.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the table does not exist
    /// - a validation error if the date is past, the time is not a
    ///   bookable slot, or the party exceeds every table
    /// - [`Error::TableUnavailable`] if the chosen table is too small, under
    ///   maintenance, or already booked
    pub fn build_plan(&self, conn: &Connection) -> Result<OperationPlan> {
        let request = &self.options.request;
        let now = self.clock.now();

        let tables = Database::list_tables(conn)?;
        let table = tables
            .iter()
            .find(|t| t.id == request.table_id)
            .ok_or_else(|| Error::NotFound {
                resource: format!("table with id {}", request.table_id),
            })?;

        check_party_fits(&tables, request.guests)?;
        check_bookable(&SlotGenerator::new(&self.clock), request.date, request.time)?;

        let checker = ConflictChecker::new(self.config.conflict_policy());
        check_table(conn, &checker, table, request)?;

        let status = if self.config.auto_confirm() {
            ReservationStatus::Confirmed
        } else {
            ReservationStatus::Pending
        };

        let mut plan = OperationPlan::new(format!(
            "Book table {} for {} on {} at {}",
            table.number, request.customer.name, request.date, request.time
        ))
        .with_conflict_policy(checker.policy())
        .add_action(PlanAction::CreateReservation {
            request: request.clone(),
            status,
            at: now,
        });

        let starts_at = request.date.and_time(request.time.to_naive_time());
        if let Some(hold) = hold_table(table, starts_at, now, self.config.reserve_lead()) {
            plan = plan.add_action(hold);
        }
        if table.status == TableStatus::Occupied {
            plan = plan.add_warning(format!("table {} is currently marked OCCUPIED", table.number));
        }

        log::debug!("Planned booking of table {} ({status})", table.number);
        Ok(plan)
    }
}

/// Rejects a party larger than every table.
pub(crate) fn check_party_fits(tables: &[Table], guests: u32) -> Result<()> {
    let largest = tables.iter().map(|t| t.capacity).max().unwrap_or(0);
    if guests > largest {
        return Err(Error::validation(
            "guests",
            format!("a party of {guests} exceeds the largest table ({largest} seat(s))"),
        ));
    }
    Ok(())
}

/// Rejects past dates and times that are not bookable slots.
pub(crate) fn check_bookable<C: Clock>(
    slots: &SlotGenerator<C>,
    date: chrono::NaiveDate,
    time: SlotTime,
) -> Result<()> {
    if date < slots.clock().today() {
        return Err(Error::validation(
            "date",
            format!("{date} is in the past"),
        ));
    }
    if !slots.is_bookable(date, time) {
        return Err(Error::validation(
            "time",
            format!("{time} is not a bookable time on {date}"),
        ));
    }
    Ok(())
}

fn check_table(
    conn: &Connection,
    checker: &ConflictChecker,
    table: &Table,
    request: &NewReservation,
) -> Result<()> {
    let reason = if !table.seats(request.guests) {
        Some(TableUnavailableReason::Capacity)
    } else if table.status == TableStatus::Maintenance {
        Some(TableUnavailableReason::Maintenance)
    } else {
        let margin = Duration::days(checker.policy().day_margin());
        let nearby = ReservationQuery::between(request.date - margin, request.date + margin)
            .with_table(Some(table.id));
        let existing = Database::list_reservations(conn, &nearby)?;
        existing
            .iter()
            .any(|r| checker.conflicts(r, request.date, request.time, None))
            .then_some(TableUnavailableReason::Booked)
    };

    match reason {
        Some(reason) => Err(Error::TableUnavailable {
            table_number: table.number,
            reason,
        }),
        None => Ok(()),
    }
}

/// Returns the action that marks `table` RESERVED when a booking starting at
/// `starts_at` is today and within `lead` of `now`, and the table is free.
pub(crate) fn hold_table(
    table: &Table,
    starts_at: NaiveDateTime,
    now: NaiveDateTime,
    lead: Duration,
) -> Option<PlanAction> {
    let soon = starts_at.date() == now.date() && starts_at >= now && starts_at - now <= lead;
    (soon && table.status == TableStatus::Available).then(|| PlanAction::SetTableStatus {
        id: table.id,
        number: table.number,
        status: TableStatus::Reserved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{
        create_test_database, insert_test_table, test_now, test_request,
    };
    use crate::error::ErrorKind;
    use crate::operations::PlanExecutor;
    use crate::schedule::FixedClock;
    use chrono::NaiveDate;

    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    fn dinner(table: crate::table::TableId, time: &str, guests: u32) -> NewReservation {
        test_request(table, tuesday(), time, guests)
    }

    fn plan_for(
        conn: &Connection,
        config: &Config,
        request: NewReservation,
    ) -> Result<OperationPlan> {
        BookPlan::new(BookOptions::new(request), config)
            .with_clock(FixedClock::new(test_now()))
            .build_plan(conn)
    }

    #[test]
    fn test_book_confirmed_by_default() {
        let mut db = create_test_database();
        let table = insert_test_table(db.connection(), 5, 4);
        let config = Config::defaults();

        let plan = plan_for(db.connection(), &config, dinner(table.id, "18:00", 4)).unwrap();
        assert_eq!(plan.len(), 1);

        let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
        let booked = result.reservation.unwrap();
        assert_eq!(booked.status, ReservationStatus::Confirmed);
        assert_eq!(booked.table_id, table.id);
        assert_eq!(booked.guests, 4);
    }

    #[test]
    fn test_book_pending_without_auto_confirm() {
        let db = create_test_database();
        let table = insert_test_table(db.connection(), 5, 4);
        let config = Config {
            auto_confirm: Some(false),
            ..Config::defaults()
        };

        let plan = plan_for(db.connection(), &config, dinner(table.id, "18:00", 2)).unwrap();
        assert!(matches!(
            plan.actions[0],
            PlanAction::CreateReservation {
                status: ReservationStatus::Pending,
                ..
            }
        ));
    }

    #[test]
    fn test_book_rejects_unbookable_times() {
        let db = create_test_database();
        let table = insert_test_table(db.connection(), 1, 4);
        let config = Config::defaults();

        // Inside the closing buffer.
        let err = plan_for(db.connection(), &config, dinner(table.id, "22:30", 2)).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "time"));

        // Off the 30-minute grid.
        assert!(plan_for(db.connection(), &config, dinner(table.id, "18:15", 2)).is_err());

        // Past date.
        let past = NaiveDate::from_ymd_opt(2025, 5, 31).unwrap();
        let request = test_request(table.id, past, "18:00", 2);
        let err = plan_for(db.connection(), &config, request).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "date"));

        // Earlier today.
        let request = test_request(table.id, test_now().date(), "09:00", 2);
        let err = plan_for(db.connection(), &config, request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_book_rejects_oversized_party() {
        let db = create_test_database();
        let small = insert_test_table(db.connection(), 1, 2);
        insert_test_table(db.connection(), 2, 6);
        let config = Config::defaults();

        let err = plan_for(db.connection(), &config, dinner(small.id, "18:00", 4)).unwrap_err();
        assert!(matches!(
            err,
            Error::TableUnavailable {
                table_number: 1,
                reason: TableUnavailableReason::Capacity
            }
        ));

        let err = plan_for(db.connection(), &config, dinner(small.id, "18:00", 8)).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "guests"));
    }

    #[test]
    fn test_book_rejects_maintenance_and_booked_tables() {
        let mut db = create_test_database();
        let table = insert_test_table(db.connection(), 1, 4);
        let config = Config::defaults();

        let plan = plan_for(db.connection(), &config, dinner(table.id, "18:00", 2)).unwrap();
        PlanExecutor::new(&mut db).execute(&plan).unwrap();

        let err = plan_for(db.connection(), &config, dinner(table.id, "18:00", 2)).unwrap_err();
        assert!(matches!(
            err,
            Error::TableUnavailable {
                reason: TableUnavailableReason::Booked,
                ..
            }
        ));

        Database::set_table_status(db.connection(), table.id, TableStatus::Maintenance).unwrap();
        let err = plan_for(db.connection(), &config, dinner(table.id, "19:00", 2)).unwrap_err();
        assert!(matches!(
            err,
            Error::TableUnavailable {
                reason: TableUnavailableReason::Maintenance,
                ..
            }
        ));
    }

    #[test]
    fn test_lost_race_surfaces_as_slot_taken() {
        let mut db = create_test_database();
        let table = insert_test_table(db.connection(), 5, 4);
        let config = Config::defaults();

        let first = plan_for(db.connection(), &config, dinner(table.id, "18:00", 2)).unwrap();
        let second = plan_for(db.connection(), &config, dinner(table.id, "18:00", 3)).unwrap();

        PlanExecutor::new(&mut db).execute(&first).unwrap();
        let err = PlanExecutor::new(&mut db).execute(&second).unwrap_err();
        assert!(matches!(err, Error::SlotTaken { table_number: 5, .. }));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_lost_race_inside_seating_window_is_rejected() {
        let mut db = create_test_database();
        let table = insert_test_table(db.connection(), 5, 4);
        let config = Config {
            seating_window_minutes: Some(120),
            ..Config::defaults()
        };

        // Both plans pass their checks before either is committed.
        let first = plan_for(db.connection(), &config, dinner(table.id, "18:00", 2)).unwrap();
        let second = plan_for(db.connection(), &config, dinner(table.id, "18:30", 2)).unwrap();

        PlanExecutor::new(&mut db).execute(&first).unwrap();
        let err = PlanExecutor::new(&mut db).execute(&second).unwrap_err();
        assert!(matches!(err, Error::SlotTaken { table_number: 5, .. }));

        let on_table = ReservationQuery::on(tuesday()).with_table(Some(table.id));
        assert_eq!(Database::list_reservations(db.connection(), &on_table).unwrap().len(), 1);

        // Outside the window both fit.
        let later = plan_for(db.connection(), &config, dinner(table.id, "20:00", 2)).unwrap();
        assert!(PlanExecutor::new(&mut db).execute(&later).is_ok());
    }

    #[test]
    fn test_booking_soon_holds_table() {
        let mut db = create_test_database();
        let table = insert_test_table(db.connection(), 3, 4);
        let config = Config::defaults();
        let clock = FixedClock::new(tuesday().and_hms_opt(17, 0, 0).unwrap());
        let plan_at = |request| {
            BookPlan::new(BookOptions::new(request), &config)
                .with_clock(clock)
                .build_plan(db.connection())
        };

        // 20:00 is more than two hours after 17:00.
        let plan = plan_at(dinner(table.id, "20:00", 2)).unwrap();
        assert_eq!(plan.len(), 1);

        // 18:30 is within two hours.
        let plan = plan_at(dinner(table.id, "18:30", 2)).unwrap();
        assert_eq!(plan.len(), 2);
        let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
        assert_eq!(result.table.unwrap().status, TableStatus::Reserved);
    }

    #[test]
    fn test_hold_table_window() {
        let table = Table {
            id: crate::table::TableId(1),
            number: 1,
            capacity: 4,
            zone: crate::floorplan::Zone::Center,
            shape: crate::table::TableShape::Square,
            status: TableStatus::Available,
            position: None,
            description: None,
            created_at: test_now(),
        };
        let now = test_now();
        let lead = Duration::minutes(120);

        assert!(hold_table(&table, now + Duration::minutes(120), now, lead).is_some());
        assert!(hold_table(&table, now + Duration::minutes(150), now, lead).is_none());
        assert!(hold_table(&table, now - Duration::minutes(30), now, lead).is_none());

        let busy = Table {
            status: TableStatus::Occupied,
            ..table
        };
        assert!(hold_table(&busy, now + Duration::minutes(30), now, lead).is_none());
    }
}

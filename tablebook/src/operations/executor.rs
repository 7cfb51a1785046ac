//! Plan execution engine.
//!
//! All actions of a plan are applied inside one IMMEDIATE transaction, so
//! a plan either takes effect completely or not at all.

use chrono::{Duration, NaiveDate};
use rusqlite::Connection;

use crate::availability::{ConflictChecker, ConflictPolicy};
use crate::database::{Database, ReservationQuery};
use crate::error::{Error, Result};
use crate::reservation::{Reservation, ReservationId};
use crate::schedule::SlotTime;
use crate::table::{Table, TableId};

use super::plan::{OperationPlan, PlanAction};

/// Result of executing a plan.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Whether the execution was successful.
    pub success: bool,

    /// Whether this was a dry-run (no actual changes made).
    pub dry_run: bool,

    /// Descriptions of actions that were taken (or would be taken in dry-run).
    pub actions_taken: Vec<String>,

    /// Warnings from the plan.
    pub warnings: Vec<String>,

    /// The reservation the plan created or changed, as stored after commit.
    pub reservation: Option<Reservation>,

    /// The table the plan created or changed, as stored after commit.
    pub table: Option<Table>,
}

impl ExecutionResult {
    fn new(plan: &OperationPlan, dry_run: bool) -> Self {
        Self {
            success: true,
            dry_run,
            actions_taken: plan.actions.iter().map(PlanAction::description).collect(),
            warnings: plan.warnings.clone(),
            reservation: None,
            table: None,
        }
    }
}

/// Executes operation plans against the database.
///
/// The executor can run in normal mode (applying changes) or dry-run mode
/// (reporting the plan without touching the store).
///
/// # Examples
///
/// ```no_run
/// use tablebook::operations::{PlanExecutor, TableStatusPlan};
/// use tablebook::{Database, DatabaseConfig, TableId, TableStatus};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/tablebook.db")).unwrap();
/// let plan = TableStatusPlan::new(TableId(1), TableStatus::Occupied)
///     .build_plan(db.connection())
///     .unwrap();
///
/// let result = PlanExecutor::new(&mut db).dry_run().execute(&plan).unwrap();
/// assert!(result.dry_run);
///
/// let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
/// assert_eq!(result.table.unwrap().status, TableStatus::Occupied);
/// ```
pub struct PlanExecutor<'a> {
    db: &'a mut Database,
    dry_run: bool,
}

impl<'a> PlanExecutor<'a> {
    /// Creates a new plan executor.
    #[must_use]
    pub fn new(db: &'a mut Database) -> Self {
        Self { db, dry_run: false }
    }

    /// Sets the executor to dry-run mode.
    #[must_use]
    pub const fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Executes the given plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the write lock cannot be acquired or any action
    /// fails; no action of the plan is then applied. A slot claimed by
    /// another request surfaces as [`Error::SlotTaken`], and a record that
    /// changed since planning as [`Error::Stale`].
    pub fn execute(&mut self, plan: &OperationPlan) -> Result<ExecutionResult> {
        if self.dry_run {
            log::debug!("Dry run: {}", plan.description);
            return Ok(ExecutionResult::new(plan, true));
        }

        let tx = self.db.begin_write()?;
        let result = Self::apply(&tx, plan)?;
        tx.commit()?;

        log::info!("{}", plan.description);
        Ok(result)
    }

    /// Applies every action of `plan` on `conn`, which must already be
    /// inside a write transaction.
    pub(crate) fn apply(conn: &Connection, plan: &OperationPlan) -> Result<ExecutionResult> {
        let mut result = ExecutionResult::new(plan, false);
        for action in &plan.actions {
            Self::execute_action(conn, plan.conflict_policy, action, &mut result)?;
        }
        Ok(result)
    }

    fn execute_action(
        conn: &Connection,
        policy: ConflictPolicy,
        action: &PlanAction,
        result: &mut ExecutionResult,
    ) -> Result<()> {
        match action {
            PlanAction::CreateReservation {
                request,
                status,
                at,
            } => {
                let slot = Slot {
                    table_id: request.table_id,
                    date: request.date,
                    time: request.time,
                };
                ensure_slot_free(conn, policy, &slot, None)?;
                let stored = Database::insert_reservation(conn, request, *status, *at)?;
                result.reservation = Some(stored);
            }
            PlanAction::UpdateSchedule {
                id,
                code,
                update,
                at,
            } => {
                let slot = Slot {
                    table_id: update.table_id,
                    date: update.date,
                    time: update.time,
                };
                ensure_slot_free(conn, policy, &slot, Some(*id))?;
                if !Database::update_reservation_schedule(conn, *id, update, *at)? {
                    return Err(stale_reservation(code));
                }
                result.reservation = Some(reload_reservation(conn, *id)?);
            }
            PlanAction::SetReservationStatus {
                id,
                code,
                update,
                at,
            } => {
                if !Database::update_reservation_status(conn, *id, update, *at)? {
                    return Err(stale_reservation(code));
                }
                result.reservation = Some(reload_reservation(conn, *id)?);
            }
            PlanAction::SetTableStatus { id, number, status } => {
                if !Database::set_table_status(conn, *id, *status)? {
                    return Err(missing_table(*number));
                }
                result.table = Some(reload_table(conn, *id, *number)?);
            }
            PlanAction::MoveTable {
                id,
                number,
                position,
                zone,
            } => {
                if !Database::set_table_position(conn, *id, *position, *zone)? {
                    return Err(missing_table(*number));
                }
                result.table = Some(reload_table(conn, *id, *number)?);
            }
            PlanAction::CreateTable { table, at } => {
                result.table = Some(Database::insert_table(conn, table, *at)?);
            }
            PlanAction::DeleteTable { id, number } => {
                let count = Database::count_table_reservations(conn, *id)?;
                if count > 0 {
                    return Err(Error::TableInUse {
                        table_number: *number,
                        count,
                    });
                }
                if !Database::delete_table(conn, *id)? {
                    return Err(missing_table(*number));
                }
            }
        }
        Ok(())
    }
}

/// A table and start time a reservation write is about to claim.
struct Slot {
    table_id: TableId,
    date: NaiveDate,
    time: SlotTime,
}

/// Re-runs the conflict check under the write lock.
///
/// The unique slot index only rejects an identical start time, so a seating
/// window has to be enforced here.
fn ensure_slot_free(
    conn: &Connection,
    policy: ConflictPolicy,
    slot: &Slot,
    exclude: Option<ReservationId>,
) -> Result<()> {
    let checker = ConflictChecker::new(policy);
    let margin = Duration::days(policy.day_margin());
    let nearby = ReservationQuery::between(slot.date - margin, slot.date + margin)
        .with_table(Some(slot.table_id));
    let taken = Database::list_reservations(conn, &nearby)?
        .iter()
        .any(|r| checker.conflicts(r, slot.date, slot.time, exclude));
    if !taken {
        return Ok(());
    }

    let table = Database::get_table(conn, slot.table_id)?.ok_or_else(|| Error::NotFound {
        resource: format!("table with id {}", slot.table_id),
    })?;
    Err(Error::SlotTaken {
        table_number: table.number,
        date: slot.date,
        time: slot.time,
    })
}

fn stale_reservation(code: &str) -> Error {
    Error::Stale {
        resource: format!("reservation {code}"),
    }
}

fn missing_table(number: u32) -> Error {
    Error::NotFound {
        resource: format!("table {number}"),
    }
}

fn reload_reservation(conn: &Connection, id: ReservationId) -> Result<Reservation> {
    Database::get_reservation(conn, id)?.ok_or_else(|| Error::NotFound {
        resource: format!("reservation {}", id.code()),
    })
}

fn reload_table(conn: &Connection, id: TableId, number: u32) -> Result<Table> {
    Database::get_table(conn, id)?.ok_or_else(|| missing_table(number))
}

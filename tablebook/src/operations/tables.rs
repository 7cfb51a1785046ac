//! Table management: creation, removal, status changes and relocation.

use rusqlite::Connection;

use crate::database::{Database, ReservationQuery};
use crate::error::{Error, Result};
use crate::floorplan::{zone_for, Position};
use crate::schedule::{Clock, SystemClock};
use crate::table::{NewTable, Table, TableId, TableStatus};

use super::plan::{OperationPlan, PlanAction};

fn load_table(conn: &Connection, id: TableId) -> Result<Table> {
    Database::get_table(conn, id)?.ok_or_else(|| Error::NotFound {
        resource: format!("table with id {id}"),
    })
}

/// Plans the creation of a table.
pub struct CreateTablePlan<C = SystemClock> {
    table: NewTable,
    clock: C,
}

impl CreateTablePlan {
    /// Creates a planner for `table`.
    #[must_use]
    pub const fn new(table: NewTable) -> Self {
        Self {
            table,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> CreateTablePlan<C> {
    /// Replaces the clock used for the creation timestamp.
    #[must_use]
    pub fn with_clock<D: Clock>(self, clock: D) -> CreateTablePlan<D> {
        CreateTablePlan {
            table: self.table,
            clock,
        }
    }

    /// Builds the plan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateTableNumber`] if the number is taken.
    pub fn build_plan(&self, conn: &Connection) -> Result<OperationPlan> {
        if Database::get_table_by_number(conn, self.table.number)?.is_some() {
            return Err(Error::DuplicateTableNumber {
                number: self.table.number,
            });
        }
        Ok(
            OperationPlan::new(format!("Add table {}", self.table.number)).add_action(
                PlanAction::CreateTable {
                    table: self.table.clone(),
                    at: self.clock.now(),
                },
            ),
        )
    }
}

/// Plans the deletion of a table. Deletion is refused while any
/// reservation, past or future, references the table.
pub struct RemoveTablePlan {
    id: TableId,
}

impl RemoveTablePlan {
    /// Creates a planner for deleting table `id`.
    #[must_use]
    pub const fn new(id: TableId) -> Self {
        Self { id }
    }

    /// Builds the plan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown table or
    /// [`Error::TableInUse`] if reservations reference it.
    pub fn build_plan(&self, conn: &Connection) -> Result<OperationPlan> {
        let table = load_table(conn, self.id)?;
        let count = Database::count_table_reservations(conn, table.id)?;
        if count > 0 {
            return Err(Error::TableInUse {
                table_number: table.number,
                count,
            });
        }
        Ok(
            OperationPlan::new(format!("Remove table {}", table.number)).add_action(
                PlanAction::DeleteTable {
                    id: table.id,
                    number: table.number,
                },
            ),
        )
    }
}

/// Plans a table status change.
///
/// Any status may follow any other. Putting a table under maintenance while
/// upcoming reservations still hold it succeeds with a warning.
pub struct TableStatusPlan<C = SystemClock> {
    id: TableId,
    status: TableStatus,
    clock: C,
}

impl TableStatusPlan {
    /// Creates a planner setting table `id` to `status`.
    #[must_use]
    pub const fn new(id: TableId, status: TableStatus) -> Self {
        Self {
            id,
            status,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> TableStatusPlan<C> {
    /// Replaces the clock used to find upcoming reservations.
    #[must_use]
    pub fn with_clock<D: Clock>(self, clock: D) -> TableStatusPlan<D> {
        TableStatusPlan {
            id: self.id,
            status: self.status,
            clock,
        }
    }

    /// Builds the plan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown table.
    pub fn build_plan(&self, conn: &Connection) -> Result<OperationPlan> {
        let table = load_table(conn, self.id)?;
        let mut plan = OperationPlan::new(format!(
            "Set table {} from {} to {}",
            table.number, table.status, self.status
        ))
        .add_action(PlanAction::SetTableStatus {
            id: table.id,
            number: table.number,
            status: self.status,
        });

        if table.status == self.status {
            plan = plan.add_warning(format!("table {} is already {}", table.number, self.status));
        }

        if self.status == TableStatus::Maintenance {
            let upcoming = ReservationQuery {
                from: Some(self.clock.today()),
                table_id: Some(table.id),
                ..ReservationQuery::default()
            };
            let active = Database::list_reservations(conn, &upcoming)?
                .into_iter()
                .filter(|r| r.status.is_active())
                .count();
            if active > 0 {
                log::warn!(
                    "Table {} goes under maintenance with {active} upcoming reservation(s)",
                    table.number
                );
                plan = plan.add_warning(format!(
                    "table {} still has {active} upcoming reservation(s); reassign them",
                    table.number
                ));
            }
        }

        Ok(plan)
    }
}

/// Plans a table relocation. The zone is derived from the new position.
pub struct MoveTablePlan {
    id: TableId,
    position: Position,
}

impl MoveTablePlan {
    /// Creates a planner moving table `id` to `position`.
    #[must_use]
    pub const fn new(id: TableId, position: Position) -> Self {
        Self { id, position }
    }

    /// Builds the plan.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an off-canvas position, or
    /// [`Error::NotFound`] for an unknown table.
    pub fn build_plan(&self, conn: &Connection) -> Result<OperationPlan> {
        let position = self.position.validate()?;
        let table = load_table(conn, self.id)?;
        let zone = zone_for(position);

        let mut plan = OperationPlan::new(format!("Move table {}", table.number)).add_action(
            PlanAction::MoveTable {
                id: table.id,
                number: table.number,
                position,
                zone,
            },
        );
        if zone != table.zone {
            log::debug!("Table {} changes zone {} -> {zone}", table.number, table.zone);
            plan = plan.add_warning(format!(
                "table {} moves from {} to {zone}",
                table.number, table.zone
            ));
        }
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{
        create_test_database, insert_test_table, test_now, test_request,
    };
    use crate::floorplan::{DragSession, Zone};
    use crate::operations::PlanExecutor;
    use crate::reservation::ReservationStatus;
    use crate::schedule::FixedClock;
    use chrono::NaiveDate;

    #[test]
    fn test_create_and_duplicate() {
        let mut db = create_test_database();
        let table = NewTable::builder(9, 6).zone(Zone::Bar).build().unwrap();

        let plan = CreateTablePlan::new(table.clone())
            .with_clock(FixedClock::new(test_now()))
            .build_plan(db.connection())
            .unwrap();
        let created = PlanExecutor::new(&mut db).execute(&plan).unwrap().table.unwrap();
        assert_eq!(created.number, 9);
        assert_eq!(created.zone, Zone::Bar);
        assert_eq!(created.created_at, test_now());

        let err = CreateTablePlan::new(table).build_plan(db.connection()).unwrap_err();
        assert!(matches!(err, Error::DuplicateTableNumber { number: 9 }));
    }

    #[test]
    fn test_remove_unreferenced_table() {
        let mut db = create_test_database();
        let table = insert_test_table(db.connection(), 4, 2);
        let plan = RemoveTablePlan::new(table.id).build_plan(db.connection()).unwrap();
        PlanExecutor::new(&mut db).execute(&plan).unwrap();
        assert!(Database::get_table(db.connection(), table.id).unwrap().is_none());
    }

    #[test]
    fn test_remove_referenced_table_rejected() {
        let db = create_test_database();
        let table = insert_test_table(db.connection(), 4, 2);
        Database::insert_reservation(
            db.connection(),
            &test_request(table.id, NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(), "18:00", 1),
            ReservationStatus::Completed,
            test_now(),
        )
        .unwrap();

        let err = RemoveTablePlan::new(table.id).build_plan(db.connection()).unwrap_err();
        assert!(matches!(err, Error::TableInUse { table_number: 4, count: 1 }));
    }

    #[test]
    fn test_any_status_to_any_status() {
        let mut db = create_test_database();
        let table = insert_test_table(db.connection(), 1, 4);
        for status in [
            TableStatus::Occupied,
            TableStatus::Reserved,
            TableStatus::Maintenance,
            TableStatus::Available,
        ] {
            let plan = TableStatusPlan::new(table.id, status)
                .with_clock(FixedClock::new(test_now()))
                .build_plan(db.connection())
                .unwrap();
            let changed = PlanExecutor::new(&mut db).execute(&plan).unwrap().table.unwrap();
            assert_eq!(changed.status, status);
        }
    }

    #[test]
    fn test_maintenance_with_upcoming_reservations_warns() {
        let db = create_test_database();
        let table = insert_test_table(db.connection(), 1, 4);
        Database::insert_reservation(
            db.connection(),
            &test_request(table.id, NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(), "18:00", 2),
            ReservationStatus::Confirmed,
            test_now(),
        )
        .unwrap();

        let plan = TableStatusPlan::new(table.id, TableStatus::Maintenance)
            .with_clock(FixedClock::new(test_now()))
            .build_plan(db.connection())
            .unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.warnings.len(), 1);
        assert!(plan.warnings[0].contains("1 upcoming"));
    }

    #[test]
    fn test_move_derives_zone() {
        let mut db = create_test_database();
        let table = insert_test_table(db.connection(), 3, 4);

        let plan = MoveTablePlan::new(table.id, Position::new(120.0, 380.0))
            .build_plan(db.connection())
            .unwrap();
        let moved = PlanExecutor::new(&mut db).execute(&plan).unwrap().table.unwrap();
        assert_eq!(moved.zone, Zone::Patio);
        assert_eq!(moved.position, Some(Position::new(120.0, 380.0)));
    }

    #[test]
    fn test_move_off_canvas_rejected() {
        let db = create_test_database();
        let table = insert_test_table(db.connection(), 3, 4);
        let err = MoveTablePlan::new(table.id, Position::new(900.0, 10.0))
            .build_plan(db.connection())
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_drag_rolls_back_when_persist_fails() {
        let mut db = create_test_database();
        let table = insert_test_table(db.connection(), 3, 4);
        let start = table.position_or_default(0);

        let mut drag = DragSession::begin(start);
        drag.drag_to(Position::new(100.0, 300.0));

        // The table disappears before the drop is persisted.
        let plan = RemoveTablePlan::new(table.id).build_plan(db.connection()).unwrap();
        PlanExecutor::new(&mut db).execute(&plan).unwrap();

        let result = drag.release(|position, _zone| {
            let plan = MoveTablePlan::new(table.id, position).build_plan(db.connection())?;
            PlanExecutor::new(&mut db).execute(&plan)
        });
        assert!(result.is_err());
        assert_eq!(drag.current(), start);
    }
}

//! Floor-plan relocation and table management against a real store.

mod common;

use common::{
    default_config, morning_clock, open_database, request, seed_tables, table_number, tuesday,
};
use tablebook::availability::{
    AvailabilityQuery, AvailabilityResolver, ConflictChecker, ConflictPolicy,
};
use tablebook::floorplan::{zone_for, DragSession, Position, Zone};
use tablebook::operations::{
    BookOptions, BookPlan, MoveTablePlan, PlanExecutor, RemoveTablePlan, TableStatusPlan,
};
use tablebook::{Database, Error, SlotGenerator, TableStatus};

#[test]
fn test_drag_table_into_patio() {
    let (_dir, mut db) = open_database();
    let tables = seed_tables(&db);
    let three = table_number(&tables, 3);
    let start = tables[2].position_or_default(2);
    assert_eq!(zone_for(start), Zone::Center);

    let mut drag = DragSession::begin(start);
    drag.drag_to(Position::new(150.0, 320.0));
    drag.drag_to(Position::new(210.0, 400.0));

    let moved = drag
        .release(|position, zone| {
            assert_eq!(zone, Zone::Patio);
            let plan = MoveTablePlan::new(three, position).build_plan(db.connection())?;
            PlanExecutor::new(&mut db).execute(&plan)
        })
        .unwrap()
        .table
        .unwrap();

    assert_eq!(moved.zone, Zone::Patio);
    assert_eq!(moved.position, Some(Position::new(210.0, 400.0)));
    assert_eq!(drag.confirmed(), Position::new(210.0, 400.0));

    let stored = Database::get_table(db.connection(), three).unwrap().unwrap();
    assert_eq!(stored.zone, Zone::Patio);
    assert_eq!(stored.position, Some(Position::new(210.0, 400.0)));
}

#[test]
fn test_maintenance_hides_table_from_availability() {
    let (_dir, mut db) = open_database();
    let tables = seed_tables(&db);
    let six = table_number(&tables, 6);

    let plan = TableStatusPlan::new(six, TableStatus::Maintenance)
        .with_clock(morning_clock())
        .build_plan(db.connection())
        .unwrap();
    assert!(plan.warnings.is_empty());
    PlanExecutor::new(&mut db).execute(&plan).unwrap();

    let resolver = AvailabilityResolver::new(
        SlotGenerator::new(morning_clock()),
        ConflictChecker::new(ConflictPolicy::ExactSlot),
    );
    let query = AvailabilityQuery::new(tuesday(), "18:00".parse().unwrap(), 6);
    assert!(resolver.available_tables(db.connection(), &query).unwrap().is_empty());
}

#[test]
fn test_referenced_table_cannot_be_removed() {
    let (_dir, mut db) = open_database();
    let tables = seed_tables(&db);
    let config = default_config();
    let two = table_number(&tables, 2);

    let plan = BookPlan::new(BookOptions::new(request(two, tuesday(), "18:00", 2)), &config)
        .with_clock(morning_clock())
        .build_plan(db.connection())
        .unwrap();
    PlanExecutor::new(&mut db).execute(&plan).unwrap();

    let err = RemoveTablePlan::new(two).build_plan(db.connection()).unwrap_err();
    assert!(matches!(err, Error::TableInUse { table_number: 2, count: 1 }));

    let one = table_number(&tables, 1);
    let plan = RemoveTablePlan::new(one).build_plan(db.connection()).unwrap();
    PlanExecutor::new(&mut db).execute(&plan).unwrap();
    assert_eq!(Database::list_tables(db.connection()).unwrap().len(), 5);
}

//! Tables command implementation.
//!
//! Manages dining tables and the floor plan: listing, adding, changing
//! status, moving on the canvas, and removing.

use crate::error::CliError;
use crate::utils::{
    find_table, load_configuration, open_database, parse_with, run_plan, write_json,
    GlobalOptions,
};
use clap::{Args, Subcommand};
use std::collections::HashMap;
use tablebook::floorplan::{Position, Zone};
use tablebook::operations::{CreateTablePlan, MoveTablePlan, RemoveTablePlan, TableStatusPlan};
use tablebook::{Database, NewTable, Table, TableShape, TableStatus};

/// Manage tables and the floor plan.
#[derive(Args)]
pub struct TablesCommand {
    #[command(subcommand)]
    pub action: TablesAction,
}

/// Table management actions.
#[derive(Subcommand)]
pub enum TablesAction {
    /// List tables with their floor-plan placement
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a table
    Add {
        /// Table number
        #[arg(value_name = "NUMBER", value_parser = clap::value_parser!(u32).range(1..))]
        number: u32,

        /// Maximum party size
        #[arg(value_name = "CAPACITY", value_parser = clap::value_parser!(u32).range(1..))]
        capacity: u32,

        /// Zone, when no position is given
        #[arg(long, value_name = "ZONE", value_parser = parse_with::<Zone>)]
        zone: Option<Zone>,

        /// Shape: square, round, rectangle or oval
        #[arg(long, value_name = "SHAPE", value_parser = parse_with::<TableShape>)]
        shape: Option<TableShape>,

        /// Canvas x coordinate
        #[arg(long, requires = "y", allow_negative_numbers = true)]
        x: Option<f64>,

        /// Canvas y coordinate
        #[arg(long, requires = "x", allow_negative_numbers = true)]
        y: Option<f64>,

        /// Description
        #[arg(long, value_name = "TEXT")]
        description: Option<String>,

        /// Show what would be added without adding
        #[arg(long)]
        dry_run: bool,
    },

    /// Change a table's status
    Status {
        /// Table number
        #[arg(value_name = "NUMBER")]
        number: u32,

        /// New status: available, reserved, occupied or maintenance
        #[arg(value_name = "STATUS", value_parser = parse_with::<TableStatus>)]
        status: TableStatus,

        /// Show what would change without changing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Move a table on the floor plan; the zone follows the position
    Move {
        /// Table number
        #[arg(value_name = "NUMBER")]
        number: u32,

        /// Canvas x coordinate
        #[arg(value_name = "X", allow_negative_numbers = true)]
        x: f64,

        /// Canvas y coordinate
        #[arg(value_name = "Y", allow_negative_numbers = true)]
        y: f64,

        /// Show what would change without changing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove a table that no reservation refers to
    Remove {
        /// Table number
        #[arg(value_name = "NUMBER")]
        number: u32,

        /// Show what would be removed without removing
        #[arg(long)]
        dry_run: bool,
    },
}

impl TablesCommand {
    /// Execute the tables command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        let (plan, dry_run) = match self.action {
            TablesAction::List { json } => return list_tables(&db, json),
            TablesAction::Add {
                number,
                capacity,
                zone,
                shape,
                x,
                y,
                description,
                dry_run,
            } => {
                let mut builder = NewTable::builder(number, capacity)
                    .shape(shape.unwrap_or_default())
                    .description(description);
                if let Some(zone) = zone {
                    builder = builder.zone(zone);
                }
                if let (Some(x), Some(y)) = (x, y) {
                    builder = builder.position(Position::new(x, y));
                }
                let plan = CreateTablePlan::new(builder.build()?).build_plan(db.connection())?;
                (plan, dry_run)
            }
            TablesAction::Status {
                number,
                status,
                dry_run,
            } => {
                let table = find_table(&db, number)?;
                let plan = TableStatusPlan::new(table.id, status).build_plan(db.connection())?;
                (plan, dry_run)
            }
            TablesAction::Move {
                number,
                x,
                y,
                dry_run,
            } => {
                let table = find_table(&db, number)?;
                let plan =
                    MoveTablePlan::new(table.id, Position::new(x, y)).build_plan(db.connection())?;
                (plan, dry_run)
            }
            TablesAction::Remove { number, dry_run } => {
                let table = find_table(&db, number)?;
                let plan = RemoveTablePlan::new(table.id).build_plan(db.connection())?;
                (plan, dry_run)
            }
        };

        let Some(result) = run_plan(&mut db, &plan, dry_run, global)? else {
            return Ok(());
        };
        if global.quiet {
            return Ok(());
        }
        match result.table {
            Some(table) => println!(
                "Table {}: {} seat(s), {} zone, {}",
                table.number, table.capacity, table.zone, table.status
            ),
            None => {
                for action in &result.actions_taken {
                    println!("{action}");
                }
            }
        }
        Ok(())
    }
}

/// Lays out every table: placed tables keep their position, unplaced tables
/// take the next default grid slot in their zone.
fn layout(tables: &[Table]) -> Vec<(&Table, Position)> {
    let mut next_index: HashMap<Zone, usize> = HashMap::new();
    tables
        .iter()
        .map(|table| {
            let position = table.position.unwrap_or_else(|| {
                let index = next_index.entry(table.zone).or_default();
                let position = table.position_or_default(*index);
                *index += 1;
                position
            });
            (table, position)
        })
        .collect()
}

fn list_tables(db: &Database, json: bool) -> Result<(), CliError> {
    let tables = Database::list_tables(db.connection())?;
    if json {
        return write_json(&tables);
    }
    println!("TABLE\tSEATS\tZONE\tSHAPE\tSTATUS\tX\tY\tDESCRIPTION");
    for (table, position) in layout(&tables) {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{:.0}\t{:.0}\t{}",
            table.number,
            table.capacity,
            table.zone,
            table.shape,
            table.status,
            position.x,
            position.y,
            table.description.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

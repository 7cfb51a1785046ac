//! Modify command implementation.
//!
//! Changes the date, time, table, party size, or notes of a confirmed
//! reservation. When the current table no longer fits, another eligible
//! table is chosen and a warning is printed.

use crate::error::CliError;
use crate::utils::{
    find_reservation, find_table, load_configuration, open_database, parse_date, parse_with,
    reservation_line, run_plan, write_json, GlobalOptions,
};
use chrono::NaiveDate;
use clap::Args;
use tablebook::operations::{ModifyOptions, ModifyPlan};
use tablebook::{Database, SlotTime};

/// Change a confirmed reservation.
#[derive(Args)]
pub struct ModifyCommand {
    /// Reservation code (e.g. RES-0001) or id
    #[arg(value_name = "RESERVATION")]
    pub reservation: String,

    /// New date
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// New time (HH:MM or h:mm AM/PM)
    #[arg(long, value_name = "TIME", value_parser = parse_with::<SlotTime>)]
    pub time: Option<SlotTime>,

    /// Move to this table number
    #[arg(long, value_name = "NUMBER")]
    pub table: Option<u32>,

    /// New party size
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub guests: Option<u32>,

    /// New special requests (empty text clears them)
    #[arg(long, value_name = "TEXT")]
    pub special_requests: Option<String>,

    /// New dietary notes (empty text clears them)
    #[arg(long, value_name = "TEXT")]
    pub dietary_notes: Option<String>,

    /// Show what would change without changing it
    #[arg(long)]
    pub dry_run: bool,

    /// Output the stored reservation as JSON
    #[arg(long)]
    pub json: bool,
}

impl ModifyCommand {
    /// Execute the modify command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        let current = find_reservation(&db, &self.reservation)?;
        let table_id = self
            .table
            .map(|number| find_table(&db, number).map(|t| t.id))
            .transpose()?;

        let options = ModifyOptions::new(current.id)
            .with_date(self.date)
            .with_time(self.time)
            .with_table(table_id)
            .with_guests(self.guests)
            .with_special_requests(self.special_requests)
            .with_dietary_notes(self.dietary_notes);

        let plan = ModifyPlan::new(options, &config).build_plan(db.connection())?;
        let Some(result) = run_plan(&mut db, &plan, self.dry_run, global)? else {
            return Ok(());
        };

        if let Some(reservation) = result.reservation {
            if self.json {
                return write_json(&reservation);
            }
            if !global.quiet {
                let number = Database::get_table(db.connection(), reservation.table_id)?
                    .map(|t| t.number);
                println!("Updated {}", reservation_line(&reservation, number));
            }
        }
        Ok(())
    }
}

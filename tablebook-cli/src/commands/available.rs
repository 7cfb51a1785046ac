//! Available command implementation.
//!
//! Lists the tables that can seat a party at a date and time.

use crate::error::CliError;
use crate::utils::{
    load_configuration, open_database, parse_date, parse_with, write_json, GlobalOptions,
};
use chrono::NaiveDate;
use clap::Args;
use tablebook::availability::{AvailabilityQuery, AvailabilityResolver, ConflictChecker};
use tablebook::{SlotGenerator, SlotTime, SystemClock};

/// List tables free for a party at a date and time.
#[derive(Args)]
pub struct AvailableCommand {
    /// Reservation date
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub date: NaiveDate,

    /// Reservation time (HH:MM or h:mm AM/PM)
    #[arg(long, value_name = "TIME", value_parser = parse_with::<SlotTime>)]
    pub time: SlotTime,

    /// Party size
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub guests: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AvailableCommand {
    /// Execute the available command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let resolver = AvailabilityResolver::new(
            SlotGenerator::new(SystemClock),
            ConflictChecker::new(config.conflict_policy()),
        );
        let query = AvailabilityQuery::new(self.date, self.time, self.guests);
        let tables = resolver.available_tables(db.connection(), &query)?;

        if self.json {
            return write_json(&tables);
        }

        if tables.is_empty() {
            if !global.quiet {
                eprintln!(
                    "No tables available for {} guest(s) on {} at {}",
                    self.guests, self.date, self.time
                );
            }
            return Ok(());
        }
        println!("TABLE\tSEATS\tZONE\tSTATUS");
        for table in tables {
            println!("{}\t{}\t{}\t{}", table.number, table.capacity, table.zone, table.status);
        }
        Ok(())
    }
}

//! Slots command implementation.

use crate::error::CliError;
use crate::utils::{parse_date, write_json, GlobalOptions};
use chrono::NaiveDate;
use clap::Args;
use tablebook::{SlotGenerator, SlotTime, SystemClock};

/// List bookable time slots for a date.
#[derive(Args)]
pub struct SlotsCommand {
    /// Date to list slots for
    #[arg(value_name = "DATE", value_parser = parse_date)]
    pub date: NaiveDate,

    /// Show 12-hour times
    #[arg(long)]
    pub twelve_hour: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SlotsCommand {
    /// Execute the slots command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let slots: Vec<SlotTime> = SlotGenerator::new(SystemClock).slots_for(self.date).collect();

        if self.json {
            return write_json(&slots);
        }

        if slots.is_empty() && !global.quiet {
            eprintln!("No bookable slots on {}", self.date);
        }
        for slot in slots {
            if self.twelve_hour {
                println!("{}", slot.display_12h());
            } else {
                println!("{slot}");
            }
        }
        Ok(())
    }
}

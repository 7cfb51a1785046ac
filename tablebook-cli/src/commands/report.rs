//! Report command implementation.
//!
//! Shows reservation, guest and occupancy statistics for one day.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, parse_date, write_json, GlobalOptions};
use chrono::NaiveDate;
use clap::Args;
use tablebook::operations::DailyStats;
use tablebook::{Clock, SystemClock};

/// Show daily statistics.
#[derive(Args)]
pub struct ReportCommand {
    /// Day to report on (defaults to today)
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ReportCommand {
    /// Execute the report command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let date = self.date.unwrap_or_else(|| SystemClock.today());
        let stats = DailyStats::load(db.connection(), date)?;

        if self.json {
            return write_json(&stats);
        }

        let counts = &stats.reservations;
        println!("Report for {}", stats.date);
        println!(
            "Reservations: {} ({:+.1}% vs previous day)",
            counts.total(),
            stats.reservation_trend
        );
        println!(
            "  pending {}, confirmed {}, completed {}, cancelled {}, no-show {}",
            counts.pending, counts.confirmed, counts.completed, counts.cancelled, counts.no_show
        );
        println!(
            "Guests expected: {} ({:+.1}% vs previous day)",
            stats.guests_expected, stats.guest_trend
        );
        println!("Guests served: {}", stats.guests_served);
        println!(
            "Tables: {} available, {} reserved, {} occupied, {} maintenance",
            stats.tables.available,
            stats.tables.reserved,
            stats.tables.occupied,
            stats.tables.maintenance
        );
        println!("Occupancy: {:.1}%", stats.occupancy_rate);
        Ok(())
    }
}

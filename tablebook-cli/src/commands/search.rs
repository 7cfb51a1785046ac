//! Search command implementation.
//!
//! Case-insensitive substring search over reservations (customer name,
//! email, code) and tables (number, zone, description).

use crate::error::CliError;
use crate::utils::{
    load_configuration, open_database, reservation_line, table_number_of, write_json,
    GlobalOptions,
};
use clap::Args;
use tablebook::operations::SearchCache;

/// Search reservations and tables.
#[derive(Args)]
pub struct SearchCommand {
    /// Text to look for
    #[arg(value_name = "TERM")]
    pub term: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    /// Execute the search command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let mut cache = SearchCache::new();
        let results = cache.search(db.connection(), &self.term)?;

        if self.json {
            return write_json(&results);
        }
        if results.is_empty() {
            if !global.quiet {
                eprintln!("No matches for '{}'", self.term);
            }
            return Ok(());
        }

        let tables = cache.tables(db.connection())?;
        for reservation in &results.reservations {
            println!(
                "{}",
                reservation_line(reservation, table_number_of(tables, reservation))
            );
        }
        for table in &results.tables {
            println!(
                "Table {}: {} seat(s), {} zone, {}{}",
                table.number,
                table.capacity,
                table.zone,
                table.status,
                table
                    .description
                    .as_deref()
                    .map_or_else(String::new, |d| format!(" ({d})"))
            );
        }
        Ok(())
    }
}

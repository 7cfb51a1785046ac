//! Sweep command implementation.
//!
//! Returns RESERVED and OCCUPIED tables with no booking close to now back
//! to AVAILABLE.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};
use clap::Args;
use tablebook::operations::CleanupOperations;
use tablebook::SystemClock;

/// Release tables left RESERVED or OCCUPIED without a booking near now.
#[derive(Args)]
pub struct SweepCommand {
    /// Show which tables would be released without releasing them
    #[arg(long)]
    pub dry_run: bool,
}

impl SweepCommand {
    /// Execute the sweep command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        let result = CleanupOperations::release_idle_tables(
            &mut db,
            &SystemClock,
            config.reserve_lead(),
            self.dry_run,
        )?;

        if global.quiet {
            return Ok(());
        }
        if result.released.is_empty() {
            println!("No idle tables");
            return Ok(());
        }
        let verb = if result.dry_run { "Would release" } else { "Released" };
        for table in &result.released {
            println!("{verb} table {} ({})", table.number, table.status);
        }
        Ok(())
    }
}

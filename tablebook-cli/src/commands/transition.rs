//! Transition command implementation.
//!
//! Moves a reservation through its lifecycle: confirm, cancel, complete,
//! or mark a no-show.

use crate::error::CliError;
use crate::utils::{
    find_reservation, load_configuration, open_database, parse_with, run_plan, write_json,
    GlobalOptions,
};
use clap::Args;
use tablebook::operations::{TransitionOptions, TransitionPlan};
use tablebook::{Actor, TransitionAction};

/// Confirm, cancel, complete, or mark a reservation as a no-show.
#[derive(Args)]
pub struct TransitionCommand {
    /// Reservation code (e.g. RES-0001) or id
    #[arg(value_name = "RESERVATION")]
    pub reservation: String,

    /// Action to apply: confirm, cancel, complete or no-show
    #[arg(value_name = "ACTION", value_parser = parse_with::<TransitionAction>)]
    pub action: TransitionAction,

    /// Who is acting: customer, staff or admin
    #[arg(
        long = "as",
        value_name = "ACTOR",
        default_value = "staff",
        value_parser = parse_with::<Actor>
    )]
    pub actor: Actor,

    /// Cancellation reason
    #[arg(long, value_name = "TEXT")]
    pub reason: Option<String>,

    /// Show what would change without changing it
    #[arg(long)]
    pub dry_run: bool,

    /// Output the stored reservation as JSON
    #[arg(long)]
    pub json: bool,
}

impl TransitionCommand {
    /// Execute the transition command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        let current = find_reservation(&db, &self.reservation)?;
        let options =
            TransitionOptions::new(current.id, self.action, self.actor).with_reason(self.reason);
        let plan = TransitionPlan::new(options, &config).build_plan(db.connection())?;

        let Some(result) = run_plan(&mut db, &plan, self.dry_run, global)? else {
            return Ok(());
        };

        if let Some(reservation) = result.reservation {
            if self.json {
                return write_json(&reservation);
            }
            if !global.quiet {
                print!("{} is now {}", reservation.code, reservation.status);
                match reservation.loyalty_points {
                    Some(points) => println!(" ({points} loyalty points)"),
                    None => println!(),
                }
            }
        }
        Ok(())
    }
}

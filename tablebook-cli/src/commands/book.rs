//! Book command implementation.
//!
//! Creates a reservation for a customer at a specific table, date and time.

use crate::error::CliError;
use crate::utils::{
    find_table, load_configuration, open_database, parse_date, parse_with, reservation_line,
    run_plan, write_json, GlobalOptions,
};
use chrono::NaiveDate;
use clap::Args;
use tablebook::operations::{BookOptions, BookPlan};
use tablebook::{Customer, NewReservation, PreOrderItem, SlotTime};

/// Book a table.
#[derive(Args)]
pub struct BookCommand {
    /// Table number
    #[arg(long, value_name = "NUMBER")]
    pub table: u32,

    /// Reservation date
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub date: NaiveDate,

    /// Reservation time (HH:MM or h:mm AM/PM)
    #[arg(long, value_name = "TIME", value_parser = parse_with::<SlotTime>)]
    pub time: SlotTime,

    /// Party size
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub guests: u32,

    /// Customer name
    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// Customer email
    #[arg(long, value_name = "EMAIL")]
    pub email: String,

    /// Customer phone number
    #[arg(long, value_name = "PHONE")]
    pub phone: Option<String>,

    /// Special requests
    #[arg(long, value_name = "TEXT")]
    pub special_requests: Option<String>,

    /// Dietary notes
    #[arg(long, value_name = "TEXT")]
    pub dietary_notes: Option<String>,

    /// Pre-order for one guest as DRINK:FOOD (repeatable, either side may be empty)
    #[arg(long = "pre-order", value_name = "DRINK:FOOD", value_parser = parse_pre_order)]
    pub pre_order: Vec<PreOrderItem>,

    /// Show what would be booked without booking
    #[arg(long)]
    pub dry_run: bool,

    /// Output the stored reservation as JSON
    #[arg(long)]
    pub json: bool,
}

/// Parses one `DRINK:FOOD` pre-order selection.
fn parse_pre_order(s: &str) -> Result<PreOrderItem, String> {
    let (drink, food) = s.split_once(':').unwrap_or((s, ""));
    let clean = |part: &str| Some(part.trim().to_string()).filter(|p| !p.is_empty());
    let item = PreOrderItem {
        drink: clean(drink),
        food: clean(food),
    };
    if item.drink.is_none() && item.food.is_none() {
        return Err("pre-order needs a drink, a food, or both".to_string());
    }
    Ok(item)
}

impl BookCommand {
    /// Execute the book command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        let table = find_table(&db, self.table)?;
        let customer = Customer::new(&self.name, &self.email, self.phone.as_deref())?;
        let request = NewReservation::builder(customer, self.date, self.time, table.id, self.guests)
            .special_requests(self.special_requests)
            .dietary_notes(self.dietary_notes)
            .pre_order(self.pre_order)
            .build()?;

        let plan = BookPlan::new(BookOptions::new(request), &config).build_plan(db.connection())?;
        let Some(result) = run_plan(&mut db, &plan, self.dry_run, global)? else {
            return Ok(());
        };

        if let Some(reservation) = result.reservation {
            if self.json {
                write_json(&reservation)?;
            } else if global.quiet {
                println!("{}", reservation.code);
            } else {
                println!("Booked {}", reservation_line(&reservation, Some(table.number)));
            }
        }
        Ok(())
    }
}

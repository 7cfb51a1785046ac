//! List command implementation.
//!
//! This module implements the `list` command, which displays reservations
//! in various formats (table, JSON, CSV).

use crate::error::CliError;
use crate::utils::{
    csv_error, load_configuration, open_database, output_format, parse_date, parse_with,
    table_number_of, write_json, GlobalOptions,
};
use chrono::NaiveDate;
use clap::Args;
use std::io::Write;
use tablebook::config::OutputFormat;
use tablebook::database::ReservationQuery;
use tablebook::{Database, Reservation, ReservationStatus, Table};

/// Column headers for table and CSV output.
const COLUMN_HEADERS: [&str; 8] = [
    "code", "date", "time", "guests", "table", "customer", "email", "status",
];

/// List reservations.
#[derive(Args)]
pub struct ListCommand {
    /// Only this date (shorthand for --from DATE --to DATE)
    #[arg(
        long,
        value_name = "DATE",
        value_parser = parse_date,
        conflicts_with_all = ["from", "to"]
    )]
    pub date: Option<NaiveDate>,

    /// First date, inclusive
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub from: Option<NaiveDate>,

    /// Last date, inclusive
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub to: Option<NaiveDate>,

    /// Only this status
    #[arg(long, value_name = "STATUS", value_parser = parse_with::<ReservationStatus>)]
    pub status: Option<ReservationStatus>,

    /// Output format: table, json or csv (defaults to the configured format)
    #[arg(long, value_name = "FORMAT", value_parser = parse_with::<OutputFormat>)]
    pub format: Option<OutputFormat>,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let (from, to) = match self.date {
            Some(date) => (Some(date), Some(date)),
            None => (self.from, self.to),
        };
        let query = ReservationQuery {
            from,
            to,
            ..ReservationQuery::all()
        }
        .with_status(self.status);

        let reservations = Database::list_reservations(db.connection(), &query)?;
        let tables = Database::list_tables(db.connection())?;

        match output_format(self.format, &config) {
            OutputFormat::Table => format_as_table(&reservations, &tables),
            OutputFormat::Json => write_json(&reservations),
            OutputFormat::Csv => format_as_csv(&reservations, &tables),
        }
    }
}

fn record(reservation: &Reservation, tables: &[Table]) -> [String; 8] {
    [
        reservation.code.clone(),
        reservation.date.to_string(),
        reservation.time.to_string(),
        reservation.guests.to_string(),
        table_number_of(tables, reservation).map_or_else(String::new, |n| n.to_string()),
        reservation.customer.name.clone(),
        reservation.customer.email.clone(),
        reservation.status.to_string(),
    ]
}

/// Format reservations as a human-readable table.
fn format_as_table(reservations: &[Reservation], tables: &[Table]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let header_line = COLUMN_HEADERS
        .iter()
        .map(|s| s.to_uppercase())
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(handle, "{header_line}")?;

    for reservation in reservations {
        writeln!(handle, "{}", record(reservation, tables).join("\t"))?;
    }
    Ok(())
}

/// Format reservations as CSV.
fn format_as_csv(reservations: &[Reservation], tables: &[Table]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut writer = csv::Writer::from_writer(stdout.lock());

    writer.write_record(COLUMN_HEADERS).map_err(csv_error)?;
    for reservation in reservations {
        writer
            .write_record(record(reservation, tables))
            .map_err(csv_error)?;
    }
    writer.flush()?;
    Ok(())
}

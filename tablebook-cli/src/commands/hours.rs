//! Hours command implementation.

use crate::error::CliError;
use crate::utils::{parse_date, write_json, GlobalOptions};
use chrono::{Datelike, NaiveDate, Weekday};
use clap::Args;
use tablebook::hours_for;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Show opening hours for the week or for one date.
#[derive(Args)]
pub struct HoursCommand {
    /// Only show the hours that apply on this date
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl HoursCommand {
    /// Execute the hours command.
    pub fn execute(self, _global: &GlobalOptions) -> Result<(), CliError> {
        let days: Vec<Weekday> = match self.date {
            Some(date) => vec![date.weekday()],
            None => WEEK.to_vec(),
        };

        if self.json {
            let rows: Vec<serde_json::Value> = days
                .iter()
                .map(|day| {
                    let hours = hours_for(*day);
                    serde_json::json!({
                        "weekday": day.to_string(),
                        "open": hours.open.to_string(),
                        "close": hours.close_time().to_string(),
                        "closes_next_day": hours.closes_next_day(),
                    })
                })
                .collect();
            return write_json(&rows);
        }

        for day in days {
            let hours = hours_for(day);
            let next_day = if hours.closes_next_day() { " (+1 day)" } else { "" };
            println!("{day}\t{}-{}{next_day}", hours.open, hours.close_time());
        }
        Ok(())
    }
}

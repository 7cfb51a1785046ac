//! Build script for tablebook-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
/// When adding/removing/modifying commands, update both files.
fn build_cli() -> Command {
    Command::new("tablebook")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Book restaurant tables and manage the floor")
        .long_about(
            "Command-line tool for restaurant table reservations, opening hours and the floor plan",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("TABLEBOOK_DATA_DIR"),
        )
        .arg(
            Arg::new("busy-timeout")
                .long("busy-timeout")
                .help("Override the default busy timeout (in seconds)")
                .value_name("SECONDS")
                .global(true)
                .env("TABLEBOOK_BUSY_TIMEOUT"),
        )
        .arg(
            Arg::new("disable-autoinit")
                .long("disable-autoinit")
                .help("Disable automatic database initialization")
                .global(true)
                .action(clap::ArgAction::SetTrue)
                .env("TABLEBOOK_DISABLE_AUTOINIT"),
        )
        .subcommands(vec![
            Command::new("init")
                .about("Initialize the data directory and database")
                .long_about("Set up the tablebook database and configuration"),
            Command::new("hours")
                .about("Show opening hours")
                .long_about("Display opening hours for the week or a single date"),
            Command::new("slots")
                .about("List bookable time slots for a date")
                .long_about("List the 30-minute slots that can still be booked on a date"),
            Command::new("available")
                .about("List tables free for a party at a date and time")
                .long_about("Show tables with enough seats and no conflicting booking"),
            Command::new("book")
                .about("Book a table")
                .long_about("Create a reservation at a table for a date, time and party size"),
            Command::new("modify")
                .about("Change a confirmed reservation")
                .long_about("Change the date, time, table, party size or notes of a reservation"),
            Command::new("transition")
                .about("Move a reservation through its lifecycle")
                .long_about("Confirm, cancel, complete or mark a reservation as a no-show"),
            Command::new("list")
                .about("List reservations")
                .long_about("Display reservations by date range and status in various formats"),
            Command::new("tables")
                .about("Manage tables and the floor plan")
                .long_about("List, add, move, remove, or change the status of dining tables"),
            Command::new("report")
                .about("Show daily statistics")
                .long_about("Show reservation, guest and occupancy figures for one day"),
            Command::new("sweep")
                .about("Release idle tables")
                .long_about("Return reserved or occupied tables with no booking near now to available"),
            Command::new("search")
                .about("Search reservations and tables")
                .long_about("Find reservations by customer or code and tables by number, zone or description"),
            Command::new("validate")
                .about("Validate a configuration file")
                .long_about("Check a tablebook configuration file for errors"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    // Generate man pages at build time
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let app = build_cli();
    let man = Man::new(app);
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("tablebook.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}

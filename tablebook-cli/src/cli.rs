//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    AvailableCommand, BookCommand, CompletionsCommand, HoursCommand, InitCommand, ListCommand,
    ModifyCommand, ReportCommand, SearchCommand, SlotsCommand, SweepCommand, TablesCommand,
    TransitionCommand, ValidateCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for restaurant table reservations.
#[derive(Parser)]
#[command(name = "tablebook")]
#[command(version, about = "Book restaurant tables and manage the floor", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "TABLEBOOK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "TABLEBOOK_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u64>,

    /// Disable automatic database initialization
    #[arg(long, global = true, env = "TABLEBOOK_DISABLE_AUTOINIT")]
    pub disable_autoinit: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and database
    Init(InitCommand),

    /// Show opening hours
    Hours(HoursCommand),

    /// List bookable time slots for a date
    Slots(SlotsCommand),

    /// List tables free for a party at a date and time
    Available(AvailableCommand),

    /// Book a table
    Book(BookCommand),

    /// Change the date, time, table, party size or notes of a reservation
    Modify(ModifyCommand),

    /// Confirm, cancel, complete or mark a reservation as a no-show
    Transition(TransitionCommand),

    /// List reservations
    List(ListCommand),

    /// Manage tables
    Tables(TablesCommand),

    /// Show daily statistics
    Report(ReportCommand),

    /// Return idle RESERVED and OCCUPIED tables to AVAILABLE
    Sweep(SweepCommand),

    /// Search reservations and tables
    Search(SearchCommand),

    /// Validate a configuration file
    Validate(ValidateCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}

//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `init`: Initialize the data directory and database
//! - `hours`: Show opening hours
//! - `slots`: List bookable time slots for a date
//! - `available`: List tables free for a party
//! - `book`: Book a table
//! - `modify`: Change a confirmed reservation
//! - `transition`: Move a reservation through its lifecycle
//! - `list`: List reservations
//! - `tables`: Manage tables and the floor plan
//! - `report`: Show daily statistics
//! - `sweep`: Release idle tables
//! - `search`: Search reservations and tables
//! - `validate`: Validate a configuration file
//! - `completions`: Generate shell completion scripts

pub mod available;
pub mod book;
pub mod completions;
pub mod hours;
pub mod init;
pub mod list;
pub mod modify;
pub mod report;
pub mod search;
pub mod slots;
pub mod sweep;
pub mod tables;
pub mod transition;
pub mod validate;

pub use available::AvailableCommand;
pub use book::BookCommand;
pub use completions::CompletionsCommand;
pub use hours::HoursCommand;
pub use init::InitCommand;
pub use list::ListCommand;
pub use modify::ModifyCommand;
pub use report::ReportCommand;
pub use search::SearchCommand;
pub use slots::SlotsCommand;
pub use sweep::SweepCommand;
pub use tables::TablesCommand;
pub use transition::TransitionCommand;
pub use validate::ValidateCommand;

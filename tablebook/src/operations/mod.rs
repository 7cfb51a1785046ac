//! Booking and floor operations using the plan-execute pattern.
//!
//! Every write goes through two phases:
//! 1. **Planning**: a `*Plan` type reads the store, checks the request and
//!    returns an [`OperationPlan`] describing the writes, or an error.
//! 2. **Execution**: [`PlanExecutor`] applies all actions of the plan in one
//!    write transaction, or reports them in dry-run mode.
//!
//! Planning-time checks are advisory. The store re-checks slot ownership and
//! status guards while executing, so a plan that raced another writer fails
//! with a conflict instead of overwriting it.
//!
//! # Examples
//!
//! ```no_run
//! use tablebook::operations::{BookOptions, BookPlan, PlanExecutor};
//! use tablebook::{ConfigBuilder, Customer, Database, DatabaseConfig, NewReservation, TableId};
//! use chrono::NaiveDate;
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/tablebook.db")).unwrap();
//! let config = ConfigBuilder::new().build().unwrap();
//!
//! let customer = Customer::new("Ada Lovelace", "ada@example.com", None).unwrap();
//! let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
//! let request = NewReservation::builder(customer, date, "18:00".parse().unwrap(), TableId(5), 4)
//!     .build()
//!     .unwrap();
//!
//! let plan = BookPlan::new(BookOptions::new(request), &config)
//!     .build_plan(db.connection())
//!     .unwrap();
//! let result = PlanExecutor::new(&mut db).execute(&plan).unwrap();
//! println!("Booked {}", result.reservation.unwrap().code);
//! ```

pub mod book;
pub mod cleanup;
pub mod executor;
pub mod init;
pub mod modify;
pub mod plan;
pub mod reports;
pub mod search;
pub mod tables;
pub mod transition;

#[cfg(test)]
mod proptests;

pub use book::{BookOptions, BookPlan};
pub use cleanup::{CleanupOperations, SweepResult};
pub use executor::{ExecutionResult, PlanExecutor};
pub use init::{init_database, InitOptions, InitResult};
pub use modify::{ModifyOptions, ModifyPlan};
pub use plan::{OperationPlan, PlanAction};
pub use reports::DailyStats;
pub use search::{EntityKind, SearchCache, SearchResults};
pub use tables::{CreateTablePlan, MoveTablePlan, RemoveTablePlan, TableStatusPlan};
pub use transition::{TransitionOptions, TransitionPlan};

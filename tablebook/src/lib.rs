#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # tablebook
//!
//! A library for restaurant table reservations: bookable time slots,
//! conflict-free table assignment, reservation and table state machines,
//! and the floor plan that maps table positions to dining zones.
//!
//! ## Core Types
//!
//! - [`SlotTime`] and [`SlotGenerator`]: times of day and bookable slots
//! - [`Reservation`] and [`ReservationStatus`]: bookings and their lifecycle
//! - [`Table`] and [`TableStatus`]: dining tables and their occupancy
//! - [`floorplan::Zone`] and [`floorplan::Position`]: floor-plan geometry
//! - [`Database`]: the SQLite system of record
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use chrono::{NaiveDate, Weekday};
//! use tablebook::{hours_for, FixedClock, SlotGenerator, SlotTime};
//!
//! let sunday = hours_for(Weekday::Sun);
//! assert_eq!(sunday.open.to_string(), "11:30");
//!
//! let now = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let slots: Vec<SlotTime> = SlotGenerator::new(FixedClock::new(now))
//!     .slots_for(NaiveDate::from_ymd_opt(2025, 6, 8).unwrap())
//!     .collect();
//! assert_eq!(slots.first().unwrap().to_string(), "11:30");
//! assert_eq!(slots.last().unwrap().to_string(), "20:00");
//! ```

pub mod availability;
pub mod config;
pub mod database;
pub mod error;
pub mod floorplan;
pub mod logging;
pub mod operations;
pub mod reservation;
pub mod schedule;
pub mod table;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig};
pub use error::{Error, ErrorKind, Result, TableUnavailableReason};
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{ExecutionResult, OperationPlan, PlanAction, PlanExecutor};
pub use reservation::{
    loyalty_points, Actor, Customer, LifecycleRules, NewReservation, PreOrderItem, Reservation,
    ReservationId, ReservationStatus, TransitionAction,
};
pub use schedule::{hours_for, Clock, FixedClock, SlotGenerator, SlotTime, SystemClock};
pub use table::{NewTable, Table, TableId, TableShape, TableStatus};

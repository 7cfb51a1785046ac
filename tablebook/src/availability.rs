//! Table availability: which tables can seat a party at a given slot.
//!
//! [`ConflictChecker`] decides whether an existing reservation blocks a
//! table; [`AvailabilityResolver`] combines it with slot validity,
//! capacity, and maintenance state. [`QueryGate`] lets a caller with several
//! availability queries in flight keep only the newest answer.

mod conflict;
mod gate;
mod resolver;

pub use conflict::{ConflictChecker, ConflictPolicy};
pub use gate::{QueryGate, Ticket};
pub use resolver::{AvailabilityQuery, AvailabilityResolver};

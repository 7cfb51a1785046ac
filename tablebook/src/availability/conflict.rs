//! Reservation conflict detection.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};

use crate::reservation::{Reservation, ReservationId};
use crate::schedule::SlotTime;
use crate::table::TableId;

/// How close two bookings on the same table may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Only the identical `(date, time)` slot conflicts.
    #[default]
    ExactSlot,
    /// Start times closer than `minutes` conflict, across midnight too.
    SeatingWindow {
        /// Minimum gap between two starts on one table.
        minutes: u16,
    },
}

impl ConflictPolicy {
    /// Builds the policy from an optional seating window.
    #[must_use]
    pub const fn from_window(minutes: Option<u16>) -> Self {
        match minutes {
            Some(minutes) if minutes > 0 => Self::SeatingWindow { minutes },
            _ => Self::ExactSlot,
        }
    }

    /// How many days either side of the requested date can hold a
    /// conflicting reservation.
    #[must_use]
    pub const fn day_margin(self) -> i64 {
        match self {
            Self::ExactSlot => 0,
            Self::SeatingWindow { minutes } => (minutes as i64).div_euclid(24 * 60) + 1,
        }
    }
}

/// Decides whether existing reservations block a table.
///
/// Cancelled and no-show reservations never conflict. When modifying a
/// reservation, its own booking is excluded.
///
/// # Examples
///
/// ```
/// use tablebook::availability::{ConflictChecker, ConflictPolicy};
///
/// let checker = ConflictChecker::new(ConflictPolicy::SeatingWindow { minutes: 120 });
/// assert_eq!(checker.policy(), ConflictPolicy::SeatingWindow { minutes: 120 });
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictChecker {
    policy: ConflictPolicy,
}

impl ConflictChecker {
    /// Creates a checker with the given policy.
    #[must_use]
    pub const fn new(policy: ConflictPolicy) -> Self {
        Self { policy }
    }

    /// Returns the checker's policy.
    #[must_use]
    pub const fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    /// Returns `true` if `existing` blocks its table for a booking at
    /// `(date, time)`.
    #[must_use]
    pub fn conflicts(
        &self,
        existing: &Reservation,
        date: NaiveDate,
        time: SlotTime,
        exclude: Option<ReservationId>,
    ) -> bool {
        if !existing.status.holds_slot() || Some(existing.id) == exclude {
            return false;
        }
        match self.policy {
            ConflictPolicy::ExactSlot => existing.date == date && existing.time == time,
            ConflictPolicy::SeatingWindow { minutes } => {
                let requested = date.and_time(time.to_naive_time());
                let gap = (existing.starts_at() - requested).abs();
                gap < Duration::minutes(i64::from(minutes))
            }
        }
    }

    /// Returns the tables blocked at `(date, time)` by any of `reservations`.
    #[must_use]
    pub fn blocked_tables(
        &self,
        reservations: &[Reservation],
        date: NaiveDate,
        time: SlotTime,
        exclude: Option<ReservationId>,
    ) -> HashSet<TableId> {
        reservations
            .iter()
            .filter(|r| self.conflicts(r, date, time, exclude))
            .map(|r| r.table_id)
            .collect()
    }
}

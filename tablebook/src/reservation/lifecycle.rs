//! Reservation status transitions.
//!
//! ```text
//! PENDING ──confirm──▶ CONFIRMED ──complete──▶ COMPLETED
//!    │                    │  └──────no-show──▶ NO_SHOW
//!    └──────cancel────────┴──────cancel──────▶ CANCELLED
//! ```
//!
//! COMPLETED, CANCELLED and `NO_SHOW` are terminal. Only staff and admin may
//! confirm, complete, or mark a no-show; customers may cancel their own
//! booking given enough notice.

use chrono::{Duration, NaiveDateTime};

use super::{Actor, Reservation, ReservationStatus, TransitionAction};
use crate::error::{Error, Result};

/// Tunable lifecycle parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleRules {
    /// Points earned per guest when a reservation is completed.
    pub loyalty_points_per_guest: u32,
    /// Minimum notice, in hours, for a customer cancellation.
    pub cancellation_notice_hours: u32,
}

impl Default for LifecycleRules {
    fn default() -> Self {
        Self {
            loyalty_points_per_guest: 10,
            cancellation_notice_hours: 2,
        }
    }
}

/// Points earned by a completed party.
///
/// # Examples
///
/// ```
/// use tablebook::loyalty_points;
///
/// assert_eq!(loyalty_points(4, 10), 40);
/// ```
#[must_use]
pub const fn loyalty_points(guests: u32, per_guest: u32) -> u32 {
    guests.saturating_mul(per_guest)
}

/// Checks whether `actor` may apply `action` to `reservation` at `now`, and
/// returns the resulting status.
///
/// Checks run in a fixed order: terminal state, actor permission, legality
/// from the current status, then the customer notice window.
///
/// # Errors
///
/// - [`Error::TerminalState`] if the reservation is already finished
/// - [`Error::Forbidden`] if the actor may not perform the action
/// - [`Error::IllegalTransition`] if the action does not apply to the
///   current status
/// - [`Error::CancellationWindowClosed`] for a late customer cancellation
pub fn check_transition(
    reservation: &Reservation,
    action: TransitionAction,
    actor: Actor,
    now: NaiveDateTime,
    rules: &LifecycleRules,
) -> Result<ReservationStatus> {
    let from = reservation.status;
    if from.is_terminal() {
        return Err(Error::TerminalState {
            code: reservation.code.clone(),
            status: from,
        });
    }

    let permitted = actor.is_staff() || action == TransitionAction::Cancel;
    if !permitted {
        return Err(Error::Forbidden { actor, action });
    }

    let legal = match action {
        TransitionAction::Confirm => from == ReservationStatus::Pending,
        TransitionAction::Cancel => from.is_active(),
        TransitionAction::Complete | TransitionAction::NoShow => {
            from == ReservationStatus::Confirmed
        }
    };
    if !legal {
        return Err(Error::IllegalTransition {
            code: reservation.code.clone(),
            from,
            action,
        });
    }

    if action == TransitionAction::Cancel && actor == Actor::Customer {
        let notice = Duration::hours(i64::from(rules.cancellation_notice_hours));
        if reservation.starts_at() - now < notice {
            return Err(Error::CancellationWindowClosed {
                code: reservation.code.clone(),
                hours: rules.cancellation_notice_hours,
            });
        }
    }

    Ok(action.target())
}

/// Checks that a reservation may be modified.
///
/// # Errors
///
/// Returns a validation error unless the reservation is CONFIRMED.
pub fn check_modifiable(reservation: &Reservation) -> Result<()> {
    if reservation.status == ReservationStatus::Confirmed {
        Ok(())
    } else {
        Err(Error::validation(
            "status",
            format!(
                "reservation {} is {}; only confirmed reservations can be modified",
                reservation.code, reservation.status
            ),
        ))
    }
}

//! Reservation status transitions.

use rusqlite::Connection;

use crate::config::Config;
use crate::database::{Database, StatusUpdate};
use crate::error::{Error, Result};
use crate::reservation::lifecycle::check_transition;
use crate::reservation::{loyalty_points, normalize_note, Actor, ReservationId, TransitionAction};
use crate::schedule::{Clock, SystemClock};

use super::book::hold_table;
use super::plan::{OperationPlan, PlanAction};

/// Options for a status transition.
#[derive(Debug, Clone)]
pub struct TransitionOptions {
    /// Reservation to transition.
    pub id: ReservationId,
    /// The action to apply.
    pub action: TransitionAction,
    /// Who is acting.
    pub actor: Actor,
    /// Cancellation reason. Only recorded for cancellations.
    pub reason: Option<String>,
}

impl TransitionOptions {
    /// Creates transition options.
    #[must_use]
    pub const fn new(id: ReservationId, action: TransitionAction, actor: Actor) -> Self {
        Self {
            id,
            action,
            actor,
            reason: None,
        }
    }

    /// Sets the cancellation reason.
    #[must_use]
    pub fn with_reason(mut self, reason: Option<String>) -> Self {
        self.reason = reason;
        self
    }
}

/// Plans a confirm, cancel, complete, or no-show transition.
///
/// Completion records `guests × loyalty_points_per_guest` points. The
/// store applies a status change only if the reservation still has the
/// status it was planned from, so points are never granted twice.
///
/// # Examples
///
/// ```no_run
/// use tablebook::config::ConfigBuilder;
/// use tablebook::operations::{PlanExecutor, TransitionOptions, TransitionPlan};
/// use tablebook::{Actor, Database, DatabaseConfig, ReservationId, TransitionAction};
///
/// let config = ConfigBuilder::new().build().unwrap();
/// let mut db = Database::open(DatabaseConfig::new("/tmp/tablebook.db")).unwrap();
/// let options = TransitionOptions::new(ReservationId(1), TransitionAction::Complete, Actor::Staff);
/// let plan = TransitionPlan::new(options, &config).build_plan(db.connection()).unwrap();
/// let done = PlanExecutor::new(&mut db).execute(&plan).unwrap();
/// println!("{:?} points", done.reservation.unwrap().loyalty_points);
/// ```
pub struct TransitionPlan<'a, C = SystemClock> {
    options: TransitionOptions,
    config: &'a Config,
    clock: C,
}

impl<'a> TransitionPlan<'a> {
    /// Creates a transition planner using the system clock.
    #[must_use]
    pub const fn new(options: TransitionOptions, config: &'a Config) -> Self {
        Self {
            options,
            config,
            clock: SystemClock,
        }
    }
}

impl<'a, C: Clock> TransitionPlan<'a, C> {
    /// Replaces the clock used for "now".
    #[must_use]
    pub fn with_clock<D: Clock>(self, clock: D) -> TransitionPlan<'a, D> {
        TransitionPlan {
            options: self.options,
            config: self.config,
            clock,
        }
    }

    /// Builds the plan for this transition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown reservation, or the
    /// lifecycle error for a terminal, forbidden, illegal, or late change.
    pub fn build_plan(&self, conn: &Connection) -> Result<OperationPlan> {
        let TransitionOptions {
            id,
            action,
            actor,
            ref reason,
        } = self.options;
        let reservation = Database::get_reservation(conn, id)?.ok_or_else(|| Error::NotFound {
            resource: format!("reservation {}", id.code()),
        })?;

        let now = self.clock.now();
        let rules = self.config.lifecycle_rules();
        let to = check_transition(&reservation, action, actor, now, &rules)?;

        let cancelling = action == TransitionAction::Cancel;
        let update = StatusUpdate {
            from: reservation.status,
            to,
            loyalty_points: (action == TransitionAction::Complete)
                .then(|| loyalty_points(reservation.guests, rules.loyalty_points_per_guest)),
            cancellation_reason: if cancelling { normalize_note(reason.clone()) } else { None },
            cancelled_at: cancelling.then_some(now),
        };

        let mut plan = OperationPlan::new(format!("{action} reservation {}", reservation.code))
            .add_action(PlanAction::SetReservationStatus {
                id,
                code: reservation.code.clone(),
                update,
                at: now,
            });

        if !cancelling && reason.as_deref().is_some_and(|r| !r.trim().is_empty()) {
            plan = plan.add_warning(format!(
                "a reason is only recorded for cancellations; ignored for {action}"
            ));
        }

        if action == TransitionAction::Confirm {
            if let Some(table) = Database::get_table(conn, reservation.table_id)? {
                let lead = self.config.reserve_lead();
                if let Some(hold) = hold_table(&table, reservation.starts_at(), now, lead) {
                    plan = plan.add_action(hold);
                }
            }
        }

        log::debug!("Planned {action} of {} by {actor}", reservation.code);
        Ok(plan)
    }
}

//! Plan types for booking and floor operations.
//!
//! A plan describes the writes an operation will make, without making
//! them. Plans are built from a read of the store and applied by the
//! [`PlanExecutor`](super::PlanExecutor) inside one write transaction.

use chrono::NaiveDateTime;

use crate::availability::ConflictPolicy;
use crate::database::{ScheduleUpdate, StatusUpdate};
use crate::floorplan::{Position, Zone};
use crate::reservation::{NewReservation, ReservationId, ReservationStatus};
use crate::table::{NewTable, TableId, TableStatus};

/// A single write to be made during plan execution.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanAction {
    /// Store a new reservation.
    CreateReservation {
        /// The booking request.
        request: NewReservation,
        /// Initial status.
        status: ReservationStatus,
        /// Creation timestamp.
        at: NaiveDateTime,
    },

    /// Rewrite the schedule and notes of a confirmed reservation.
    UpdateSchedule {
        /// Reservation to update.
        id: ReservationId,
        /// Its code, for reporting.
        code: String,
        /// The new schedule.
        update: ScheduleUpdate,
        /// Modification timestamp.
        at: NaiveDateTime,
    },

    /// Move a reservation to a new status.
    SetReservationStatus {
        /// Reservation to update.
        id: ReservationId,
        /// Its code, for reporting.
        code: String,
        /// The guarded status change.
        update: StatusUpdate,
        /// Modification timestamp.
        at: NaiveDateTime,
    },

    /// Set a table's occupancy status.
    SetTableStatus {
        /// Table to update.
        id: TableId,
        /// Its display number, for reporting.
        number: u32,
        /// The new status.
        status: TableStatus,
    },

    /// Store a table's position and derived zone.
    MoveTable {
        /// Table to move.
        id: TableId,
        /// Its display number, for reporting.
        number: u32,
        /// The new canvas position.
        position: Position,
        /// The zone containing `position`.
        zone: Zone,
    },

    /// Store a new table.
    CreateTable {
        /// The table to create.
        table: NewTable,
        /// Creation timestamp.
        at: NaiveDateTime,
    },

    /// Delete a table.
    DeleteTable {
        /// Table to delete.
        id: TableId,
        /// Its display number, for reporting.
        number: u32,
    },
}

impl PlanAction {
    /// Returns a human-readable description of this action.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::CreateReservation {
                request, status, ..
            } => format!(
                "Create {status} reservation for {} ({} guest(s)) on {} at {}",
                request.customer.name, request.guests, request.date, request.time
            ),
            Self::UpdateSchedule { code, update, .. } => format!(
                "Move reservation {code} to {} at {} ({} guest(s))",
                update.date, update.time, update.guests
            ),
            Self::SetReservationStatus { code, update, .. } => {
                format!("Change reservation {code} from {} to {}", update.from, update.to)
            }
            Self::SetTableStatus { number, status, .. } => {
                format!("Mark table {number} {status}")
            }
            Self::MoveTable {
                number,
                position,
                zone,
                ..
            } => format!("Move table {number} to {position} in {zone}"),
            Self::CreateTable { table, .. } => format!(
                "Create table {} seating {} in {}",
                table.number, table.capacity, table.zone
            ),
            Self::DeleteTable { number, .. } => format!("Delete table {number}"),
        }
    }
}

/// A complete operation plan describing all actions to be taken.
///
/// Plans are generated during the planning phase and can be inspected,
/// logged, or executed. They include a description, a sequence of actions,
/// and any warnings that should be communicated to the user.
#[derive(Debug, Clone)]
pub struct OperationPlan {
    /// A human-readable description of the operation.
    pub description: String,

    /// The sequence of actions to perform.
    pub actions: Vec<PlanAction>,

    /// Warnings to communicate to the user.
    pub warnings: Vec<String>,

    /// Rule the executor re-applies to reservation writes at commit.
    pub conflict_policy: ConflictPolicy,
}

impl OperationPlan {
    /// Creates a new operation plan with the given description.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablebook::operations::OperationPlan;
    ///
    /// let plan = OperationPlan::new("Delete table 4");
    /// assert_eq!(plan.description, "Delete table 4");
    /// assert!(plan.is_empty());
    /// ```
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            actions: Vec::new(),
            warnings: Vec::new(),
            conflict_policy: ConflictPolicy::ExactSlot,
        }
    }

    /// Adds an action to the plan.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablebook::operations::{OperationPlan, PlanAction};
    /// use tablebook::{TableId, TableStatus};
    ///
    /// let plan = OperationPlan::new("Close table 4").add_action(PlanAction::SetTableStatus {
    ///     id: TableId(4),
    ///     number: 4,
    ///     status: TableStatus::Maintenance,
    /// });
    /// assert_eq!(plan.len(), 1);
    /// ```
    #[must_use]
    pub fn add_action(mut self, action: PlanAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Adds a warning to the plan.
    #[must_use]
    pub fn add_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Sets the conflict rule checked again when reservations are written.
    #[must_use]
    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    /// Checks if the plan has no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the number of actions in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }
}

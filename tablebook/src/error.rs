//! Error types for the tablebook library.
//!
//! This module provides the error hierarchy for every operation in the
//! library, using `thiserror` for ergonomic error handling. Each error also
//! carries an [`ErrorKind`] so callers can decide how to recover (show the
//! message, re-fetch availability, retry later) without matching on every
//! variant.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::reservation::{Actor, ReservationStatus, TransitionAction};
use crate::schedule::SlotTime;

/// Result type alias for operations that may fail with a tablebook error.
///
/// # Examples
///
/// ```
/// use tablebook::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(4)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the tablebook library.
#[derive(Debug, Error)]
pub enum Error {
    /// An invalid time of day was provided.
    #[error("invalid time '{value}': {reason}")]
    InvalidTime {
        /// The rejected input.
        value: String,
        /// The reason the time is invalid.
        reason: String,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A stored payload could not be encoded or decoded.
    #[error("payload error: {0}")]
    Payload(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// No table can seat the party at the requested date and time.
    #[error("no tables available for {party_size} guest(s) on {date} at {time}")]
    NoTablesAvailable {
        /// Requested date.
        date: NaiveDate,
        /// Requested time.
        time: SlotTime,
        /// Requested party size.
        party_size: u32,
    },

    /// A specific table cannot be used for the requested booking.
    #[error("table {table_number} is not available: {reason}")]
    TableUnavailable {
        /// The table's display number.
        table_number: u32,
        /// Why the table was rejected.
        reason: TableUnavailableReason,
    },

    /// The slot was claimed by another booking between the availability
    /// check and the commit.
    #[error(
        "table {table_number} was booked for {date} at {time} by another request; \
         refresh availability and choose again"
    )]
    SlotTaken {
        /// The table's display number.
        table_number: u32,
        /// Booked date.
        date: NaiveDate,
        /// Booked time.
        time: SlotTime,
    },

    /// A record changed between planning and commit.
    #[error("{resource} changed while the request was in flight; reload and try again")]
    Stale {
        /// The record that changed.
        resource: String,
    },

    /// The action is not legal from the reservation's current status.
    #[error("cannot {action} reservation {code}: status is {from}")]
    IllegalTransition {
        /// Reservation code.
        code: String,
        /// Current status.
        from: ReservationStatus,
        /// Attempted action.
        action: TransitionAction,
    },

    /// The reservation is in a terminal status and accepts no further change.
    #[error("reservation {code} is {status}; no further changes are allowed")]
    TerminalState {
        /// Reservation code.
        code: String,
        /// The terminal status.
        status: ReservationStatus,
    },

    /// The actor is not permitted to perform the action.
    #[error("{actor} may not {action} a reservation")]
    Forbidden {
        /// Who attempted the action.
        actor: Actor,
        /// Attempted action.
        action: TransitionAction,
    },

    /// A customer cancellation came too close to the reservation start.
    #[error("reservation {code} can only be cancelled at least {hours} hour(s) in advance")]
    CancellationWindowClosed {
        /// Reservation code.
        code: String,
        /// Required notice in hours.
        hours: u32,
    },

    /// A table number is already taken.
    #[error("table number {number} already exists")]
    DuplicateTableNumber {
        /// The duplicated number.
        number: u32,
    },

    /// A table cannot be removed while reservations reference it.
    #[error("table {table_number} is referenced by {count} reservation(s)")]
    TableInUse {
        /// The table's display number.
        table_number: u32,
        /// Number of referencing reservations.
        count: usize,
    },

    /// A database lock timeout occurred.
    #[error("database lock timeout after {seconds}s")]
    LockTimeout {
        /// The number of seconds waited before timing out.
        seconds: u64,
    },

    /// The data directory was not found and auto-initialization is disabled.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryNotFound {
        /// The expected path to the data directory.
        path: PathBuf,
    },

    /// Database corruption was detected.
    #[error("database corruption detected: {details}")]
    DatabaseCorruption {
        /// Details about the corruption.
        details: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: u32,
        /// The schema version found in the database.
        found: u32,
    },
}

/// Reason a specific table was rejected for a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableUnavailableReason {
    /// The party is larger than the table's capacity.
    Capacity,
    /// The table is under maintenance.
    Maintenance,
    /// Another active reservation holds the slot.
    Booked,
}

impl fmt::Display for TableUnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capacity => write!(f, "party exceeds capacity"),
            Self::Maintenance => write!(f, "under maintenance"),
            Self::Booked => write!(f, "already booked"),
        }
    }
}

/// Broad classification of an [`Error`], used to pick a recovery path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input or a rule violation; show the message verbatim.
    Validation,
    /// Another request got there first; re-fetch and let the user re-select.
    Conflict,
    /// Temporary failure; prompt the user to retry.
    Transient,
    /// The reservation is finished and cannot change.
    TerminalState,
    /// The referenced record does not exist.
    NotFound,
    /// Storage, configuration, or I/O failure.
    Internal,
}

impl Error {
    /// Classifies this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablebook::{Error, ErrorKind};
    ///
    /// let err = Error::NotFound { resource: "reservation RES-0001".into() };
    /// assert_eq!(err.kind(), ErrorKind::NotFound);
    /// ```
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidTime { .. }
            | Self::Validation { .. }
            | Self::NoTablesAvailable { .. }
            | Self::TableUnavailable { .. }
            | Self::IllegalTransition { .. }
            | Self::Forbidden { .. }
            | Self::CancellationWindowClosed { .. } => ErrorKind::Validation,
            Self::SlotTaken { .. }
            | Self::Stale { .. }
            | Self::DuplicateTableNumber { .. }
            | Self::TableInUse { .. } => ErrorKind::Conflict,
            Self::LockTimeout { .. } => ErrorKind::Transient,
            Self::Database(e) if is_busy(e) => ErrorKind::Transient,
            Self::TerminalState { .. } => ErrorKind::TerminalState,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Database(_)
            | Self::Configuration(_)
            | Self::Payload(_)
            | Self::Io(_)
            | Self::DataDirectoryNotFound { .. }
            | Self::DatabaseCorruption { .. }
            | Self::UnsupportedSchemaVersion { .. } => ErrorKind::Internal,
        }
    }

    /// Convenience constructor for validation errors.
    pub(crate) fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<crate::schedule::InvalidTimeError> for Error {
    fn from(err: crate::schedule::InvalidTimeError) -> Self {
        Self::InvalidTime {
            value: err.value,
            reason: err.reason,
        }
    }
}

fn is_busy(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if matches!(
                e.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            )
    )
}

//! Configuration schema definitions.
//!
//! Every field is optional so that partial files can be layered; the
//! accessor methods on [`Config`] supply the built-in defaults for anything
//! left unset.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::availability::ConflictPolicy;
use crate::error::{Error, Result};
use crate::reservation::LifecycleRules;

/// Default loyalty points earned per guest on completion.
pub const DEFAULT_LOYALTY_POINTS_PER_GUEST: u32 = 10;

/// Default minimum notice, in hours, for a customer cancellation.
pub const DEFAULT_CANCELLATION_NOTICE_HOURS: u32 = 2;

/// Default window, in minutes, within which a booking marks its table
/// RESERVED and the idle sweep treats a table as in use.
pub const DEFAULT_RESERVE_LEAD_MINUTES: u32 = 120;

/// Default maximum wait for a database lock, in seconds.
pub const DEFAULT_LOCK_WAIT_SECONDS: u64 = 5;

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use tablebook::config::Config;
///
/// let config = Config {
///     auto_confirm: Some(false),
///     seating_window_minutes: Some(120),
///     ..Default::default()
/// };
/// assert!(!config.auto_confirm());
/// assert_eq!(config.lifecycle_rules().loyalty_points_per_guest, 10);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Create reservations as CONFIRMED rather than PENDING.
    pub auto_confirm: Option<bool>,

    /// Loyalty points earned per guest when a reservation completes.
    pub loyalty_points_per_guest: Option<u32>,

    /// Minimum notice, in hours, a customer must give to cancel.
    pub cancellation_notice_hours: Option<u32>,

    /// When set, bookings on one table must start at least this many
    /// minutes apart. Unset means only identical slots conflict.
    pub seating_window_minutes: Option<u16>,

    /// Lead time, in minutes, for marking tables RESERVED and for the idle
    /// table sweep.
    pub reserve_lead_minutes: Option<u32>,

    /// Maximum time to wait for database lock acquisition (seconds).
    pub maximum_lock_wait_seconds: Option<u64>,

    /// Disable automatic database initialization.
    pub disable_autoinit: Option<bool>,

    /// Output format for list commands.
    pub output_format: Option<OutputFormat>,
}

impl Config {
    /// The built-in defaults with every field populated.
    #[must_use]
    pub const fn defaults() -> Self {
        Self {
            auto_confirm: Some(true),
            loyalty_points_per_guest: Some(DEFAULT_LOYALTY_POINTS_PER_GUEST),
            cancellation_notice_hours: Some(DEFAULT_CANCELLATION_NOTICE_HOURS),
            seating_window_minutes: None,
            reserve_lead_minutes: Some(DEFAULT_RESERVE_LEAD_MINUTES),
            maximum_lock_wait_seconds: Some(DEFAULT_LOCK_WAIT_SECONDS),
            disable_autoinit: Some(false),
            output_format: Some(OutputFormat::Table),
        }
    }

    /// Whether new reservations start out CONFIRMED.
    #[must_use]
    pub fn auto_confirm(&self) -> bool {
        self.auto_confirm.unwrap_or(true)
    }

    /// Lifecycle parameters derived from this configuration.
    #[must_use]
    pub fn lifecycle_rules(&self) -> LifecycleRules {
        LifecycleRules {
            loyalty_points_per_guest: self
                .loyalty_points_per_guest
                .unwrap_or(DEFAULT_LOYALTY_POINTS_PER_GUEST),
            cancellation_notice_hours: self
                .cancellation_notice_hours
                .unwrap_or(DEFAULT_CANCELLATION_NOTICE_HOURS),
        }
    }

    /// The conflict policy derived from `seating_window_minutes`.
    #[must_use]
    pub const fn conflict_policy(&self) -> ConflictPolicy {
        ConflictPolicy::from_window(self.seating_window_minutes)
    }

    /// The reserve lead time.
    #[must_use]
    pub fn reserve_lead(&self) -> Duration {
        Duration::minutes(i64::from(
            self.reserve_lead_minutes
                .unwrap_or(DEFAULT_RESERVE_LEAD_MINUTES),
        ))
    }

    /// The maximum lock wait.
    #[must_use]
    pub fn lock_wait(&self) -> std::time::Duration {
        std::time::Duration::from_secs(
            self.maximum_lock_wait_seconds
                .unwrap_or(DEFAULT_LOCK_WAIT_SECONDS),
        )
    }
}

/// Output format for list commands.
///
/// # Examples
///
/// ```
/// use tablebook::config::OutputFormat;
///
/// let format: OutputFormat = "csv".parse().unwrap();
/// assert_eq!(format, OutputFormat::Csv);
/// assert_eq!(OutputFormat::Json.to_string(), "json");
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output format.
    Json,
    /// CSV output format.
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(Error::validation(
                "output_format",
                format!("unknown output format '{s}' (expected table, json or csv)"),
            )),
        }
    }
}

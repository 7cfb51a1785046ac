//! Configuration validation.

use crate::config::schema::Config;
use crate::error::{Error, Result};
use crate::schedule::MINUTES_PER_DAY;

/// Largest accepted `loyalty_points_per_guest`.
pub const MAX_LOYALTY_POINTS_PER_GUEST: u32 = 1000;

/// Largest accepted `cancellation_notice_hours` (one week).
pub const MAX_CANCELLATION_NOTICE_HOURS: u32 = 7 * 24;

/// Largest accepted `maximum_lock_wait_seconds`.
pub const MAX_LOCK_WAIT_SECONDS: u64 = 3600;

/// Validates configuration values.
///
/// # Examples
///
/// ```
/// use tablebook::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::default()).unwrap();
///
/// let bad = Config { reserve_lead_minutes: Some(0), ..Default::default() };
/// assert!(ConfigValidator::validate(&bad).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration. Unset fields are always valid.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first out-of-range field.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(points) = config.loyalty_points_per_guest {
            if points > MAX_LOYALTY_POINTS_PER_GUEST {
                return Err(Error::validation(
                    "loyalty_points_per_guest",
                    format!("must be at most {MAX_LOYALTY_POINTS_PER_GUEST}"),
                ));
            }
        }

        if let Some(hours) = config.cancellation_notice_hours {
            if hours > MAX_CANCELLATION_NOTICE_HOURS {
                return Err(Error::validation(
                    "cancellation_notice_hours",
                    format!("must be at most {MAX_CANCELLATION_NOTICE_HOURS}"),
                ));
            }
        }

        if let Some(window) = config.seating_window_minutes {
            Self::validate_minutes("seating_window_minutes", u32::from(window))?;
        }

        if let Some(lead) = config.reserve_lead_minutes {
            Self::validate_minutes("reserve_lead_minutes", lead)?;
        }

        if let Some(timeout) = config.maximum_lock_wait_seconds {
            if timeout == 0 || timeout > MAX_LOCK_WAIT_SECONDS {
                return Err(Error::validation(
                    "maximum_lock_wait_seconds",
                    format!("must be between 1 and {MAX_LOCK_WAIT_SECONDS}"),
                ));
            }
        }

        Ok(())
    }

    fn validate_minutes(field: &str, minutes: u32) -> Result<()> {
        if minutes == 0 || minutes > u32::from(MINUTES_PER_DAY) {
            return Err(Error::validation(
                field,
                format!("must be between 1 and {MINUTES_PER_DAY} minutes"),
            ));
        }
        Ok(())
    }
}
